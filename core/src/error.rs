//! # Error Handling
//!
//! Provides the unified `AppError` enum returned by document conversion.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Conversion has no recoverable failure modes under valid input; every
/// variant here is a caller contract violation or a rendering failure.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// A protected API group or global requirement names a scheme that was never registered.
    #[from(ignore)]
    #[display("Unknown security scheme: '{_0}'")]
    UnknownSecurityScheme(String),

    /// The `info` object is unusable (empty title or version).
    #[from(ignore)]
    #[display("Invalid info object: {_0}")]
    InvalidInfo(String),

    /// JSON rendering failure.
    #[display("JSON Error: {_0}")]
    Serialization(serde_json::Error),

    /// YAML rendering failure.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_info_display() {
        let app_err = AppError::InvalidInfo("title must not be empty".into());
        assert_eq!(app_err.to_string(), "Invalid info object: title must not be empty");
    }

    #[test]
    fn test_unknown_scheme_display() {
        let app_err = AppError::UnknownSecurityScheme("oauth".into());
        assert_eq!(format!("{}", app_err), "Unknown security scheme: 'oauth'");
    }

    #[test]
    fn test_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Serialization(_)));
    }
}
