#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use oasgen_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Document conversion or rendering failure.
    #[display("{}", _0)]
    Core(AppError),

    /// The definition file could not be parsed.
    #[from(ignore)]
    #[display("Invalid definition file: {}", _0)]
    Config(String),
}

/// Manual implementation of the standard Error trait.
///
/// `Config` carries a plain string, so `source()` is left at its default.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
