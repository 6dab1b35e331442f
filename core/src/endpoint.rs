//! # Endpoint Definitions
//!
//! The declarative input of a conversion: one [`EndpointDefinition`] per API
//! operation, generic over the schema tree used for parameters and bodies.

use crate::schema::TypeSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods an endpoint may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
}

impl Method {
    /// The lowercase key used inside an OpenAPI path item.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
            Method::Head => "head",
            Method::Options => "options",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a declared parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamType {
    /// A `:name` placeholder in the path.
    Path,
    /// A query string entry.
    Query,
    /// A request header.
    Header,
    /// The JSON request body.
    Body,
}

impl ParamType {
    /// The OpenAPI `in` value. `None` for bodies, which are not parameters.
    pub fn location(&self) -> Option<&'static str> {
        match self {
            ParamType::Path => Some("path"),
            ParamType::Query => Some("query"),
            ParamType::Header => Some("header"),
            ParamType::Body => None,
        }
    }
}

/// A declared endpoint parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec<S = TypeSchema> {
    /// Parameter name (path placeholder, query key, header name).
    pub name: String,
    /// Parameter location.
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Human text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value schema.
    pub schema: S,
}

impl<S> ParameterSpec<S> {
    /// Creates a parameter without description.
    pub fn new(name: impl Into<String>, param_type: ParamType, schema: S) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: None,
            schema,
        }
    }

    /// A path parameter.
    pub fn path(name: impl Into<String>, schema: S) -> Self {
        Self::new(name, ParamType::Path, schema)
    }

    /// A query parameter.
    pub fn query(name: impl Into<String>, schema: S) -> Self {
        Self::new(name, ParamType::Query, schema)
    }

    /// A header parameter.
    pub fn header(name: impl Into<String>, schema: S) -> Self {
        Self::new(name, ParamType::Header, schema)
    }

    /// The request body.
    pub fn body(name: impl Into<String>, schema: S) -> Self {
        Self::new(name, ParamType::Body, schema)
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Response key of a declared error: a status code or `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawErrorStatus", into = "RawErrorStatus")]
pub enum ErrorStatus {
    /// A numeric HTTP status.
    Code(u16),
    /// The catch-all `default` response.
    Default,
}

impl ErrorStatus {
    /// The key used in the OpenAPI responses map.
    pub fn key(&self) -> String {
        match self {
            ErrorStatus::Code(code) => code.to_string(),
            ErrorStatus::Default => "default".to_string(),
        }
    }
}

impl From<u16> for ErrorStatus {
    fn from(code: u16) -> Self {
        ErrorStatus::Code(code)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawErrorStatus {
    Code(u16),
    Keyword(String),
}

impl TryFrom<RawErrorStatus> for ErrorStatus {
    type Error = String;

    fn try_from(raw: RawErrorStatus) -> Result<Self, Self::Error> {
        match raw {
            RawErrorStatus::Code(code) => Ok(ErrorStatus::Code(code)),
            RawErrorStatus::Keyword(k) if k == "default" => Ok(ErrorStatus::Default),
            RawErrorStatus::Keyword(k) => Err(format!(
                "error status must be a number or \"default\", got \"{}\"",
                k
            )),
        }
    }
}

impl From<ErrorStatus> for RawErrorStatus {
    fn from(status: ErrorStatus) -> Self {
        match status {
            ErrorStatus::Code(code) => RawErrorStatus::Code(code),
            ErrorStatus::Default => RawErrorStatus::Keyword("default".to_string()),
        }
    }
}

/// A declared error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSpec<S = TypeSchema> {
    /// Status code or `default`.
    pub status: ErrorStatus,
    /// Response description; "Error" when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Response body schema.
    pub schema: S,
}

impl<S> ErrorSpec<S> {
    /// Creates an error response without description.
    pub fn new(status: impl Into<ErrorStatus>, schema: S) -> Self {
        Self {
            status: status.into(),
            description: None,
            schema,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One API operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDefinition<S = TypeSchema> {
    /// HTTP method.
    pub method: Method,
    /// Path with `:name` placeholders, optionally followed by `?query` and `#fragment`.
    pub path: String,
    /// Operation id; unique within a document.
    pub alias: String,
    /// Used as both summary and description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared parameters, in order.
    #[serde(default = "Vec::new")]
    pub parameters: Vec<ParameterSpec<S>>,
    /// Success response schema.
    pub response: S,
    /// Declared error responses, in order.
    #[serde(default = "Vec::new")]
    pub errors: Vec<ErrorSpec<S>>,
    /// Success status code; 200 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl<S> EndpointDefinition<S> {
    /// Creates an endpoint with no parameters or errors.
    pub fn new(method: Method, path: impl Into<String>, alias: impl Into<String>, response: S) -> Self {
        Self {
            method,
            path: path.into(),
            alias: alias.into(),
            description: None,
            parameters: Vec::new(),
            response,
            errors: Vec::new(),
            status: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a parameter.
    pub fn with_parameter(mut self, parameter: ParameterSpec<S>) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Appends an error response.
    pub fn with_error(mut self, error: ErrorSpec<S>) -> Self {
        self.errors.push(error);
        self
    }

    /// Sets the success status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// The success status code.
    pub fn success_status(&self) -> u16 {
        self.status.unwrap_or(200)
    }

    /// The first declared body parameter.
    pub fn body(&self) -> Option<&ParameterSpec<S>> {
        self.parameters
            .iter()
            .find(|p| p.param_type == ParamType::Body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_keys() {
        assert_eq!(ErrorStatus::Code(404).key(), "404");
        assert_eq!(ErrorStatus::Default.key(), "default");
    }

    #[test]
    fn test_error_status_deserialize() {
        let code: ErrorStatus = serde_json::from_str("404").unwrap();
        assert_eq!(code, ErrorStatus::Code(404));
        let default: ErrorStatus = serde_json::from_str("\"default\"").unwrap();
        assert_eq!(default, ErrorStatus::Default);
        assert!(serde_json::from_str::<ErrorStatus>("\"oops\"").is_err());
    }

    #[test]
    fn test_deserialize_endpoint() {
        let yaml = r#"
method: get
path: /users/:id
alias: getUser
parameters:
  - name: id
    type: Path
    schema:
      type: string
response:
  type: object
  properties:
    id:
      type: string
errors:
  - status: default
    schema:
      type: any
"#;
        let endpoint: EndpointDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(endpoint.method, Method::Get);
        assert_eq!(endpoint.success_status(), 200);
        assert_eq!(endpoint.parameters[0].param_type, ParamType::Path);
        assert_eq!(endpoint.errors[0].status, ErrorStatus::Default);
    }

    #[test]
    fn test_first_body_wins() {
        let endpoint = EndpointDefinition::new(Method::Post, "/users", "createUser", TypeSchema::any())
            .with_parameter(ParameterSpec::body("first", TypeSchema::string()))
            .with_parameter(ParameterSpec::body("second", TypeSchema::number()));
        assert_eq!(endpoint.body().map(|b| b.name.as_str()), Some("first"));
    }
}
