#![deny(missing_docs)]

//! # oasgen Core
//!
//! Converts declarative HTTP endpoint definitions into OpenAPI 3.0 documents.

/// Shared error types.
pub mod error;

/// Endpoint definition model.
pub mod endpoint;

/// Schema capability set and the bundled type-description tree.
pub mod schema;

/// OpenAPI document generation.
pub mod oas;

pub use endpoint::{
    EndpointDefinition, ErrorSpec, ErrorStatus, Method, ParamType, ParameterSpec,
};
pub use error::{AppError, AppResult};
pub use oas::{
    api_key_auth_scheme, basic_auth_scheme, bearer_auth_scheme, convert, oauth2_scheme,
    tags_from_path, ApiKeyLocation, ConvertOptions, OAuthFlow, OAuthFlows, OpenApiBuilder,
    OpenApiContact, OpenApiDocument, OpenApiInfo, OpenApiLicense, OpenApiServer,
    OpenApiServerVariable, SecurityScheme,
};
pub use schema::{export_schema, JsonSchemaTarget, SchemaNode, TypeSchema};
