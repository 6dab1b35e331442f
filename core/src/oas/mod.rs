#![deny(missing_docs)]

//! # OpenAPI Generation Module
//!
//! - **path**: `:name` placeholder detection and `{name}` templating.
//! - **tags**: default tag inference from the path.
//! - **params**: parameter and request body resolution.
//! - **responses**: the status-keyed responses map.
//! - **security**: security scheme constructors.
//! - **info**: info and server metadata.
//! - **document**: operation and document assembly, single-group [`convert`].
//! - **builder**: multi-group composition.

pub mod builder;
pub mod document;
pub mod info;
pub mod params;
pub mod path;
pub mod responses;
pub mod security;
pub mod tags;

pub use builder::OpenApiBuilder;
pub use document::{convert, ConvertOptions, OpenApiDocument, OPENAPI_VERSION, SINGLE_API_SCHEME};
pub use info::{
    OpenApiContact, OpenApiInfo, OpenApiLicense, OpenApiServer, OpenApiServerVariable,
    DEFAULT_TITLE, DEFAULT_VERSION,
};
pub use path::{analyze_path, PathTemplate};
pub use security::{
    api_key_auth_scheme, basic_auth_scheme, bearer_auth_scheme, oauth2_scheme, ApiKeyLocation,
    OAuthFlow, OAuthFlows, SecurityScheme,
};
pub use tags::{default_tags_fn, tags_from_path, TagsFn};
