#![deny(missing_docs)]

//! # Definition Files
//!
//! The on-disk description of an API: metadata, security schemes and one or
//! more endpoint groups, read from YAML or JSON and fed to the builder.

use crate::error::{CliError, CliResult};
use indexmap::IndexMap;
use oasgen_core::{
    EndpointDefinition, OpenApiBuilder, OpenApiDocument, OpenApiInfo, OpenApiServer,
    SecurityScheme, TypeSchema,
};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A complete definition file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionFile {
    /// Document metadata; a placeholder title is used when absent.
    #[serde(default)]
    pub info: Option<OpenApiInfo>,
    /// Servers emitted at the document root.
    #[serde(default)]
    pub servers: Vec<OpenApiServer>,
    /// Named security schemes.
    #[serde(default)]
    pub security_schemes: IndexMap<String, SecurityScheme>,
    /// Named reusable schemas.
    #[serde(default)]
    pub definitions: IndexMap<String, TypeSchema>,
    /// Document-wide security requirement.
    #[serde(default)]
    pub security: Option<SecurityRequirement>,
    /// Endpoint groups.
    pub apis: Vec<ApiGroupConfig>,
}

/// A scheme reference with its requirements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecurityRequirement {
    /// Registered scheme name.
    pub scheme: String,
    /// Scopes or other requirement values.
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// One group of endpoints sharing the same protection.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiGroupConfig {
    /// Registered scheme protecting the group; public when absent.
    #[serde(default)]
    pub scheme: Option<String>,
    /// Requirements attached to the scheme.
    #[serde(default)]
    pub requirements: Vec<String>,
    /// The endpoints.
    pub endpoints: Vec<EndpointDefinition>,
}

impl DefinitionFile {
    /// Parses `content`; JSON when `path` ends in `.json`, YAML otherwise.
    pub fn parse(path: &Path, content: &str) -> CliResult<Self> {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(content).map_err(|e| CliError::Config(e.to_string()))
        } else {
            serde_yaml::from_str(content).map_err(|e| CliError::Config(e.to_string()))
        }
    }

    /// Builds the document described by this file.
    pub fn into_document(self) -> CliResult<OpenApiDocument> {
        let mut builder = OpenApiBuilder::<TypeSchema>::new(self.info.unwrap_or_default());
        for server in self.servers {
            builder = builder.add_server(server);
        }
        for (name, scheme) in self.security_schemes {
            builder = builder.add_security_scheme(name, scheme);
        }
        for (name, schema) in self.definitions {
            builder = builder.add_definition(name, schema);
        }
        if let Some(global) = self.security {
            builder = builder.add_global_security(global.scheme, global.requirements);
        }
        for group in self.apis {
            debug!(
                scheme = group.scheme.as_deref().unwrap_or("<public>"),
                endpoints = group.endpoints.len(),
                "adding api group"
            );
            builder = match group.scheme {
                Some(scheme) => builder.add_protected_group_with_requirements(
                    scheme,
                    group.endpoints,
                    group.requirements,
                ),
                None => builder.add_public_group(group.endpoints),
            };
        }
        Ok(builder.build()?)
    }
}
