//! # Document Builder
//!
//! Composes several endpoint groups, each public or protected by its own
//! named security scheme, into one document.

use crate::endpoint::EndpointDefinition;
use crate::error::AppResult;
use crate::oas::document::{assemble, DocumentParts, GroupRef, GroupSecurity, OpenApiDocument};
use crate::oas::info::{OpenApiInfo, OpenApiServer};
use crate::oas::security::SecurityScheme;
use crate::oas::tags::{default_tags_fn, TagsFn};
use crate::schema::{SchemaNode, TypeSchema};
use indexmap::IndexMap;
use std::sync::Arc;

struct ApiGroup<S> {
    endpoints: Vec<EndpointDefinition<S>>,
    security: Option<GroupSecurity>,
}

/// Accumulates groups and options, then builds the document once.
///
/// ```
/// use oasgen_core::{bearer_auth_scheme, EndpointDefinition, Method, OpenApiBuilder, OpenApiInfo, TypeSchema};
///
/// let api = vec![EndpointDefinition::new(Method::Get, "/users", "getUsers", TypeSchema::string())];
/// let doc = OpenApiBuilder::new(OpenApiInfo::new("My API", "1.0.0"))
///     .add_security_scheme("auth", bearer_auth_scheme())
///     .add_protected_group("auth", api)
///     .build()
///     .unwrap();
/// assert_eq!(doc.as_value()["paths"]["/users"]["get"]["security"][0]["auth"], serde_json::json!([]));
/// ```
pub struct OpenApiBuilder<S = TypeSchema> {
    info: OpenApiInfo,
    servers: Vec<OpenApiServer>,
    security_schemes: IndexMap<String, SecurityScheme>,
    definitions: IndexMap<String, S>,
    global_security: Option<GroupSecurity>,
    groups: Vec<ApiGroup<S>>,
    tags_fn: TagsFn,
}

impl<S: SchemaNode> OpenApiBuilder<S> {
    /// Starts a document with the given metadata.
    pub fn new(info: OpenApiInfo) -> Self {
        Self {
            info,
            servers: Vec::new(),
            security_schemes: IndexMap::new(),
            definitions: IndexMap::new(),
            global_security: None,
            groups: Vec::new(),
            tags_fn: default_tags_fn(),
        }
    }

    /// Registers a security scheme under `name`, replacing any previous one.
    pub fn add_security_scheme(mut self, name: impl Into<String>, scheme: SecurityScheme) -> Self {
        self.security_schemes.insert(name.into(), scheme);
        self
    }

    /// Adds endpoints that require no authentication.
    pub fn add_public_group(
        mut self,
        endpoints: impl IntoIterator<Item = EndpointDefinition<S>>,
    ) -> Self {
        self.groups.push(ApiGroup {
            endpoints: endpoints.into_iter().collect(),
            security: None,
        });
        self
    }

    /// Adds endpoints protected by the scheme registered as `scheme`.
    pub fn add_protected_group(
        self,
        scheme: impl Into<String>,
        endpoints: impl IntoIterator<Item = EndpointDefinition<S>>,
    ) -> Self {
        self.add_protected_group_with_requirements(scheme, endpoints, Vec::<String>::new())
    }

    /// Adds protected endpoints that also need `requirements` (e.g. OAuth2 scopes).
    pub fn add_protected_group_with_requirements<R>(
        mut self,
        scheme: impl Into<String>,
        endpoints: impl IntoIterator<Item = EndpointDefinition<S>>,
        requirements: impl IntoIterator<Item = R>,
    ) -> Self
    where
        R: Into<String>,
    {
        self.groups.push(ApiGroup {
            endpoints: endpoints.into_iter().collect(),
            security: Some(GroupSecurity {
                scheme: scheme.into(),
                requirements: requirements.into_iter().map(Into::into).collect(),
            }),
        });
        self
    }

    /// Requires `scheme` for the whole document via the root `security` array.
    pub fn add_global_security<R>(
        mut self,
        scheme: impl Into<String>,
        requirements: impl IntoIterator<Item = R>,
    ) -> Self
    where
        R: Into<String>,
    {
        self.global_security = Some(GroupSecurity {
            scheme: scheme.into(),
            requirements: requirements.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Appends a server.
    pub fn add_server(mut self, server: OpenApiServer) -> Self {
        self.servers.push(server);
        self
    }

    /// Registers a reusable schema under `components.schemas`.
    pub fn add_definition(mut self, name: impl Into<String>, schema: S) -> Self {
        self.definitions.insert(name.into(), schema);
        self
    }

    /// Overrides tag inference.
    pub fn set_tags_fn<F>(mut self, tags_fn: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        self.tags_fn = Arc::new(tags_fn);
        self
    }

    /// Builds the document.
    ///
    /// Fails when a group or the global requirement names an unregistered scheme.
    pub fn build(self) -> AppResult<OpenApiDocument> {
        let parts = DocumentParts {
            info: &self.info,
            servers: &self.servers,
            security_schemes: &self.security_schemes,
            definitions: &self.definitions,
            global_security: self.global_security.as_ref(),
            tags_fn: &self.tags_fn,
        };
        let groups = self
            .groups
            .iter()
            .map(|g| GroupRef {
                endpoints: &g.endpoints,
                security: g.security.as_ref(),
            })
            .collect::<Vec<_>>();
        assemble(&parts, &groups)
    }
}
