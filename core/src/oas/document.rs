//! # Document Assembly
//!
//! Merges per-endpoint operations into path items and path items into a
//! complete OpenAPI 3.0 document.

use crate::endpoint::{EndpointDefinition, Method};
use crate::error::{AppError, AppResult};
use crate::oas::info::{OpenApiInfo, OpenApiServer};
use crate::oas::params::{resolve_parameters, resolve_request_body};
use crate::oas::path::{analyze_path, PathTemplate};
use crate::oas::responses::build_responses;
use crate::oas::security::{security_requirement_value, SecurityScheme};
use crate::oas::tags::{default_tags_fn, TagsFn};
use crate::schema::{JsonSchemaTarget, SchemaNode};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// The OpenAPI version emitted.
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Scheme name used by [`convert`] when a security scheme is supplied.
pub const SINGLE_API_SCHEME: &str = "auth";

/// A finished OpenAPI document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OpenApiDocument(Value);

impl OpenApiDocument {
    /// The document as a JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the document, returning the JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// The operation registered under a templated path and method.
    pub fn operation(&self, path: &str, method: Method) -> Option<&Value> {
        self.0.get("paths")?.get(path)?.get(method.as_str())
    }

    /// Renders pretty-printed JSON.
    pub fn to_json_pretty(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    /// Renders YAML.
    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(&self.0)?)
    }
}

/// Options for [`convert`].
#[derive(Clone, Default)]
pub struct ConvertOptions {
    /// Document metadata; a placeholder title is used when absent.
    pub info: Option<OpenApiInfo>,
    /// Servers emitted at the document root.
    pub servers: Vec<OpenApiServer>,
    /// Scheme protecting every endpoint, registered as `auth`.
    pub security_scheme: Option<SecurityScheme>,
    /// Tag function replacing [`crate::oas::tags::tags_from_path`].
    pub tags_fn: Option<TagsFn>,
}

impl ConvertOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the info object.
    pub fn with_info(mut self, info: OpenApiInfo) -> Self {
        self.info = Some(info);
        self
    }

    /// Adds a server.
    pub fn with_server(mut self, server: OpenApiServer) -> Self {
        self.servers.push(server);
        self
    }

    /// Protects every endpoint with `scheme`.
    pub fn with_security_scheme(mut self, scheme: SecurityScheme) -> Self {
        self.security_scheme = Some(scheme);
        self
    }

    /// Overrides tag inference.
    pub fn with_tags_fn<F>(mut self, tags_fn: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        self.tags_fn = Some(Arc::new(tags_fn));
        self
    }
}

/// Security applied to every endpoint of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GroupSecurity {
    pub scheme: String,
    pub requirements: Vec<String>,
}

/// A borrowed endpoint group.
pub(crate) struct GroupRef<'a, S> {
    pub endpoints: &'a [EndpointDefinition<S>],
    pub security: Option<&'a GroupSecurity>,
}

/// Document-level inputs shared by [`convert`] and the builder.
pub(crate) struct DocumentParts<'a, S> {
    pub info: &'a OpenApiInfo,
    pub servers: &'a [OpenApiServer],
    pub security_schemes: &'a IndexMap<String, SecurityScheme>,
    pub definitions: &'a IndexMap<String, S>,
    pub global_security: Option<&'a GroupSecurity>,
    pub tags_fn: &'a TagsFn,
}

/// Converts one group of endpoints into an OpenAPI document.
///
/// When `options.security_scheme` is set, it is registered as `auth` and every
/// operation requires it.
pub fn convert<S: SchemaNode>(
    endpoints: &[EndpointDefinition<S>],
    options: &ConvertOptions,
) -> AppResult<OpenApiDocument> {
    let info = options.info.clone().unwrap_or_default();
    let tags_fn = options.tags_fn.clone().unwrap_or_else(default_tags_fn);

    let mut security_schemes = IndexMap::new();
    let group_security = options.security_scheme.as_ref().map(|scheme| {
        security_schemes.insert(SINGLE_API_SCHEME.to_string(), scheme.clone());
        GroupSecurity {
            scheme: SINGLE_API_SCHEME.to_string(),
            requirements: Vec::new(),
        }
    });

    let parts = DocumentParts {
        info: &info,
        servers: &options.servers,
        security_schemes: &security_schemes,
        definitions: &IndexMap::new(),
        global_security: None,
        tags_fn: &tags_fn,
    };
    let groups = [GroupRef {
        endpoints,
        security: group_security.as_ref(),
    }];
    assemble(&parts, &groups)
}

/// Builds the document from its parts and endpoint groups, in group order
/// then declaration order.
pub(crate) fn assemble<S: SchemaNode>(
    parts: &DocumentParts<'_, S>,
    groups: &[GroupRef<'_, S>],
) -> AppResult<OpenApiDocument> {
    validate_info(parts.info)?;
    let referenced = groups
        .iter()
        .filter_map(|g| g.security)
        .chain(parts.global_security);
    for security in referenced {
        if !parts.security_schemes.contains_key(&security.scheme) {
            return Err(AppError::UnknownSecurityScheme(security.scheme.clone()));
        }
    }

    let mut paths: IndexMap<String, Map<String, Value>> = IndexMap::new();
    let mut aliases = HashSet::new();
    for group in groups {
        for endpoint in group.endpoints {
            if !aliases.insert(endpoint.alias.as_str()) {
                warn!(alias = %endpoint.alias, "duplicate operationId");
            }
            insert_operation(&mut paths, endpoint, group.security, parts.tags_fn);
        }
    }

    let mut doc = Map::new();
    doc.insert("openapi".to_string(), json!(OPENAPI_VERSION));
    doc.insert("info".to_string(), parts.info.to_value());
    if !parts.servers.is_empty() {
        let servers = parts.servers.iter().map(OpenApiServer::to_value).collect();
        doc.insert("servers".to_string(), Value::Array(servers));
    }
    if let Some(global) = parts.global_security {
        doc.insert(
            "security".to_string(),
            security_requirement_value(&global.scheme, &global.requirements),
        );
    }
    if let Some(components) = build_components(parts) {
        doc.insert("components".to_string(), components);
    }
    let paths = paths
        .into_iter()
        .map(|(path, item)| (path, Value::Object(item)))
        .collect();
    doc.insert("paths".to_string(), Value::Object(paths));

    Ok(OpenApiDocument(Value::Object(doc)))
}

fn validate_info(info: &OpenApiInfo) -> AppResult<()> {
    if info.title.trim().is_empty() {
        return Err(AppError::InvalidInfo("title must not be empty".into()));
    }
    if info.version.trim().is_empty() {
        return Err(AppError::InvalidInfo("version must not be empty".into()));
    }
    Ok(())
}

fn build_components<S: SchemaNode>(parts: &DocumentParts<'_, S>) -> Option<Value> {
    let mut components = Map::new();
    if !parts.security_schemes.is_empty() {
        let schemes = parts
            .security_schemes
            .iter()
            .map(|(name, scheme)| (name.clone(), scheme.to_value()))
            .collect();
        components.insert("securitySchemes".to_string(), Value::Object(schemes));
    }
    if !parts.definitions.is_empty() {
        let schemas = parts
            .definitions
            .iter()
            .map(|(name, schema)| (name.clone(), schema.to_json_schema(JsonSchemaTarget::OpenApi3)))
            .collect();
        components.insert("schemas".to_string(), Value::Object(schemas));
    }
    if components.is_empty() {
        None
    } else {
        Some(Value::Object(components))
    }
}

fn insert_operation<S: SchemaNode>(
    paths: &mut IndexMap<String, Map<String, Value>>,
    endpoint: &EndpointDefinition<S>,
    security: Option<&GroupSecurity>,
    tags_fn: &TagsFn,
) {
    let template = analyze_path(&endpoint.path);
    let op = build_operation(endpoint, &template, security, tags_fn);

    let path_item = paths.entry(template.templated.clone()).or_default();
    let method_key = endpoint.method.as_str();
    if path_item.insert(method_key.to_string(), op).is_some() {
        warn!(
            path = %template.templated,
            method = method_key,
            alias = %endpoint.alias,
            "operation overwritten by a later endpoint"
        );
    }
    debug!(
        path = %template.templated,
        method = method_key,
        alias = %endpoint.alias,
        "assembled operation"
    );
}

fn build_operation<S: SchemaNode>(
    endpoint: &EndpointDefinition<S>,
    template: &PathTemplate,
    security: Option<&GroupSecurity>,
    tags_fn: &TagsFn,
) -> Value {
    let mut op = Map::new();
    op.insert("operationId".to_string(), json!(endpoint.alias));
    if let Some(desc) = &endpoint.description {
        op.insert("summary".to_string(), json!(desc));
        op.insert("description".to_string(), json!(desc));
    }

    let tags = tags_fn(&endpoint.path);
    if !tags.is_empty() {
        op.insert("tags".to_string(), json!(tags));
    }

    if let Some(security) = security {
        op.insert(
            "security".to_string(),
            security_requirement_value(&security.scheme, &security.requirements),
        );
    }

    if let Some(body) = resolve_request_body(endpoint) {
        op.insert("requestBody".to_string(), body);
    }
    op.insert(
        "parameters".to_string(),
        Value::Array(resolve_parameters(endpoint, template)),
    );
    op.insert("responses".to_string(), build_responses(endpoint));

    Value::Object(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::security::bearer_auth_scheme;
    use crate::schema::TypeSchema;
    use pretty_assertions::assert_eq;

    fn endpoint(method: Method, path: &str, alias: &str) -> EndpointDefinition {
        EndpointDefinition::new(method, path, alias, TypeSchema::string())
    }

    #[test]
    fn test_sibling_methods_merge() {
        let endpoints = vec![
            endpoint(Method::Get, "/users", "getUsers"),
            endpoint(Method::Post, "/users", "createUser"),
        ];
        let doc = convert(&endpoints, &ConvertOptions::new()).unwrap();
        let paths = doc.as_value()["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 1);
        let methods: Vec<&String> = paths["/users"].as_object().unwrap().keys().collect();
        assert_eq!(methods, vec!["get", "post"]);
    }

    #[test]
    fn test_same_path_and_method_last_wins() {
        let endpoints = vec![
            endpoint(Method::Get, "/users", "listUsers"),
            endpoint(Method::Get, "/users?page=:page", "pageUsers"),
        ];
        let doc = convert(&endpoints, &ConvertOptions::new()).unwrap();
        let op = doc.operation("/users", Method::Get).unwrap();
        assert_eq!(op["operationId"], json!("pageUsers"));
        assert_eq!(op["parameters"][0]["name"], json!("page"));
    }

    #[test]
    fn test_default_info_and_no_security() {
        let doc = convert(&[endpoint(Method::Get, "/users", "getUsers")], &ConvertOptions::new())
            .unwrap();
        let value = doc.as_value();
        assert_eq!(value["openapi"], json!("3.0.0"));
        assert_eq!(value["info"]["title"], json!(crate::oas::info::DEFAULT_TITLE));
        assert_eq!(value["info"]["version"], json!("1.0.0"));
        assert!(value.get("components").is_none());
        assert!(value.get("servers").is_none());
        let op = doc.operation("/users", Method::Get).unwrap();
        assert!(op.get("security").is_none());
        assert!(op.get("summary").is_none());
        assert_eq!(op["tags"], json!(["users"]));
        assert_eq!(op["parameters"], json!([]));
    }

    #[test]
    fn test_single_scheme_applies_to_all() {
        let endpoints = vec![
            endpoint(Method::Get, "/users", "getUsers"),
            endpoint(Method::Delete, "/users/:id", "deleteUser"),
        ];
        let options = ConvertOptions::new().with_security_scheme(bearer_auth_scheme());
        let doc = convert(&endpoints, &options).unwrap();
        assert_eq!(
            doc.as_value()["components"],
            json!({
                "securitySchemes": {
                    "auth": { "type": "http", "scheme": "bearer", "bearerFormat": "JWT" }
                }
            })
        );
        for (path, method) in [("/users", Method::Get), ("/users/{id}", Method::Delete)] {
            let op = doc.operation(path, method).unwrap();
            assert_eq!(op["security"], json!([{ "auth": [] }]));
        }
    }

    #[test]
    fn test_custom_tags_fn() {
        let options = ConvertOptions::new().with_tags_fn(|path| vec![format!("api:{}", path)]);
        let doc = convert(&[endpoint(Method::Get, "/users/:id", "getUser")], &options).unwrap();
        let op = doc.operation("/users/{id}", Method::Get).unwrap();
        assert_eq!(op["tags"], json!(["api:/users/:id"]));
    }

    #[test]
    fn test_empty_tags_are_omitted() {
        let doc = convert(&[endpoint(Method::Get, "/:id", "getAny")], &ConvertOptions::new())
            .unwrap();
        let op = doc.operation("/{id}", Method::Get).unwrap();
        assert!(op.get("tags").is_none());
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let options = ConvertOptions::new().with_info(OpenApiInfo::new(" ", "1.0.0"));
        let err = convert(&[endpoint(Method::Get, "/users", "getUsers")], &options).unwrap_err();
        assert!(matches!(err, AppError::InvalidInfo(_)));
    }

    #[test]
    fn test_deterministic_output() {
        let endpoints = vec![
            endpoint(Method::Get, "/users/:id", "getUser"),
            endpoint(Method::Put, "/users/:id", "updateUser"),
            endpoint(Method::Get, "/teams", "getTeams"),
        ];
        let options = ConvertOptions::new().with_security_scheme(bearer_auth_scheme());
        let first = convert(&endpoints, &options).unwrap().to_json_pretty().unwrap();
        let second = convert(&endpoints, &options).unwrap().to_json_pretty().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_duplicate_alias_is_logged() {
        let endpoints = vec![
            endpoint(Method::Get, "/users", "getUsers"),
            endpoint(Method::Get, "/people", "getUsers"),
        ];
        convert(&endpoints, &ConvertOptions::new()).unwrap();
        assert!(logs_contain("duplicate operationId"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_overwritten_operation_is_logged() {
        let endpoints = vec![
            endpoint(Method::Get, "/users", "listUsers"),
            endpoint(Method::Post, "/users", "createUser"),
            endpoint(Method::Get, "/users#all", "allUsers"),
        ];
        let doc = convert(&endpoints, &ConvertOptions::new()).unwrap();
        assert!(logs_contain("operation overwritten"));
        let item = doc.as_value()["paths"]["/users"].as_object().unwrap();
        let methods: Vec<&String> = item.keys().collect();
        assert_eq!(methods, vec!["get", "post"]);
        assert_eq!(item["get"]["operationId"], json!("allUsers"));
        assert_eq!(item["post"]["operationId"], json!("createUser"));
    }
}
