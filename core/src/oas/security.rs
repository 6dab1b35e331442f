//! # Security Schemes
//!
//! Constructors for the `components.securitySchemes` entries an API group
//! can be protected by.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Where an API key is transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
}

impl ApiKeyLocation {
    fn as_str(&self) -> &'static str {
        match self {
            ApiKeyLocation::Query => "query",
            ApiKeyLocation::Header => "header",
            ApiKeyLocation::Cookie => "cookie",
        }
    }
}

/// A single OAuth2 flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OAuthFlow {
    /// Authorization endpoint (implicit, authorizationCode).
    pub authorization_url: Option<String>,
    /// Token endpoint (password, clientCredentials, authorizationCode).
    pub token_url: Option<String>,
    /// Refresh endpoint.
    pub refresh_url: Option<String>,
    /// Scope name to description.
    pub scopes: IndexMap<String, String>,
}

impl OAuthFlow {
    /// Creates a flow with no endpoints or scopes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the authorization URL.
    pub fn with_authorization_url(mut self, url: impl Into<String>) -> Self {
        self.authorization_url = Some(url.into());
        self
    }

    /// Sets the token URL.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Sets the refresh URL.
    pub fn with_refresh_url(mut self, url: impl Into<String>) -> Self {
        self.refresh_url = Some(url.into());
        self
    }

    /// Adds a scope.
    pub fn with_scope(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.scopes.insert(name.into(), description.into());
        self
    }
}

/// The set of OAuth2 flows a scheme supports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OAuthFlows {
    /// Implicit flow.
    pub implicit: Option<OAuthFlow>,
    /// Resource owner password flow.
    pub password: Option<OAuthFlow>,
    /// Client credentials flow.
    pub client_credentials: Option<OAuthFlow>,
    /// Authorization code flow.
    pub authorization_code: Option<OAuthFlow>,
}

/// A named authentication mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SecurityScheme {
    /// `Authorization: Bearer <JWT>`.
    Bearer {
        /// Optional description.
        #[serde(default)]
        description: Option<String>,
    },
    /// HTTP basic authentication.
    Basic {
        /// Optional description.
        #[serde(default)]
        description: Option<String>,
    },
    /// An API key in a header, query parameter or cookie.
    ApiKey {
        /// Header, query or cookie name.
        name: String,
        /// Where the key travels.
        #[serde(rename = "in")]
        location: ApiKeyLocation,
        /// Optional description.
        #[serde(default)]
        description: Option<String>,
    },
    /// OAuth2 with one or more flows.
    #[serde(rename = "oauth2")]
    OAuth2 {
        /// Supported flows.
        flows: OAuthFlows,
        /// Optional description.
        #[serde(default)]
        description: Option<String>,
    },
}

/// HTTP bearer authentication carrying a JWT.
pub fn bearer_auth_scheme() -> SecurityScheme {
    SecurityScheme::Bearer { description: None }
}

/// HTTP basic authentication.
pub fn basic_auth_scheme() -> SecurityScheme {
    SecurityScheme::Basic { description: None }
}

/// API key authentication.
pub fn api_key_auth_scheme(name: impl Into<String>, location: ApiKeyLocation) -> SecurityScheme {
    SecurityScheme::ApiKey {
        name: name.into(),
        location,
        description: None,
    }
}

/// OAuth2 authentication.
pub fn oauth2_scheme(flows: OAuthFlows) -> SecurityScheme {
    SecurityScheme::OAuth2 {
        flows,
        description: None,
    }
}

impl SecurityScheme {
    /// Sets the description.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            SecurityScheme::Bearer { description }
            | SecurityScheme::Basic { description }
            | SecurityScheme::ApiKey { description, .. }
            | SecurityScheme::OAuth2 { description, .. } => *description = Some(text.into()),
        }
        self
    }

    fn description(&self) -> Option<&str> {
        match self {
            SecurityScheme::Bearer { description }
            | SecurityScheme::Basic { description }
            | SecurityScheme::ApiKey { description, .. }
            | SecurityScheme::OAuth2 { description, .. } => description.as_deref(),
        }
    }

    /// Renders the Security Scheme Object.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        match self {
            SecurityScheme::Bearer { .. } => {
                obj.insert("type".to_string(), json!("http"));
                obj.insert("scheme".to_string(), json!("bearer"));
                obj.insert("bearerFormat".to_string(), json!("JWT"));
            }
            SecurityScheme::Basic { .. } => {
                obj.insert("type".to_string(), json!("http"));
                obj.insert("scheme".to_string(), json!("basic"));
            }
            SecurityScheme::ApiKey { name, location, .. } => {
                obj.insert("type".to_string(), json!("apiKey"));
                obj.insert("name".to_string(), json!(name));
                obj.insert("in".to_string(), json!(location.as_str()));
            }
            SecurityScheme::OAuth2 { flows, .. } => {
                obj.insert("type".to_string(), json!("oauth2"));
                obj.insert("flows".to_string(), oauth_flows_value(flows));
            }
        }
        if let Some(desc) = self.description() {
            obj.insert("description".to_string(), json!(desc));
        }
        Value::Object(obj)
    }
}

fn oauth_flows_value(flows: &OAuthFlows) -> Value {
    let mut map = Map::new();
    if let Some(flow) = flows.implicit.as_ref() {
        map.insert("implicit".to_string(), oauth_flow_value(flow));
    }
    if let Some(flow) = flows.password.as_ref() {
        map.insert("password".to_string(), oauth_flow_value(flow));
    }
    if let Some(flow) = flows.client_credentials.as_ref() {
        map.insert("clientCredentials".to_string(), oauth_flow_value(flow));
    }
    if let Some(flow) = flows.authorization_code.as_ref() {
        map.insert("authorizationCode".to_string(), oauth_flow_value(flow));
    }
    Value::Object(map)
}

fn oauth_flow_value(flow: &OAuthFlow) -> Value {
    let mut map = Map::new();
    if let Some(url) = &flow.authorization_url {
        map.insert("authorizationUrl".to_string(), json!(url));
    }
    if let Some(url) = &flow.token_url {
        map.insert("tokenUrl".to_string(), json!(url));
    }
    if let Some(url) = &flow.refresh_url {
        map.insert("refreshUrl".to_string(), json!(url));
    }
    map.insert("scopes".to_string(), json!(flow.scopes));
    Value::Object(map)
}

/// Renders a one-entry security requirement list: `[{ scheme: requirements }]`.
pub(crate) fn security_requirement_value(scheme: &str, requirements: &[String]) -> Value {
    let mut map = Map::new();
    map.insert(scheme.to_string(), json!(requirements));
    Value::Array(vec![Value::Object(map)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bearer_scheme() {
        assert_eq!(
            bearer_auth_scheme().to_value(),
            json!({ "type": "http", "scheme": "bearer", "bearerFormat": "JWT" })
        );
    }

    #[test]
    fn test_basic_scheme_with_description() {
        assert_eq!(
            basic_auth_scheme().with_description("Staff only").to_value(),
            json!({ "type": "http", "scheme": "basic", "description": "Staff only" })
        );
    }

    #[test]
    fn test_api_key_scheme() {
        assert_eq!(
            api_key_auth_scheme("X-API-Key", ApiKeyLocation::Header).to_value(),
            json!({ "type": "apiKey", "name": "X-API-Key", "in": "header" })
        );
    }

    #[test]
    fn test_oauth2_scheme() {
        let flows = OAuthFlows {
            implicit: Some(
                OAuthFlow::new()
                    .with_authorization_url("https://example.com/oauth2/authorize")
                    .with_scope("read", "Read access")
                    .with_scope("write", "Write access"),
            ),
            ..OAuthFlows::default()
        };
        assert_eq!(
            oauth2_scheme(flows).to_value(),
            json!({
                "type": "oauth2",
                "flows": {
                    "implicit": {
                        "authorizationUrl": "https://example.com/oauth2/authorize",
                        "scopes": { "read": "Read access", "write": "Write access" }
                    }
                }
            })
        );
    }

    #[test]
    fn test_deserialize_scheme() {
        let scheme: SecurityScheme =
            serde_yaml::from_str("kind: apiKey\nname: token\nin: cookie\n").unwrap();
        assert_eq!(scheme, api_key_auth_scheme("token", ApiKeyLocation::Cookie));
        let scheme: SecurityScheme = serde_yaml::from_str("kind: oauth2\nflows: {}\n").unwrap();
        assert_eq!(scheme, oauth2_scheme(OAuthFlows::default()));
    }

    #[test]
    fn test_requirement_value() {
        assert_eq!(
            security_requirement_value("oauth", &["read".to_string()]),
            json!([{ "oauth": ["read"] }])
        );
        assert_eq!(security_requirement_value("auth", &[]), json!([{ "auth": [] }]));
    }
}
