//! # Document Metadata
//!
//! `info` and `servers` objects of an OpenAPI 3.0 document.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Title used when no info object is supplied.
pub const DEFAULT_TITLE: &str = "oasgen : add an info object to the conversion options";

/// Version used when no info object is supplied.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// OpenAPI Info metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiInfo {
    /// The title of the API.
    pub title: String,
    /// The version of the API document.
    pub version: String,
    /// Optional description for the API.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional Terms of Service URL.
    #[serde(default)]
    pub terms_of_service: Option<String>,
    /// Optional contact information.
    #[serde(default)]
    pub contact: Option<OpenApiContact>,
    /// Optional license information.
    #[serde(default)]
    pub license: Option<OpenApiLicense>,
}

impl OpenApiInfo {
    /// Creates a new OpenApiInfo with required fields.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
        }
    }

    /// Sets an optional description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the Terms of Service URL.
    pub fn with_terms_of_service(mut self, terms: impl Into<String>) -> Self {
        self.terms_of_service = Some(terms.into());
        self
    }

    /// Sets optional contact metadata.
    pub fn with_contact(mut self, contact: OpenApiContact) -> Self {
        self.contact = Some(contact);
        self
    }

    /// Sets optional license metadata.
    pub fn with_license(mut self, license: OpenApiLicense) -> Self {
        self.license = Some(license);
        self
    }

    /// Renders the `info` object.
    pub fn to_value(&self) -> Value {
        let mut info_obj = Map::new();
        info_obj.insert("title".to_string(), json!(self.title));
        if let Some(desc) = &self.description {
            info_obj.insert("description".to_string(), json!(desc));
        }
        if let Some(terms) = &self.terms_of_service {
            info_obj.insert("termsOfService".to_string(), json!(terms));
        }
        if let Some(contact) = &self.contact {
            let mut contact_obj = Map::new();
            if let Some(name) = &contact.name {
                contact_obj.insert("name".to_string(), json!(name));
            }
            if let Some(url) = &contact.url {
                contact_obj.insert("url".to_string(), json!(url));
            }
            if let Some(email) = &contact.email {
                contact_obj.insert("email".to_string(), json!(email));
            }
            if !contact_obj.is_empty() {
                info_obj.insert("contact".to_string(), Value::Object(contact_obj));
            }
        }
        if let Some(license) = &self.license {
            let mut license_obj = Map::new();
            license_obj.insert("name".to_string(), json!(license.name));
            if let Some(url) = &license.url {
                license_obj.insert("url".to_string(), json!(url));
            }
            info_obj.insert("license".to_string(), Value::Object(license_obj));
        }
        info_obj.insert("version".to_string(), json!(self.version));
        Value::Object(info_obj)
    }
}

impl Default for OpenApiInfo {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_VERSION)
    }
}

/// Contact metadata for the OpenAPI Info object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OpenApiContact {
    /// The identifying name of the contact person/organization.
    #[serde(default)]
    pub name: Option<String>,
    /// The URL for the contact information.
    #[serde(default)]
    pub url: Option<String>,
    /// The email address of the contact person/organization.
    #[serde(default)]
    pub email: Option<String>,
}

impl OpenApiContact {
    /// Creates an empty contact object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the contact name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the contact URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the contact email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// License metadata for the OpenAPI Info object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpenApiLicense {
    /// The license name used for the API.
    pub name: String,
    /// Optional URL pointing to the license text.
    #[serde(default)]
    pub url: Option<String>,
}

impl OpenApiLicense {
    /// Creates a new license with the required name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
        }
    }

    /// Sets the license URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Server metadata for OpenAPI `servers`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpenApiServer {
    /// Server URL (may be relative).
    pub url: String,
    /// Optional description for the server.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional variable definitions for server URL templating.
    #[serde(default)]
    pub variables: IndexMap<String, OpenApiServerVariable>,
}

impl OpenApiServer {
    /// Creates a new server with the required URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
            variables: IndexMap::new(),
        }
    }

    /// Sets the server description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a server variable definition.
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        variable: OpenApiServerVariable,
    ) -> Self {
        self.variables.insert(name.into(), variable);
        self
    }

    /// Renders one entry of the `servers` array.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("url".to_string(), json!(self.url));
        if let Some(desc) = &self.description {
            obj.insert("description".to_string(), json!(desc));
        }
        if !self.variables.is_empty() {
            let mut vars = Map::new();
            for (var_name, var) in &self.variables {
                vars.insert(var_name.clone(), var.to_value());
            }
            obj.insert("variables".to_string(), Value::Object(vars));
        }
        Value::Object(obj)
    }
}

/// Server variable metadata for templated server URLs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpenApiServerVariable {
    /// Allowed enum values (if constrained).
    #[serde(default, rename = "enum")]
    pub enum_values: Option<Vec<String>>,
    /// Default value for substitution.
    pub default: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl OpenApiServerVariable {
    /// Creates a new server variable with the required default.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            enum_values: None,
            default: default.into(),
            description: None,
        }
    }

    /// Sets enum values for the variable.
    pub fn with_enum_values(mut self, values: Vec<String>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// Sets the variable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn to_value(&self) -> Value {
        let mut obj = Map::new();
        if let Some(values) = &self.enum_values {
            obj.insert("enum".to_string(), json!(values));
        }
        obj.insert("default".to_string(), json!(self.default));
        if let Some(desc) = &self.description {
            obj.insert("description".to_string(), json!(desc));
        }
        Value::Object(obj)
    }
}
