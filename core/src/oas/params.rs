//! # Parameter Resolution
//!
//! Decides location, requiredness and rendered schema of every operation
//! parameter, and picks the request body.

use crate::endpoint::{EndpointDefinition, ParamType, ParameterSpec};
use crate::oas::path::PathTemplate;
use crate::schema::{JsonSchemaTarget, SchemaNode};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// Builds the `parameters` array of an operation.
///
/// Path parameters come first, one per placeholder in order of appearance,
/// followed by query and header parameters in declaration order.
pub fn resolve_parameters<S: SchemaNode>(
    endpoint: &EndpointDefinition<S>,
    template: &PathTemplate,
) -> Vec<Value> {
    let mut parameters = Vec::new();

    for placeholder in &template.placeholders {
        let declared = endpoint
            .parameters
            .iter()
            .find(|p| p.param_type == ParamType::Path && &p.name == placeholder);
        match declared {
            Some(param) => parameters.push(build_path_parameter(placeholder, param)),
            None => {
                debug!(
                    alias = %endpoint.alias,
                    param = %placeholder,
                    "undeclared path parameter, falling back to string"
                );
                parameters.push(fallback_path_parameter(placeholder));
            }
        }
    }

    for param in &endpoint.parameters {
        if param.param_type == ParamType::Path && !template.placeholders.contains(&param.name) {
            warn!(
                alias = %endpoint.alias,
                param = %param.name,
                "path parameter has no matching placeholder in '{}'",
                endpoint.path
            );
        }
    }

    parameters.extend(
        endpoint
            .parameters
            .iter()
            .filter(|p| matches!(p.param_type, ParamType::Query | ParamType::Header))
            .map(build_parameter),
    );

    parameters
}

/// Builds the `requestBody` object from the first declared body parameter.
pub fn resolve_request_body<S: SchemaNode>(endpoint: &EndpointDefinition<S>) -> Option<Value> {
    let extra_bodies = endpoint
        .parameters
        .iter()
        .filter(|p| p.param_type == ParamType::Body)
        .skip(1)
        .count();
    if extra_bodies > 0 {
        warn!(
            alias = %endpoint.alias,
            ignored = extra_bodies,
            "multiple body parameters declared, using the first"
        );
    }

    let body = endpoint.body()?;
    let mut obj = Map::new();
    if let Some(desc) = param_description(body) {
        obj.insert("description".to_string(), json!(desc));
    }
    obj.insert("content".to_string(), json_content(&body.schema));
    Some(Value::Object(obj))
}

/// `{ "application/json": { "schema": ... } }`
pub(crate) fn json_content<S: SchemaNode>(schema: &S) -> Value {
    json!({
        "application/json": {
            "schema": schema.to_json_schema(JsonSchemaTarget::OpenApi3)
        }
    })
}

fn param_description<S: SchemaNode>(param: &ParameterSpec<S>) -> Option<&str> {
    param
        .description
        .as_deref()
        .or_else(|| param.schema.description())
}

fn build_path_parameter<S: SchemaNode>(name: &str, param: &ParameterSpec<S>) -> Value {
    parameter_value(
        name,
        "path",
        param_description(param),
        true,
        param.schema.to_json_schema(JsonSchemaTarget::OpenApi3),
    )
}

fn fallback_path_parameter(name: &str) -> Value {
    parameter_value(name, "path", None, true, json!({ "type": "string" }))
}

fn build_parameter<S: SchemaNode>(param: &ParameterSpec<S>) -> Value {
    let required = !param.schema.is_optional();
    let rendered = if required {
        None
    } else {
        param.schema.unwrap_optional()
    };
    let schema = rendered
        .as_ref()
        .unwrap_or(&param.schema)
        .to_json_schema(JsonSchemaTarget::OpenApi3);

    let name = if param.param_type == ParamType::Query && param.schema.is_array() {
        format!("{}[]", param.name)
    } else {
        param.name.clone()
    };
    let location = param.param_type.location().unwrap_or("query");

    parameter_value(&name, location, param_description(param), required, schema)
}

fn parameter_value(
    name: &str,
    location: &str,
    description: Option<&str>,
    required: bool,
    schema: Value,
) -> Value {
    let mut obj = Map::new();
    obj.insert("name".to_string(), json!(name));
    obj.insert("in".to_string(), json!(location));
    if let Some(desc) = description {
        obj.insert("description".to_string(), json!(desc));
    }
    obj.insert("required".to_string(), json!(required));
    obj.insert("schema".to_string(), schema);
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Method;
    use crate::oas::path::analyze_path;
    use crate::schema::TypeSchema;
    use pretty_assertions::assert_eq;

    fn resolve(endpoint: &EndpointDefinition) -> Vec<Value> {
        resolve_parameters(endpoint, &analyze_path(&endpoint.path))
    }

    #[test]
    fn test_declared_path_parameter() {
        let endpoint =
            EndpointDefinition::new(Method::Get, "/users/:id", "getUser", TypeSchema::any())
                .with_parameter(
                    ParameterSpec::path("id", TypeSchema::string().uuid())
                        .with_description("User id"),
                );
        assert_eq!(
            resolve(&endpoint),
            vec![json!({
                "name": "id",
                "in": "path",
                "description": "User id",
                "required": true,
                "schema": { "type": "string", "format": "uuid" }
            })]
        );
    }

    #[test]
    fn test_optional_path_parameter_is_still_required() {
        let endpoint =
            EndpointDefinition::new(Method::Get, "/users/:id", "getUser", TypeSchema::any())
                .with_parameter(ParameterSpec::path("id", TypeSchema::integer().optional()));
        let params = resolve(&endpoint);
        assert_eq!(params[0]["required"], json!(true));
        assert_eq!(params[0]["schema"], json!({ "type": "integer" }));
    }

    #[test]
    fn test_undeclared_path_parameter_falls_back_to_string() {
        let endpoint =
            EndpointDefinition::new(Method::Get, "/users/:id", "getUser", TypeSchema::any())
                .with_parameter(ParameterSpec::query("id", TypeSchema::integer()));
        let params = resolve(&endpoint);
        assert_eq!(
            params[0],
            json!({ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } })
        );
        assert_eq!(params[1]["in"], json!("query"));
    }

    #[test]
    fn test_optional_query_is_unwrapped() {
        let endpoint = EndpointDefinition::new(Method::Get, "/users", "getUsers", TypeSchema::any())
            .with_parameter(
                ParameterSpec::query("offset", TypeSchema::number().positive().optional())
                    .with_description("Offset the number of users"),
            );
        assert_eq!(
            resolve(&endpoint),
            vec![json!({
                "name": "offset",
                "in": "query",
                "description": "Offset the number of users",
                "required": false,
                "schema": { "type": "number", "exclusiveMinimum": true, "minimum": 0 }
            })]
        );
    }

    #[test]
    fn test_defaulted_query_is_not_required() {
        let endpoint = EndpointDefinition::new(Method::Get, "/users", "getUsers", TypeSchema::any())
            .with_parameter(ParameterSpec::query(
                "limit",
                TypeSchema::number().positive().default_value(10),
            ));
        let params = resolve(&endpoint);
        assert_eq!(params[0]["required"], json!(false));
        assert_eq!(
            params[0]["schema"],
            json!({ "type": "number", "exclusiveMinimum": true, "minimum": 0, "default": 10 })
        );
    }

    #[test]
    fn test_array_query_uses_brackets() {
        let endpoint = EndpointDefinition::new(Method::Get, "/users", "getUsers", TypeSchema::any())
            .with_parameter(ParameterSpec::query(
                "filter",
                TypeSchema::array(TypeSchema::string()).refine("No duplicates allowed"),
            ))
            .with_parameter(ParameterSpec::header(
                "x-tags",
                TypeSchema::array(TypeSchema::string()),
            ));
        let params = resolve(&endpoint);
        assert_eq!(params[0]["name"], json!("filter[]"));
        assert_eq!(params[1]["name"], json!("x-tags"));
        assert_eq!(params[1]["in"], json!("header"));
    }

    #[test]
    fn test_description_falls_back_to_schema() {
        let endpoint = EndpointDefinition::new(Method::Get, "/users", "getUsers", TypeSchema::any())
            .with_parameter(ParameterSpec::query(
                "offset",
                TypeSchema::number().optional().describe("Offset the number of users"),
            ));
        let params = resolve(&endpoint);
        assert_eq!(params[0]["description"], json!("Offset the number of users"));
    }

    #[test]
    fn test_path_parameters_precede_declared_order() {
        let endpoint = EndpointDefinition::new(
            Method::Get,
            "/orgs/:org/users/:user",
            "getMember",
            TypeSchema::any(),
        )
        .with_parameter(ParameterSpec::header("x-trace", TypeSchema::string()))
        .with_parameter(ParameterSpec::path("user", TypeSchema::string()))
        .with_parameter(ParameterSpec::query("expand", TypeSchema::boolean().optional()))
        .with_parameter(ParameterSpec::path("org", TypeSchema::string()));
        let names: Vec<Value> = resolve(&endpoint)
            .iter()
            .map(|p| p["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("org"), json!("user"), json!("x-trace"), json!("expand")]);
    }

    #[test]
    fn test_request_body_uses_first_body() {
        let endpoint =
            EndpointDefinition::new(Method::Post, "/users", "createUser", TypeSchema::any())
                .with_parameter(
                    ParameterSpec::body("user", TypeSchema::object([("name", TypeSchema::string())]))
                        .with_description("The user to create"),
                )
                .with_parameter(ParameterSpec::body("ignored", TypeSchema::number()));
        assert_eq!(
            resolve_request_body(&endpoint),
            Some(json!({
                "description": "The user to create",
                "content": {
                    "application/json": {
                        "schema": {
                            "type": "object",
                            "properties": { "name": { "type": "string" } },
                            "required": ["name"],
                            "additionalProperties": false
                        }
                    }
                }
            }))
        );
        assert!(resolve(&endpoint).is_empty());
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_extra_body_parameters_are_logged() {
        let endpoint =
            EndpointDefinition::new(Method::Put, "/users/:id", "updateUser", TypeSchema::any())
                .with_parameter(ParameterSpec::body("user", TypeSchema::string()))
                .with_parameter(ParameterSpec::body("patch", TypeSchema::number()));
        let body = resolve_request_body(&endpoint).unwrap();
        assert_eq!(
            body["content"]["application/json"]["schema"],
            json!({ "type": "string" })
        );
        assert!(logs_contain("multiple body parameters declared"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_unmatched_path_parameter_is_logged() {
        let endpoint = EndpointDefinition::new(Method::Get, "/users", "getUsers", TypeSchema::any())
            .with_parameter(ParameterSpec::path("id", TypeSchema::string()));
        assert!(resolve(&endpoint).is_empty());
        assert!(logs_contain("has no matching placeholder"));
    }

    #[test]
    fn test_no_body() {
        let endpoint = EndpointDefinition::new(Method::Get, "/users", "getUsers", TypeSchema::any());
        assert_eq!(resolve_request_body(&endpoint), None);
    }
}
