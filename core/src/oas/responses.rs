//! # Response Aggregation
//!
//! Builds the status-keyed `responses` map of an operation.

use crate::endpoint::EndpointDefinition;
use crate::oas::params::json_content;
use crate::schema::SchemaNode;
use serde_json::{json, Map, Value};

const SUCCESS_DESCRIPTION: &str = "Success";
const ERROR_DESCRIPTION: &str = "Error";

/// Builds the `responses` object.
///
/// The success entry comes first; declared errors follow in order and a
/// later entry replaces an earlier one with the same key, the success entry
/// included.
pub fn build_responses<S: SchemaNode>(endpoint: &EndpointDefinition<S>) -> Value {
    let mut responses = Map::new();
    responses.insert(
        endpoint.success_status().to_string(),
        response_entry(SUCCESS_DESCRIPTION, &endpoint.response),
    );
    for error in &endpoint.errors {
        let description = error.description.as_deref().unwrap_or(ERROR_DESCRIPTION);
        responses.insert(error.status.key(), response_entry(description, &error.schema));
    }
    Value::Object(responses)
}

fn response_entry<S: SchemaNode>(description: &str, schema: &S) -> Value {
    let mut resp = Map::new();
    resp.insert("description".to_string(), json!(description));
    resp.insert("content".to_string(), json_content(schema));
    Value::Object(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{ErrorSpec, ErrorStatus, Method};
    use crate::schema::TypeSchema;
    use pretty_assertions::assert_eq;

    fn message(text: &str) -> TypeSchema {
        TypeSchema::object([("message", TypeSchema::literal(text))])
    }

    #[test]
    fn test_success_only() {
        let endpoint = EndpointDefinition::new(
            Method::Delete,
            "/users/:id",
            "deleteUser",
            TypeSchema::void(),
        )
        .with_status(204);
        assert_eq!(
            build_responses(&endpoint),
            json!({
                "204": {
                    "description": "Success",
                    "content": { "application/json": { "schema": {} } }
                }
            })
        );
    }

    #[test]
    fn test_errors_and_default() {
        let endpoint =
            EndpointDefinition::new(Method::Get, "/users", "getUsers", TypeSchema::string())
                .with_error(
                    ErrorSpec::new(404, message("No users found")).with_description("No users found"),
                )
                .with_error(ErrorSpec::new(ErrorStatus::Default, TypeSchema::any()));
        let responses = build_responses(&endpoint);
        let keys: Vec<&String> = responses.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["200", "404", "default"]);
        assert_eq!(responses["404"]["description"], json!("No users found"));
        assert_eq!(responses["default"]["description"], json!("Error"));
        assert_eq!(
            responses["404"]["content"]["application/json"]["schema"]["properties"]["message"],
            json!({ "type": "string", "enum": ["No users found"] })
        );
    }

    #[test]
    fn test_last_declared_error_wins() {
        let endpoint =
            EndpointDefinition::new(Method::Get, "/users", "getUsers", TypeSchema::string())
                .with_error(ErrorSpec::new(200, message("first")).with_description("First"))
                .with_error(ErrorSpec::new(200, message("second")).with_description("Second"));
        let responses = build_responses(&endpoint);
        assert_eq!(responses.as_object().unwrap().len(), 1);
        assert_eq!(responses["200"]["description"], json!("Second"));
        assert_eq!(
            responses["200"]["content"]["application/json"]["schema"]["properties"]["message"]
                ["enum"],
            json!(["second"])
        );
    }
}
