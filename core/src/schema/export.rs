//! # Schema Export
//!
//! Converts a [`TypeSchema`] into a JSON Schema object. The OpenAPI 3.0 target
//! follows the Schema Object subset: boolean exclusive bounds paired with
//! `minimum`/`maximum`, single-value enums instead of `const`, and `nullable`.

use crate::schema::types::{
    Bound, NumberType, ObjectType, StringType, TypeKind, TypeSchema, UnknownKeys,
};
use crate::schema::{JsonSchemaTarget, SchemaNode};
use serde_json::{json, Map, Value};

/// Exports `schema` as a JSON Schema object for `target`.
pub fn export_schema(schema: &TypeSchema, target: JsonSchemaTarget) -> Map<String, Value> {
    let mut obj = match &schema.kind {
        TypeKind::String(s) => string_schema(s),
        TypeKind::Number(n) => number_schema(n, target),
        TypeKind::Boolean => type_only("boolean"),
        TypeKind::Null => null_schema(target),
        TypeKind::Literal { value } => literal_schema(value, target),
        TypeKind::Enum { values } => {
            let mut obj = type_only("string");
            obj.insert("enum".to_string(), json!(values));
            obj
        }
        TypeKind::Array(a) => {
            let mut obj = type_only("array");
            obj.insert(
                "items".to_string(),
                Value::Object(export_schema(&a.items, target)),
            );
            if let Some(min) = a.min_items {
                obj.insert("minItems".to_string(), json!(min));
            }
            if let Some(max) = a.max_items {
                obj.insert("maxItems".to_string(), json!(max));
            }
            obj
        }
        TypeKind::Object(o) => object_schema(o, target),
        TypeKind::Record { values } => {
            let mut obj = type_only("object");
            obj.insert(
                "additionalProperties".to_string(),
                Value::Object(export_schema(values, target)),
            );
            obj
        }
        TypeKind::Union { options } => {
            let members = options
                .iter()
                .map(|o| Value::Object(export_schema(o, target)))
                .collect::<Vec<_>>();
            let mut obj = Map::new();
            obj.insert("anyOf".to_string(), Value::Array(members));
            obj
        }
        TypeKind::Optional { inner } | TypeKind::Refine { inner, .. } => {
            export_schema(inner, target)
        }
        TypeKind::Default { inner, value } => {
            let mut obj = export_schema(inner, target);
            obj.insert("default".to_string(), value.clone());
            obj
        }
        TypeKind::Nullable { inner } => nullable_schema(export_schema(inner, target), target),
        TypeKind::Void | TypeKind::Any => Map::new(),
    };

    if let Some(desc) = &schema.description {
        obj.insert("description".to_string(), json!(desc));
    }
    obj
}

fn type_only(ty: &str) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert("type".to_string(), json!(ty));
    obj
}

fn string_schema(s: &StringType) -> Map<String, Value> {
    let mut obj = type_only("string");
    if let Some(format) = s.format {
        obj.insert("format".to_string(), json!(format.as_str()));
    }
    if let Some(min) = s.min_length {
        obj.insert("minLength".to_string(), json!(min));
    }
    if let Some(max) = s.max_length {
        obj.insert("maxLength".to_string(), json!(max));
    }
    if let Some(pattern) = &s.pattern {
        obj.insert("pattern".to_string(), json!(pattern));
    }
    obj
}

fn number_schema(n: &NumberType, target: JsonSchemaTarget) -> Map<String, Value> {
    let mut obj = type_only(if n.integer { "integer" } else { "number" });
    if let Some(min) = &n.minimum {
        insert_bound(&mut obj, "minimum", "exclusiveMinimum", min, target);
    }
    if let Some(max) = &n.maximum {
        insert_bound(&mut obj, "maximum", "exclusiveMaximum", max, target);
    }
    if let Some(step) = &n.multiple_of {
        obj.insert("multipleOf".to_string(), Value::Number(step.clone()));
    }
    obj
}

fn insert_bound(
    obj: &mut Map<String, Value>,
    key: &str,
    exclusive_key: &str,
    bound: &Bound,
    target: JsonSchemaTarget,
) {
    let value = Value::Number(bound.value.clone());
    match (bound.exclusive, target) {
        (false, _) => {
            obj.insert(key.to_string(), value);
        }
        (true, JsonSchemaTarget::OpenApi3) => {
            obj.insert(exclusive_key.to_string(), json!(true));
            obj.insert(key.to_string(), value);
        }
        (true, JsonSchemaTarget::JsonSchema7) => {
            obj.insert(exclusive_key.to_string(), value);
        }
    }
}

fn null_schema(target: JsonSchemaTarget) -> Map<String, Value> {
    match target {
        JsonSchemaTarget::OpenApi3 => {
            let mut obj = Map::new();
            obj.insert("enum".to_string(), json!(["null"]));
            obj.insert("nullable".to_string(), json!(true));
            obj
        }
        JsonSchemaTarget::JsonSchema7 => type_only("null"),
    }
}

fn literal_schema(value: &Value, target: JsonSchemaTarget) -> Map<String, Value> {
    let ty = match value {
        Value::Null => return null_schema(target),
        Value::String(_) => Some("string"),
        Value::Number(_) => Some("number"),
        Value::Bool(_) => Some("boolean"),
        Value::Array(_) | Value::Object(_) => None,
    };
    let mut obj = Map::new();
    if let Some(ty) = ty {
        obj.insert("type".to_string(), json!(ty));
    }
    match target {
        JsonSchemaTarget::OpenApi3 => obj.insert("enum".to_string(), json!([value])),
        JsonSchemaTarget::JsonSchema7 => obj.insert("const".to_string(), value.clone()),
    };
    obj
}

fn object_schema(o: &ObjectType, target: JsonSchemaTarget) -> Map<String, Value> {
    let mut obj = type_only("object");
    let mut properties = Map::new();
    let mut required = Vec::new();
    for (name, prop) in &o.properties {
        if !prop.is_optional() {
            required.push(Value::String(name.clone()));
        }
        properties.insert(name.clone(), Value::Object(export_schema(prop, target)));
    }
    obj.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        obj.insert("required".to_string(), Value::Array(required));
    }
    let additional = matches!(o.unknown_keys, UnknownKeys::Passthrough);
    obj.insert("additionalProperties".to_string(), json!(additional));
    obj
}

fn nullable_schema(inner: Map<String, Value>, target: JsonSchemaTarget) -> Map<String, Value> {
    match target {
        JsonSchemaTarget::OpenApi3 => {
            if inner.contains_key("type") || inner.contains_key("anyOf") {
                let mut obj = inner;
                obj.insert("nullable".to_string(), json!(true));
                return obj;
            }
            let mut obj = Map::new();
            obj.insert("anyOf".to_string(), json!([inner]));
            obj.insert("nullable".to_string(), json!(true));
            obj
        }
        JsonSchemaTarget::JsonSchema7 => {
            if let Some(Value::String(ty)) = inner.get("type").cloned() {
                let mut obj = inner;
                obj.insert("type".to_string(), json!([ty, "null"]));
                return obj;
            }
            if let Some(Value::Array(members)) = inner.get("anyOf") {
                let mut members = members.clone();
                members.push(json!({ "type": "null" }));
                let mut obj = inner;
                obj.insert("anyOf".to_string(), Value::Array(members));
                return obj;
            }
            let mut obj = Map::new();
            obj.insert("anyOf".to_string(), json!([inner, { "type": "null" }]));
            obj
        }
    }
}
