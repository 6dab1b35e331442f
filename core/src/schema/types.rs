//! # Type Description Tree
//!
//! A small runtime type-description language covering objects, arrays,
//! primitives, refinements, optionality and defaults. Trees are built with
//! chained constructors or deserialized from JSON/YAML definition files.

use crate::schema::{export_schema, JsonSchemaTarget, SchemaNode};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A node of the type-description tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSchema {
    /// The structural kind of the node.
    #[serde(flatten)]
    pub kind: TypeKind,
    /// Human text attached with [`TypeSchema::describe`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Structural kinds understood by the translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TypeKind {
    /// A string, optionally constrained.
    String(StringType),
    /// A number or integer, optionally bounded.
    Number(NumberType),
    /// `true` or `false`.
    Boolean,
    /// The `null` value.
    Null,
    /// Exactly one JSON value.
    Literal {
        /// The accepted value.
        value: Value,
    },
    /// One of a fixed set of strings.
    Enum {
        /// Accepted values, in declaration order.
        values: Vec<String>,
    },
    /// A homogeneous array.
    Array(ArrayType),
    /// An object with known keys.
    Object(ObjectType),
    /// An object with arbitrary keys and uniform values.
    Record {
        /// Schema of every value.
        values: Box<TypeSchema>,
    },
    /// Any of the listed schemas.
    Union {
        /// Member schemas.
        options: Vec<TypeSchema>,
    },
    /// The inner schema, or absent.
    Optional {
        /// Wrapped schema.
        inner: Box<TypeSchema>,
    },
    /// The inner schema, or `null`.
    Nullable {
        /// Wrapped schema.
        inner: Box<TypeSchema>,
    },
    /// The inner schema, with a value substituted when absent.
    Default {
        /// Wrapped schema.
        inner: Box<TypeSchema>,
        /// Substituted value.
        value: Value,
    },
    /// The inner schema plus a runtime check that has no JSON Schema form.
    Refine {
        /// Wrapped schema.
        inner: Box<TypeSchema>,
        /// Message reported when the check fails.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// No value at all (e.g. an empty response body).
    Void,
    /// Anything.
    Any,
}

/// Well-known string formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringFormat {
    /// RFC 5322 e-mail address.
    Email,
    /// RFC 4122 UUID.
    Uuid,
    /// RFC 3986 URI.
    Uri,
    /// RFC 3339 date-time.
    DateTime,
}

impl StringFormat {
    /// The `format` keyword value.
    pub fn as_str(&self) -> &'static str {
        match self {
            StringFormat::Email => "email",
            StringFormat::Uuid => "uuid",
            StringFormat::Uri => "uri",
            StringFormat::DateTime => "date-time",
        }
    }
}

/// String constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StringType {
    /// Well-known format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<StringFormat>,
    /// Minimum length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// ECMA-262 regular expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// A numeric bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    /// The limit.
    pub value: Number,
    /// Whether the limit itself is excluded.
    #[serde(default)]
    pub exclusive: bool,
}

impl Bound {
    /// A bound that includes `value`.
    pub fn inclusive(value: impl Into<Number>) -> Self {
        Self {
            value: value.into(),
            exclusive: false,
        }
    }

    /// A bound that excludes `value`.
    pub fn exclusive(value: impl Into<Number>) -> Self {
        Self {
            value: value.into(),
            exclusive: true,
        }
    }
}

/// Number constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberType {
    /// Restrict to whole numbers.
    pub integer: bool,
    /// Lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Bound>,
    /// Upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Bound>,
    /// Step the value must be a multiple of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,
}

/// Array constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayType {
    /// Schema of every item.
    pub items: Box<TypeSchema>,
    /// Minimum item count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// Maximum item count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
}

/// Policy for keys not listed in an object's properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnknownKeys {
    /// Unknown keys are dropped.
    #[default]
    Strip,
    /// Unknown keys are rejected.
    Strict,
    /// Unknown keys are kept.
    Passthrough,
}

/// Object shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectType {
    /// Known properties, in declaration order.
    pub properties: IndexMap<String, TypeSchema>,
    /// Unknown key policy.
    pub unknown_keys: UnknownKeys,
}

impl From<TypeKind> for TypeSchema {
    fn from(kind: TypeKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }
}

impl TypeSchema {
    /// A plain string.
    pub fn string() -> Self {
        TypeKind::String(StringType::default()).into()
    }

    /// A floating point number.
    pub fn number() -> Self {
        TypeKind::Number(NumberType::default()).into()
    }

    /// A whole number.
    pub fn integer() -> Self {
        TypeKind::Number(NumberType {
            integer: true,
            ..NumberType::default()
        })
        .into()
    }

    /// A boolean.
    pub fn boolean() -> Self {
        TypeKind::Boolean.into()
    }

    /// The `null` value.
    pub fn null() -> Self {
        TypeKind::Null.into()
    }

    /// Exactly `value`.
    pub fn literal(value: impl Into<Value>) -> Self {
        TypeKind::Literal {
            value: value.into(),
        }
        .into()
    }

    /// One of `values`.
    pub fn enumeration<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        TypeKind::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
        .into()
    }

    /// An array of `items`.
    pub fn array(items: TypeSchema) -> Self {
        TypeKind::Array(ArrayType {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        })
        .into()
    }

    /// An object with the given properties.
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, TypeSchema)>,
        K: Into<String>,
    {
        TypeKind::Object(ObjectType {
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
            unknown_keys: UnknownKeys::Strip,
        })
        .into()
    }

    /// A map from arbitrary keys to `values`.
    pub fn record(values: TypeSchema) -> Self {
        TypeKind::Record {
            values: Box::new(values),
        }
        .into()
    }

    /// Any of `options`.
    pub fn union(options: Vec<TypeSchema>) -> Self {
        TypeKind::Union { options }.into()
    }

    /// No value.
    pub fn void() -> Self {
        TypeKind::Void.into()
    }

    /// Anything.
    pub fn any() -> Self {
        TypeKind::Any.into()
    }

    /// Attaches human text to this node.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Makes this node optional.
    pub fn optional(self) -> Self {
        self.wrap(|inner| TypeKind::Optional { inner })
    }

    /// Makes this node nullable.
    pub fn nullable(self) -> Self {
        self.wrap(|inner| TypeKind::Nullable { inner })
    }

    /// Substitutes `value` when absent.
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.wrap(|inner| TypeKind::Default { inner, value })
    }

    /// Adds a runtime check that has no schema representation.
    pub fn refine(self, message: impl Into<String>) -> Self {
        let message = Some(message.into());
        self.wrap(|inner| TypeKind::Refine { inner, message })
    }

    // Wrappers inherit the description so `.describe(..).optional()` keeps it visible.
    fn wrap(self, make: impl FnOnce(Box<TypeSchema>) -> TypeKind) -> Self {
        let description = self.description.clone();
        Self {
            kind: make(Box::new(self)),
            description,
        }
    }

    /// Requires the `email` format.
    pub fn email(self) -> Self {
        self.with_format(StringFormat::Email)
    }

    /// Requires the `uuid` format.
    pub fn uuid(self) -> Self {
        self.with_format(StringFormat::Uuid)
    }

    /// Requires the `uri` format.
    pub fn url(self) -> Self {
        self.with_format(StringFormat::Uri)
    }

    /// Requires the `date-time` format.
    pub fn datetime(self) -> Self {
        self.with_format(StringFormat::DateTime)
    }

    fn with_format(self, format: StringFormat) -> Self {
        self.map_string(|s| s.format = Some(format))
    }

    /// Minimum string length.
    pub fn min_length(self, len: u64) -> Self {
        self.map_string(|s| s.min_length = Some(len))
    }

    /// Maximum string length.
    pub fn max_length(self, len: u64) -> Self {
        self.map_string(|s| s.max_length = Some(len))
    }

    /// Regular expression the string must match.
    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.map_string(|s| s.pattern = Some(pattern))
    }

    fn map_string(mut self, f: impl FnOnce(&mut StringType)) -> Self {
        if let TypeKind::String(s) = self.base_kind_mut() {
            f(s);
        }
        self
    }

    /// Restricts a number to whole values.
    pub fn int(self) -> Self {
        self.map_number(|n| n.integer = true)
    }

    /// `value >= min`.
    pub fn min(self, min: impl Into<Number>) -> Self {
        let bound = Bound::inclusive(min);
        self.map_number(|n| n.minimum = Some(bound))
    }

    /// `value > min`.
    pub fn gt(self, min: impl Into<Number>) -> Self {
        let bound = Bound::exclusive(min);
        self.map_number(|n| n.minimum = Some(bound))
    }

    /// `value <= max`.
    pub fn max(self, max: impl Into<Number>) -> Self {
        let bound = Bound::inclusive(max);
        self.map_number(|n| n.maximum = Some(bound))
    }

    /// `value < max`.
    pub fn lt(self, max: impl Into<Number>) -> Self {
        let bound = Bound::exclusive(max);
        self.map_number(|n| n.maximum = Some(bound))
    }

    /// `value > 0`.
    pub fn positive(self) -> Self {
        self.gt(0)
    }

    /// `value >= 0`.
    pub fn nonnegative(self) -> Self {
        self.min(0)
    }

    /// `value < 0`.
    pub fn negative(self) -> Self {
        self.lt(0)
    }

    /// `value <= 0`.
    pub fn nonpositive(self) -> Self {
        self.max(0)
    }

    /// `value % step == 0`.
    pub fn multiple_of(self, step: impl Into<Number>) -> Self {
        let step = step.into();
        self.map_number(|n| n.multiple_of = Some(step))
    }

    fn map_number(mut self, f: impl FnOnce(&mut NumberType)) -> Self {
        if let TypeKind::Number(n) = self.base_kind_mut() {
            f(n);
        }
        self
    }

    /// Minimum array length.
    pub fn min_items(mut self, count: u64) -> Self {
        if let TypeKind::Array(a) = self.base_kind_mut() {
            a.min_items = Some(count);
        }
        self
    }

    /// Maximum array length.
    pub fn max_items(mut self, count: u64) -> Self {
        if let TypeKind::Array(a) = self.base_kind_mut() {
            a.max_items = Some(count);
        }
        self
    }

    /// Rejects unknown object keys.
    pub fn strict(self) -> Self {
        self.map_object(|o| o.unknown_keys = UnknownKeys::Strict)
    }

    /// Keeps unknown object keys.
    pub fn passthrough(self) -> Self {
        self.map_object(|o| o.unknown_keys = UnknownKeys::Passthrough)
    }

    /// Removes the listed properties.
    pub fn omit(self, keys: &[&str]) -> Self {
        self.map_object(|o| o.properties.retain(|k, _| !keys.contains(&k.as_str())))
    }

    /// Adds (or replaces) properties.
    pub fn extend<I, K>(self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, TypeSchema)>,
        K: Into<String>,
    {
        self.map_object(|o| {
            for (k, v) in properties {
                o.properties.insert(k.into(), v);
            }
        })
    }

    fn map_object(mut self, f: impl FnOnce(&mut ObjectType)) -> Self {
        if let TypeKind::Object(o) = self.base_kind_mut() {
            f(o);
        }
        self
    }

    // Constraint modifiers apply to the innermost node, so `.optional().positive()`
    // bounds the number. A modifier of the wrong kind is a no-op.
    fn base_kind_mut(&mut self) -> &mut TypeKind {
        match &mut self.kind {
            TypeKind::Optional { inner }
            | TypeKind::Nullable { inner }
            | TypeKind::Default { inner, .. }
            | TypeKind::Refine { inner, .. } => inner.base_kind_mut(),
            kind => kind,
        }
    }
}

impl SchemaNode for TypeSchema {
    fn is_optional(&self) -> bool {
        match &self.kind {
            TypeKind::Optional { .. } | TypeKind::Default { .. } => true,
            TypeKind::Void | TypeKind::Any => true,
            TypeKind::Nullable { inner } | TypeKind::Refine { inner, .. } => inner.is_optional(),
            TypeKind::Union { options } => options.iter().any(SchemaNode::is_optional),
            _ => false,
        }
    }

    fn unwrap_optional(&self) -> Option<Self> {
        match &self.kind {
            TypeKind::Optional { inner } => Some(inner.as_ref().clone()),
            TypeKind::Default { inner, value } => inner.unwrap_optional().map(|unwrapped| Self {
                kind: TypeKind::Default {
                    inner: Box::new(unwrapped),
                    value: value.clone(),
                },
                description: self.description.clone(),
            }),
            TypeKind::Nullable { inner } => inner.unwrap_optional().map(|unwrapped| Self {
                kind: TypeKind::Nullable {
                    inner: Box::new(unwrapped),
                },
                description: self.description.clone(),
            }),
            _ => None,
        }
    }

    fn is_array(&self) -> bool {
        match &self.kind {
            TypeKind::Array(_) => true,
            TypeKind::Optional { inner }
            | TypeKind::Nullable { inner }
            | TypeKind::Default { inner, .. }
            | TypeKind::Refine { inner, .. } => inner.is_array(),
            _ => false,
        }
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn to_json_schema(&self, target: JsonSchemaTarget) -> Value {
        Value::Object(export_schema(self, target))
    }
}
