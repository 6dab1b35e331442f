//! # Schema Translation
//!
//! The conversion core only ever talks to schemas through the [`SchemaNode`]
//! capability set. [`TypeSchema`] is the type-description tree shipped with
//! this crate; any other tree can be plugged in by implementing the trait.
//!
//! - **types**: the `TypeSchema` tree and its fluent constructors.
//! - **export**: translation of a `TypeSchema` into a JSON Schema object.

pub mod export;
pub mod types;

pub use export::export_schema;
pub use types::{
    ArrayType, Bound, NumberType, ObjectType, StringFormat, StringType, TypeKind, TypeSchema,
    UnknownKeys,
};

use serde_json::Value;

/// JSON Schema dialect targeted when exporting a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonSchemaTarget {
    /// The OpenAPI 3.0 Schema Object subset.
    ///
    /// Exclusive bounds render as `exclusiveMinimum: true` next to `minimum`,
    /// literals as single-value enums and nullability as `nullable: true`.
    #[default]
    OpenApi3,
    /// JSON Schema draft 7.
    JsonSchema7,
}

/// Capabilities the document assembler requires from a schema node.
///
/// Nodes are only ever read; the assembler never mutates caller schemas.
pub trait SchemaNode: Clone {
    /// Whether the node accepts an absent value.
    fn is_optional(&self) -> bool;

    /// Strips exactly one layer of optionality.
    ///
    /// Returns `None` when the node is not an optional wrapper (for instance
    /// when it is optional only because it carries a default).
    fn unwrap_optional(&self) -> Option<Self>;

    /// Whether the node describes an array, looking through modifiers.
    fn is_array(&self) -> bool;

    /// Human text attached to the node.
    fn description(&self) -> Option<&str>;

    /// Exports the node as a JSON Schema object in the given dialect.
    fn to_json_schema(&self, target: JsonSchemaTarget) -> Value;
}
