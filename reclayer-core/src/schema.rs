//! Record type descriptors consumed by the adapter.
//!
//! The schema is an external, read-only description of record types: which
//! fields exist, their scalar kind, whether they are array-valued, and how
//! link fields relate to other record types. The adapter reads it on every
//! call to decide per-field coercion and filter translation; it never writes
//! to it.

use bson::Bson;
use std::collections::HashMap;

use crate::error::{AdapterError, AdapterResult};

/// Scalar kind of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8 text.
    Text,
    /// Whole number.
    Integer,
    /// Floating-point number.
    Float,
    /// Boolean flag.
    Boolean,
    /// Date/time value. Stored natively by the document store as a
    /// `{seconds, nanoseconds}` pair.
    DateTime,
    /// Binary buffer. Stored by the document store as a text-encoded string.
    Buffer,
    /// Opaque object, passed through without coercion.
    Object,
}

/// Descriptor for a single record field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Scalar kind of the field (or of its elements when array-valued).
    pub kind: FieldKind,
    /// Whether the field holds a sequence of values.
    pub is_array: bool,
    /// Target record type name when this field is a link.
    pub link: Option<String>,
    /// Name of the denormalized back-reference field on the linked type.
    pub inverse: Option<String>,
}

impl FieldDef {
    /// Creates a scalar field descriptor of the given kind.
    pub fn new(kind: FieldKind) -> Self {
        Self { kind, is_array: false, link: None, inverse: None }
    }

    /// Marks the field as array-valued.
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Declares the field as a link to another record type, resolved through
    /// the given inverse field name.
    pub fn link(mut self, target: impl Into<String>, inverse: impl Into<String>) -> Self {
        self.link = Some(target.into());
        self.inverse = Some(inverse.into());
        self
    }

    /// Declares the field as a link without a known inverse field. Matching
    /// falls back to the link target's collection name.
    pub fn link_without_inverse(mut self, target: impl Into<String>) -> Self {
        self.link = Some(target.into());
        self
    }

    /// Whether this field is a link to another record type.
    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }
}

/// Field descriptors for one record type.
#[derive(Debug, Clone, Default)]
pub struct RecordType {
    fields: HashMap<String, FieldDef>,
}

impl RecordType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field descriptor, replacing any previous descriptor of the
    /// same name.
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    /// Looks up a field descriptor by name.
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Iterates over all declared fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of all fields of the given scalar kind.
    pub fn fields_of_kind(&self, kind: FieldKind) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, def)| def.kind == kind)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// The full set of record types known to the adapter, plus the name of the
/// primary-key field shared by all of them.
///
/// Supplied by the owning framework at construction and read on every call.
#[derive(Debug, Clone)]
pub struct Schema {
    types: HashMap<String, RecordType>,
    primary_key: String,
}

impl Schema {
    pub fn new(primary_key: impl Into<String>) -> Self {
        Self { types: HashMap::new(), primary_key: primary_key.into() }
    }

    /// Registers a record type under the given name.
    pub fn record_type(mut self, name: impl Into<String>, record_type: RecordType) -> Self {
        self.types.insert(name.into(), record_type);
        self
    }

    /// Name of the primary-key field.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Looks up the descriptor for a record type.
    pub fn get(&self, type_name: &str) -> AdapterResult<&RecordType> {
        self.types
            .get(type_name)
            .ok_or_else(|| AdapterError::UnknownType(type_name.to_string()))
    }

    /// Looks up a field descriptor, failing when the field is not declared.
    ///
    /// Every field referenced by a query option must exist in the descriptor
    /// for the record's type.
    pub fn field<'a>(
        &'a self,
        type_name: &str,
        field: &str,
    ) -> AdapterResult<&'a FieldDef> {
        self.get(type_name)?
            .get(field)
            .ok_or_else(|| {
                AdapterError::UnknownField(field.to_string(), type_name.to_string())
            })
    }
}

/// Renders a primary-key value into the store's string document-id space.
///
/// Strings are rendered bare; numbers through their `Display` form, so the
/// integer key `5` addresses document `"5"`.
pub fn key_string(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::Int32(i) => i.to_string(),
        Bson::Int64(i) => i.to_string(),
        Bson::Double(f) => f.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new("id").record_type(
            "user",
            RecordType::new()
                .field("name", FieldDef::new(FieldKind::Text))
                .field("friends", FieldDef::new(FieldKind::Integer).array()),
        )
    }

    #[test]
    fn unknown_field_lookup_fails() {
        let schema = schema();
        assert!(schema.field("user", "name").is_ok());
        assert!(matches!(
            schema.field("user", "age"),
            Err(AdapterError::UnknownField(_, _))
        ));
        assert!(matches!(
            schema.field("animal", "name"),
            Err(AdapterError::UnknownType(_))
        ));
    }

    #[test]
    fn key_string_renders_numbers_bare() {
        assert_eq!(key_string(&Bson::String("abc".into())), "abc");
        assert_eq!(key_string(&Bson::Int32(5)), "5");
        assert_eq!(key_string(&Bson::Int64(12)), "12");
    }
}
