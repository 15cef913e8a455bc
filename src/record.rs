//! Decoded records
//!
//! A [`Record`] is the uniform in-memory form of every entity, table entry
//! and object: the type name plus an ordered map from field name to value.
//! Which names exist, and what they mean, is decided by the record's
//! [`EntitySchema`].

use indexmap::IndexMap;

use crate::error::{DxfError, Result};
use crate::policy::VersionPolicy;
use crate::schema::EntitySchema;
use crate::types::{FieldValue, Handle, Point3, Value};

/// Field name of the record handle in every builtin schema
pub const HANDLE_FIELD: &str = "handle";

/// One entity, table entry or object.
///
/// Equality compares the type name and the field map; the order in which
/// fields were set does not matter.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    entity_type: &'static str,
    fields: IndexMap<&'static str, FieldValue>,
}

impl Record {
    /// Create a record of `schema`'s type with every schema default applied
    pub fn new(schema: &EntitySchema) -> Self {
        let mut fields = IndexMap::with_capacity(schema.fields().len());
        for spec in schema.fields() {
            if let Some(value) = VersionPolicy::default_for(spec) {
                fields.insert(spec.name, value);
            }
        }
        Self {
            entity_type: schema.name(),
            fields,
        }
    }

    /// Create a record with no fields at all
    pub fn empty(entity_type: &'static str) -> Self {
        Self {
            entity_type,
            fields: IndexMap::new(),
        }
    }

    /// Type name (the code 0 value)
    pub fn entity_type(&self) -> &'static str {
        self.entity_type
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Store a value, returning the previous one
    pub fn set(&mut self, name: &'static str, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(name, value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields holding a value
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Append a value to a repeated field, creating the list if needed
    pub fn push(&mut self, name: &'static str, value: Value) -> Result<()> {
        let entity = self.entity_type;
        match self.fields.entry(name).or_insert_with(|| FieldValue::List(Vec::new())) {
            FieldValue::List(values) => {
                values.try_reserve(1)?;
                values.push(value);
                Ok(())
            }
            _ => Err(not_a_list(entity, name)),
        }
    }

    /// Append a point to a point-list field, creating the list if needed
    pub fn push_point(&mut self, name: &'static str, point: Point3) -> Result<()> {
        let entity = self.entity_type;
        match self.fields.entry(name).or_insert_with(|| FieldValue::Points(Vec::new())) {
            FieldValue::Points(points) => {
                points.try_reserve(1)?;
                points.push(point);
                Ok(())
            }
            _ => Err(not_a_list(entity, name)),
        }
    }

    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(FieldValue::as_value)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get_value(name).and_then(Value::as_int)
    }

    pub fn get_double(&self, name: &str) -> Option<f64> {
        self.get_value(name).and_then(Value::as_double)
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get_value(name).and_then(Value::as_str)
    }

    pub fn get_handle(&self, name: &str) -> Option<Handle> {
        self.get_value(name).and_then(Value::as_handle)
    }

    pub fn get_point(&self, name: &str) -> Option<Point3> {
        self.get(name).and_then(FieldValue::as_point)
    }

    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(FieldValue::as_list)
    }

    pub fn get_points(&self, name: &str) -> Option<&[Point3]> {
        self.get(name).and_then(FieldValue::as_points)
    }

    /// Whether bit `bit` of an integer/flag field is set.
    ///
    /// Absent and non-integer fields report `false`.
    pub fn flag_is_set(&self, name: &str, bit: u32) -> bool {
        self.get_value(name).map_or(false, |v| v.test_bit(bit))
    }

    /// The record's own handle, if it has a non-null one
    pub fn handle(&self) -> Option<Handle> {
        self.get_handle(HANDLE_FIELD).and_then(Handle::non_null)
    }
}

fn not_a_list(entity: &str, name: &str) -> DxfError {
    DxfError::SchemaViolation {
        entity: entity.to_string(),
        field: name.to_string(),
        reason: "field does not hold a list".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::catalog;

    #[test]
    fn test_born_with_defaults() {
        let record = Record::new(&catalog::text_style());
        assert_eq!(record.entity_type(), "STYLE");
        assert_eq!(record.get_double("width_factor"), Some(1.0));
        assert_eq!(record.get_text("primary_font_file"), Some("txt"));
        assert!(!record.contains("style_name"));
        assert!(!record.contains("handle"));
    }

    #[test]
    fn test_list_fields_start_empty() {
        let record = Record::new(&catalog::layer_index());
        assert_eq!(record.get_list("layer_names"), Some(&[][..]));
    }

    #[test]
    fn test_push_and_order() {
        let mut record = Record::new(&catalog::layer_index());
        for name in ["L1", "L2", "L3"] {
            record.push("layer_names", Value::from(name)).unwrap();
        }
        let names: Vec<_> = record
            .get_list("layer_names")
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(names, ["L1", "L2", "L3"]);
    }

    #[test]
    fn test_push_into_single_fails() {
        let mut record = Record::new(&catalog::text_style());
        let err = record.push("width_factor", Value::Double(2.0)).unwrap_err();
        assert!(err.is_record_local());
    }

    #[test]
    fn test_equality_ignores_order() {
        let mut a = Record::empty("3DFACE");
        a.set("layer", "WALLS");
        a.set("color", 3i64);
        let mut b = Record::empty("3DFACE");
        b.set("color", 3i64);
        b.set("layer", "WALLS");
        assert_eq!(a, b);
        b.set("color", 4i64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_flags_and_handle() {
        let mut record = Record::new(&catalog::text_style());
        record.set("standard_flag", 5i64);
        assert!(record.flag_is_set("standard_flag", 0));
        assert!(!record.flag_is_set("standard_flag", 1));
        assert!(!record.flag_is_set("missing", 0));

        assert_eq!(record.handle(), None);
        record.set("handle", Handle::new(0x2A));
        assert_eq!(record.handle(), Some(Handle::new(0x2A)));
        record.set("handle", Handle::NULL);
        assert_eq!(record.handle(), None);
    }
}
