//! Schema lookup by record type name

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use super::catalog::builtin_schemas;
use super::entity::EntitySchema;
use crate::error::{DxfError, Result};

static BUILTIN: Lazy<SchemaRegistry> = Lazy::new(|| {
    let mut registry = SchemaRegistry::new();
    for schema in builtin_schemas() {
        registry.register(schema);
    }
    registry
});

/// Table of record layouts keyed by the code 0 type name.
///
/// Names are matched case-insensitively. The builtin registry is built once
/// on first use and never changes afterwards.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, EntitySchema>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            schemas: IndexMap::new(),
        }
    }

    /// The shared builtin registry
    pub fn builtin() -> &'static SchemaRegistry {
        &BUILTIN
    }

    /// Add a schema, replacing any schema with the same name
    pub fn register(&mut self, schema: EntitySchema) -> Option<EntitySchema> {
        self.schemas.insert(schema.name().to_ascii_uppercase(), schema)
    }

    /// Look a schema up by type name
    pub fn lookup(&self, name: &str) -> Result<&EntitySchema> {
        self.get(name)
            .ok_or_else(|| DxfError::UnknownEntityType(name.to_string()))
    }

    /// Look a schema up by type name, without an error
    pub fn get(&self, name: &str) -> Option<&EntitySchema> {
        self.schemas.get(&name.trim().to_ascii_uppercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered type names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.values().map(|s| s.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntitySchema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
