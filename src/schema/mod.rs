//! Declarative record layouts
//!
//! Each record type is described once as an [`EntitySchema`]: an ordered list
//! of [`FieldSpec`]s interleaved with subclass markers. The decoder and the
//! encoder are driven entirely by these tables.

pub mod catalog;
pub mod entity;
pub mod field;
pub mod registry;

pub use entity::{EntitySchema, EntitySchemaBuilder, RecordKind, SchemaEntry};
pub use field::{Cardinality, FieldFlags, FieldSpec, Occurrence, WIDE_GRAPHICS_SIZE_CODE};
pub use registry::SchemaRegistry;
