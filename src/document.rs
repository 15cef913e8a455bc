//! Document-level container of decoded records

use crate::chain::ChainSet;
use crate::error::Result;
use crate::notification::NotificationCollection;
use crate::record::Record;
use crate::schema::{RecordKind, SchemaRegistry};
use crate::types::{DxfVersion, Handle};

/// Records of a DXF file, grouped by the section they live in
#[derive(Debug, Clone, Default)]
pub struct DxfDocument {
    /// Version read from `$ACADVER`, or the version to write
    pub version: DxfVersion,
    /// `$DWGCODEPAGE`, when the header carried one
    pub code_page: Option<String>,
    /// Symbol table entries (TABLES section)
    pub tables: ChainSet,
    /// Graphical entities (ENTITIES section)
    pub entities: ChainSet,
    /// Non-graphical objects (OBJECTS section)
    pub objects: ChainSet,
    /// Diagnostics collected while reading
    pub notifications: NotificationCollection,
}

impl DxfDocument {
    /// Create an empty document of `version`
    pub fn new(version: DxfVersion) -> Self {
        Self {
            version,
            ..Default::default()
        }
    }

    /// Add a record to the section its builtin schema belongs to
    pub fn add(&mut self, record: Record) -> Result<()> {
        self.add_with(SchemaRegistry::builtin(), record)
    }

    /// Add a record to the section its schema in `registry` belongs to
    pub fn add_with(&mut self, registry: &SchemaRegistry, record: Record) -> Result<()> {
        match registry.lookup(record.entity_type())?.kind() {
            RecordKind::Entity => self.entities.append(record),
            RecordKind::TableEntry { .. } => self.tables.append(record),
            RecordKind::Object => self.objects.append(record),
        }
    }

    /// Number of records in every section
    pub fn record_count(&self) -> usize {
        self.tables.record_count() + self.entities.record_count() + self.objects.record_count()
    }

    /// First record of any section carrying `handle`
    pub fn find_by_handle(&self, handle: Handle) -> Option<&Record> {
        self.tables
            .find_by_handle(handle)
            .or_else(|| self.entities.find_by_handle(handle))
            .or_else(|| self.objects.find_by_handle(handle))
    }

    /// Release every record and return how many were released
    pub fn destroy(self) -> usize {
        self.tables.destroy() + self.entities.destroy() + self.objects.destroy()
    }
}
