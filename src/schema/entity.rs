//! Per-type record layouts

use ahash::AHashMap;

use super::field::{Cardinality, FieldSpec, Occurrence};

/// Where records of a schema live in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Graphical entity (ENTITIES / BLOCKS sections)
    Entity,
    /// Symbol table entry (TABLES section), with the owning table name
    TableEntry { table: &'static str },
    /// Non-graphical object (OBJECTS section)
    Object,
}

/// One line of a schema layout, in canonical output order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaEntry {
    /// Index into [`EntitySchema::fields`]
    Field(usize),
    /// Subclass marker (code 100); opens a new section
    Subclass(&'static str),
}

/// Layout of one record type.
///
/// Fields are grouped into sections: section 0 precedes the first subclass
/// marker, section `i` follows the `i`-th marker. A code declared in several
/// sections resolves to the section the decoder is currently in.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    name: &'static str,
    kind: RecordKind,
    entries: Vec<SchemaEntry>,
    fields: Vec<FieldSpec>,
    field_sections: Vec<usize>,
    markers: Vec<&'static str>,
    code_index: AHashMap<i32, Vec<usize>>,
}

impl EntitySchema {
    /// Start a schema for records tagged `name` (the code 0 value)
    pub fn builder(name: &'static str, kind: RecordKind) -> EntitySchemaBuilder {
        EntitySchemaBuilder {
            name,
            kind,
            entries: Vec::new(),
            fields: Vec::new(),
            field_sections: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field_at(&self, index: usize) -> &FieldSpec {
        &self.fields[index]
    }

    /// Look a field up by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Expected subclass markers, in declared order
    pub fn subclass_markers(&self) -> &[&'static str] {
        &self.markers
    }

    /// Section opened by a subclass marker value, if expected
    pub fn marker_section(&self, marker: &str) -> Option<usize> {
        self.markers
            .iter()
            .position(|m| m.eq_ignore_ascii_case(marker))
            .map(|i| i + 1)
    }

    /// Section a field is declared in
    pub fn section_of(&self, index: usize) -> usize {
        self.field_sections[index]
    }

    /// Indexes of every field listening to `code`, in declared order
    pub fn candidates(&self, code: i32) -> &[usize] {
        self.code_index.get(&code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any field listens to `code`
    pub fn knows_code(&self, code: i32) -> bool {
        self.code_index.contains_key(&code)
    }

    /// Resolve the field for the `occurrence`-th appearance of `code`.
    ///
    /// Among the fields whose occurrence rule claims it, one declared in
    /// `section` wins; otherwise the first declared.
    pub fn resolve(&self, code: i32, occurrence: u32, section: usize) -> Option<usize> {
        self.resolve_with(code, occurrence, section, |_| true)
    }

    /// [`resolve`](Self::resolve) restricted to fields `accept` admits
    pub fn resolve_with(
        &self,
        code: i32,
        occurrence: u32,
        section: usize,
        accept: impl Fn(&FieldSpec) -> bool,
    ) -> Option<usize> {
        let mut first = None;
        for &idx in self.candidates(code) {
            let spec = &self.fields[idx];
            if !spec.occurrence.accepts(occurrence) || !accept(spec) {
                continue;
            }
            if self.field_sections[idx] == section {
                return Some(idx);
            }
            first.get_or_insert(idx);
        }
        first
    }

    /// Fields sharing `code` whose meaning depends on occurrence order
    pub fn positional_slots(&self, code: i32) -> Vec<usize> {
        self.code_index
            .get(&code)
            .map(|c| {
                c.iter()
                    .copied()
                    .filter(|&i| self.fields[i].code == code && self.fields[i].occurrence.is_positional())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Builder for [`EntitySchema`]
///
/// Schemas are static data; layout mistakes (duplicate names, positional
/// slots declared out of order) are programmer errors and panic.
#[derive(Debug)]
pub struct EntitySchemaBuilder {
    name: &'static str,
    kind: RecordKind,
    entries: Vec<SchemaEntry>,
    fields: Vec<FieldSpec>,
    field_sections: Vec<usize>,
    markers: Vec<&'static str>,
}

impl EntitySchemaBuilder {
    /// Append a field at the current position
    pub fn field(mut self, spec: FieldSpec) -> Self {
        assert!(
            self.fields.iter().all(|f| f.name != spec.name),
            "duplicate field {} in schema {}",
            spec.name,
            self.name
        );
        if let Occurrence::Nth(_) = spec.occurrence {
            assert!(
                spec.cardinality == Cardinality::Single,
                "occurrence slot {} in schema {} must be single-valued",
                spec.name,
                self.name
            );
        }
        if let Occurrence::Nth(n) | Occurrence::From(n) = spec.occurrence {
            let earlier_max = self
                .fields
                .iter()
                .filter(|f| f.code == spec.code && f.occurrence.is_positional())
                .map(|f| f.occurrence.first())
                .max()
                .unwrap_or(0);
            assert!(
                n > earlier_max,
                "occurrence slots for code {} in schema {} must be declared in order",
                spec.code,
                self.name
            );
            assert!(
                self.fields
                    .iter()
                    .filter(|f| f.code == spec.code && f.occurrence.is_positional())
                    .all(|f| f.min_version == spec.min_version && f.max_version == spec.max_version),
                "occurrence slots for code {} in schema {} must share a version range",
                spec.code,
                self.name
            );
        }
        self.entries.push(SchemaEntry::Field(self.fields.len()));
        self.field_sections.push(self.markers.len());
        self.fields.push(spec);
        self
    }

    /// Append several fields
    pub fn fields(self, specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        specs.into_iter().fold(self, |b, s| b.field(s))
    }

    /// Append a subclass marker; following fields belong to its section
    pub fn subclass(mut self, marker: &'static str) -> Self {
        self.entries.push(SchemaEntry::Subclass(marker));
        self.markers.push(marker);
        self
    }

    pub fn build(self) -> EntitySchema {
        let mut code_index: AHashMap<i32, Vec<usize>> = AHashMap::new();
        for (idx, spec) in self.fields.iter().enumerate() {
            for code in spec.codes() {
                code_index.entry(code).or_default().push(idx);
            }
        }
        EntitySchema {
            name: self.name,
            kind: self.kind,
            entries: self.entries,
            fields: self.fields,
            field_sections: self.field_sections,
            markers: self.markers,
            code_index,
        }
    }
}
