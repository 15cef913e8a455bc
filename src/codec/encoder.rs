//! Record encoder
//!
//! Writes a [`Record`] as code/value pairs in the canonical order of its
//! schema. The output of a record decoded at a version re-decodes to an
//! equal record at that version.

use crate::error::{DxfError, Result};
use crate::io::dxf::{DxfStreamWriter, DxfStreamWriterExt, OutputProfile, Token, TokenCollector};
use crate::policy::VersionPolicy;
use crate::record::Record;
use crate::schema::{Cardinality, EntitySchema, FieldFlags, FieldSpec, SchemaEntry, WIDE_GRAPHICS_SIZE_CODE};
use crate::types::{DxfVersion, FieldValue, Value};

/// Configuration for the record encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncoderConfiguration {
    /// Write the graphics data size under code 160 instead of 92.
    pub wide_graphics_size: bool,
    /// Output profile handed to the writers the encoder creates itself.
    /// [`RecordEncoder::encode_to`] formats with the given writer's own
    /// profile.
    pub format: OutputProfile,
}

impl EncoderConfiguration {
    pub fn with_wide_graphics_size(mut self, wide: bool) -> Self {
        self.wide_graphics_size = wide;
        self
    }

    pub fn with_format(mut self, format: OutputProfile) -> Self {
        self.format = format;
        self
    }
}

/// Encodes records of one schema at one version
#[derive(Debug, Clone)]
pub struct RecordEncoder<'s> {
    schema: &'s EntitySchema,
    version: DxfVersion,
    config: EncoderConfiguration,
    graphics_size_code: i32,
}

impl<'s> RecordEncoder<'s> {
    pub fn new(schema: &'s EntitySchema, version: DxfVersion) -> Self {
        Self::with_parts(schema, version, EncoderConfiguration::default())
    }

    /// Set the encoder configuration.
    pub fn with_configuration(self, config: EncoderConfiguration) -> Self {
        Self::with_parts(self.schema, self.version, config)
    }

    fn with_parts(schema: &'s EntitySchema, version: DxfVersion, config: EncoderConfiguration) -> Self {
        let graphics_size_code = if config.wide_graphics_size {
            WIDE_GRAPHICS_SIZE_CODE
        } else {
            92
        };
        Self {
            schema,
            version,
            config,
            graphics_size_code,
        }
    }

    pub fn schema(&self) -> &'s EntitySchema {
        self.schema
    }

    pub fn version(&self) -> DxfVersion {
        self.version
    }

    /// Encode a record into tokens, starting with its `0 TYPE` token
    pub fn encode(&self, record: &Record) -> Result<Vec<Token>> {
        let mut collector = TokenCollector::new().with_double_precision(self.config.format.double_precision);
        self.encode_to(record, &mut collector)?;
        Ok(collector.into_tokens())
    }

    /// Encode a record straight into a stream writer.
    ///
    /// The record is validated first: a [`DxfError::SchemaViolation`] leaves
    /// the writer untouched.
    pub fn encode_to<W: DxfStreamWriter + ?Sized>(&self, record: &Record, writer: &mut W) -> Result<()> {
        self.validate(record)?;
        let plan = self.plan(record);

        let markers = VersionPolicy::markers_active(self.version);
        let groups = VersionPolicy::app_groups_active(self.version);
        let mut open_group: Option<&'static str> = None;

        writer.write_entity_type(self.schema.name())?;
        for entry in self.schema.entries() {
            let index = match *entry {
                SchemaEntry::Subclass(marker) => {
                    close_group(writer, &mut open_group)?;
                    if markers {
                        writer.write_subclass(marker)?;
                    }
                    continue;
                }
                SchemaEntry::Field(index) if plan[index] => index,
                SchemaEntry::Field(_) => continue,
            };

            let group = self.schema.field_at(index).group.filter(|_| groups);
            if open_group != group {
                close_group(writer, &mut open_group)?;
                if let Some(name) = group {
                    writer.write_group_start(name)?;
                    open_group = Some(name);
                }
            }
            self.write_field(record, index, writer)?;
        }
        close_group(writer, &mut open_group)?;

        tracing::debug!(
            entity = self.schema.name(),
            version = self.version.to_dxf_string(),
            fields = plan.iter().filter(|emit| **emit).count(),
            "encoded record"
        );
        Ok(())
    }

    /// Check type, field names, value shapes, text framing and required
    /// fields
    fn validate(&self, record: &Record) -> Result<()> {
        if record.entity_type() != self.schema.name() {
            return Err(self.violation(
                "entity_type",
                format!("record of type {} cannot use this schema", record.entity_type()),
            ));
        }

        for (name, value) in record.iter() {
            let spec = self
                .schema
                .field(name)
                .ok_or_else(|| self.violation(name, "no such field".to_string()))?;
            if !value_fits(spec, value) {
                return Err(self.violation(
                    name,
                    format!("value does not match a {:?} {:?} field", spec.cardinality, spec.kind),
                ));
            }
            if breaks_framing(value) {
                return Err(self.violation(name, "text value contains a line break".to_string()));
            }
        }

        for spec in self.schema.fields() {
            if !spec.flags.contains(FieldFlags::REQUIRED) || !VersionPolicy::is_field_active(spec, self.version) {
                continue;
            }
            if !is_present(record.get(spec.name)) {
                return Err(self.violation(spec.name, "required field is missing".to_string()));
            }
        }
        Ok(())
    }

    /// Which fields are written, by field index.
    ///
    /// An occurrence slot is positional: when a later slot of a code is
    /// written, every earlier unbracketed slot is written too.
    fn plan(&self, record: &Record) -> Vec<bool> {
        let fields = self.schema.fields();
        let mut emit: Vec<bool> = fields
            .iter()
            .map(|spec| self.should_emit(spec, record.get(spec.name)))
            .collect();

        for (index, spec) in fields.iter().enumerate() {
            if !emit[index] || !spec.occurrence.is_positional() {
                continue;
            }
            for slot in self.schema.positional_slots(spec.code) {
                let earlier = &fields[slot];
                if earlier.occurrence.first() < spec.occurrence.first()
                    && earlier.group.is_none()
                    && VersionPolicy::is_field_active(earlier, self.version)
                {
                    emit[slot] = true;
                }
            }
        }
        emit
    }

    fn should_emit(&self, spec: &FieldSpec, value: Option<&FieldValue>) -> bool {
        if !VersionPolicy::is_field_active(spec, self.version) || !is_present(value) {
            return false;
        }
        match value {
            Some(FieldValue::List(values)) => !values.is_empty(),
            Some(FieldValue::Points(points)) => !points.is_empty(),
            Some(value) => !spec.is_suppressible() || spec.default.as_ref() != Some(value),
            None => false,
        }
    }

    fn write_field<W: DxfStreamWriter + ?Sized>(&self, record: &Record, index: usize, writer: &mut W) -> Result<()> {
        let spec = self.schema.field_at(index);
        let code = if spec.flags.contains(FieldFlags::GRAPHICS_SIZE) {
            self.graphics_size_code
        } else {
            spec.code
        };

        // Positional placeholders have no stored value
        let placeholder;
        let value = match record.get(spec.name) {
            Some(value) => value,
            None => {
                placeholder = spec
                    .default
                    .clone()
                    .unwrap_or_else(|| FieldValue::Single(Value::zero(spec.kind)));
                &placeholder
            }
        };

        match value {
            FieldValue::Single(v) => writer.write_value(code, v),
            FieldValue::List(values) => values.iter().try_for_each(|v| writer.write_value(code, v)),
            FieldValue::Point(p) => writer.write_point3d(code, *p),
            FieldValue::Points(points) => points.iter().try_for_each(|p| writer.write_point3d(code, *p)),
        }
    }

    fn violation(&self, field: &str, reason: String) -> DxfError {
        DxfError::SchemaViolation {
            entity: self.schema.name().to_string(),
            field: field.to_string(),
            reason,
        }
    }
}

fn close_group<W: DxfStreamWriter + ?Sized>(writer: &mut W, open_group: &mut Option<&'static str>) -> Result<()> {
    if open_group.take().is_some() {
        writer.write_group_end()?;
    }
    Ok(())
}

/// A stored value counts unless it is the null handle
fn is_present(value: Option<&FieldValue>) -> bool {
    match value {
        None => false,
        Some(FieldValue::Single(Value::Handle(h))) => !h.is_null(),
        Some(_) => true,
    }
}

/// A value line may not hold a line terminator
fn breaks_framing(value: &FieldValue) -> bool {
    let breaks = |v: &Value| v.as_str().map_or(false, |s| s.contains(|c: char| c == '\n' || c == '\r'));
    match value {
        FieldValue::Single(v) => breaks(v),
        FieldValue::List(values) => values.iter().any(breaks),
        FieldValue::Point(_) | FieldValue::Points(_) => false,
    }
}

fn value_fits(spec: &FieldSpec, value: &FieldValue) -> bool {
    match (spec.cardinality, value) {
        (Cardinality::Single, FieldValue::Single(v)) => v.fits(spec.kind),
        (Cardinality::Repeated, FieldValue::List(values)) => values.iter().all(|v| v.fits(spec.kind)),
        (Cardinality::Point, FieldValue::Point(_)) => true,
        (Cardinality::PointList, FieldValue::Points(_)) => true,
        _ => false,
    }
}

/// Encode one record with the default configuration
pub fn encode(record: &Record, schema: &EntitySchema, version: DxfVersion) -> Result<Vec<Token>> {
    RecordEncoder::new(schema, version).encode(record)
}
