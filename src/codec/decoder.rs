//! Record decoder
//!
//! Reads the body of one record (everything after its `0 TYPE` token) into a
//! [`Record`], driven by the record's [`EntitySchema`]. Anything the schema
//! does not explain is reported as a [`Notification`] and skipped, so that
//! files written by newer applications still load.
//!
//! [`Notification`]: crate::notification::Notification

use super::assembler::{OccurrenceCounter, PointAssembler};
use crate::chain::Chain;
use crate::error::{DxfError, Result};
use crate::io::dxf::{Token, TokenSource};
use crate::notification::{NotificationCollection, NotificationType};
use crate::policy::{VersionPolicy, APP_GROUP_CODE, COMMENT_CODE, RECORD_START_CODE, SUBCLASS_MARKER_CODE};
use crate::record::Record;
use crate::schema::{Cardinality, EntitySchema, FieldSpec};
use crate::types::{DxfVersion, FieldValue, Value, ValueKind};

/// Longest string value accepted without a warning
pub const DEFAULT_MAX_STRING_LENGTH: usize = 2049;

/// Configuration for the record decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfiguration {
    /// Text values longer than this (in characters) are kept but reported.
    pub max_string_length: usize,
    /// When `true`, single text fields read as empty strings fall back to a
    /// non-empty schema default.
    pub restore_blank_defaults: bool,
}

impl Default for DecoderConfiguration {
    fn default() -> Self {
        Self {
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            restore_blank_defaults: true,
        }
    }
}

impl DecoderConfiguration {
    pub fn with_max_string_length(mut self, length: usize) -> Self {
        self.max_string_length = length;
        self
    }

    pub fn with_restore_blank_defaults(mut self, restore: bool) -> Self {
        self.restore_blank_defaults = restore;
        self
    }
}

/// Result of decoding one record
#[derive(Debug, Clone)]
pub struct Decoded {
    pub record: Record,
    /// Diagnostics met while reading this record, in stream order
    pub notifications: NotificationCollection,
    /// The code 0 token that ended the record; it belongs to the caller
    pub terminator: Token,
}

/// Result of decoding a run of same-type records
#[derive(Debug, Clone)]
pub struct DecodedChain {
    pub chain: Chain,
    pub notifications: NotificationCollection,
    /// The first code 0 token that does not start another record of the type
    pub terminator: Token,
}

/// Mutable state of one record decode
struct DecodeState {
    record: Record,
    notifications: NotificationCollection,
    /// Subclass section the stream is in (0 before the first marker)
    section: usize,
    /// Application group the stream is in
    group: Option<String>,
    occurrences: OccurrenceCounter,
    points: PointAssembler,
}

/// Decodes records of one schema at one version
#[derive(Debug, Clone)]
pub struct RecordDecoder<'s> {
    schema: &'s EntitySchema,
    version: DxfVersion,
    config: DecoderConfiguration,
}

impl<'s> RecordDecoder<'s> {
    pub fn new(schema: &'s EntitySchema, version: DxfVersion) -> Self {
        Self {
            schema,
            version,
            config: DecoderConfiguration::default(),
        }
    }

    /// Set the decoder configuration.
    pub fn with_configuration(mut self, config: DecoderConfiguration) -> Self {
        self.config = config;
        self
    }

    pub fn schema(&self) -> &'s EntitySchema {
        self.schema
    }

    pub fn version(&self) -> DxfVersion {
        self.version
    }

    /// Decode one record body.
    ///
    /// The record's `0 TYPE` token must already have been consumed. Reading
    /// stops at the next code 0 token, which is returned as the terminator.
    pub fn decode<S: TokenSource + ?Sized>(&self, source: &mut S) -> Result<Decoded> {
        let mut state = DecodeState {
            record: Record::new(self.schema),
            notifications: NotificationCollection::new(),
            section: 0,
            group: None,
            occurrences: OccurrenceCounter::new(),
            points: PointAssembler::new(),
        };

        let terminator = loop {
            let token = match source.next_token()? {
                Some(token) => token,
                None => {
                    return Err(DxfError::UnexpectedEof {
                        line: source.line_number(),
                    })
                }
            };

            match token.code {
                RECORD_START_CODE => break token,
                COMMENT_CODE => state.notifications.notify_at(
                    NotificationType::Comment,
                    token.line,
                    token.code,
                    format!("comment in {}: {}", self.schema.name(), token.value),
                ),
                SUBCLASS_MARKER_CODE if VersionPolicy::markers_active(self.version) => {
                    self.enter_subclass(&mut state, &token)
                }
                APP_GROUP_CODE if VersionPolicy::app_groups_active(self.version) => {
                    self.app_group(&mut state, &token)
                }
                _ => self.apply(&mut state, &token)?,
            }
        };

        state.points.finish(&mut state.record)?;
        if self.config.restore_blank_defaults {
            self.restore_blank_defaults(&mut state.record);
        }

        tracing::debug!(
            entity = self.schema.name(),
            fields = state.record.len(),
            diagnostics = state.notifications.len(),
            "decoded record"
        );

        Ok(Decoded {
            record: state.record,
            notifications: state.notifications,
            terminator,
        })
    }

    /// Decode consecutive records of this schema's type into a chain.
    ///
    /// Like [`decode`](Self::decode), the first `0 TYPE` token must already
    /// have been consumed.
    pub fn decode_chain<S: TokenSource + ?Sized>(&self, source: &mut S) -> Result<DecodedChain> {
        let mut chain = Chain::for_schema(self.schema);
        let mut notifications = NotificationCollection::new();
        loop {
            let decoded = self.decode(source)?;
            chain.append(decoded.record)?;
            notifications.extend(decoded.notifications);
            if !decoded.terminator.is_start(self.schema.name()) {
                return Ok(DecodedChain {
                    chain,
                    notifications,
                    terminator: decoded.terminator,
                });
            }
        }
    }

    fn enter_subclass(&self, state: &mut DecodeState, token: &Token) {
        let expected = self.schema.subclass_markers().get(state.section).copied();
        match self.schema.marker_section(&token.value) {
            Some(section) if expected.map_or(false, |m| m.eq_ignore_ascii_case(&token.value)) => {
                state.section = section;
            }
            Some(section) => {
                state.notifications.notify_at(
                    NotificationType::SubclassMismatch,
                    token.line,
                    token.code,
                    format!(
                        "subclass marker {} out of order in {}, expected {}",
                        token.value,
                        self.schema.name(),
                        expected.unwrap_or("none")
                    ),
                );
                state.section = section;
            }
            None => state.notifications.notify_at(
                NotificationType::SubclassMismatch,
                token.line,
                token.code,
                format!(
                    "unexpected subclass marker {} in {}",
                    token.value,
                    self.schema.name()
                ),
            ),
        }
    }

    fn app_group(&self, state: &mut DecodeState, token: &Token) {
        if token.value.starts_with('{') {
            state.group = Some(token.value.clone());
        } else if token.value == "}" {
            state.group = None;
        } else {
            state.notifications.notify_at(
                NotificationType::Warning,
                token.line,
                token.code,
                format!("malformed application group bracket {:?}", token.value),
            );
        }
    }

    /// Store one field token
    fn apply(&self, state: &mut DecodeState, token: &Token) -> Result<()> {
        let index = match self.resolve(state, token.code) {
            Some(index) => index,
            None => {
                let message = if self.schema.knows_code(token.code) {
                    format!(
                        "group code {} is not used by {} at {}",
                        token.code,
                        self.schema.name(),
                        self.version.to_dxf_string()
                    )
                } else {
                    format!("unknown group code {} in {}", token.code, self.schema.name())
                };
                state
                    .notifications
                    .notify_at(NotificationType::UnknownGroupCode, token.line, token.code, message);
                return Ok(());
            }
        };
        let spec = self.schema.field_at(index);

        let value = match Value::parse(spec.kind, &token.value) {
            Some(value) => value,
            None => {
                state.notifications.notify_at(
                    NotificationType::InvalidValue,
                    token.line,
                    token.code,
                    format!(
                        "invalid {:?} value {:?} for {}.{}",
                        spec.kind,
                        token.value,
                        self.schema.name(),
                        spec.name
                    ),
                );
                return Ok(());
            }
        };

        if let Value::Text(text) = &value {
            let length = text.chars().count();
            if length > self.config.max_string_length {
                state.notifications.notify_at(
                    NotificationType::Warning,
                    token.line,
                    token.code,
                    format!(
                        "{}.{} is {} characters long, more than {}",
                        self.schema.name(),
                        spec.name,
                        length,
                        self.config.max_string_length
                    ),
                );
            }
        }

        match spec.cardinality {
            Cardinality::Single => match value {
                // A null reference is no reference
                Value::Handle(h) if h.is_null() => {
                    state.record.remove(spec.name);
                }
                value => {
                    state.record.set(spec.name, value);
                }
            },
            Cardinality::Repeated => state.record.push(spec.name, value)?,
            Cardinality::Point | Cardinality::PointList => {
                let axis = spec.point_axis(token.code).unwrap_or(0);
                let component = value.as_double().unwrap_or(0.0);
                state
                    .points
                    .feed(index, spec, axis, component, &mut state.record)?;
            }
        }
        Ok(())
    }

    /// Field claiming the next occurrence of `code`.
    ///
    /// Inside an application group only fields of that group are
    /// candidates. Outside, grouped fields never match, but the occurrences
    /// they claim up to the last declared slot of the code still count, so
    /// a stream without the group numbers the remaining slots correctly.
    fn resolve(&self, state: &mut DecodeState, code: i32) -> Option<usize> {
        let version = self.version;
        let active = move |spec: &FieldSpec| VersionPolicy::is_field_active(spec, version);

        if let Some(group) = state.group.as_deref() {
            let index = self.schema.candidates(code).iter().copied().find(|&i| {
                let spec = self.schema.field_at(i);
                spec.group.map_or(false, |g| g.eq_ignore_ascii_case(group)) && active(spec)
            })?;
            let first = self.schema.field_at(index).occurrence.first();
            state.occurrences.raise_to(code, first);
            return Some(index);
        }

        let ungrouped = |spec: &FieldSpec| spec.group.is_none() && active(spec);
        let grouped = |spec: &FieldSpec| spec.group.is_some() && active(spec);
        let last_slot = self
            .schema
            .candidates(code)
            .iter()
            .map(|&i| self.schema.field_at(i).occurrence.first())
            .max()
            .unwrap_or(1);

        let mut occurrence = state.occurrences.seen(code) + 1;
        loop {
            let found = self.schema.resolve_with(code, occurrence, state.section, ungrouped);
            let reserved = found.is_none()
                && occurrence < last_slot
                && self
                    .schema
                    .resolve_with(code, occurrence, state.section, grouped)
                    .is_some();
            if !reserved {
                state.occurrences.set(code, occurrence);
                return found;
            }
            occurrence += 1;
        }
    }

    fn restore_blank_defaults(&self, record: &mut Record) {
        for spec in self.schema.fields() {
            if spec.cardinality != Cardinality::Single || spec.kind != ValueKind::Text {
                continue;
            }
            if record.get_text(spec.name) != Some("") {
                continue;
            }
            if let Some(default @ FieldValue::Single(Value::Text(text))) = &spec.default {
                if !text.is_empty() {
                    record.set(spec.name, default.clone());
                }
            }
        }
    }
}

/// Decode one record body with the default configuration
pub fn decode<S: TokenSource + ?Sized>(
    source: &mut S,
    schema: &EntitySchema,
    version: DxfVersion,
) -> Result<Decoded> {
    RecordDecoder::new(schema, version).decode(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dxf::SliceTokens;
    use crate::schema::catalog;
    use crate::types::{Handle, Point3};

    fn tokens(pairs: &[(i32, &str)]) -> Vec<Token> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (code, value))| Token::at(*code, *value, 2 * i + 1))
            .collect()
    }

    fn decode_pairs(schema: &EntitySchema, version: DxfVersion, pairs: &[(i32, &str)]) -> Result<Decoded> {
        let tokens = tokens(pairs);
        let mut source = SliceTokens::new(&tokens).terminated();
        decode(&mut source, schema, version)
    }

    #[test]
    fn test_decode_face() {
        let schema = catalog::face3d();
        let decoded = decode_pairs(
            &schema,
            DxfVersion::AC1032,
            &[
                (5, "2A"),
                (100, "AcDbEntity"),
                (8, "WALLS"),
                (100, "AcDbFace"),
                (10, "0.0"), (20, "0.0"), (30, "0.0"),
                (11, "1.0"), (21, "0.0"), (31, "0.0"),
                (12, "1.0"), (22, "1.0"), (32, "0.0"),
                (13, "0.0"), (23, "1.0"), (33, "0.0"),
                (70, "3"),
            ],
        )
        .unwrap();
        let record = &decoded.record;
        assert!(decoded.notifications.is_empty());
        assert_eq!(record.handle(), Some(Handle::new(0x2A)));
        assert_eq!(record.get_text("layer"), Some("WALLS"));
        assert_eq!(record.get_point("third_corner"), Some(Point3::new(1.0, 1.0, 0.0)));
        assert!(record.flag_is_set("edge_flags", 1));
        assert_eq!(record.get_text("linetype"), Some("BYLAYER"));
        assert!(decoded.terminator.is_start("EOF"));
    }

    #[test]
    fn test_eof_inside_record() {
        let schema = catalog::face3d();
        let tokens = tokens(&[(8, "0"), (10, "1.0")]);
        let mut source = SliceTokens::new(&tokens);
        let err = decode(&mut source, &schema, DxfVersion::AC1032).unwrap_err();
        assert!(matches!(err, DxfError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_unknown_code_is_skipped() {
        let schema = catalog::face3d();
        let decoded = decode_pairs(&schema, DxfVersion::AC1032, &[(8, "A"), (1071, "7"), (62, "3")]).unwrap();
        assert_eq!(decoded.record.get_int("color"), Some(3));
        let unknown = decoded.notifications.of_type(NotificationType::UnknownGroupCode);
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].code, Some(1071));
        assert_eq!(unknown[0].line, Some(3));
    }

    #[test]
    fn test_invalid_value_keeps_prior() {
        let schema = catalog::face3d();
        let decoded = decode_pairs(&schema, DxfVersion::AC1032, &[(62, "5"), (62, "five")]).unwrap();
        assert_eq!(decoded.record.get_int("color"), Some(5));
        assert!(decoded.notifications.has_type(NotificationType::InvalidValue));
    }

    #[test]
    fn test_comment_not_stored() {
        let schema = catalog::face3d();
        let before = Record::new(&schema);
        let decoded = decode_pairs(&schema, DxfVersion::AC1032, &[(999, "hello")]).unwrap();
        assert_eq!(decoded.record, before);
        assert!(decoded.notifications.has_type(NotificationType::Comment));
    }

    #[test]
    fn test_subclass_mismatch() {
        let schema = catalog::face3d();
        let decoded = decode_pairs(&schema, DxfVersion::AC1032, &[(100, "AcDbLine")]).unwrap();
        assert!(decoded.notifications.has_type(NotificationType::SubclassMismatch));
    }

    #[test]
    fn test_inactive_field_is_unknown() {
        let schema = catalog::face3d();
        // Lineweight only exists from AC1015
        let decoded = decode_pairs(&schema, DxfVersion::AC1009, &[(370, "25")]).unwrap();
        assert_eq!(decoded.record.get_int("lineweight"), Some(-1));
        assert!(decoded.notifications.has_type(NotificationType::UnknownGroupCode));
    }

    #[test]
    fn test_owner_slots_with_and_without_group() {
        let schema = catalog::layer_index();
        let decoded = decode_pairs(
            &schema,
            DxfVersion::AC1032,
            &[
                (102, "{ACAD_XDICTIONARY"),
                (360, "A1"),
                (102, "}"),
                (330, "B2"),
                (100, "AcDbIndex"),
                (100, "AcDbLayerIndex"),
                (8, "L1"),
                (360, "C3"),
                (90, "4"),
            ],
        )
        .unwrap();
        let record = &decoded.record;
        assert!(decoded.notifications.is_empty(), "{:?}", decoded.notifications);
        assert_eq!(record.get_handle("dictionary_owner_hard"), Some(Handle::new(0xA1)));
        assert_eq!(record.get_handle("owner_handle"), Some(Handle::new(0xB2)));
        assert_eq!(record.get_list("reactors").map(<[_]>::len), Some(0));
        assert_eq!(
            record.get_list("id_buffer_handles"),
            Some(&[Value::Handle(Handle::new(0xC3))][..])
        );

        // Same stream without the bracket around the extension dictionary
        let decoded = decode_pairs(&schema, DxfVersion::AC1032, &[(330, "B2"), (360, "C3"), (360, "C4")]).unwrap();
        assert!(!decoded.record.contains("dictionary_owner_hard"));
        assert_eq!(decoded.record.get_handle("owner_handle"), Some(Handle::new(0xB2)));
        assert_eq!(decoded.record.get_list("id_buffer_handles").map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_every_reactor_kept() {
        let schema = catalog::layer_index();
        let decoded = decode_pairs(
            &schema,
            DxfVersion::AC1032,
            &[
                (102, "{ACAD_REACTORS"),
                (330, "A1"),
                (330, "A2"),
                (102, "}"),
                (330, "C3"),
                (330, "C4"),
            ],
        )
        .unwrap();
        let record = &decoded.record;
        assert_eq!(
            record.get_list("reactors"),
            Some(&[Value::Handle(Handle::new(0xA1)), Value::Handle(Handle::new(0xA2))][..])
        );
        assert_eq!(record.get_handle("owner_handle"), Some(Handle::new(0xC3)));
        // A third 330 outside the group has no field
        let unknown = decoded.notifications.of_type(NotificationType::UnknownGroupCode);
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].line, Some(11));
    }

    #[test]
    fn test_table_value_flag_occurrences() {
        let schema = catalog::table();
        let decoded = decode_pairs(
            &schema,
            DxfVersion::AC1032,
            &[
                (100, "AcDbEntity"),
                (100, "AcDbBlockReference"),
                (2, "*T1"),
                (100, "AcDbTable"),
                (90, "22"),
                (90, "1"),
                (90, "2"),
            ],
        )
        .unwrap();
        assert_eq!(decoded.record.get_int("table_value_flag"), Some(22));
        assert_eq!(
            decoded.record.get_list("cell_value_flags"),
            Some(&[Value::Int(1), Value::Int(2)][..])
        );
    }

    #[test]
    fn test_blank_text_restores_default() {
        let schema = catalog::text_style();
        let decoded = decode_pairs(&schema, DxfVersion::AC1032, &[(2, "Standard"), (3, "")]).unwrap();
        assert_eq!(decoded.record.get_text("primary_font_file"), Some("txt"));

        let tokens = tokens(&[(3, "")]);
        let mut source = SliceTokens::new(&tokens).terminated();
        let decoded = RecordDecoder::new(&schema, DxfVersion::AC1032)
            .with_configuration(DecoderConfiguration::default().with_restore_blank_defaults(false))
            .decode(&mut source)
            .unwrap();
        assert_eq!(decoded.record.get_text("primary_font_file"), Some(""));
    }

    #[test]
    fn test_long_string_warns() {
        let schema = catalog::text_style();
        let long = "x".repeat(20);
        let tokens = tokens(&[(2, long.as_str())]);
        let mut source = SliceTokens::new(&tokens).terminated();
        let decoded = RecordDecoder::new(&schema, DxfVersion::AC1032)
            .with_configuration(DecoderConfiguration::default().with_max_string_length(10))
            .decode(&mut source)
            .unwrap();
        assert_eq!(decoded.record.get_text("style_name"), Some(long.as_str()));
        assert!(decoded.notifications.has_type(NotificationType::Warning));
    }

    #[test]
    fn test_decode_chain_stops_at_other_type() {
        let schema = catalog::face3d();
        let tokens = tokens(&[
            (8, "A"),
            (0, "3DFACE"),
            (8, "B"),
            (0, "ENDSEC"),
        ]);
        let mut source = SliceTokens::new(&tokens);
        let decoded = RecordDecoder::new(&schema, DxfVersion::AC1032)
            .decode_chain(&mut source)
            .unwrap();
        assert_eq!(decoded.chain.len(), 2);
        assert_eq!(decoded.chain.get(1).and_then(|r| r.get_text("layer")), Some("B"));
        assert!(decoded.terminator.is_start("ENDSEC"));
    }
}
