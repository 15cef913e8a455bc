//! Release gating and defaults
//!
//! A field exists in the releases its own range names. Both the decoder and
//! the encoder ask [`VersionPolicy`], so reading and writing can never
//! disagree on whether a field belongs to a version.
//!
//! The release table below only holds format defaults for common codes.
//! Schema builders narrow a field to it with [`VersionPolicy::gate`]; a
//! schema that gives a code another life in its own type leaves it out.

use crate::schema::FieldSpec;
use crate::types::{DxfVersion, FieldValue};

/// Group code 100, subclass marker
pub const SUBCLASS_MARKER_CODE: i32 = 100;
/// Group code 102, application-defined group bracket
pub const APP_GROUP_CODE: i32 = 102;
/// Group code 999, comment
pub const COMMENT_CODE: i32 = 999;
/// Group code 0, record start
pub const RECORD_START_CODE: i32 = 0;

/// Release gate of one group code range: `(first code, last code, since, until)`
type Gate = (i32, i32, DxfVersion, DxfVersion);

/// Default release ranges of the codes shared by every entity
static RELEASE_GATES: &[Gate] = &[
    (38, 38, DxfVersion::OLDEST, DxfVersion::AC1009),
    (48, 48, DxfVersion::R13, DxfVersion::LATEST),
    (60, 60, DxfVersion::R13, DxfVersion::LATEST),
    (100, 100, DxfVersion::R13, DxfVersion::LATEST),
    (102, 102, DxfVersion::R14, DxfVersion::LATEST),
    (160, 160, DxfVersion::AC1015, DxfVersion::LATEST),
    (284, 284, DxfVersion::AC1021, DxfVersion::LATEST),
    (310, 310, DxfVersion::AC1015, DxfVersion::LATEST),
    (330, 330, DxfVersion::R14, DxfVersion::LATEST),
    (347, 347, DxfVersion::AC1021, DxfVersion::LATEST),
    (360, 360, DxfVersion::R14, DxfVersion::LATEST),
    (370, 370, DxfVersion::AC1015, DxfVersion::LATEST),
    (390, 390, DxfVersion::AC1015, DxfVersion::LATEST),
    (410, 410, DxfVersion::AC1015, DxfVersion::LATEST),
    (420, 440, DxfVersion::AC1018, DxfVersion::LATEST),
];

/// Stateless gate/default queries over the static release table
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionPolicy;

impl VersionPolicy {
    /// Default release range of `code`
    pub fn code_range(code: i32) -> (DxfVersion, DxfVersion) {
        RELEASE_GATES
            .iter()
            .find(|(lo, hi, _, _)| (*lo..=*hi).contains(&code))
            .map(|(_, _, since, until)| (*since, *until))
            .unwrap_or((DxfVersion::OLDEST, DxfVersion::LATEST))
    }

    /// Whether `code` is active at `version` under the default table
    pub fn is_code_active(code: i32, version: DxfVersion) -> bool {
        let (since, until) = Self::code_range(code);
        (since..=until).contains(&version)
    }

    /// Whether `field` is read and written at `version`
    pub fn is_field_active(field: &FieldSpec, version: DxfVersion) -> bool {
        (field.min_version..=field.max_version).contains(&version)
    }

    /// Narrow `field` to the default range of its code
    pub fn gate(field: FieldSpec) -> FieldSpec {
        let (since, until) = Self::code_range(field.code);
        let min = field.min_version.max(since);
        let max = field.max_version.min(until);
        field.since(min).until(max)
    }

    /// Value a record holds for `field` when the stream does not provide one
    pub fn default_for(field: &FieldSpec) -> Option<FieldValue> {
        field.default.clone().or_else(|| field.empty_value())
    }

    /// Whether subclass markers are read and written at `version`
    pub fn markers_active(version: DxfVersion) -> bool {
        Self::is_code_active(SUBCLASS_MARKER_CODE, version)
    }

    /// Whether application groups (code 102) are written at `version`
    pub fn app_groups_active(version: DxfVersion) -> bool {
        Self::is_code_active(APP_GROUP_CODE, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Value, ValueKind};

    #[test]
    fn test_code_gates() {
        assert!(!VersionPolicy::is_code_active(100, DxfVersion::AC1009));
        assert!(VersionPolicy::is_code_active(100, DxfVersion::AC1012));
        assert!(VersionPolicy::is_code_active(38, DxfVersion::AC1009));
        assert!(!VersionPolicy::is_code_active(38, DxfVersion::AC1012));
        assert!(VersionPolicy::is_code_active(430, DxfVersion::AC1018));
        assert!(!VersionPolicy::is_code_active(440, DxfVersion::AC1015));
        assert!(VersionPolicy::is_code_active(10, DxfVersion::OLDEST));
    }

    #[test]
    fn test_gate_narrows_to_code_default() {
        let lw = VersionPolicy::gate(FieldSpec::int(370, "lineweight"));
        assert!(!VersionPolicy::is_field_active(&lw, DxfVersion::AC1014));
        assert!(VersionPolicy::is_field_active(&lw, DxfVersion::AC1015));

        // A narrower own range survives the gate
        let late = VersionPolicy::gate(FieldSpec::int(370, "late").since(DxfVersion::AC1024));
        assert_eq!(late.min_version, DxfVersion::AC1024);

        let elevation = VersionPolicy::gate(FieldSpec::double(38, "elevation"));
        assert_eq!(elevation.max_version, DxfVersion::AC1009);
    }

    #[test]
    fn test_field_range_alone_decides() {
        // LWPOLYLINE keeps its elevation under 38 from R14 on
        let elevation = FieldSpec::double(38, "elevation").since(DxfVersion::AC1014);
        assert!(!VersionPolicy::is_code_active(38, DxfVersion::AC1015));
        assert!(VersionPolicy::is_field_active(&elevation, DxfVersion::AC1015));
        assert!(!VersionPolicy::is_field_active(&elevation, DxfVersion::AC1012));

        let helix_only = FieldSpec::double(40, "radius").since(DxfVersion::AC1021);
        assert!(!VersionPolicy::is_field_active(&helix_only, DxfVersion::AC1018));
        assert!(VersionPolicy::is_field_active(&helix_only, DxfVersion::AC1032));
    }

    #[test]
    fn test_defaults() {
        let linetype = FieldSpec::text(6, "linetype").default_text("BYLAYER");
        assert_eq!(
            VersionPolicy::default_for(&linetype),
            Some(FieldValue::Single(Value::from("BYLAYER")))
        );
        let names = FieldSpec::repeated(8, "layer_names", ValueKind::Text);
        assert_eq!(VersionPolicy::default_for(&names), Some(FieldValue::List(vec![])));
        assert_eq!(VersionPolicy::default_for(&FieldSpec::handle(347, "material")), None);
    }

    #[test]
    fn test_markers_and_groups() {
        assert!(!VersionPolicy::markers_active(DxfVersion::AC1009));
        assert!(VersionPolicy::markers_active(DxfVersion::R13));
        assert!(!VersionPolicy::app_groups_active(DxfVersion::R13));
        assert!(VersionPolicy::app_groups_active(DxfVersion::R14));
    }
}
