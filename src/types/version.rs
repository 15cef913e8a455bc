//! DXF format versions

use std::fmt;

use crate::error::{DxfError, Result};

/// DXF format version, ordered oldest to newest.
///
/// Variants are named after the `$ACADVER` string written in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DxfVersion {
    /// AutoCAD R10
    AC1006,
    /// AutoCAD R11 / R12
    AC1009,
    /// AutoCAD R13
    AC1012,
    /// AutoCAD R14
    AC1014,
    /// AutoCAD 2000
    AC1015,
    /// AutoCAD 2004
    AC1018,
    /// AutoCAD 2007
    AC1021,
    /// AutoCAD 2010
    AC1024,
    /// AutoCAD 2013
    AC1027,
    /// AutoCAD 2018
    AC1032,
}

impl DxfVersion {
    /// First release with subclass markers (code 100).
    pub const R13: DxfVersion = DxfVersion::AC1012;
    /// First release with reactor / extension dictionary groups.
    pub const R14: DxfVersion = DxfVersion::AC1014;
    /// Newest supported release.
    pub const LATEST: DxfVersion = DxfVersion::AC1032;
    /// Oldest supported release.
    pub const OLDEST: DxfVersion = DxfVersion::AC1006;

    /// Every supported version, oldest first
    pub const ALL: [DxfVersion; 10] = [
        DxfVersion::AC1006,
        DxfVersion::AC1009,
        DxfVersion::AC1012,
        DxfVersion::AC1014,
        DxfVersion::AC1015,
        DxfVersion::AC1018,
        DxfVersion::AC1021,
        DxfVersion::AC1024,
        DxfVersion::AC1027,
        DxfVersion::AC1032,
    ];

    /// Parse a `$ACADVER` value
    pub fn from_version_string(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AC1006" => Some(DxfVersion::AC1006),
            "AC1009" => Some(DxfVersion::AC1009),
            "AC1012" => Some(DxfVersion::AC1012),
            "AC1014" => Some(DxfVersion::AC1014),
            "AC1015" => Some(DxfVersion::AC1015),
            "AC1018" => Some(DxfVersion::AC1018),
            "AC1021" => Some(DxfVersion::AC1021),
            "AC1024" => Some(DxfVersion::AC1024),
            "AC1027" => Some(DxfVersion::AC1027),
            "AC1032" => Some(DxfVersion::AC1032),
            _ => None,
        }
    }

    /// Parse a `$ACADVER` value, failing on unknown strings
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_version_string(s).ok_or_else(|| DxfError::UnsupportedVersion(s.to_string()))
    }

    /// The `$ACADVER` string for this version
    pub fn to_dxf_string(&self) -> &'static str {
        match self {
            DxfVersion::AC1006 => "AC1006",
            DxfVersion::AC1009 => "AC1009",
            DxfVersion::AC1012 => "AC1012",
            DxfVersion::AC1014 => "AC1014",
            DxfVersion::AC1015 => "AC1015",
            DxfVersion::AC1018 => "AC1018",
            DxfVersion::AC1021 => "AC1021",
            DxfVersion::AC1024 => "AC1024",
            DxfVersion::AC1027 => "AC1027",
            DxfVersion::AC1032 => "AC1032",
        }
    }

    /// Marketing release name
    pub fn release_name(&self) -> &'static str {
        match self {
            DxfVersion::AC1006 => "R10",
            DxfVersion::AC1009 => "R12",
            DxfVersion::AC1012 => "R13",
            DxfVersion::AC1014 => "R14",
            DxfVersion::AC1015 => "2000",
            DxfVersion::AC1018 => "2004",
            DxfVersion::AC1021 => "2007",
            DxfVersion::AC1024 => "2010",
            DxfVersion::AC1027 => "2013",
            DxfVersion::AC1032 => "2018",
        }
    }

    /// Whether records of this version carry subclass markers
    pub fn has_subclass_markers(&self) -> bool {
        *self >= Self::R13
    }

    /// Whether string data is always UTF-8 (code pages are ignored)
    pub fn is_unicode(&self) -> bool {
        *self >= DxfVersion::AC1021
    }
}

impl Default for DxfVersion {
    fn default() -> Self {
        DxfVersion::LATEST
    }
}

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_dxf_string(), self.release_name())
    }
}
