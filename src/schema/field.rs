//! Field descriptions
//!
//! A [`FieldSpec`] says which group code carries a field, how its value line
//! is written, how many values it holds, in which releases it exists and what
//! it defaults to.

use bitflags::bitflags;

use crate::types::{DxfVersion, FieldValue, Handle, Point3, Value, ValueKind};

/// Group code used for the graphics data size on 64-bit targets
pub const WIDE_GRAPHICS_SIZE_CODE: i32 = 160;

/// Offset between the X, Y and Z codes of a point (10/20/30, 210/220/230)
pub const POINT_AXIS_STRIDE: i32 = 10;

/// How many values a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// One value, last write wins
    Single,
    /// Ordered list of values under the same code
    Repeated,
    /// One point from an X/Y/Z code triplet
    Point,
    /// Ordered list of points from repeated X/Y/Z triplets
    PointList,
}

impl Cardinality {
    pub fn is_point(&self) -> bool {
        matches!(self, Cardinality::Point | Cardinality::PointList)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Cardinality::Repeated | Cardinality::PointList)
    }
}

/// Which occurrences of a group code within one record a field claims.
///
/// Some codes change meaning with their position in the record: the first
/// 330 is the reactor (owner dictionary) and the second the owner object.
/// Occurrences are counted per code, from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occurrence {
    /// Every occurrence
    Any,
    /// Exactly the n-th occurrence
    Nth(u32),
    /// The n-th occurrence and every later one
    From(u32),
}

impl Occurrence {
    /// Whether the `n`-th occurrence belongs to this field
    pub fn accepts(&self, n: u32) -> bool {
        match *self {
            Occurrence::Any => true,
            Occurrence::Nth(k) => n == k,
            Occurrence::From(k) => n >= k,
        }
    }

    /// First occurrence this rule claims
    pub fn first(&self) -> u32 {
        match *self {
            Occurrence::Any => 1,
            Occurrence::Nth(k) | Occurrence::From(k) => k,
        }
    }

    pub fn is_positional(&self) -> bool {
        !matches!(self, Occurrence::Any)
    }
}

bitflags! {
    /// Output behaviour flags of a field
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        /// Record identity (handle); written whenever present
        const IDENTITY = 1 << 0;
        /// Must be present to encode; always written
        const REQUIRED = 1 << 1;
        /// Written even when equal to the default
        const ALWAYS_EMIT = 1 << 2;
        /// Graphics data size: code 92, or 160 on wide targets
        const GRAPHICS_SIZE = 1 << 3;
    }
}

/// Declarative description of one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Group code (the X code for points)
    pub code: i32,
    /// Field name, unique within a schema
    pub name: &'static str,
    /// Syntax of the value line
    pub kind: ValueKind,
    pub cardinality: Cardinality,
    /// First release the field exists in
    pub min_version: DxfVersion,
    /// Last release the field exists in
    pub max_version: DxfVersion,
    pub default: Option<FieldValue>,
    pub occurrence: Occurrence,
    /// Application-defined group (`102 {NAME … 102 }`) wrapping the field
    pub group: Option<&'static str>,
    pub flags: FieldFlags,
}

impl FieldSpec {
    pub fn new(code: i32, name: &'static str, kind: ValueKind, cardinality: Cardinality) -> Self {
        Self {
            code,
            name,
            kind,
            cardinality,
            min_version: DxfVersion::OLDEST,
            max_version: DxfVersion::LATEST,
            default: None,
            occurrence: Occurrence::Any,
            group: None,
            flags: FieldFlags::empty(),
        }
    }

    pub fn int(code: i32, name: &'static str) -> Self {
        Self::new(code, name, ValueKind::Int, Cardinality::Single)
    }

    pub fn flags(code: i32, name: &'static str) -> Self {
        Self::new(code, name, ValueKind::Flags, Cardinality::Single)
    }

    pub fn double(code: i32, name: &'static str) -> Self {
        Self::new(code, name, ValueKind::Double, Cardinality::Single)
    }

    pub fn text(code: i32, name: &'static str) -> Self {
        Self::new(code, name, ValueKind::Text, Cardinality::Single)
    }

    pub fn handle(code: i32, name: &'static str) -> Self {
        Self::new(code, name, ValueKind::Handle, Cardinality::Single)
    }

    pub fn repeated(code: i32, name: &'static str, kind: ValueKind) -> Self {
        Self::new(code, name, kind, Cardinality::Repeated)
    }

    pub fn point(code: i32, name: &'static str) -> Self {
        Self::new(code, name, ValueKind::Double, Cardinality::Point)
    }

    pub fn point_list(code: i32, name: &'static str) -> Self {
        Self::new(code, name, ValueKind::Double, Cardinality::PointList)
    }

    /// Exists from `version` onwards
    pub fn since(mut self, version: DxfVersion) -> Self {
        self.min_version = version;
        self
    }

    /// Exists up to and including `version`
    pub fn until(mut self, version: DxfVersion) -> Self {
        self.max_version = version;
        self
    }

    pub fn default_int(mut self, v: i64) -> Self {
        self.default = Some(FieldValue::Single(Value::Int(v)));
        self
    }

    pub fn default_double(mut self, v: f64) -> Self {
        self.default = Some(FieldValue::Single(Value::Double(v)));
        self
    }

    pub fn default_text(mut self, v: &str) -> Self {
        self.default = Some(FieldValue::Single(Value::Text(v.to_string())));
        self
    }

    pub fn default_handle(mut self, v: u64) -> Self {
        self.default = Some(FieldValue::Single(Value::Handle(Handle::new(v))));
        self
    }

    pub fn default_point(mut self, p: Point3) -> Self {
        self.default = Some(FieldValue::Point(p));
        self
    }

    pub fn nth(mut self, n: u32) -> Self {
        self.occurrence = Occurrence::Nth(n);
        self
    }

    pub fn from_nth(mut self, n: u32) -> Self {
        self.occurrence = Occurrence::From(n);
        self
    }

    pub fn in_group(mut self, group: &'static str) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn identity(self) -> Self {
        self.with_flags(FieldFlags::IDENTITY)
    }

    pub fn required(self) -> Self {
        self.with_flags(FieldFlags::REQUIRED)
    }

    pub fn always_emit(self) -> Self {
        self.with_flags(FieldFlags::ALWAYS_EMIT)
    }

    pub fn graphics_size(self) -> Self {
        self.with_flags(FieldFlags::GRAPHICS_SIZE)
    }

    /// Every group code that feeds this field
    pub fn codes(&self) -> Vec<i32> {
        let mut codes = if self.cardinality.is_point() {
            vec![
                self.code,
                self.code + POINT_AXIS_STRIDE,
                self.code + 2 * POINT_AXIS_STRIDE,
            ]
        } else {
            vec![self.code]
        };
        if self.flags.contains(FieldFlags::GRAPHICS_SIZE) {
            codes.push(WIDE_GRAPHICS_SIZE_CODE);
        }
        codes
    }

    /// Axis (0 = X, 1 = Y, 2 = Z) a code addresses in a point field
    pub fn point_axis(&self, code: i32) -> Option<usize> {
        if !self.cardinality.is_point() {
            return None;
        }
        match code - self.code {
            0 => Some(0),
            d if d == POINT_AXIS_STRIDE => Some(1),
            d if d == 2 * POINT_AXIS_STRIDE => Some(2),
            _ => None,
        }
    }

    /// Whether the field may be dropped from output when equal to its default
    pub fn is_suppressible(&self) -> bool {
        !self.cardinality.is_list()
            && !self
                .flags
                .intersects(FieldFlags::IDENTITY | FieldFlags::REQUIRED | FieldFlags::ALWAYS_EMIT)
    }

    /// Empty value matching the cardinality, used for list fields at birth
    pub fn empty_value(&self) -> Option<FieldValue> {
        match self.cardinality {
            Cardinality::Repeated => Some(FieldValue::List(Vec::new())),
            Cardinality::PointList => Some(FieldValue::Points(Vec::new())),
            _ => None,
        }
    }
}
