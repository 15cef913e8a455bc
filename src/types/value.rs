//! Typed values stored in records, and their text syntax
//!
//! Parsing is done with `nom` so that every value line is consumed whole:
//! trailing garbage after a number is an invalid value, not a truncation.

use nom::character::complete::{hex_digit1, i32 as code_i32, i64 as int_i64};
use nom::combinator::{all_consuming, map_res};
use nom::number::complete::double;
use nom::IResult;

use super::{Handle, Point3};

/// Largest magnitude printed without switching away from the `{:.1}` form.
const INTEGRAL_PRINT_LIMIT: f64 = 1e15;

/// Syntax of a value line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Decimal integer (16/32/64-bit codes)
    Int,
    /// Hexadecimal handle
    Handle,
    /// Floating point
    Double,
    /// Raw string, passed through
    Text,
    /// Integer read as a set of bits
    Flags,
}

/// A single typed value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Handle(Handle),
    Double(f64),
    Text(String),
}

impl Value {
    /// Parse a raw value line as `kind`
    pub fn parse(kind: ValueKind, raw: &str) -> Option<Value> {
        match kind {
            ValueKind::Int | ValueKind::Flags => parse_int(raw).map(Value::Int),
            ValueKind::Handle => parse_handle(raw).map(Value::Handle),
            ValueKind::Double => parse_double(raw).map(Value::Double),
            ValueKind::Text => Some(Value::Text(raw.to_string())),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            Value::Handle(h) => Some(*h),
            _ => None,
        }
    }

    /// Test a single bit of an integer value (bit 0 is the least significant).
    ///
    /// Non-integer values and bits beyond 63 report `false`.
    pub fn test_bit(&self, bit: u32) -> bool {
        match self {
            Value::Int(v) if bit < 64 => (v >> bit) & 1 == 1,
            _ => false,
        }
    }

    /// Whether this value can be stored in a field of `kind`
    pub fn fits(&self, kind: ValueKind) -> bool {
        matches!(
            (self, kind),
            (Value::Int(_), ValueKind::Int | ValueKind::Flags)
                | (Value::Handle(_), ValueKind::Handle)
                | (Value::Double(_), ValueKind::Double)
                | (Value::Text(_), ValueKind::Text)
        )
    }

    /// Zero value of a kind, used when a positional slot must be written
    /// without a stored value
    pub fn zero(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Int | ValueKind::Flags => Value::Int(0),
            ValueKind::Handle => Value::Handle(Handle::NULL),
            ValueKind::Double => Value::Double(0.0),
            ValueKind::Text => Value::Text(String::new()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<Handle> for Value {
    fn from(h: Handle) -> Self {
        Value::Handle(h)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// The value stored under one field name of a record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A single-valued field
    Single(Value),
    /// A repeated field, in stream order
    List(Vec<Value>),
    /// One assembled point
    Point(Point3),
    /// A repeated point, in stream order
    Points(Vec<Point3>),
}

impl FieldValue {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldValue::Single(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            FieldValue::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point3> {
        match self {
            FieldValue::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_points(&self) -> Option<&[Point3]> {
        match self {
            FieldValue::Points(p) => Some(p),
            _ => None,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Single(v)
    }
}

impl From<Point3> for FieldValue {
    fn from(p: Point3) -> Self {
        FieldValue::Point(p)
    }
}

impl From<Vec<Value>> for FieldValue {
    fn from(v: Vec<Value>) -> Self {
        FieldValue::List(v)
    }
}

impl From<Vec<Point3>> for FieldValue {
    fn from(p: Vec<Point3>) -> Self {
        FieldValue::Points(p)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Single(Value::Int(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Single(Value::Double(v))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Single(Value::from(s))
    }
}

impl From<Handle> for FieldValue {
    fn from(h: Handle) -> Self {
        FieldValue::Single(Value::Handle(h))
    }
}

fn group_code(input: &str) -> IResult<&str, i32> {
    code_i32(input)
}

fn integer(input: &str) -> IResult<&str, i64> {
    int_i64(input)
}

fn hex_handle(input: &str) -> IResult<&str, u64> {
    map_res(hex_digit1, |digits: &str| u64::from_str_radix(digits, 16))(input)
}

fn real(input: &str) -> IResult<&str, f64> {
    double(input)
}

/// Parse a group code line
pub fn parse_code(raw: &str) -> Option<i32> {
    all_consuming(group_code)(raw.trim()).ok().map(|(_, v)| v)
}

/// Parse a decimal integer value line
pub fn parse_int(raw: &str) -> Option<i64> {
    all_consuming(integer)(raw.trim()).ok().map(|(_, v)| v)
}

/// Parse a hexadecimal handle value line
pub fn parse_handle(raw: &str) -> Option<Handle> {
    all_consuming(hex_handle)(raw.trim())
        .ok()
        .map(|(_, v)| Handle::new(v))
}

/// Parse a floating point value line
pub fn parse_double(raw: &str) -> Option<f64> {
    all_consuming(real)(raw.trim()).ok().map(|(_, v)| v)
}

/// Format a double for output.
///
/// Integral values keep one decimal (`1.0`); others use the shortest
/// round-trip text unless a fixed precision is requested.
pub fn format_double(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(p) => format!("{:.*}", p, value),
        None if value == value.trunc() && value.abs() < INTEGRAL_PRINT_LIMIT => {
            format!("{:.1}", value)
        }
        None => format!("{}", value),
    }
}
