//! Core value types shared by the schema, codec and chain store

pub mod handle;
pub mod point;
pub mod value;
pub mod version;

pub use handle::Handle;
pub use point::Point3;
pub use value::{format_double, parse_code, parse_double, parse_handle, parse_int, FieldValue, Value, ValueKind};
pub use version::DxfVersion;
