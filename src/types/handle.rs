//! Handle type for DXF records
//!
//! Handles are 64-bit identifiers written as upper-case hex in the stream.

use std::fmt;

/// A record handle (code 5) or a reference to one (codes 330, 340, 360, …)
///
/// Handle 0 is the null reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    /// The null handle (0)
    pub const NULL: Handle = Handle(0);

    /// Create a new handle from a u64 value
    #[inline]
    pub const fn new(value: u64) -> Self {
        Handle(value)
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Check if this is the null handle
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// The handle, unless it is the null reference
    #[inline]
    pub const fn non_null(self) -> Option<Handle> {
        if self.is_null() {
            None
        } else {
            Some(self)
        }
    }

    /// Parse the stream form: hexadecimal digits, surrounding blanks ignored
    pub fn parse(text: &str) -> Option<Handle> {
        super::value::parse_handle(text)
    }

    /// Text form used in the stream (upper-case hex, no prefix)
    pub fn to_dxf_string(&self) -> String {
        format!("{:X}", self.0)
    }
}

impl Default for Handle {
    fn default() -> Self {
        Handle::NULL
    }
}

impl From<u64> for Handle {
    fn from(value: u64) -> Self {
        Handle(value)
    }
}

impl From<Handle> for u64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#X}", self.0)
    }
}

impl fmt::UpperHex for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}
