//! Error types for the DXF entity codec

use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

/// Fatal errors raised by the codec.
///
/// Recoverable anomalies (unknown group codes, subclass mismatches, comments,
/// unparseable values) are never returned here; they are collected as
/// [`Notification`](crate::notification::Notification)s next to the decoded
/// record.
#[derive(Debug, Error)]
pub enum DxfError {
    /// IO error occurred while reading or writing the stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The stream ended in the middle of a record
    #[error("Unexpected end of stream at line {line}")]
    UnexpectedEof { line: usize },

    /// A code/value pair could not be formed
    #[error("Malformed token at line {line}: {reason}")]
    MalformedToken { line: usize, reason: String },

    /// A record cannot be encoded against its schema
    #[error("Schema violation in {entity}.{field}: {reason}")]
    SchemaViolation {
        entity: String,
        field: String,
        reason: String,
    },

    /// Allocation failed while growing a record or chain
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// The registry has no schema for the requested type
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// A record was appended to a chain of another type
    #[error("Chain of {expected} cannot hold a {found} record")]
    ChainTypeMismatch { expected: String, found: String },

    /// Unsupported DXF version string
    #[error("Unsupported DXF version: {0:?}")]
    UnsupportedVersion(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

impl DxfError {
    /// Whether the error only invalidates the record being processed.
    ///
    /// Schema violations leave the surrounding stream usable; every other
    /// error means the stream position can no longer be trusted.
    pub fn is_record_local(&self) -> bool {
        matches!(self, DxfError::SchemaViolation { .. })
    }
}

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}

impl From<TryReserveError> for DxfError {
    fn from(e: TryReserveError) -> Self {
        DxfError::ResourceExhausted(e.to_string())
    }
}
