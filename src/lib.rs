//! # dxf-entity-codec
//!
//! A schema-driven reader and writer for the records of DXF text files.
//!
//! A DXF file is a stream of alternating group code and value lines. Rather
//! than one hand-written reader and writer per entity type, this library
//! describes every record type once as a declarative [`EntitySchema`] and
//! runs a single decoder and encoder over those tables.
//!
//! ## Features
//!
//! - One [`RecordDecoder`] / [`RecordEncoder`] pair for every record type
//! - Release gating shared by reading and writing ([`VersionPolicy`])
//! - Unknown group codes are reported, never fatal
//! - Points assembled from X/Y/Z codes, repeated fields kept in stream order
//! - Explicit occurrence rules for codes whose meaning depends on position
//! - Document-level reading and writing of TABLES, ENTITIES and OBJECTS
//! - Parallel decoding of pre-split records
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dxf_entity_codec::{io::dxf::DxfReader, DxfWriter};
//!
//! // Read a DXF file
//! let doc = DxfReader::from_file("sample.dxf")?.read()?;
//!
//! // Access records
//! for chain in doc.entities.iter() {
//!     println!("{}: {} records", chain.entity_type(), chain.len());
//! }
//!
//! // Write to DXF
//! DxfWriter::new(doc).write_to_file("output.dxf")?;
//! # Ok::<(), dxf_entity_codec::error::DxfError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`schema`] - field specs, per-type layouts and the registry
//! - [`policy`] - which group codes exist in which release
//! - [`codec`] - the decoder, encoder and point assembly
//! - [`chain`] - owning containers of decoded records
//! - [`io`] - token streams and whole-file reading/writing

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod chain;
pub mod codec;
pub mod document;
pub mod error;
pub mod io;
pub mod notification;
pub mod policy;
pub mod record;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use chain::{Chain, ChainSet};
pub use codec::{
    DecoderConfiguration, Decoded, EncoderConfiguration, RecordDecoder, RecordEncoder,
};
pub use document::DxfDocument;
pub use error::{DxfError, Result};
pub use io::dxf::{DxfReader, DxfReaderConfiguration, DxfWriter, OutputProfile, Token, TokenSource};
pub use notification::{DiagnosticsSink, Notification, NotificationCollection, NotificationType};
pub use policy::VersionPolicy;
pub use record::Record;
pub use schema::{EntitySchema, FieldSpec, SchemaRegistry};
pub use types::{DxfVersion, FieldValue, Handle, Point3, Value, ValueKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
