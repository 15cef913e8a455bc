//! Schema-driven record codec
//!
//! One decoder and one encoder serve every record type. Both are
//! parameterized by an [`EntitySchema`](crate::schema::EntitySchema) and a
//! target [`DxfVersion`](crate::types::DxfVersion) and consult
//! [`VersionPolicy`](crate::policy::VersionPolicy) for release gating.

pub mod assembler;
pub mod decoder;
pub mod encoder;
pub mod parallel;

pub use assembler::{OccurrenceCounter, PointAssembler};
pub use decoder::{decode, Decoded, DecodedChain, DecoderConfiguration, RecordDecoder, DEFAULT_MAX_STRING_LENGTH};
pub use encoder::{encode, EncoderConfiguration, RecordEncoder};
pub use parallel::{decode_parallel, split_records, ParallelDecoded, RecordSlice};
