//! I/O module for reading and writing DXF text streams

pub mod dxf;

pub use dxf::{DxfReader, DxfWriter};
