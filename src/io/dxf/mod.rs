//! DXF (Drawing Exchange Format) reading and writing

mod code_page;
mod reader;
mod writer;

pub use code_page::encoding_for;
pub use reader::{
    DxfReader, DxfReaderConfiguration, DxfTextReader, LineReader, SliceTokens, Token, TokenSource,
};
pub use writer::{
    write_dxf, CodePadding, DxfStreamWriter, DxfStreamWriterExt, DxfTextWriter, DxfWriter, LineEnding,
    OutputProfile, TokenCollector,
};
