//! DXF writer module

mod profile;
mod stream_writer;
mod text_writer;
mod token_collector;

pub use profile::{CodePadding, LineEnding, OutputProfile};
pub use stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
pub use text_writer::DxfTextWriter;
pub use token_collector::TokenCollector;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;

use crate::chain::{Chain, ChainSet};
use crate::codec::{EncoderConfiguration, RecordEncoder};
use crate::document::DxfDocument;
use crate::error::Result;
use crate::schema::{RecordKind, SchemaRegistry};

/// DXF file writer
pub struct DxfWriter<'r> {
    document: DxfDocument,
    registry: &'r SchemaRegistry,
    config: EncoderConfiguration,
}

impl DxfWriter<'static> {
    /// Create a new DXF writer using the builtin schemas
    pub fn new(document: DxfDocument) -> Self {
        Self {
            document,
            registry: SchemaRegistry::builtin(),
            config: EncoderConfiguration::default(),
        }
    }
}

impl<'r> DxfWriter<'r> {
    /// Set the encoder configuration; its format also drives code padding
    /// and line endings
    pub fn with_configuration(mut self, config: EncoderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Encode records with the schemas of `registry`
    pub fn with_registry<'b>(self, registry: &'b SchemaRegistry) -> DxfWriter<'b> {
        DxfWriter {
            document: self.document,
            registry,
            config: self.config,
        }
    }

    /// Write to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.write_to_writer(writer)
    }

    /// Write to any writer
    pub fn write_to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut stream_writer = DxfTextWriter::new(writer).with_profile(self.config.format);
        self.write_dxf(&mut stream_writer)?;
        stream_writer.flush()
    }

    /// Write to a byte vector (useful for testing)
    pub fn write_to_vec(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to_writer(&mut buffer)?;
        Ok(buffer)
    }

    /// Write DXF content to a stream writer
    pub fn write_dxf<W: DxfStreamWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        self.write_header(writer)?;
        if !self.document.tables.is_empty() {
            self.write_tables(writer)?;
        }
        writer.write_section_start("ENTITIES")?;
        self.write_chains(writer, &self.document.entities)?;
        writer.write_section_end()?;
        if !self.document.objects.is_empty() {
            writer.write_section_start("OBJECTS")?;
            self.write_chains(writer, &self.document.objects)?;
            writer.write_section_end()?;
        }
        writer.write_eof()
    }

    fn write_header<W: DxfStreamWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_section_start("HEADER")?;
        writer.write_string(9, "$ACADVER")?;
        writer.write_string(1, self.document.version.to_dxf_string())?;
        if let Some(code_page) = &self.document.code_page {
            writer.write_string(9, "$DWGCODEPAGE")?;
            writer.write_string(3, code_page)?;
        }
        writer.write_section_end()
    }

    /// One TABLE block per symbol table, entries grouped by table
    fn write_tables<W: DxfStreamWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let mut tables: IndexMap<&str, Vec<&Chain>> = IndexMap::new();
        for chain in self.document.tables.iter() {
            let table = match self.registry.lookup(chain.entity_type())?.kind() {
                RecordKind::TableEntry { table } => table,
                _ => chain.entity_type(),
            };
            tables.entry(table).or_default().push(chain);
        }

        writer.write_section_start("TABLES")?;
        for (table, chains) in &tables {
            let entries = chains.iter().map(|c| c.len()).sum();
            writer.write_table_start(table, entries)?;
            for chain in chains {
                self.write_chain(writer, chain)?;
            }
            writer.write_table_end()?;
        }
        writer.write_section_end()
    }

    fn write_chains<W: DxfStreamWriter + ?Sized>(&self, writer: &mut W, chains: &ChainSet) -> Result<()> {
        for chain in chains.iter() {
            self.write_chain(writer, chain)?;
        }
        Ok(())
    }

    fn write_chain<W: DxfStreamWriter + ?Sized>(&self, writer: &mut W, chain: &Chain) -> Result<()> {
        let schema = self.registry.lookup(chain.entity_type())?;
        let encoder = RecordEncoder::new(schema, self.document.version).with_configuration(self.config);
        for record in chain {
            encoder.encode_to(record, writer)?;
        }
        Ok(())
    }

    /// Get a reference to the document
    pub fn document(&self) -> &DxfDocument {
        &self.document
    }
}

/// Convenience function to write a document to a file
pub fn write_dxf<P: AsRef<Path>>(document: &DxfDocument, path: P) -> Result<()> {
    DxfWriter::new(document.clone()).write_to_file(path)
}
