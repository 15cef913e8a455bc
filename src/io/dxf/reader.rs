//! DXF file reader

mod line_reader;
mod stream_reader;
mod text_reader;

pub use line_reader::LineReader;
pub use stream_reader::{SliceTokens, Token, TokenSource};
pub use text_reader::DxfTextReader;

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek};
use std::path::Path;

use super::code_page::encoding_for;
use crate::chain::ChainSet;
use crate::codec::{DecoderConfiguration, RecordDecoder};
use crate::document::DxfDocument;
use crate::error::{DxfError, Result};
use crate::notification::{NotificationCollection, NotificationType};
use crate::schema::SchemaRegistry;
use crate::types::DxfVersion;

/// Configuration for the DXF reader.
#[derive(Debug, Clone)]
pub struct DxfReaderConfiguration {
    /// When `true`, errors within a section are reported as notifications
    /// and the rest of the section is skipped instead of aborting the read.
    ///
    /// Default: `false` (strict mode, errors propagate).
    pub failsafe: bool,
    /// Configuration handed to every record decoder.
    pub decoder: DecoderConfiguration,
    /// Version assumed when the header has no `$ACADVER`.
    pub default_version: DxfVersion,
}

impl Default for DxfReaderConfiguration {
    fn default() -> Self {
        Self {
            failsafe: false,
            decoder: DecoderConfiguration::default(),
            default_version: DxfVersion::AC1009,
        }
    }
}

impl DxfReaderConfiguration {
    pub fn with_failsafe(mut self, failsafe: bool) -> Self {
        self.failsafe = failsafe;
        self
    }

    pub fn with_decoder(mut self, decoder: DecoderConfiguration) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_default_version(mut self, version: DxfVersion) -> Self {
        self.default_version = version;
        self
    }
}

/// DXF file reader
pub struct DxfReader<'r, R: BufRead> {
    reader: DxfTextReader<R>,
    registry: &'r SchemaRegistry,
    config: DxfReaderConfiguration,
    version: DxfVersion,
    code_page: Option<String>,
}

impl DxfReader<'static, BufReader<File>> {
    /// Create a new DXF reader from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<T: Read + Seek> DxfReader<'static, BufReader<T>> {
    /// Create a new DXF reader from any seekable reader
    pub fn from_reader(reader: T) -> Self {
        Self::new(BufReader::new(reader))
    }
}

impl<R: BufRead + Seek> DxfReader<'static, R> {
    /// Create a reader over a buffered stream, using the builtin schemas
    pub fn new(reader: R) -> Self {
        Self {
            reader: DxfTextReader::new(reader),
            registry: SchemaRegistry::builtin(),
            config: DxfReaderConfiguration::default(),
            version: DxfVersion::AC1009,
            code_page: None,
        }
    }
}

impl<'r, R: BufRead + Seek> DxfReader<'r, R> {
    /// Set the reader configuration.
    pub fn with_configuration(mut self, config: DxfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Decode records with the schemas of `registry`
    pub fn with_registry<'b>(self, registry: &'b SchemaRegistry) -> DxfReader<'b, R> {
        DxfReader {
            reader: self.reader,
            registry,
            config: self.config,
            version: self.version,
            code_page: self.code_page,
        }
    }

    /// Read the whole stream into a document
    pub fn read(mut self) -> Result<DxfDocument> {
        self.read_version()?;

        let mut document = DxfDocument::new(self.version);
        document.code_page = self.code_page.clone();
        let failsafe = self.config.failsafe;

        while let Some(token) = self.reader.next_token()? {
            if token.is_start("EOF") {
                break;
            }
            if !token.is_start("SECTION") {
                continue;
            }
            let name = match self.reader.next_token()? {
                Some(t) if t.code == 2 => t.value,
                Some(_) => continue,
                None => break,
            };

            let result = match name.as_str() {
                "TABLES" => self.read_tables_section(&mut document),
                "ENTITIES" => {
                    let mut chains = ChainSet::new();
                    let result = self.read_records(&mut chains, "ENDSEC", &mut document.notifications);
                    document.entities.merge(chains).and(result)
                }
                "OBJECTS" => {
                    let mut chains = ChainSet::new();
                    let result = self.read_records(&mut chains, "ENDSEC", &mut document.notifications);
                    document.objects.merge(chains).and(result)
                }
                "HEADER" => self.skip_section(),
                _ => {
                    document.notifications.notify(
                        NotificationType::NotImplemented,
                        format!("{} section skipped", name),
                    );
                    self.skip_section()
                }
            };

            // In failsafe mode, report the error and move past the section
            if let Err(e) = result {
                if !failsafe {
                    return Err(e);
                }
                document.notifications.notify(
                    NotificationType::Warning,
                    format!("Error reading {} section: {}", name, e),
                );
                if let Err(skip) = self.skip_section() {
                    tracing::warn!(error = %skip, "could not skip past {} section", name);
                    break;
                }
            }
        }

        tracing::debug!(
            version = document.version.to_dxf_string(),
            records = document.record_count(),
            diagnostics = document.notifications.len(),
            "read document"
        );
        Ok(document)
    }

    /// Pre-scan the HEADER section for $ACADVER and $DWGCODEPAGE.
    ///
    /// After this call the reader is reset to the beginning, `self.version`
    /// is populated and the stream encoding follows the code page.
    fn read_version(&mut self) -> Result<()> {
        let mut version = None;

        'scan: while let Some(token) = self.reader.next_token()? {
            if !token.is_start("SECTION") {
                continue;
            }
            match self.reader.next_token()? {
                Some(t) if t.code == 2 && t.value == "HEADER" => {}
                // HEADER always comes first
                _ => break,
            }
            while let Some(token) = self.reader.next_token()? {
                if token.is_start("ENDSEC") {
                    break 'scan;
                }
                if token.code != 9 {
                    continue;
                }
                match token.value.as_str() {
                    "$ACADVER" => {
                        if let Some(v) = self.reader.next_token()? {
                            version = Some(DxfVersion::parse(&v.value)?);
                        }
                    }
                    "$DWGCODEPAGE" => {
                        if let Some(cp) = self.reader.next_token()? {
                            self.code_page = Some(cp.value);
                        }
                    }
                    _ => {}
                }
            }
            break;
        }

        self.version = version.unwrap_or(self.config.default_version);
        if let Some(code_page) = &self.code_page {
            self.reader.set_encoding(encoding_for(self.version, code_page));
        }

        self.reader.reset()
    }

    /// Read the TABLES section: every TABLE ... ENDTAB block
    fn read_tables_section(&mut self, document: &mut DxfDocument) -> Result<()> {
        loop {
            let token = self.next_required()?;
            if token.is_start("ENDSEC") {
                return Ok(());
            }
            if token.is_start("TABLE") {
                // Skip the table header up to the first entry
                let first = self.skip_record()?;
                let mut chains = ChainSet::new();
                let result = self.read_records_from(first, &mut chains, "ENDTAB", &mut document.notifications);
                document.tables.merge(chains)?;
                result?;
            }
        }
    }

    /// Read records until `0 <end>`
    fn read_records(
        &mut self,
        chains: &mut ChainSet,
        end: &str,
        notifications: &mut NotificationCollection,
    ) -> Result<()> {
        let first = self.next_required()?;
        self.read_records_from(first, chains, end, notifications)
    }

    fn read_records_from(
        &mut self,
        mut token: Token,
        chains: &mut ChainSet,
        end: &str,
        notifications: &mut NotificationCollection,
    ) -> Result<()> {
        let registry = self.registry;
        loop {
            if token.code != 0 {
                notifications.notify_at(
                    NotificationType::UnknownGroupCode,
                    token.line,
                    token.code,
                    format!("group code {} outside of any record", token.code),
                );
                token = self.next_required()?;
                continue;
            }
            if token.is_start(end) {
                return Ok(());
            }

            match registry.get(&token.value) {
                Some(schema) => {
                    let decoded = RecordDecoder::new(schema, self.version)
                        .with_configuration(self.config.decoder.clone())
                        .decode_chain(&mut self.reader)?;
                    notifications.extend(decoded.notifications);
                    chains.insert_chain(decoded.chain)?;
                    token = decoded.terminator;
                }
                None => {
                    notifications.notify_at(
                        NotificationType::NotImplemented,
                        token.line,
                        token.code,
                        format!("{} records are not supported, skipped", token.value),
                    );
                    token = self.skip_record()?;
                }
            }
        }
    }

    /// Consume tokens up to and including the next code 0, which is returned
    fn skip_record(&mut self) -> Result<Token> {
        loop {
            let token = self.next_required()?;
            if token.code == 0 {
                return Ok(token);
            }
        }
    }

    /// Skip the current section
    fn skip_section(&mut self) -> Result<()> {
        while let Some(token) = self.reader.next_token()? {
            if token.is_start("ENDSEC") {
                break;
            }
        }
        Ok(())
    }

    fn next_required(&mut self) -> Result<Token> {
        self.reader
            .next_token()?
            .ok_or_else(|| DxfError::UnexpectedEof {
                line: self.reader.line_number(),
            })
    }
}
