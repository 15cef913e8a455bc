//! Line-numbered text input

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use encoding_rs::Encoding;

use crate::error::Result;

/// Reads physical lines and counts them.
///
/// Bytes that are not valid UTF-8 go through the configured fallback
/// encoding, or Latin-1 (byte to char) when none is set.
#[derive(Debug)]
pub struct LineReader<R: BufRead> {
    reader: R,
    line_number: usize,
    encoding: Option<&'static Encoding>,
    buffer: Vec<u8>,
}

impl LineReader<BufReader<File>> {
    /// Open a file for line reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            encoding: None,
            buffer: Vec::new(),
        }
    }

    /// Set the fallback encoding for non-UTF-8 lines
    pub fn set_encoding(&mut self, encoding: Option<&'static Encoding>) {
        self.encoding = encoding;
    }

    /// Number of lines read so far (the 1-based number of the last line)
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Whether no bytes remain
    pub fn is_eof(&mut self) -> Result<bool> {
        Ok(self.reader.fill_buf()?.is_empty())
    }

    /// Read the next line without its terminator (`\n` or `\r\n`).
    ///
    /// Returns `Ok(None)` at end of input. A final line without a newline is
    /// still returned.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        let read = self.reader.read_until(b'\n', &mut self.buffer)?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
        }
        if self.buffer.last() == Some(&b'\r') {
            self.buffer.pop();
        }

        let line = match std::str::from_utf8(&self.buffer) {
            Ok(s) => s.to_string(),
            Err(_) => match self.encoding {
                Some(enc) => enc.decode(&self.buffer).0.into_owned(),
                None => self.buffer.iter().map(|&b| b as char).collect(),
            },
        };
        Ok(Some(line))
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead + Seek> LineReader<R> {
    /// Rewind to the first line
    pub fn rewind(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.line_number = 0;
        Ok(())
    }
}
