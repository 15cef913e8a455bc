//! DXF ASCII token reader

use std::io::{BufRead, Seek};

use encoding_rs::Encoding;

use super::line_reader::LineReader;
use super::stream_reader::{Token, TokenSource};
use crate::error::{DxfError, Result};
use crate::types::parse_code;

/// Reads tokens from a DXF ASCII stream, two lines at a time
#[derive(Debug)]
pub struct DxfTextReader<R: BufRead> {
    lines: LineReader<R>,
}

impl<R: BufRead> DxfTextReader<R> {
    /// Create a new DXF text reader
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
        }
    }

    /// Wrap an existing line reader
    pub fn from_lines(lines: LineReader<R>) -> Self {
        Self { lines }
    }

    /// Set the fallback encoding for non-UTF-8 values
    pub fn set_encoding(&mut self, encoding: Option<&'static Encoding>) {
        self.lines.set_encoding(encoding);
    }

    /// Read a code/value pair from the stream
    fn read_pair(&mut self) -> Result<Option<Token>> {
        let code_line = match self.lines.read_line()? {
            Some(line) => line,
            None => return Ok(None),
        };
        let line = self.lines.line_number();

        let code = parse_code(&code_line).ok_or_else(|| DxfError::MalformedToken {
            line,
            reason: format!("invalid group code '{}'", code_line.trim()),
        })?;

        let value_line = self.lines.read_line()?.ok_or_else(|| DxfError::MalformedToken {
            line,
            reason: format!("group code {} has no value line", code),
        })?;

        Ok(Some(Token::at(code, value_line.trim(), line)))
    }
}

impl<R: BufRead + Seek> DxfTextReader<R> {
    /// Rewind to the start of the stream
    pub fn reset(&mut self) -> Result<()> {
        self.lines.rewind()
    }
}

impl<R: BufRead> TokenSource for DxfTextReader<R> {
    fn next_token(&mut self) -> Result<Option<Token>> {
        self.read_pair()
    }

    fn line_number(&self) -> usize {
        self.lines.line_number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(data: &str) -> DxfTextReader<Cursor<&str>> {
        DxfTextReader::new(Cursor::new(data))
    }

    #[test]
    fn test_read_simple_pair() {
        let mut reader = reader("  0\nSECTION\n");
        let token = reader.next_token().unwrap().unwrap();
        assert_eq!(token.code, 0);
        assert_eq!(token.value, "SECTION");
        assert_eq!(token.line, 1);
        assert!(reader.next_token().unwrap().is_none());
    }

    #[test]
    fn test_strips_whitespace() {
        let mut reader = reader(" 10\r\n  1.5  \r\n");
        let token = reader.next_token().unwrap().unwrap();
        assert_eq!(token.code, 10);
        assert_eq!(token.value, "1.5");
    }

    #[test]
    fn test_line_numbers_advance_by_two() {
        let mut reader = reader("  0\nSECTION\n  2\nHEADER\n");
        reader.next_token().unwrap();
        let second = reader.next_token().unwrap().unwrap();
        assert_eq!(second.line, 3);
        assert_eq!(reader.line_number(), 4);
    }

    #[test]
    fn test_odd_trailing_line_is_malformed() {
        let mut reader = reader("  0\nSECTION\n  2\n");
        reader.next_token().unwrap();
        let err = reader.next_token().unwrap_err();
        assert!(matches!(err, DxfError::MalformedToken { line: 3, .. }));
    }

    #[test]
    fn test_bad_code_is_malformed() {
        let mut reader = reader("abc\nSECTION\n");
        assert!(matches!(
            reader.next_token(),
            Err(DxfError::MalformedToken { line: 1, .. })
        ));
    }

    #[test]
    fn test_empty_value_line() {
        let mut reader = reader("  1\n\n  0\nEOF\n");
        let token = reader.next_token().unwrap().unwrap();
        assert_eq!(token.code, 1);
        assert_eq!(token.value, "");
    }
}
