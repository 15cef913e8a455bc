//! In-memory token sink

use super::stream_writer::DxfStreamWriter;
use crate::error::Result;
use crate::io::dxf::Token;
use crate::types::{format_double, Handle};

/// Collects written pairs as [`Token`]s instead of text lines.
///
/// Useful to encode a record without a file, and to feed the result straight
/// back into the decoder.
#[derive(Debug, Clone, Default)]
pub struct TokenCollector {
    tokens: Vec<Token>,
    double_precision: Option<usize>,
}

impl TokenCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format doubles with a fixed number of decimals
    pub fn with_double_precision(mut self, precision: Option<usize>) -> Self {
        self.double_precision = precision;
        self
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl DxfStreamWriter for TokenCollector {
    fn write_string(&mut self, code: i32, value: &str) -> Result<()> {
        self.tokens.try_reserve(1)?;
        self.tokens.push(Token::new(code, value));
        Ok(())
    }

    fn write_i64(&mut self, code: i32, value: i64) -> Result<()> {
        self.write_string(code, &value.to_string())
    }

    fn write_double(&mut self, code: i32, value: f64) -> Result<()> {
        let text = format_double(value, self.double_precision);
        self.write_string(code, &text)
    }

    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()> {
        self.write_string(code, &handle.to_dxf_string())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
