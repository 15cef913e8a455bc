//! Token type and token sources

use crate::error::Result;

/// A group code / value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The group code
    pub code: i32,
    /// Raw value line, whitespace stripped
    pub value: String,
    /// Line number of the code line (0 when not read from a stream)
    pub line: usize,
}

impl Token {
    /// Create a token that did not come from a stream
    pub fn new(code: i32, value: impl Into<String>) -> Self {
        Self {
            code,
            value: value.into(),
            line: 0,
        }
    }

    /// Create a token read at `line`
    pub fn at(code: i32, value: impl Into<String>, line: usize) -> Self {
        Self {
            code,
            value: value.into(),
            line,
        }
    }

    /// Whether this is a `0` token with the given value (case-insensitive)
    pub fn is_start(&self, name: &str) -> bool {
        self.code == 0 && self.value.eq_ignore_ascii_case(name)
    }
}

/// Anything that yields tokens in stream order.
///
/// There is no peeking: a caller that needs to know where a record ends
/// consumes the next token and compares its code against 0.
pub trait TokenSource {
    /// Read the next token; `Ok(None)` at a clean end of stream
    fn next_token(&mut self) -> Result<Option<Token>>;

    /// Line number of the last line read, for diagnostics
    fn line_number(&self) -> usize;
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    fn next_token(&mut self) -> Result<Option<Token>> {
        (**self).next_token()
    }

    fn line_number(&self) -> usize {
        (**self).line_number()
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Box<T> {
    fn next_token(&mut self) -> Result<Option<Token>> {
        (**self).next_token()
    }

    fn line_number(&self) -> usize {
        (**self).line_number()
    }
}

/// Tokens already in memory, e.g. one record pre-split from a stream
#[derive(Debug, Clone)]
pub struct SliceTokens<'a> {
    tokens: &'a [Token],
    position: usize,
    terminate: bool,
    terminated: bool,
}

impl<'a> SliceTokens<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            terminate: false,
            terminated: false,
        }
    }

    /// Yield a synthetic `0 EOF` token after the slice, so a slice holding
    /// exactly one record body decodes without running off its end
    pub fn terminated(mut self) -> Self {
        self.terminate = true;
        self
    }

    /// Tokens not yet consumed
    pub fn remaining(&self) -> &'a [Token] {
        &self.tokens[self.position..]
    }
}

impl TokenSource for SliceTokens<'_> {
    fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some(token) = self.tokens.get(self.position) {
            self.position += 1;
            return Ok(Some(token.clone()));
        }
        if self.terminate && !self.terminated {
            self.terminated = true;
            return Ok(Some(Token::at(0, "EOF", self.line_number())));
        }
        Ok(None)
    }

    fn line_number(&self) -> usize {
        self.tokens
            .get(self.position.saturating_sub(1))
            .map(|t| t.line)
            .unwrap_or(0)
    }
}
