//! Output formatting options

/// How group code lines are padded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodePadding {
    /// Right-aligned in a 3-character field (`  0`, ` 10`, `100`)
    #[default]
    RightAligned,
    /// No padding (`0`, `10`, `100`)
    None,
}

/// Line terminator written after every line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Formatting applied to every written token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputProfile {
    pub padding: CodePadding,
    /// Fixed number of decimals for doubles; `None` writes the shortest text
    /// that reads back to the same value
    pub double_precision: Option<usize>,
    pub line_ending: LineEnding,
}

impl OutputProfile {
    /// Padded codes, CRLF line endings and lossless doubles, as written by
    /// most CAD applications
    pub fn legacy() -> Self {
        Self {
            padding: CodePadding::RightAligned,
            double_precision: None,
            line_ending: LineEnding::CrLf,
        }
    }

    /// Unpadded codes and LF line endings
    pub fn compact() -> Self {
        Self {
            padding: CodePadding::None,
            double_precision: None,
            line_ending: LineEnding::Lf,
        }
    }

    pub fn with_padding(mut self, padding: CodePadding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_double_precision(mut self, precision: Option<usize>) -> Self {
        self.double_precision = precision;
        self
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Text of a group code line, without the terminator
    pub fn format_code(&self, code: i32) -> String {
        match self.padding {
            CodePadding::RightAligned => format!("{:>3}", code),
            CodePadding::None => code.to_string(),
        }
    }
}
