//! ASCII DXF writer

use std::io::Write;

use super::profile::OutputProfile;
use super::stream_writer::DxfStreamWriter;
use crate::error::Result;
use crate::types::{format_double, Handle};

/// ASCII DXF stream writer
pub struct DxfTextWriter<W: Write> {
    writer: W,
    profile: OutputProfile,
}

impl<W: Write> DxfTextWriter<W> {
    /// Create a new ASCII DXF writer with the default profile
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            profile: OutputProfile::default(),
        }
    }

    /// Use `profile` for code padding, doubles and line endings
    pub fn with_profile(mut self, profile: OutputProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn profile(&self) -> &OutputProfile {
        &self.profile
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.write_all(self.profile.line_ending.as_str().as_bytes())?;
        Ok(())
    }

    /// Get the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DxfStreamWriter for DxfTextWriter<W> {
    fn write_string(&mut self, code: i32, value: &str) -> Result<()> {
        let code_line = self.profile.format_code(code);
        self.write_line(&code_line)?;
        self.write_line(value)
    }

    fn write_i64(&mut self, code: i32, value: i64) -> Result<()> {
        self.write_string(code, &value.to_string())
    }

    fn write_double(&mut self, code: i32, value: f64) -> Result<()> {
        let text = format_double(value, self.profile.double_precision);
        self.write_string(code, &text)
    }

    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()> {
        self.write_string(code, &handle.to_dxf_string())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
