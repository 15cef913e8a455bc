//! DXF stream writer trait and common operations

use crate::error::Result;
use crate::policy::{APP_GROUP_CODE, RECORD_START_CODE, SUBCLASS_MARKER_CODE};
use crate::types::{Handle, Point3, Value};

/// Trait for writing DXF code/value pairs
pub trait DxfStreamWriter {
    /// Write a code/value pair with a string value
    fn write_string(&mut self, code: i32, value: &str) -> Result<()>;

    /// Write a code/value pair with an integer value
    fn write_i64(&mut self, code: i32, value: i64) -> Result<()>;

    /// Write a code/value pair with a double value
    fn write_double(&mut self, code: i32, value: f64) -> Result<()>;

    /// Write a code/value pair with a handle value
    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()>;

    /// Flush the writer
    fn flush(&mut self) -> Result<()>;
}

impl<T: DxfStreamWriter + ?Sized> DxfStreamWriter for &mut T {
    fn write_string(&mut self, code: i32, value: &str) -> Result<()> {
        (**self).write_string(code, value)
    }

    fn write_i64(&mut self, code: i32, value: i64) -> Result<()> {
        (**self).write_i64(code, value)
    }

    fn write_double(&mut self, code: i32, value: f64) -> Result<()> {
        (**self).write_double(code, value)
    }

    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()> {
        (**self).write_handle(code, handle)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Extension trait for convenient writing operations
pub trait DxfStreamWriterExt: DxfStreamWriter {
    /// Write a typed value with the syntax of its kind
    fn write_value(&mut self, code: i32, value: &Value) -> Result<()> {
        match value {
            Value::Int(v) => self.write_i64(code, *v),
            Value::Handle(h) => self.write_handle(code, *h),
            Value::Double(v) => self.write_double(code, *v),
            Value::Text(s) => self.write_string(code, s),
        }
    }

    /// Write a 3D point (codes 10/20/30 or similar)
    fn write_point3d(&mut self, x_code: i32, point: Point3) -> Result<()> {
        self.write_double(x_code, point.x)?;
        self.write_double(x_code + 10, point.y)?;
        self.write_double(x_code + 20, point.z)?;
        Ok(())
    }

    /// Write the record start
    fn write_entity_type(&mut self, entity_type: &str) -> Result<()> {
        self.write_string(RECORD_START_CODE, entity_type)
    }

    /// Write a subclass marker
    fn write_subclass(&mut self, marker: &str) -> Result<()> {
        self.write_string(SUBCLASS_MARKER_CODE, marker)
    }

    /// Open an application-defined group (`{ACAD_REACTORS`)
    fn write_group_start(&mut self, name: &str) -> Result<()> {
        self.write_string(APP_GROUP_CODE, name)
    }

    /// Close an application-defined group
    fn write_group_end(&mut self) -> Result<()> {
        self.write_string(APP_GROUP_CODE, "}")
    }

    /// Write section start
    fn write_section_start(&mut self, section_name: &str) -> Result<()> {
        self.write_string(0, "SECTION")?;
        self.write_string(2, section_name)?;
        Ok(())
    }

    /// Write section end
    fn write_section_end(&mut self) -> Result<()> {
        self.write_string(0, "ENDSEC")
    }

    /// Write a symbol table header with its entry count
    fn write_table_start(&mut self, table_name: &str, entries: usize) -> Result<()> {
        self.write_string(0, "TABLE")?;
        self.write_string(2, table_name)?;
        self.write_i64(70, entries as i64)?;
        Ok(())
    }

    /// Write a symbol table end
    fn write_table_end(&mut self) -> Result<()> {
        self.write_string(0, "ENDTAB")
    }

    /// Write end of file
    fn write_eof(&mut self) -> Result<()> {
        self.write_string(0, "EOF")
    }
}

// Auto-implement the extension trait for all stream writers
impl<T: DxfStreamWriter + ?Sized> DxfStreamWriterExt for T {}
