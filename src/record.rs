//! Record writer contract and the writers shipped with the crate
//!
//! A record is one `(group code, value)` pair of the DXF tag-value format.
//! The encoding core never formats records itself; it hands every chunk to
//! a [`RecordWriter`] supplied by the caller.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::io;
use std::path::Path;

/// Group code of the first record of a text field
pub const PRIMARY_TAG: i32 = 1;
/// Group code of every following record of the same field
pub const CONTINUATION_TAG: i32 = 3;

/// Default number of decimal places for floats in ASCII output
pub const DEFAULT_FLOAT_PRECISION: usize = 16;

/// Sink for tag-value records
///
/// Writers enforce no width limit; callers chunk long values first.
pub trait RecordWriter {
    /// Emit a text record
    fn write_string(&mut self, tag: i32, value: &str);

    /// Emit a floating point record
    fn write_float(&mut self, tag: i32, value: f64);

    /// Emit an integer record
    fn write_int(&mut self, tag: i32, value: i64);

    /// Emit a text record given as raw UTF-8 code units.
    ///
    /// The chunker splits on byte positions, so a value may end or start in
    /// the middle of a multi-byte character. Byte-oriented writers should
    /// override this; the default forwards a lossy view to `write_string`.
    fn write_bytes(&mut self, tag: i32, value: &[u8]) {
        self.write_string(tag, &String::from_utf8_lossy(value));
    }
}

impl<W: RecordWriter + ?Sized> RecordWriter for &mut W {
    fn write_string(&mut self, tag: i32, value: &str) {
        (**self).write_string(tag, value)
    }

    fn write_float(&mut self, tag: i32, value: f64) {
        (**self).write_float(tag, value)
    }

    fn write_int(&mut self, tag: i32, value: i64) {
        (**self).write_int(tag, value)
    }

    fn write_bytes(&mut self, tag: i32, value: &[u8]) {
        (**self).write_bytes(tag, value)
    }
}

/// Writes records in DXF ASCII form: the group code right-aligned to three
/// columns on one line, the value on the next.
#[derive(Debug, Clone)]
pub struct AsciiWriter {
    buffer: Vec<u8>,
    precision: usize,
}

impl AsciiWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            precision: DEFAULT_FLOAT_PRECISION,
        }
    }

    /// Set the number of decimal places used by `write_float`
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Output as text, replacing split multi-byte sequences with U+FFFD
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer)
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Copy the output to a writer
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.buffer)
    }

    /// Write the output to a file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, &self.buffer)
    }

    fn push_tag(&mut self, tag: i32) {
        let mut line = String::with_capacity(4);
        // Writing into a String cannot fail
        let _ = writeln!(line, "{:>3}", tag);
        self.buffer.extend_from_slice(line.as_bytes());
    }

    fn push_value(&mut self, value: &[u8]) {
        self.buffer.extend_from_slice(value);
        self.buffer.push(b'\n');
    }
}

impl Default for AsciiWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordWriter for AsciiWriter {
    fn write_string(&mut self, tag: i32, value: &str) {
        self.write_bytes(tag, value.as_bytes());
    }

    fn write_float(&mut self, tag: i32, value: f64) {
        let text = format!("{:.*}", self.precision, value);
        self.push_tag(tag);
        self.push_value(text.as_bytes());
    }

    fn write_int(&mut self, tag: i32, value: i64) {
        self.push_tag(tag);
        self.push_value(value.to_string().as_bytes());
    }

    fn write_bytes(&mut self, tag: i32, value: &[u8]) {
        self.push_tag(tag);
        self.push_value(value);
    }
}

/// Value carried by a buffered record
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text as raw UTF-8 code units (may hold a partial character)
    Text(Vec<u8>),
    Float(f64),
    Int(i64),
}

impl Value {
    /// Text payload as a string, if this is a text record holding valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Text(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// A single buffered record
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub tag: i32,
    pub value: Value,
}

/// Collects records in memory, in emission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordBuffer {
    pub records: Vec<Record>,
}

impl RecordBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn tags(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.tag).collect()
    }

    /// Concatenate the text values of all records, in order
    pub fn joined_text(&self) -> Vec<u8> {
        self.records
            .iter()
            .filter_map(|r| r.value.as_bytes())
            .flatten()
            .copied()
            .collect()
    }

    /// Replay the buffered records into another writer
    pub fn replay<W: RecordWriter>(&self, writer: &mut W) {
        for record in &self.records {
            match &record.value {
                Value::Text(bytes) => writer.write_bytes(record.tag, bytes),
                Value::Float(v) => writer.write_float(record.tag, *v),
                Value::Int(v) => writer.write_int(record.tag, *v),
            }
        }
    }
}

impl RecordWriter for RecordBuffer {
    fn write_string(&mut self, tag: i32, value: &str) {
        self.write_bytes(tag, value.as_bytes());
    }

    fn write_float(&mut self, tag: i32, value: f64) {
        self.records.push(Record {
            tag,
            value: Value::Float(value),
        });
    }

    fn write_int(&mut self, tag: i32, value: i64) {
        self.records.push(Record {
            tag,
            value: Value::Int(value),
        });
    }

    fn write_bytes(&mut self, tag: i32, value: &[u8]) {
        self.records.push(Record {
            tag,
            value: Value::Text(value.to_vec()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_string_record() {
        let mut writer = AsciiWriter::new();
        writer.write_string(PRIMARY_TAG, "hello");
        writer.write_string(100, "AcDbModelerGeometry");

        assert_eq!(writer.to_string_lossy(), "  1\nhello\n100\nAcDbModelerGeometry\n");
    }

    #[test]
    fn test_ascii_int_and_float() {
        let mut writer = AsciiWriter::new().with_precision(3);
        writer.write_int(70, 1);
        writer.write_float(40, 2.5);

        assert_eq!(writer.to_string_lossy(), " 70\n1\n 40\n2.500\n");
    }

    #[test]
    fn test_ascii_default_precision() {
        let mut writer = AsciiWriter::new();
        writer.write_float(10, 1.0);
        assert_eq!(writer.to_string_lossy(), " 10\n1.0000000000000000\n");
    }

    #[test]
    fn test_ascii_keeps_raw_bytes() {
        // First byte of a two-byte character
        let mut writer = AsciiWriter::new();
        writer.write_bytes(CONTINUATION_TAG, &[b'x', 0xC3]);
        assert_eq!(writer.as_bytes(), b"  3\nx\xC3\n");
    }

    #[test]
    fn test_ascii_write_to() {
        let mut writer = AsciiWriter::new();
        writer.write_string(PRIMARY_TAG, "abc");

        let mut out = Vec::new();
        writer.write_to(&mut out).unwrap();
        assert_eq!(out, b"  1\nabc\n");
    }

    #[test]
    fn test_buffer_records_in_order() {
        let mut buffer = RecordBuffer::new();
        buffer.write_string(PRIMARY_TAG, "ab");
        buffer.write_int(71, 1);
        buffer.write_float(50, 0.5);
        buffer.write_string(CONTINUATION_TAG, "cd");

        assert_eq!(buffer.tags(), vec![1, 71, 50, 3]);
        assert_eq!(buffer.records[1].value, Value::Int(1));
        assert_eq!(buffer.records[2].value, Value::Float(0.5));
        assert_eq!(buffer.joined_text(), b"abcd");
    }

    #[test]
    fn test_default_write_bytes_is_lossy() {
        struct Strings(Vec<String>);

        impl RecordWriter for Strings {
            fn write_string(&mut self, _tag: i32, value: &str) {
                self.0.push(value.to_string());
            }
            fn write_float(&mut self, _tag: i32, _value: f64) {}
            fn write_int(&mut self, _tag: i32, _value: i64) {}
        }

        let mut writer = Strings(Vec::new());
        writer.write_bytes(PRIMARY_TAG, b"ok");
        writer.write_bytes(PRIMARY_TAG, &[0xC3]);
        assert_eq!(writer.0, vec!["ok".to_string(), "\u{FFFD}".to_string()]);
    }

    #[test]
    fn test_replay_into_ascii() {
        let mut buffer = RecordBuffer::new();
        buffer.write_string(PRIMARY_TAG, "x");
        buffer.write_int(70, 2);

        let mut ascii = AsciiWriter::new();
        buffer.replay(&mut ascii);
        assert_eq!(ascii.to_string_lossy(), "  1\nx\n 70\n2\n");
    }
}
