//! Payload types embedded in DXF entities

use crate::encoder::Encoder;
use crate::error::Result;
use crate::extent::{Extent, ExtentScanner};
use crate::record::RecordWriter;

/// Subclass marker written before solid-body data
pub const MODELER_GEOMETRY_SUBCLASS: &str = "AcDbModelerGeometry";
/// Modeler format version written before solid-body data
pub const MODELER_FORMAT_VERSION: i64 = 1;

const SUBCLASS_TAG: i32 = 100;
const VERSION_TAG: i32 = 70;

/// ACIS solid-body data, one SAT line per field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solid {
    pub lines: Vec<String>,
    /// Extent supplied by the caller, used instead of scanning the lines
    pub extent: Option<Extent>,
}

impl Solid {
    pub fn new<I>(lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            extent: None,
        }
    }

    /// Split SAT text into lines
    pub fn from_sat(text: &str) -> Self {
        Self::new(text.lines())
    }

    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }

    /// The supplied extent, or the scanned one with the default scanner
    pub fn extent(&self) -> Extent {
        match self.extent {
            Some(extent) => extent,
            None => crate::extent::scan_extent(&self.lines),
        }
    }

    /// The supplied extent, or the lines scanned with `scanner`
    pub fn extent_with(&self, scanner: &ExtentScanner) -> Result<Extent> {
        match self.extent {
            Some(extent) => Ok(extent),
            None => scanner.scan(&self.lines),
        }
    }

    /// Write the modeler geometry body: subclass marker, version and the
    /// transcoded data lines. Returns the number of records written.
    pub fn write_body<W: RecordWriter + ?Sized>(&self, encoder: &Encoder, writer: &mut W) -> usize {
        writer.write_string(SUBCLASS_TAG, MODELER_GEOMETRY_SUBCLASS);
        writer.write_int(VERSION_TAG, MODELER_FORMAT_VERSION);
        2 + encoder.write_fields(&self.lines, writer)
    }
}

/// MTEXT content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    pub value: String,
}

impl RichText {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Write the value as primary/continuation records
    pub fn write_value<W: RecordWriter + ?Sized>(&self, encoder: &Encoder, writer: &mut W) -> usize {
        encoder.write_fields([self.value.as_str()], writer)
    }
}
