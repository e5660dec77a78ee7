//! Payload encoder: transcode, chunk, write

use std::io;
use std::path::Path;

use tracing::debug;

use crate::chunk::{ChunkWidth, Chunker, TagPair};
use crate::error::Result;
use crate::record::{AsciiWriter, RecordWriter};
use crate::transcode::TranscodeTable;

/// What kind of payload is being embedded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// ACIS solid-body data: transcoded, 255 code units per record
    Solid,
    /// MTEXT content: written as is, 250 code units per record
    RichText,
}

/// Configuration for [`Encoder`]
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderConfig {
    pub kind: PayloadKind,
    pub chunk_width: ChunkWidth,
    /// Whether fields go through the ACIS transcoder before chunking
    pub transcode: bool,
    pub tags: TagPair,
}

impl EncoderConfig {
    /// Settings for solid-body data
    pub fn solid() -> Self {
        Self {
            kind: PayloadKind::Solid,
            chunk_width: ChunkWidth::SOLID,
            transcode: true,
            tags: TagPair::default(),
        }
    }

    /// Settings for MTEXT values
    pub fn rich_text() -> Self {
        Self {
            kind: PayloadKind::RichText,
            chunk_width: ChunkWidth::MTEXT,
            transcode: false,
            tags: TagPair::default(),
        }
    }

    pub fn for_kind(kind: PayloadKind) -> Self {
        match kind {
            PayloadKind::Solid => Self::solid(),
            PayloadKind::RichText => Self::rich_text(),
        }
    }

    pub fn with_chunk_width(mut self, width: ChunkWidth) -> Self {
        self.chunk_width = width;
        self
    }

    pub fn with_transcode(mut self, transcode: bool) -> Self {
        self.transcode = transcode;
        self
    }

    pub fn with_tags(mut self, tags: TagPair) -> Self {
        self.tags = tags;
        self
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::solid()
    }
}

/// Encodes payload fields into tag-value records
#[derive(Debug, Clone)]
pub struct Encoder {
    config: EncoderConfig,
    chunker: Chunker,
    table: &'static TranscodeTable,
}

impl Encoder {
    pub fn new(config: EncoderConfig) -> Self {
        let chunker = Chunker::with_width(config.chunk_width).with_tags(config.tags);
        Self {
            config,
            chunker,
            table: TranscodeTable::shared(),
        }
    }

    pub fn solid() -> Self {
        Self::new(EncoderConfig::solid())
    }

    pub fn rich_text() -> Self {
        Self::new(EncoderConfig::rich_text())
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Write every field to `writer`, returning the number of records
    pub fn write_fields<I, W>(&self, fields: I, writer: &mut W) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        W: RecordWriter + ?Sized,
    {
        let mut field_count = 0;
        let mut records = 0;
        for field in fields {
            let field = field.as_ref();
            records += if self.config.transcode {
                self.chunker.write_field(&self.table.encode_field(field), writer)
            } else {
                self.chunker.write_field(field, writer)
            };
            field_count += 1;
        }

        debug!(
            kind = ?self.config.kind,
            fields = field_count,
            records,
            width = self.config.chunk_width.get(),
            "encoded payload"
        );
        records
    }

    /// Encode fields to DXF ASCII text
    pub fn encode<I>(&self, fields: I) -> Vec<u8>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut writer = AsciiWriter::new();
        self.write_fields(fields, &mut writer);
        writer.into_bytes()
    }

    /// Encode fields directly to a writer
    pub fn encode_to_writer<I, W>(&self, fields: I, mut writer: W) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        W: io::Write,
    {
        let encoded = self.encode(fields);
        writer.write_all(&encoded)?;
        Ok(())
    }

    /// Encode fields to a file
    pub fn encode_to_file<I>(&self, fields: I, path: &Path) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let encoded = self.encode(fields);
        std::fs::write(path, encoded)?;
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::solid()
    }
}
