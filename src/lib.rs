//! # emx-dxfrec
//!
//! Encoding of long payloads into DXF group-code records.
//!
//! DXF is a line-based tag-value format: every record is a group code line
//! followed by a value line, and text values have a maximum width. Payloads
//! longer than that are split into a record with the primary code `1`
//! followed by continuation records with code `3`:
//!
//! ```text
//!   1
//! <first 255 code units>
//!   3
//! <next 255 code units>
//!   3
//! <rest>
//! ```
//!
//! ## Payloads
//!
//! - **Solid-body data** (`3DSOLID`, `BODY`, `REGION`): ACIS SAT lines, each
//!   line passed through the ACIS substitution cipher ([`transcode`]) and
//!   chunked at 255 code units.
//! - **Rich text** (`MTEXT`): the value is written unchanged, chunked at 250
//!   code units.
//!
//! ## Pipeline
//!
//! fields → [`TranscodeTable`] (solid only) → [`Chunker`] → [`RecordWriter`]
//!
//! The record writer is a trait so the pipeline can feed any DXF writer;
//! [`AsciiWriter`] and [`RecordBuffer`] are provided.
//!
//! ## Extents
//!
//! [`ExtentScanner`] computes the bounding box of the `point` records of
//! SAT data. See the [`extent`] module for its defaults.
//!
//! ## Example
//!
//! ```rust
//! use emx_dxfrec::{Encoder, RecordBuffer};
//!
//! let mut records = RecordBuffer::new();
//! Encoder::solid().write_fields(["body $-1 -1 $-1 $1 #"], &mut records);
//! assert_eq!(records.tags(), vec![1]);
//! ```

pub mod chunk;
pub mod encoder;
pub mod error;
pub mod extent;
pub mod payload;
pub mod record;
pub mod transcode;

pub use chunk::{
    Chunk, ChunkWidth, Chunker, Chunks, TagPair, MTEXT_CHUNK_WIDTH, SOLID_CHUNK_WIDTH,
};
pub use encoder::{Encoder, EncoderConfig, PayloadKind};
pub use error::{Axis, Error, Result};
pub use extent::{scan_extent, Extent, ExtentScanner, ExtentSeed, ParsePolicy, POINT_MARKER};
pub use payload::{RichText, Solid};
pub use record::{
    AsciiWriter, Record, RecordBuffer, RecordWriter, Value, CONTINUATION_TAG, PRIMARY_TAG,
};
pub use transcode::TranscodeTable;
