//! Splitting long text fields into tagged records
//!
//! A DXF text value is limited in width. Longer values are written as a
//! record with the primary group code followed by as many records with the
//! continuation group code as needed.
//!
//! Widths are counted in UTF-8 code units. A multi-byte character that
//! straddles a boundary is split between two records; readers join the
//! records back before decoding, so this is harmless.

use std::num::NonZeroUsize;

use crate::error::{Error, Result};
use crate::record::{RecordWriter, CONTINUATION_TAG, PRIMARY_TAG};

/// Chunk width for solid-body (ACIS) data lines
pub const SOLID_CHUNK_WIDTH: usize = 255;
/// Chunk width for MTEXT values
pub const MTEXT_CHUNK_WIDTH: usize = 250;

/// Maximum chunk length in code units, never zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkWidth(NonZeroUsize);

impl ChunkWidth {
    pub const SOLID: ChunkWidth = ChunkWidth::from_const(SOLID_CHUNK_WIDTH);
    pub const MTEXT: ChunkWidth = ChunkWidth::from_const(MTEXT_CHUNK_WIDTH);

    const fn from_const(width: usize) -> Self {
        match NonZeroUsize::new(width) {
            Some(width) => ChunkWidth(width),
            None => panic!("chunk width constant is zero"),
        }
    }

    pub fn new(width: usize) -> Result<Self> {
        NonZeroUsize::new(width)
            .map(ChunkWidth)
            .ok_or_else(|| Error::invalid_config("chunk width must be at least 1"))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for ChunkWidth {
    type Error = Error;

    fn try_from(width: usize) -> Result<Self> {
        Self::new(width)
    }
}

/// Group codes used for the first and the following chunks of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPair {
    pub primary: i32,
    pub continuation: i32,
}

impl Default for TagPair {
    fn default() -> Self {
        Self {
            primary: PRIMARY_TAG,
            continuation: CONTINUATION_TAG,
        }
    }
}

/// One record-sized piece of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Position within the field, starting at 0
    pub index: usize,
    pub tag: i32,
    pub bytes: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// The chunk as text, unless the boundary split a character
    pub fn as_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_primary(&self) -> bool {
        self.index == 0
    }
}

/// Splits fields into chunks of at most `width` code units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    width: ChunkWidth,
    tags: TagPair,
}

impl Chunker {
    /// Create a chunker with the default tags.
    ///
    /// Fails with [`Error::InvalidConfiguration`] when `width` is zero.
    pub fn new(width: usize) -> Result<Self> {
        Ok(Self::with_width(ChunkWidth::new(width)?))
    }

    pub fn with_width(width: ChunkWidth) -> Self {
        Self {
            width,
            tags: TagPair::default(),
        }
    }

    pub fn with_tags(mut self, tags: TagPair) -> Self {
        self.tags = tags;
        self
    }

    pub fn width(&self) -> ChunkWidth {
        self.width
    }

    pub fn tags(&self) -> TagPair {
        self.tags
    }

    /// Chunks of one field. An empty field yields nothing.
    pub fn chunks<'a, T: AsRef<[u8]> + ?Sized>(&self, field: &'a T) -> Chunks<'a> {
        Chunks {
            data: field.as_ref(),
            width: self.width.get(),
            tags: self.tags,
            offset: 0,
            index: 0,
        }
    }

    /// Write one field, returning the number of records emitted
    pub fn write_field<T, W>(&self, field: &T, writer: &mut W) -> usize
    where
        T: AsRef<[u8]> + ?Sized,
        W: RecordWriter + ?Sized,
    {
        let mut count = 0;
        for chunk in self.chunks(field) {
            writer.write_bytes(chunk.tag, chunk.bytes);
            count += 1;
        }
        count
    }

    /// Write several fields; each field starts again with the primary tag
    pub fn write_fields<I, W>(&self, fields: I, writer: &mut W) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
        W: RecordWriter + ?Sized,
    {
        fields
            .into_iter()
            .map(|field| self.write_field(field.as_ref(), writer))
            .sum()
    }
}

/// Iterator over the chunks of a field
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    data: &'a [u8],
    width: usize,
    tags: TagPair,
    offset: usize,
    index: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.data.len() {
            return None;
        }

        let end = self.offset.saturating_add(self.width).min(self.data.len());
        let tag = if self.index == 0 {
            self.tags.primary
        } else {
            self.tags.continuation
        };
        let chunk = Chunk {
            index: self.index,
            tag,
            bytes: &self.data[self.offset..end],
        };

        self.offset = end;
        self.index += 1;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.data.len() - self.offset;
        let n = remaining.div_ceil(self.width);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Chunks<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordBuffer;
    use crate::transcode;

    fn lengths(chunker: &Chunker, field: &str) -> Vec<usize> {
        chunker.chunks(field).map(|c| c.len()).collect()
    }

    #[test]
    fn test_zero_width_is_invalid() {
        assert!(matches!(
            Chunker::new(0),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(ChunkWidth::try_from(0).is_err());
        assert_eq!(ChunkWidth::new(1).unwrap().get(), 1);
    }

    #[test]
    fn test_empty_field_has_no_chunks() {
        let chunker = Chunker::new(SOLID_CHUNK_WIDTH).unwrap();
        assert_eq!(chunker.chunks("").count(), 0);

        let mut buffer = RecordBuffer::new();
        assert_eq!(chunker.write_field("", &mut buffer), 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_short_field_single_chunk() {
        let chunker = Chunker::new(SOLID_CHUNK_WIDTH).unwrap();
        let chunks: Vec<_> = chunker.chunks("hello").collect();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].tag, PRIMARY_TAG);
        assert_eq!(chunks[0].as_str(), Some("hello"));
        assert!(chunks[0].is_primary());
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_chunk() {
        let chunker = Chunker::new(4).unwrap();
        assert_eq!(lengths(&chunker, "abcdefgh"), vec![4, 4]);
        assert_eq!(lengths(&chunker, "abcd"), vec![4]);
    }

    #[test]
    fn test_remainder_goes_last() {
        let chunker = Chunker::new(4).unwrap();
        assert_eq!(lengths(&chunker, "abcdefghij"), vec![4, 4, 2]);
        assert_eq!(lengths(&chunker, "a"), vec![1]);
    }

    #[test]
    fn test_width_one() {
        let chunker = Chunker::new(1).unwrap();
        let tags: Vec<_> = chunker.chunks("xyz").map(|c| c.tag).collect();
        assert_eq!(tags, vec![1, 3, 3]);
    }

    #[test]
    fn test_chunk_invariants() {
        let text: String = (0..1000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        for width in [1, 2, 7, 250, 255, 999, 1000, 1001, 5000] {
            let chunker = Chunker::new(width).unwrap();
            let chunks: Vec<_> = chunker.chunks(&text).collect();

            let joined: Vec<u8> = chunks.iter().flat_map(|c| c.bytes.iter().copied()).collect();
            assert_eq!(joined, text.as_bytes());

            let last = chunks.len() - 1;
            for (i, chunk) in chunks.iter().enumerate() {
                assert_eq!(chunk.index, i);
                assert!(chunk.len() <= width);
                if i < last {
                    assert_eq!(chunk.len(), width);
                }
                let expected = if i == 0 { PRIMARY_TAG } else { CONTINUATION_TAG };
                assert_eq!(chunk.tag, expected);
            }
        }
    }

    #[test]
    fn test_size_hint() {
        let chunker = Chunker::new(3).unwrap();
        let mut chunks = chunker.chunks("abcdefg");
        assert_eq!(chunks.len(), 3);
        chunks.next();
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_multibyte_split_round_trips() {
        let chunker = Chunker::new(3).unwrap();
        let field = "aéé";
        let chunks: Vec<_> = chunker.chunks(field).collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].bytes, &[b'a', 0xC3, 0xA9][..]);
        assert_eq!(chunks[1].bytes, &[0xC3, 0xA9][..]);
        assert_eq!(chunks[0].as_str(), Some("aé"));

        let chunker = Chunker::new(2).unwrap();
        let chunks: Vec<_> = chunker.chunks(field).collect();
        assert_eq!(chunks[0].as_str(), None);

        let mut buffer = RecordBuffer::new();
        chunker.write_field(field, &mut buffer);
        assert_eq!(buffer.joined_text(), field.as_bytes());
    }

    #[test]
    fn test_primary_resets_per_field() {
        let chunker = Chunker::new(2).unwrap();
        let mut buffer = RecordBuffer::new();
        let count = chunker.write_fields(["abc", "", "de", "fghij"], &mut buffer);

        assert_eq!(count, 6);
        assert_eq!(buffer.tags(), vec![1, 3, 1, 1, 3, 3]);
    }

    #[test]
    fn test_custom_tags() {
        let chunker = Chunker::new(2).unwrap().with_tags(TagPair {
            primary: 1000,
            continuation: 1001,
        });
        let tags: Vec<_> = chunker.chunks("abcde").map(|c| c.tag).collect();
        assert_eq!(tags, vec![1000, 1001, 1001]);
    }

    #[test]
    fn test_transcoded_long_line() {
        let input = format!("{}{}", "A".repeat(255), "B".repeat(255));
        let encoded = transcode::encode([input]);
        let chunker = Chunker::new(SOLID_CHUNK_WIDTH).unwrap();

        let mut buffer = RecordBuffer::new();
        chunker.write_fields(&encoded, &mut buffer);

        assert_eq!(buffer.tags(), vec![1, 3, 3]);
        for record in &buffer.records {
            assert_eq!(record.value.as_bytes().map(<[u8]>::len), Some(255));
        }
    }

    #[test]
    fn test_transcoded_short_line() {
        let encoded = transcode::encode(["test entry smaller than 255 characters"]);
        let chunker = Chunker::new(SOLID_CHUNK_WIDTH).unwrap();

        let mut buffer = RecordBuffer::new();
        chunker.write_fields(&encoded, &mut buffer);

        assert_eq!(buffer.tags(), vec![PRIMARY_TAG]);
        assert_eq!(buffer.joined_text(), encoded[0].as_bytes());
    }
}
