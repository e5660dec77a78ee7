//! ACIS text transcoder
//!
//! Solid-body data embedded in DXF is stored with a simple substitution
//! cipher. Every character is either looked up in a small table or XORed
//! with `0x5F`:
//!
//! | input            | output                         |
//! |------------------|--------------------------------|
//! | space            | space                          |
//! | `_`              | `@`                            |
//! | `@`              | `_`                            |
//! | `A` ..= `^`      | `0x5E - (c - 0x41)` (`A`→`^`)  |
//! | anything else    | `c ^ 0x5F`                     |
//!
//! An input `A` is additionally followed by one space in the output, so the
//! encoded text can be longer than its input. Existing readers expect that
//! extra space; keep it.

use std::sync::OnceLock;

/// XOR key applied to characters outside the table
pub const XOR_KEY: u32 = 0x5F;

const TABLE_SIZE: usize = 0x60;
const REFLECT_START: u32 = 0x41;
const REFLECT_END: u32 = 0x5F; // exclusive
const REFLECT_TOP: u32 = 0x5E;

static SHARED: OnceLock<TranscodeTable> = OnceLock::new();

/// Substitution table for the characters that do not follow the XOR rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeTable {
    entries: [Option<char>; TABLE_SIZE],
}

impl TranscodeTable {
    /// Build a table
    pub fn new() -> Self {
        let mut entries = [None; TABLE_SIZE];
        entries[' ' as usize] = Some(' ');
        entries['_' as usize] = Some('@');
        entries['@' as usize] = Some('_');
        for c in REFLECT_START..REFLECT_END {
            entries[c as usize] = char::from_u32(REFLECT_TOP - (c - REFLECT_START));
        }
        Self { entries }
    }

    /// Process-wide table, built on first use
    pub fn shared() -> &'static TranscodeTable {
        SHARED.get_or_init(TranscodeTable::new)
    }

    /// Table image of `c`, or `None` when `c` falls under the XOR rule
    pub fn lookup(&self, c: char) -> Option<char> {
        self.entries.get(c as usize).copied().flatten()
    }

    /// Append the encoding of one character to `out`
    pub fn transcode_char(&self, c: char, out: &mut String) {
        match self.lookup(c) {
            Some(mapped) => {
                out.push(mapped);
                if c == 'A' {
                    out.push(' ');
                }
            }
            None => out.push(xor_char(c)),
        }
    }

    /// Encode a single field
    pub fn encode_field(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + text.len() / 8);
        for c in text.chars() {
            self.transcode_char(c, &mut out);
        }
        out
    }

    /// Encode every field, keeping order and count
    pub fn encode<I>(&self, fields: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        fields
            .into_iter()
            .map(|field| self.encode_field(field.as_ref()))
            .collect()
    }

    /// Encode binary data.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD before encoding.
    pub fn encode_bytes(&self, data: &[u8]) -> String {
        self.encode_field(&String::from_utf8_lossy(data))
    }
}

impl Default for TranscodeTable {
    fn default() -> Self {
        Self::new()
    }
}

fn xor_char(c: char) -> char {
    // Only the low seven bits change, so the result stays a scalar value.
    char::from_u32(c as u32 ^ XOR_KEY).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Encode fields with the shared table
pub fn encode<I>(fields: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    TranscodeTable::shared().encode(fields)
}

/// Encode one field with the shared table
pub fn encode_field(text: &str) -> String {
    TranscodeTable::shared().encode_field(text)
}
