//! String interning for UTF-8 values and comments.
//!
//! The first occurrence of a string is written literally (flag bit 0, byte
//! length, raw bytes) and gets the next sequential index. Every later
//! occurrence is written as flag bit 1 followed by that index. Indices are
//! assigned in first-seen order on both sides, so a back-reference always
//! points at a string the reader has already seen.

use crate::bits::{BitReader, BitWriter};
use crate::varint::{read_count, write_count};
use crate::{Error, Result};
use indexmap::IndexSet;

/// Write side: string content to first-seen index.
#[derive(Debug, Default)]
pub struct StringTable {
    strings: IndexSet<String>,
    intern: bool,
}

impl StringTable {
    /// Creates a table; with `intern` off every string is written literally.
    #[must_use]
    pub fn new(intern: bool) -> Self {
        StringTable {
            strings: IndexSet::new(),
            intern,
        }
    }

    /// Writes `s` as a back-reference if it was seen before, else as a literal.
    pub fn write(&mut self, writer: &mut BitWriter, s: &str) {
        if self.intern {
            if let Some(index) = self.strings.get_index_of(s) {
                writer.write_bit(true);
                write_count(writer, index as u64);
                return;
            }
            self.strings.insert(s.to_string());
        }
        writer.write_bit(false);
        write_count(writer, s.len() as u64);
        writer.write_bytes(s.as_bytes());
    }

    /// Number of distinct strings registered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns `true` if no string has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Read side: literals in the order they were decoded.
#[derive(Debug, Default)]
pub struct StringList {
    strings: Vec<String>,
}

impl StringList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a literal or a back-reference.
    pub fn read(&mut self, reader: &mut BitReader<'_>) -> Result<String> {
        if reader.read_bit()? {
            let index = read_count(reader)?;
            return usize::try_from(index)
                .ok()
                .and_then(|i| self.strings.get(i))
                .cloned()
                .ok_or(Error::StringIndexOutOfRange {
                    index,
                    len: self.strings.len(),
                });
        }
        let len = usize::try_from(read_count(reader)?).map_err(|_| Error::LengthOverflow)?;
        let start = reader.position();
        let bytes = reader.read_bytes(len)?;
        let s = std::str::from_utf8(bytes)
            .map_err(|e| Error::InvalidUtf8(format!("{} (string at byte {})", e, start)))?
            .to_string();
        self.strings.push(s.clone());
        Ok(s)
    }

    /// Number of literals decoded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns `true` if no literal has been decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
