//! Binary encoding.
//!
//! [`Encoder`] owns the bit cursor and the string table for one encode
//! operation. It exposes typed write primitives for callers that stream their
//! own trees, and [`Encoder::write_value`] for whole [`Value`] trees.
//!
//! ## Layout
//!
//! Every value starts with its type tag (3-bit chunks, see [`crate::varint`]):
//!
//! | Kind | Payload after the tag |
//! |------|-----------------------|
//! | empty | nothing |
//! | bool | 1 bit |
//! | integer | sign bit, chunked magnitude |
//! | real | 8 bytes, little-endian IEEE-754 |
//! | bytes | chunked length, raw bytes |
//! | utf8, comment | string table entry |
//! | list | chunked count, tagged values |
//! | uniform list | element tag, chunked count, untagged payloads |
//! | map | chunked count, tagged key/value pairs |
//! | properties | chunked count, tagged key/value pairs, then the annotated tagged value |
//!
//! A pair whose key is a comment is written as the comment alone.
//!
//! ```rust
//! use serde_bof::{Encoder, Kind};
//!
//! let mut encoder = Encoder::new();
//! encoder.write_kind(Kind::List);
//! encoder.write_count(2);
//! encoder.write_kind(Kind::Bool);
//! encoder.write_bool(true);
//! encoder.write_kind(Kind::Empty);
//! let bytes = encoder.finish();
//!
//! assert_eq!(
//!     serde_bof::decode(&bytes).unwrap(),
//!     serde_bof::Value::List(vec![true.into(), serde_bof::Value::Empty])
//! );
//! ```

use crate::bits::BitWriter;
use crate::strings::StringTable;
use crate::varint::{write_count, write_signed, VariableWidth};
use crate::{EncodeOptions, Error, Kind, Result, Value};
use num_bigint::BigInt;

/// Writes one root value (or a hand-built sequence of primitives) to bytes.
pub struct Encoder {
    writer: BitWriter,
    strings: StringTable,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Creates an encoder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(EncodeOptions::default())
    }

    /// Creates an encoder with the given options.
    #[must_use]
    pub fn with_options(options: EncodeOptions) -> Self {
        Encoder {
            writer: BitWriter::with_capacity(256),
            strings: StringTable::new(options.intern_strings),
        }
    }

    /// Writes a type tag.
    pub fn write_kind(&mut self, kind: Kind) {
        VariableWidth::TYPE_TAG.write(&mut self.writer, kind.code());
    }

    /// Writes a boolean as one bit.
    pub fn write_bool(&mut self, value: bool) {
        self.writer.write_bit(value);
    }

    /// Writes a signed integer: sign bit, then chunked magnitude.
    pub fn write_integer(&mut self, value: &BigInt) {
        write_signed(&mut self.writer, value);
    }

    /// Writes an element count or byte length.
    pub fn write_count(&mut self, count: usize) {
        write_count(&mut self.writer, count as u64);
    }

    /// Writes an IEEE-754 double as 8 little-endian bytes.
    pub fn write_real(&mut self, value: f64) {
        self.writer.write_bytes(&value.to_le_bytes());
    }

    /// Writes a length-prefixed byte blob.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_count(bytes.len());
        self.writer.write_bytes(bytes);
    }

    /// Writes a string through the string table.
    pub fn write_string(&mut self, s: &str) {
        self.strings.write(&mut self.writer, s);
    }

    /// Writes a tagged value, recursing into containers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UniformListMismatch`] for a uniform list holding an item of
    /// another kind, and [`Error::UnsupportedValue`] for a comment entry that
    /// carries a value.
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        self.write_kind(value.kind());
        self.write_payload(value)
    }

    /// Writes a value without its type tag, as uniform list items are stored.
    pub fn write_payload(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Empty => {}
            Value::Bool(b) => self.write_bool(*b),
            Value::Integer(i) => self.write_integer(i),
            Value::Real(f) => self.write_real(*f),
            Value::Bytes(b) => self.write_bytes(b),
            Value::Utf8(s) | Value::Comment(s) => self.write_string(s),
            Value::List(items) => {
                self.write_count(items.len());
                for item in items {
                    self.write_value(item)?;
                }
            }
            Value::UniformList { kind, items } => {
                if let Some(bad) = items.iter().find(|item| item.kind() != *kind) {
                    return Err(Error::UniformListMismatch {
                        expected: *kind,
                        found: bad.kind(),
                    });
                }
                self.write_kind(*kind);
                self.write_count(items.len());
                for item in items {
                    self.write_payload(item)?;
                }
            }
            Value::Map(entries) => self.write_entries(entries)?,
            Value::Properties { entries, value } => {
                self.write_entries(entries)?;
                self.write_value(value)?;
            }
        }
        Ok(())
    }

    fn write_entries(&mut self, entries: &[(Value, Value)]) -> Result<()> {
        self.write_count(entries.len());
        for (key, value) in entries {
            self.write_value(key)?;
            if key.annotated().is_comment() {
                if !value.is_empty() {
                    return Err(Error::unsupported(format!(
                        "comment entry cannot carry a {} value",
                        value.kind()
                    )));
                }
                continue;
            }
            self.write_value(value)?;
        }
        Ok(())
    }

    /// Bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writer.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writer.is_empty()
    }

    /// Flushes the pending partial byte and returns the encoded bytes.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        let strings = self.strings.len();
        let bytes = self.writer.finish();
        log::debug!(
            "encoded {} byte(s), {} distinct string(s)",
            bytes.len(),
            strings
        );
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &Value) -> Vec<u8> {
        let mut encoder = Encoder::new();
        encoder.write_value(value).unwrap();
        encoder.finish()
    }

    #[test]
    fn test_empty_is_one_tag_byte() {
        assert_eq!(encode(&Value::Empty), vec![0]);
    }

    #[test]
    fn test_bool_packs_after_tag() {
        // tag 001, then the bit
        assert_eq!(encode(&Value::Bool(true)), vec![0b1001]);
        assert_eq!(encode(&Value::Bool(false)), vec![0b0001]);
    }

    #[test]
    fn test_negative_integer_layout() {
        // tag 010, sign 1, selector 00, then the magnitude byte
        assert_eq!(encode(&Value::from(-5)), vec![0b0000_1010, 5]);
    }

    #[test]
    fn test_real_is_raw_little_endian() {
        let data = encode(&Value::Real(1.5));
        assert_eq!(data[0], 0b011);
        assert_eq!(&data[1..], &1.5f64.to_le_bytes());
    }

    #[test]
    fn test_uniform_list_items_are_untagged() {
        let value = Value::uniform(
            Kind::Integer,
            vec![Value::from(5), Value::from(1_000_000), Value::from(0)],
        )
        .unwrap();
        let data = encode(&value);
        // outer tag: sentinel 111 + 000; element tag 010; then count and payloads
        assert_eq!(data[0] & 0b11_1111, 0b000_111);
        let tagged: usize = [5i64, 1_000_000, 0]
            .iter()
            .map(|&n| encode(&Value::from(n)).len())
            .sum();
        assert!(data.len() < tagged + 2);
    }

    #[test]
    fn test_heterogeneous_uniform_list_rejected() {
        let value = Value::UniformList {
            kind: Kind::Integer,
            items: vec![Value::from(1), Value::from("two")],
        };
        let mut encoder = Encoder::new();
        assert_eq!(
            encoder.write_value(&value),
            Err(Error::UniformListMismatch {
                expected: Kind::Integer,
                found: Kind::Utf8
            })
        );
    }

    #[test]
    fn test_comment_entry_with_value_rejected() {
        let value = Value::Map(vec![(Value::Comment("c".into()), Value::from(1))]);
        let mut encoder = Encoder::new();
        assert!(matches!(
            encoder.write_value(&value),
            Err(Error::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_primitives_match_value_encoding() {
        let mut encoder = Encoder::new();
        encoder.write_kind(Kind::Map);
        encoder.write_count(1);
        encoder.write_kind(Kind::Utf8);
        encoder.write_string("k");
        encoder.write_kind(Kind::Bytes);
        encoder.write_bytes(&[1, 2, 3]);
        let by_hand = encoder.finish();

        let value = Value::Map(vec![(Value::from("k"), Value::Bytes(vec![1, 2, 3]))]);
        assert_eq!(by_hand, encode(&value));
    }
}
