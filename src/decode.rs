//! Binary decoding.
//!
//! [`Decoder`] mirrors [`crate::Encoder`]: typed read primitives over a
//! borrowed byte slice, plus [`Decoder::read_value`] for whole trees. Every
//! read is bounds-checked; malformed input surfaces as an [`Error`], never a
//! panic.
//!
//! ```rust
//! use serde_bof::{Decoder, Kind, Value};
//!
//! let bytes = serde_bof::encode(&Value::from(-300)).unwrap();
//! let mut decoder = Decoder::new(&bytes);
//! assert_eq!(decoder.read_kind().unwrap(), Kind::Integer);
//! assert_eq!(decoder.read_integer().unwrap(), (-300).into());
//! decoder.finish().unwrap();
//! ```

use crate::bits::BitReader;
use crate::strings::StringList;
use crate::varint::{read_count, read_signed, VariableWidth};
use crate::{DecodeOptions, Error, Kind, Result, Value};
use num_bigint::BigInt;

/// Reads one root value (or a hand-driven sequence of primitives) from bytes.
pub struct Decoder<'a> {
    reader: BitReader<'a>,
    strings: StringList,
    options: DecodeOptions,
    depth: usize,
    items: usize,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder with default options.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_options(data, DecodeOptions::default())
    }

    /// Creates a decoder with the given options.
    #[must_use]
    pub fn with_options(data: &'a [u8], options: DecodeOptions) -> Self {
        Decoder {
            reader: BitReader::new(data),
            strings: StringList::new(),
            options,
            depth: 0,
            items: 0,
        }
    }

    /// Reads a type tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] for codes past the last kind.
    pub fn read_kind(&mut self) -> Result<Kind> {
        let code = VariableWidth::TYPE_TAG.read(&mut self.reader)?;
        Kind::from_code(code).ok_or(Error::UnknownType(code))
    }

    /// Reads a one-bit boolean.
    pub fn read_bool(&mut self) -> Result<bool> {
        self.reader.read_bit()
    }

    /// Reads a signed integer. A negative zero reads as zero.
    pub fn read_integer(&mut self) -> Result<BigInt> {
        read_signed(&mut self.reader)
    }

    /// Reads an element count or byte length.
    pub fn read_count(&mut self) -> Result<usize> {
        usize::try_from(read_count(&mut self.reader)?).map_err(|_| Error::LengthOverflow)
    }

    /// Reads an 8-byte little-endian IEEE-754 double.
    pub fn read_real(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.reader.read_array::<8>()?))
    }

    /// Reads a length-prefixed byte blob.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_count()?;
        Ok(self.reader.read_bytes(len)?.to_vec())
    }

    /// Reads a string literal or back-reference.
    pub fn read_string(&mut self) -> Result<String> {
        self.strings.read(&mut self.reader)
    }

    /// Reads a tagged value, recursing into containers.
    ///
    /// With [`DecodeOptions::preserve_comments`] off, comments are consumed and
    /// come back as `Empty` (or are dropped from maps).
    pub fn read_value(&mut self) -> Result<Value> {
        let value = self.read_tagged()?;
        if self.options.preserve_comments {
            Ok(value)
        } else {
            Ok(strip_comments(value))
        }
    }

    /// Reads the payload of a value whose tag is already known, as uniform list
    /// items are stored.
    pub fn read_payload(&mut self, kind: Kind) -> Result<Value> {
        let value = self.read_untagged(kind)?;
        if self.options.preserve_comments {
            Ok(value)
        } else {
            Ok(strip_comments(value))
        }
    }

    fn read_tagged(&mut self) -> Result<Value> {
        let position = self.reader.position();
        let kind = self.read_kind()?;
        log::trace!("{} at byte {}", kind, position);
        self.read_untagged(kind)
    }

    fn read_untagged(&mut self, kind: Kind) -> Result<Value> {
        Ok(match kind {
            Kind::Empty => Value::Empty,
            Kind::Bool => Value::Bool(self.read_bool()?),
            Kind::Integer => Value::Integer(self.read_integer()?),
            Kind::Real => Value::Real(self.read_real()?),
            Kind::Bytes => Value::Bytes(self.read_bytes()?),
            Kind::Utf8 => Value::Utf8(self.read_string()?),
            Kind::Comment => Value::Comment(self.read_string()?),
            Kind::List => self.nested(Self::read_list)?,
            Kind::UniformList => self.nested(Self::read_uniform_list)?,
            Kind::Map => self.nested(|d| Ok(Value::Map(d.read_entries()?)))?,
            Kind::Properties => self.nested(Self::read_properties)?,
        })
    }

    fn nested<F>(&mut self, read: F) -> Result<Value>
    where
        F: FnOnce(&mut Self) -> Result<Value>,
    {
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthLimitExceeded(self.options.max_depth));
        }
        self.depth += 1;
        let value = read(self);
        self.depth -= 1;
        value
    }

    fn read_list(&mut self) -> Result<Value> {
        let count = self.read_item_count()?;
        let mut items = Vec::with_capacity(self.capacity_hint(count));
        for _ in 0..count {
            items.push(self.read_tagged()?);
        }
        Ok(Value::List(items))
    }

    fn read_uniform_list(&mut self) -> Result<Value> {
        let kind = self.read_kind()?;
        let count = self.read_item_count()?;
        let mut items = Vec::with_capacity(self.capacity_hint(count));
        for _ in 0..count {
            items.push(self.read_untagged(kind)?);
        }
        Ok(Value::UniformList { kind, items })
    }

    fn read_properties(&mut self) -> Result<Value> {
        let entries = self.read_entries()?;
        let value = Box::new(self.read_tagged()?);
        Ok(Value::Properties { entries, value })
    }

    fn read_entries(&mut self) -> Result<Vec<(Value, Value)>> {
        let count = self.read_item_count()?;
        let mut entries = Vec::with_capacity(self.capacity_hint(count));
        for _ in 0..count {
            let key = self.read_tagged()?;
            let value = if key.annotated().is_comment() {
                Value::Empty
            } else {
                self.read_tagged()?
            };
            entries.push((key, value));
        }
        Ok(entries)
    }

    // Empty items take no bits, so input size alone does not bound a uniform list.
    fn read_item_count(&mut self) -> Result<usize> {
        let count = self.read_count()?;
        self.items = self
            .items
            .checked_add(count)
            .filter(|&total| total <= self.options.max_items)
            .ok_or(Error::ItemLimitExceeded(self.options.max_items))?;
        Ok(count)
    }

    // Counts come from untrusted input; never preallocate past what the input could hold.
    fn capacity_hint(&self, count: usize) -> usize {
        count.min(self.reader.remaining())
    }

    /// Byte offset of the next unread byte.
    #[must_use]
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    /// Checks for input left after the root value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TrailingBytes`] unless
    /// [`DecodeOptions::allow_trailing_bytes`] is set.
    pub fn finish(self) -> Result<()> {
        let remaining = self.reader.remaining();
        if remaining > 0 && !self.options.allow_trailing_bytes {
            return Err(Error::TrailingBytes(remaining));
        }
        log::debug!(
            "decoded {} byte(s), {} distinct string(s)",
            self.reader.position(),
            self.strings.len()
        );
        Ok(())
    }
}

fn strip_comments(value: Value) -> Value {
    match value {
        Value::Comment(_) => Value::Empty,
        Value::List(items) => Value::List(items.into_iter().map(strip_comments).collect()),
        Value::UniformList { kind, items } => {
            let kind = if kind == Kind::Comment { Kind::Empty } else { kind };
            Value::UniformList {
                kind,
                items: items.into_iter().map(strip_comments).collect(),
            }
        }
        Value::Map(entries) => Value::Map(strip_entries(entries)),
        Value::Properties { entries, value } => Value::Properties {
            entries: strip_entries(entries),
            value: Box::new(strip_comments(*value)),
        },
        other => other,
    }
}

fn strip_entries(entries: Vec<(Value, Value)>) -> Vec<(Value, Value)> {
    entries
        .into_iter()
        .filter(|(key, _)| !key.annotated().is_comment())
        .map(|(key, value)| (strip_comments(key), strip_comments(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode, Encoder};

    fn decode(data: &[u8]) -> Result<Value> {
        let mut decoder = Decoder::new(data);
        let value = decoder.read_value()?;
        decoder.finish()?;
        Ok(value)
    }

    #[test]
    fn test_empty_input_is_eof() {
        assert!(matches!(decode(&[]), Err(Error::UnexpectedEof { .. })));
    }

    #[test]
    fn test_unknown_tag() {
        // sentinel 111, then continuation chunk 100 -> 7 + 4
        assert_eq!(decode(&[0b100_111]), Err(Error::UnknownType(11)));
    }

    #[test]
    fn test_truncated_real() {
        assert!(matches!(
            decode(&[0b011, 0, 0, 0]),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        assert_eq!(decode(&[0, 0]), Err(Error::TrailingBytes(1)));

        let options = DecodeOptions::new().with_allow_trailing_bytes(true);
        let mut decoder = Decoder::with_options(&[0, 0], options);
        assert_eq!(decoder.read_value().unwrap(), Value::Empty);
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let mut value = Value::Empty;
        for _ in 0..10 {
            value = Value::List(vec![value]);
        }
        let data = encode(&value).unwrap();

        let mut shallow = Decoder::with_options(&data, DecodeOptions::new().with_max_depth(9));
        assert_eq!(shallow.read_value(), Err(Error::DepthLimitExceeded(9)));

        let mut deep = Decoder::with_options(&data, DecodeOptions::new().with_max_depth(10));
        assert_eq!(deep.read_value().unwrap(), value);
    }

    #[test]
    fn test_falsy_keys_keep_their_values() {
        let value = Value::Map(vec![
            (Value::from(0), Value::from("zero")),
            (Value::Bool(false), Value::from("no")),
            (Value::Empty, Value::from("blank")),
            (Value::from(""), Value::from("empty string")),
        ]);
        assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn test_comment_entries_have_no_value_slot() {
        let value = Value::Map(vec![
            (Value::Comment("note".into()), Value::Empty),
            (Value::from("a"), Value::from(1)),
        ]);
        let data = encode(&value).unwrap();
        assert_eq!(decode(&data).unwrap(), value);

        let mut decoder =
            Decoder::with_options(&data, DecodeOptions::new().with_preserve_comments(false));
        assert_eq!(
            decoder.read_value().unwrap(),
            Value::Map(vec![(Value::from("a"), Value::from(1))])
        );
        decoder.finish().unwrap();
    }

    #[test]
    fn test_dropped_comments_still_consume_bytes() {
        let value = Value::List(vec![Value::Comment("skip me".into()), Value::from(5)]);
        let data = encode(&value).unwrap();
        let mut decoder =
            Decoder::with_options(&data, DecodeOptions::new().with_preserve_comments(false));
        assert_eq!(
            decoder.read_value().unwrap(),
            Value::List(vec![Value::Empty, Value::from(5)])
        );
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn test_properties_wrap_the_following_value() {
        let value = Value::Properties {
            entries: vec![(Value::from("lang"), Value::from("en"))],
            value: Box::new(Value::from("hello")),
        };
        assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn test_huge_count_does_not_preallocate() {
        // list tag, selector 3 continuation chain claiming an enormous count
        let mut encoder = Encoder::new();
        encoder.write_kind(Kind::List);
        encoder.write_count(usize::MAX >> 8);
        let data = encoder.finish();
        assert_eq!(decode(&data), Err(Error::ItemLimitExceeded(1 << 22)));

        let options = DecodeOptions::new().with_max_items(usize::MAX);
        let mut decoder = Decoder::with_options(&data, options);
        assert!(matches!(
            decoder.read_value(),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_zero_width_items_are_budgeted() {
        let mut encoder = Encoder::new();
        encoder.write_kind(Kind::UniformList);
        encoder.write_kind(Kind::Empty);
        encoder.write_count(20_000_000);
        let data = encoder.finish();
        let err = decode(&data).unwrap_err();
        assert_eq!(err, Error::ItemLimitExceeded(1 << 22));
        assert!(err.is_malformed());

        let options = DecodeOptions::new().with_max_items(3);
        let mut decoder = Decoder::with_options(&data, options);
        assert_eq!(decoder.read_value(), Err(Error::ItemLimitExceeded(3)));
    }

    #[test]
    fn test_item_budget_covers_the_whole_document() {
        let value = Value::List(vec![
            Value::List(vec![Value::from(1), Value::from(2)]),
            Value::Map(vec![(Value::from("k"), Value::Empty)]),
        ]);
        let data = encode(&value).unwrap();

        // 2 outer items + 2 list items + 1 map entry
        let mut exact = Decoder::with_options(&data, DecodeOptions::new().with_max_items(5));
        assert_eq!(exact.read_value().unwrap(), value);

        let mut short = Decoder::with_options(&data, DecodeOptions::new().with_max_items(4));
        assert_eq!(short.read_value(), Err(Error::ItemLimitExceeded(4)));
    }

    #[test]
    fn test_primitives_read_back() {
        let mut encoder = Encoder::new();
        encoder.write_kind(Kind::Real);
        encoder.write_real(-0.25);
        encoder.write_bytes(b"raw");
        encoder.write_string("s");
        encoder.write_string("s");
        encoder.write_bool(true);
        let data = encoder.finish();

        let mut decoder = Decoder::new(&data);
        assert_eq!(decoder.read_kind().unwrap(), Kind::Real);
        assert_eq!(decoder.read_real().unwrap(), -0.25);
        assert_eq!(decoder.read_bytes().unwrap(), b"raw");
        assert_eq!(decoder.read_string().unwrap(), "s");
        assert_eq!(decoder.read_string().unwrap(), "s");
        assert!(decoder.read_bool().unwrap());
        decoder.finish().unwrap();
    }
}
