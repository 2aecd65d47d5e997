//! Variable-length integer encodings.
//!
//! Two independent schemes live here:
//!
//! - **Variable-width fields** ([`VariableWidth`]): a value is written as
//!   `bit_length`-bit chunks. Each chunk equal to the all-ones sentinel means
//!   "add this and keep reading", and the chunk width grows by `bit_step`
//!   after every sentinel. Type tags use 3-bit chunks with no growth, so
//!   codes 0..=6 fit in a single chunk and 7..=13 take a sentinel plus a
//!   terminal chunk.
//! - **Chunked magnitudes** ([`write_unsigned`] and friends): a 2-bit selector
//!   followed by byte-aligned little-endian payload bytes. Selectors 0, 1 and 2
//!   terminate after 1, 2 or 3 bytes, and selector 3 carries 3 bytes and
//!   continues 24 bits higher.
//!
//! ```rust
//! use serde_bof::bits::{BitReader, BitWriter};
//! use serde_bof::varint::{read_count, write_count};
//!
//! let mut writer = BitWriter::new();
//! write_count(&mut writer, 16_777_216);
//! let data = writer.finish();
//! // one reserved selector byte, then 3 + 1 payload bytes
//! assert_eq!(data, vec![0b0000_0011, 0, 0, 0, 1]);
//!
//! let mut reader = BitReader::new(&data);
//! assert_eq!(read_count(&mut reader).unwrap(), 16_777_216);
//! ```

use crate::bits::{BitReader, BitWriter};
use crate::{Error, Result};
use num_bigint::{BigInt, BigUint, Sign};

/// Selector values for the chunked magnitude encoding.
const SELECTOR_ONE_BYTE: u64 = 0;
const SELECTOR_TWO_BYTES: u64 = 1;
const SELECTOR_THREE_BYTES: u64 = 2;
const SELECTOR_CONTINUE: u64 = 3;

/// Payload bytes carried by a continuation chunk.
const CHUNK_BYTES: usize = 3;

/// Layout of an escape-continued bit field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariableWidth {
    pub bit_length: u32,
    pub bit_step: u32,
}

impl VariableWidth {
    /// The layout type tags are written with: 3-bit chunks, no growth.
    pub const TYPE_TAG: VariableWidth = VariableWidth::new(3, 0);

    /// Creates a layout starting at `bit_length` bits and growing by `bit_step`.
    ///
    /// # Panics
    ///
    /// Panics if `bit_length` is not in `1..=64`.
    #[must_use]
    pub const fn new(bit_length: u32, bit_step: u32) -> Self {
        assert!(
            bit_length > 0 && bit_length <= 64,
            "bit_length must be 1..=64"
        );
        VariableWidth {
            bit_length,
            bit_step,
        }
    }

    /// Writes `value` as sentinel chunks followed by one terminal chunk.
    pub fn write(&self, writer: &mut BitWriter, value: u64) {
        let mut width = self.bit_length;
        let mut value = value;
        loop {
            let max = sentinel(width);
            if value < max {
                break;
            }
            writer.write_bits(width, max);
            value -= max;
            width = (width + self.bit_step).min(64);
        }
        writer.write_bits(width, value);
    }

    /// Reads a value written by [`VariableWidth::write`].
    pub fn read(&self, reader: &mut BitReader<'_>) -> Result<u64> {
        let mut width = self.bit_length;
        let mut total = 0u64;
        let mut chunk = reader.read_bits(width)?;
        while chunk == sentinel(width) {
            total = total.checked_add(chunk).ok_or(Error::LengthOverflow)?;
            width = (width + self.bit_step).min(64);
            chunk = reader.read_bits(width)?;
        }
        total.checked_add(chunk).ok_or(Error::LengthOverflow)
    }
}

#[inline]
fn sentinel(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Writes a magnitude given as little-endian bytes (trailing zeros allowed).
fn write_magnitude_le(writer: &mut BitWriter, bytes: &[u8]) {
    let significant = bytes.iter().rposition(|&b| b != 0).map_or(1, |i| i + 1);
    let mut rest = &bytes[..significant.min(bytes.len())];
    if rest.is_empty() {
        rest = &[0];
    }
    while rest.len() > CHUNK_BYTES {
        writer.write_bits(2, SELECTOR_CONTINUE);
        writer.write_bytes(&rest[..CHUNK_BYTES]);
        rest = &rest[CHUNK_BYTES..];
    }
    let selector = match rest.len() {
        1 => SELECTOR_ONE_BYTE,
        2 => SELECTOR_TWO_BYTES,
        _ => SELECTOR_THREE_BYTES,
    };
    writer.write_bits(2, selector);
    writer.write_bytes(rest);
}

/// Reads a chunked magnitude back into little-endian bytes.
fn read_magnitude_le(reader: &mut BitReader<'_>) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(CHUNK_BYTES);
    loop {
        let selector = reader.read_bits(2)?;
        let len = match selector {
            SELECTOR_ONE_BYTE => 1,
            SELECTOR_TWO_BYTES => 2,
            _ => CHUNK_BYTES,
        };
        bytes.extend_from_slice(reader.read_bytes(len)?);
        if selector != SELECTOR_CONTINUE {
            return Ok(bytes);
        }
    }
}

/// Writes an unsigned count or length.
pub fn write_count(writer: &mut BitWriter, value: u64) {
    write_magnitude_le(writer, &value.to_le_bytes());
}

/// Reads an unsigned count or length that must fit in a `u64`.
pub fn read_count(reader: &mut BitReader<'_>) -> Result<u64> {
    let bytes = read_magnitude_le(reader)?;
    if bytes.iter().skip(8).any(|&b| b != 0) {
        return Err(Error::LengthOverflow);
    }
    let mut buf = [0u8; 8];
    let len = bytes.len().min(8);
    buf[..len].copy_from_slice(&bytes[..len]);
    Ok(u64::from_le_bytes(buf))
}

/// Writes an arbitrary-precision unsigned magnitude.
pub fn write_unsigned(writer: &mut BitWriter, value: &BigUint) {
    write_magnitude_le(writer, &value.to_bytes_le());
}

/// Reads an arbitrary-precision unsigned magnitude.
pub fn read_unsigned(reader: &mut BitReader<'_>) -> Result<BigUint> {
    Ok(BigUint::from_bytes_le(&read_magnitude_le(reader)?))
}

/// Writes a sign bit (1 = negative) followed by the magnitude.
///
/// Zero always carries a clear sign bit.
pub fn write_signed(writer: &mut BitWriter, value: &BigInt) {
    writer.write_bit(value.sign() == Sign::Minus);
    write_unsigned(writer, value.magnitude());
}

/// Reads a value written by [`write_signed`]. A negative zero reads as zero.
pub fn read_signed(reader: &mut BitReader<'_>) -> Result<BigInt> {
    let negative = reader.read_bit()?;
    let magnitude = read_unsigned(reader)?;
    let sign = if negative { Sign::Minus } else { Sign::Plus };
    Ok(BigInt::from_biguint(sign, magnitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip_count(value: u64) -> (u64, Vec<u8>) {
        let mut w = BitWriter::new();
        write_count(&mut w, value);
        let data = w.finish();
        let mut r = BitReader::new(&data);
        let back = read_count(&mut r).unwrap();
        assert_eq!(r.remaining(), 0);
        (back, data)
    }

    #[test]
    fn test_selector_boundaries() {
        // (value, expected encoded length including the selector byte)
        let cases = [
            (0u64, 2usize),
            (255, 2),
            (256, 3),
            (65_535, 3),
            (65_536, 4),
            (16_777_215, 4),
            (16_777_216, 5),
            (16_777_217, 5),
        ];
        for (value, len) in cases {
            let (back, data) = round_trip_count(value);
            assert_eq!(back, value);
            assert_eq!(data.len(), len, "encoded length of {value}");
        }
    }

    #[test]
    fn test_selector_bits() {
        let (_, data) = round_trip_count(255);
        assert_eq!(data, vec![0b00, 0xFF]);
        let (_, data) = round_trip_count(256);
        assert_eq!(data, vec![0b01, 0x00, 0x01]);
        let (_, data) = round_trip_count(65_536);
        assert_eq!(data, vec![0b10, 0x00, 0x00, 0x01]);
        let (_, data) = round_trip_count(16_777_217);
        // continue (11) then one byte (00)
        assert_eq!(data, vec![0b0011, 0x01, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_multi_chunk_counts() {
        for value in [1u64 << 48, u64::MAX, (1u64 << 56) + 7] {
            assert_eq!(round_trip_count(value).0, value);
        }
    }

    #[test]
    fn test_count_overflow() {
        let big = BigUint::from(u64::MAX) * BigUint::from(1_000u32);
        let mut w = BitWriter::new();
        write_unsigned(&mut w, &big);
        let data = w.finish();
        let mut r = BitReader::new(&data);
        assert_eq!(read_count(&mut r), Err(Error::LengthOverflow));
    }

    #[test]
    fn test_big_magnitudes() {
        let value: BigUint = "123456789012345678901234567890123456789".parse().unwrap();
        let mut w = BitWriter::new();
        write_unsigned(&mut w, &value);
        let data = w.finish();
        let mut r = BitReader::new(&data);
        assert_eq!(read_unsigned(&mut r).unwrap(), value);
    }

    #[test]
    fn test_signed() {
        for value in [0i64, 1, -1, 255, -256, i64::MIN, i64::MAX] {
            let value = BigInt::from(value);
            let mut w = BitWriter::new();
            write_signed(&mut w, &value);
            let data = w.finish();
            let mut r = BitReader::new(&data);
            assert_eq!(read_signed(&mut r).unwrap(), value);
        }
    }

    #[test]
    fn test_zero_has_clear_sign_bit() {
        let mut w = BitWriter::new();
        write_signed(&mut w, &BigInt::from(0));
        assert_eq!(w.finish(), vec![0b000, 0]);
    }

    #[test]
    fn test_negative_zero_reads_as_zero() {
        // sign bit set, selector 0, payload 0
        let data = [0b001u8, 0];
        let mut r = BitReader::new(&data);
        assert_eq!(read_signed(&mut r).unwrap(), BigInt::from(0));
    }

    #[test]
    fn test_type_tag_single_chunk() {
        for code in 0..7u64 {
            let mut w = BitWriter::new();
            VariableWidth::TYPE_TAG.write(&mut w, code);
            let data = w.finish();
            assert_eq!(data, vec![code as u8]);
            let mut r = BitReader::new(&data);
            assert_eq!(VariableWidth::TYPE_TAG.read(&mut r).unwrap(), code);
        }
    }

    #[test]
    fn test_type_tag_continuation() {
        for code in 7..=10u64 {
            let mut w = BitWriter::new();
            VariableWidth::TYPE_TAG.write(&mut w, code);
            let data = w.finish();
            // sentinel 0b111 followed by the remainder in the next 3 bits
            assert_eq!(data, vec![(((code - 7) << 3) | 0b111) as u8]);
            let mut r = BitReader::new(&data);
            assert_eq!(VariableWidth::TYPE_TAG.read(&mut r).unwrap(), code);
        }
    }

    #[test]
    fn test_growing_width() {
        let layout = VariableWidth::new(2, 3);
        for value in [0u64, 2, 3, 4, 34, 35, 1_000_000] {
            let mut w = BitWriter::new();
            layout.write(&mut w, value);
            let data = w.finish();
            let mut r = BitReader::new(&data);
            assert_eq!(layout.read(&mut r).unwrap(), value);
        }
    }

    #[test]
    fn test_truncated_magnitude() {
        // selector asks for two payload bytes, only one present
        let data = [0b01u8, 0xAA];
        let mut r = BitReader::new(&data);
        assert!(matches!(
            read_count(&mut r),
            Err(Error::UnexpectedEof { .. })
        ));
    }
}
