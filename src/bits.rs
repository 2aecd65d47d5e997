//! Bit-addressable cursor over a byte buffer.
//!
//! Bits are packed LSB first. The first sub-byte write reserves a byte at the
//! current end of the buffer; later bit writes fill that reserved byte from
//! bit 0 upward while whole bytes (raw payloads, doubles) keep being appended
//! behind it. Once the reserved byte holds 8 bits the next bit write reserves
//! a fresh byte at the then-current end.
//!
//! The reader mirrors this exactly: a one-byte lookahead is refilled from the
//! stream only when its bits are exhausted, and byte reads always come from
//! the stream position, never from the lookahead.
//!
//! ```rust
//! use serde_bof::bits::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(3, 0b101);
//! writer.write_byte(0xAB);
//! writer.write_bits(2, 0b11);
//! let data = writer.finish();
//! assert_eq!(data, vec![0b0001_1101, 0xAB]);
//!
//! let mut reader = BitReader::new(&data);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_byte().unwrap(), 0xAB);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b11);
//! ```

use crate::{Error, Result};

/// Writes bit fields and byte-aligned payloads into a growable buffer.
#[derive(Debug, Default)]
pub struct BitWriter {
    buf: Vec<u8>,
    /// Index of the reserved partial byte; meaningful while `pending_bits > 0`.
    reserved: usize,
    /// Bits already placed in the reserved byte (0..=7).
    pending_bits: u8,
}

impl BitWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        BitWriter {
            buf: Vec::with_capacity(capacity),
            reserved: 0,
            pending_bits: 0,
        }
    }

    /// Emits the low `width` bits of `value`, least significant bit first.
    ///
    /// Every width goes through the partial-byte accumulator, so a wide field
    /// written while bits are pending stays bit-contiguous.
    pub fn write_bits(&mut self, width: u32, value: u64) {
        debug_assert!(width <= 64, "bit width must be 0..=64, got {width}");
        let mut value = value;
        let mut remaining = width;
        while remaining > 0 {
            if self.pending_bits == 0 {
                self.reserved = self.buf.len();
                self.buf.push(0);
            }
            let room = 8 - u32::from(self.pending_bits);
            let take = remaining.min(room);
            let chunk = (value & ((1u64 << take) - 1)) as u8;
            self.buf[self.reserved] |= chunk << self.pending_bits;
            self.pending_bits += take as u8;
            if self.pending_bits == 8 {
                self.pending_bits = 0;
            }
            value >>= take;
            remaining -= take;
        }
    }

    /// Emits a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(1, u64::from(bit));
    }

    /// Appends one whole byte at the end of the buffer.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Appends raw bytes at the end of the buffer.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Number of bytes written so far, including a reserved partial byte.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Closes the pending partial byte. Its unused high bits stay zero.
    ///
    /// The next bit write starts a new byte.
    pub fn finalize(&mut self) {
        self.pending_bits = 0;
    }

    /// Finalizes and returns the encoded bytes.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.finalize();
        self.buf
    }
}

/// Reads bit fields and byte-aligned payloads from a borrowed buffer.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
    /// Lookahead byte the next bit fields are drawn from.
    bits: u8,
    /// Unread bits left in `bits` (0..=8).
    bits_left: u8,
}

impl<'a> BitReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        BitReader {
            data,
            position: 0,
            bits: 0,
            bits_left: 0,
        }
    }

    /// Reads `width` bits written by [`BitWriter::write_bits`].
    pub fn read_bits(&mut self, width: u32) -> Result<u64> {
        debug_assert!(width <= 64, "bit width must be 0..=64, got {width}");
        let mut value = 0u64;
        let mut filled = 0u32;
        while filled < width {
            if self.bits_left == 0 {
                self.bits = self.read_byte()?;
                self.bits_left = 8;
            }
            let take = (width - filled).min(u32::from(self.bits_left));
            let shift = 8 - self.bits_left;
            let mask = ((1u16 << take) - 1) as u8;
            let chunk = (self.bits >> shift) & mask;
            value |= u64::from(chunk) << filled;
            filled += take;
            self.bits_left -= take as u8;
        }
        Ok(value)
    }

    /// Reads a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Reads one whole byte from the stream position.
    #[inline]
    pub fn read_byte(&mut self) -> Result<u8> {
        match self.data.get(self.position) {
            Some(&byte) => {
                self.position += 1;
                Ok(byte)
            }
            None => Err(Error::eof(self.position, 1)),
        }
    }

    /// Reads `len` raw bytes from the stream position.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(Error::eof(self.position, len - available));
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Reads exactly `N` raw bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Byte offset of the next whole byte to be consumed.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes not yet consumed from the stream.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }
}
