//! QR code data mode decoders
//!
//! This module contains decoders for different QR data modes:
//! - Numeric: Efficient encoding for digits (0-9)
//! - Alphanumeric: Letters, numbers, and symbols
//! - Byte: 8-bit data (UTF-8, binary, etc.)
//! - Kanji: 13-bit packed Shift-JIS characters

use crate::error::DecodeError;

/// Alphanumeric mode, 45-character set
pub mod alphanumeric;
/// Byte mode
pub mod byte;
/// Kanji mode, 13-bit Shift-JIS characters
pub mod kanji;
/// Numeric mode, digits in groups of three
pub mod numeric;

/// MSB-first reader over corrected data codewords
pub struct BitReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> BitReader<'a> {
    /// Reader positioned at the first bit of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bits not yet consumed
    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.offset
    }

    /// Read `n` bits (at most 32) as an unsigned value
    pub fn read_bits(&mut self, n: usize) -> Result<u32, DecodeError> {
        debug_assert!(n <= 32);
        if n > self.remaining() {
            return Err(DecodeError::malformed(format!(
                "needed {n} bits with {} left",
                self.remaining()
            )));
        }
        let mut value = 0u32;
        for _ in 0..n {
            let bit = (self.data[self.offset / 8] >> (7 - self.offset % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.offset += 1;
        }
        Ok(value)
    }
}

#[cfg(test)]
pub(crate) fn reader_from_bits(bits: &str) -> Vec<u8> {
    let bits: Vec<u8> = bits.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    bits.chunks(8)
        .map(|chunk| {
            let byte = chunk.iter().fold(0u8, |acc, &b| (acc << 1) | (b == b'1') as u8);
            byte << (8 - chunk.len())
        })
        .collect()
}
