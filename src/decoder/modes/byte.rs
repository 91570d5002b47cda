use super::BitReader;
use crate::error::DecodeError;

/// Byte mode decoder (Mode 0100) for 8-bit data
pub struct ByteDecoder;

impl ByteDecoder {
    /// Raw bytes; no character set is assumed
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Result<Vec<u8>, DecodeError> {
        (0..character_count)
            .map(|_| reader.read_bits(8).map(|b| b as u8))
            .collect()
    }
}
