use super::BitReader;
use crate::error::DecodeError;

/// Kanji mode decoder (Mode 1000)
///
/// Each character is 13 bits: the Shift-JIS code minus 0x8140 (or 0xC140),
/// with the high byte multiplied by 0xC0 and added to the low byte.
pub struct KanjiDecoder;

impl KanjiDecoder {
    /// Decode to Shift-JIS bytes, two per character
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Result<Vec<u8>, DecodeError> {
        let mut sjis = Vec::with_capacity(character_count * 2);
        for _ in 0..character_count {
            let value = reader.read_bits(13)?;
            let packed = ((value / 0xC0) << 8) | (value % 0xC0);
            let code = if packed < 0x1F00 {
                packed + 0x8140
            } else {
                packed + 0xC140
            };
            sjis.push((code >> 8) as u8);
            sjis.push(code as u8);
        }
        Ok(sjis)
    }
}
