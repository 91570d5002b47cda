use super::BitReader;
use crate::error::DecodeError;

/// Alphanumeric mode decoder (Mode 0010)
/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
const ALPHANUMERIC_TABLE: [u8; 45] = *b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Decode alphanumeric data
/// Pairs = 11 bits, single = 6 bits
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    /// Decode `character_count` characters as ASCII
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Result<Vec<u8>, DecodeError> {
        let mut result = Vec::with_capacity(character_count);
        let mut chars_remaining = character_count;

        while chars_remaining >= 2 {
            let value = reader.read_bits(11)? as usize;
            if value >= 45 * 45 {
                return Err(DecodeError::malformed(format!(
                    "alphanumeric pair value {value} out of range"
                )));
            }
            result.push(ALPHANUMERIC_TABLE[value / 45]);
            result.push(ALPHANUMERIC_TABLE[value % 45]);
            chars_remaining -= 2;
        }

        if chars_remaining == 1 {
            let value = reader.read_bits(6)? as usize;
            let &ch = ALPHANUMERIC_TABLE.get(value).ok_or_else(|| {
                DecodeError::malformed(format!("alphanumeric value {value} out of range"))
            })?;
            result.push(ch);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::modes::reader_from_bits;

    #[test]
    fn test_alphanumeric_decode() {
        // "A1" = 10 * 45 + 1 = 451 = 00111000011
        let data = reader_from_bits("00111000011");
        let mut reader = BitReader::new(&data);
        assert_eq!(AlphanumericDecoder::decode(&mut reader, 2).unwrap(), b"A1");
    }

    #[test]
    fn test_alphanumeric_odd_count() {
        // "AC-42" = (10,12) (41,4) (2)
        let data = reader_from_bits("00111001110 11100111001 000010");
        let mut reader = BitReader::new(&data);
        assert_eq!(AlphanumericDecoder::decode(&mut reader, 5).unwrap(), b"AC-42");
    }

    #[test]
    fn test_alphanumeric_rejects_bad_values() {
        // 2047 >= 45 * 45
        let data = reader_from_bits("11111111111");
        let mut reader = BitReader::new(&data);
        assert!(AlphanumericDecoder::decode(&mut reader, 2).is_err());

        // 63 >= 45
        let data = reader_from_bits("111111");
        let mut reader = BitReader::new(&data);
        assert!(AlphanumericDecoder::decode(&mut reader, 1).is_err());
    }
}
