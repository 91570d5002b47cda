use super::BitReader;
use crate::error::DecodeError;

/// Numeric mode decoder (Mode 0001)
/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
pub struct NumericDecoder;

impl NumericDecoder {
    /// Decode `character_count` digits as ASCII
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Result<Vec<u8>, DecodeError> {
        let mut result = Vec::with_capacity(character_count);
        let mut chars_remaining = character_count;

        while chars_remaining > 0 {
            let group_size = chars_remaining.min(3);
            let (bits_needed, limit) = match group_size {
                3 => (10, 1000),
                2 => (7, 100),
                _ => (4, 10),
            };

            let value = reader.read_bits(bits_needed)?;
            if value >= limit {
                return Err(DecodeError::malformed(format!(
                    "numeric group {value} has more than {group_size} digits"
                )));
            }

            let digits = format!("{:0width$}", value, width = group_size);
            result.extend_from_slice(digits.as_bytes());
            chars_remaining -= group_size;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::modes::reader_from_bits;

    #[test]
    fn test_numeric_decode() {
        // 012 -> 0000001100, 345 -> 0101011001
        let data = reader_from_bits("0000001100 0101011001");
        let mut reader = BitReader::new(&data);
        assert_eq!(NumericDecoder::decode(&mut reader, 6).unwrap(), b"012345");
    }

    #[test]
    fn test_numeric_short_tail_groups() {
        // 012 -> 0000001100, 34 -> 0100010
        let data = reader_from_bits("0000001100 0100010");
        let mut reader = BitReader::new(&data);
        assert_eq!(NumericDecoder::decode(&mut reader, 5).unwrap(), b"01234");

        // 987 -> 1111011011, 6 -> 0110
        let data = reader_from_bits("1111011011 0110");
        let mut reader = BitReader::new(&data);
        assert_eq!(NumericDecoder::decode(&mut reader, 4).unwrap(), b"9876");
    }

    #[test]
    fn test_numeric_rejects_overflow() {
        // 1017 does not fit in three digits
        let data = reader_from_bits("1111111001");
        let mut reader = BitReader::new(&data);
        assert!(matches!(
            NumericDecoder::decode(&mut reader, 3),
            Err(DecodeError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_numeric_truncated() {
        let data = reader_from_bits("0000001");
        let mut reader = BitReader::new(&data);
        assert!(NumericDecoder::decode(&mut reader, 3).is_err());
    }
}
