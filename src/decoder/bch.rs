/// BCH error correction for QR code format and version info.
///
/// Both codes are short enough that decoding is a nearest-codeword search
/// over every valid codeword.
pub struct BchDecoder;

/// BCH(15,5) generator: x^10 + x^8 + x^5 + x^4 + x^2 + x + 1
const FORMAT_GENERATOR: u32 = 0x537;
/// XOR mask applied to stored format codewords
const FORMAT_MASK: u16 = 0x5412;
/// BCH(18,6) generator: x^12 + x^11 + x^10 + x^9 + x^8 + x^5 + x^2 + 1
const VERSION_GENERATOR: u32 = 0x1F25;
/// Both codes correct up to three bit errors
const MAX_BIT_ERRORS: u32 = 3;

impl BchDecoder {
    /// Stored (masked) format codeword for 5 data bits
    pub fn encode_format(data: u8) -> u16 {
        let data = (data & 0x1F) as u32;
        let codeword = (data << 10) | remainder(data, FORMAT_GENERATOR, 10);
        codeword as u16 ^ FORMAT_MASK
    }

    /// Version codeword for versions 7-40
    pub fn encode_version(version: u8) -> u32 {
        let data = version as u32 & 0x3F;
        (data << 12) | remainder(data, VERSION_GENERATOR, 12)
    }

    /// Decode a stored format codeword to its 5 data bits.
    ///
    /// Returns the data and the number of corrected bits.
    pub fn decode_format(format: u16) -> Option<(u8, u32)> {
        (0u8..32)
            .map(|data| (data, (Self::encode_format(data) ^ format).count_ones()))
            .min_by_key(|&(_, distance)| distance)
            .filter(|&(_, distance)| distance <= MAX_BIT_ERRORS)
    }

    /// Decode an 18-bit version codeword.
    ///
    /// Returns the version and the number of corrected bits.
    pub fn decode_version(bits: u32) -> Option<(u8, u32)> {
        (7u8..=40)
            .map(|v| (v, (Self::encode_version(v) ^ bits).count_ones()))
            .min_by_key(|&(_, distance)| distance)
            .filter(|&(_, distance)| distance <= MAX_BIT_ERRORS)
    }
}

/// Remainder of `data * x^degree` divided by `generator`
fn remainder(data: u32, generator: u32, degree: u32) -> u32 {
    let mut rem = data;
    for _ in 0..degree {
        rem = (rem << 1) ^ (((rem >> (degree - 1)) & 1) * generator);
    }
    rem & ((1 << degree) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codewords() {
        // ISO 18004 Annex C: EC level M (00), mask 0 -> 101010000010010
        assert_eq!(BchDecoder::encode_format(0b00000), 0b101010000010010);
        // EC level L (01), mask 0 -> 111011111000100
        assert_eq!(BchDecoder::encode_format(0b01000), 0b111011111000100);
        // Version 7 -> 000111110010010100
        assert_eq!(BchDecoder::encode_version(7), 0b000111110010010100);
        assert_eq!(BchDecoder::encode_version(40), 0b101000110001101001);
    }

    #[test]
    fn test_format_decode_with_errors() {
        let clean = BchDecoder::encode_format(0b10110);
        assert_eq!(BchDecoder::decode_format(clean), Some((0b10110, 0)));

        let damaged = clean ^ 0b100_0000_0100_0001;
        assert_eq!(BchDecoder::decode_format(damaged), Some((0b10110, 3)));
    }

    #[test]
    fn test_format_decode_rejects_noise() {
        // Four flipped bits are beyond the guaranteed correction radius; the
        // code's minimum distance is 7 so no codeword lies within 3.
        let clean = BchDecoder::encode_format(0b00011);
        let damaged = clean ^ 0b000_0000_0000_1111;
        match BchDecoder::decode_format(damaged) {
            None => {}
            Some((data, distance)) => {
                assert_ne!(data, 0b00011);
                assert!(distance <= 3);
            }
        }
    }

    #[test]
    fn test_version_decode() {
        for v in 7..=40u8 {
            let code = BchDecoder::encode_version(v);
            assert_eq!(BchDecoder::decode_version(code), Some((v, 0)));
            assert_eq!(BchDecoder::decode_version(code ^ 0b101), Some((v, 2)));
        }
        assert_eq!(BchDecoder::decode_version(0), None);
    }
}
