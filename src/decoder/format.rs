/// Format information extraction from QR code
use crate::decoder::bch::BchDecoder;
use crate::models::{BitMatrix, ECLevel, MaskPattern};
use tracing::trace;

/// Format info is 15 bits (5 data + 10 ECC), stored twice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Error correction level
    pub ec_level: ECLevel,
    /// Data mask applied to the symbol
    pub mask_pattern: MaskPattern,
}

impl FormatInfo {
    /// Extract format info from a sampled module grid.
    ///
    /// Both copies are read; the one closest to a valid codeword wins.
    pub fn extract(matrix: &BitMatrix) -> Option<Self> {
        let size = matrix.width();
        if size < 21 {
            return None;
        }

        let copies = [Self::read_top_left(matrix), Self::read_split(matrix)];
        let (data, distance) = copies
            .iter()
            .filter_map(|&bits| BchDecoder::decode_format(bits))
            .min_by_key(|&(_, distance)| distance)?;
        trace!(
            copy_a = copies[0],
            copy_b = copies[1],
            corrected_bits = distance,
            "format info decoded"
        );

        Some(Self::from_data(data))
    }

    /// 5 data bits: EC level (2) then mask (3)
    pub fn from_data(data: u8) -> Self {
        Self {
            ec_level: ECLevel::from_format_bits(data >> 3),
            mask_pattern: MaskPattern::from_bits(data),
        }
    }

    /// Copy wrapped around the top-left finder. Bit i (LSB first) runs down
    /// column 8 then leftwards along row 8.
    fn read_top_left(matrix: &BitMatrix) -> u16 {
        let mut bits = 0u16;
        for (i, (x, y)) in Self::top_left_positions().enumerate() {
            bits |= (matrix.get(x, y) as u16) << i;
        }
        bits
    }

    /// Copy split between the top-right (bits 0-7) and bottom-left
    /// (bits 8-14) finders.
    fn read_split(matrix: &BitMatrix) -> u16 {
        let size = matrix.width();
        let mut bits = 0u16;
        for i in 0..8 {
            bits |= (matrix.get(size - 1 - i, 8) as u16) << i;
        }
        for i in 8..15 {
            bits |= (matrix.get(8, size - 15 + i) as u16) << i;
        }
        bits
    }

    fn top_left_positions() -> impl Iterator<Item = (usize, usize)> {
        (0..6)
            .map(|i| (8, i))
            .chain([(8, 7), (8, 8), (7, 8)])
            .chain((9..15).map(|i| (14 - i, 8)))
    }
}
