/// Bitstream extraction from QR code matrix
use crate::decoder::function_mask::FunctionMask;
use crate::models::BitMatrix;

/// Extract raw bitstream from QR code matrix following zigzag pattern
pub struct BitstreamExtractor;

impl BitstreamExtractor {
    /// Data modules in reading order.
    ///
    /// Column pairs are walked right to left starting at the last column,
    /// upward first and alternating direction, with column 6 (vertical
    /// timing) skipped. Within a row the right column of the pair comes
    /// first.
    pub fn positions(func: &FunctionMask) -> Vec<(usize, usize)> {
        let size = func.size();
        let mut positions = Vec::with_capacity(func.data_modules_count());

        let mut upward = true;
        let mut right = size as isize - 1;
        while right > 0 {
            if right == 6 {
                right -= 1;
            }
            let right_col = right as usize;
            for step in 0..size {
                let y = if upward { size - 1 - step } else { step };
                for x in [right_col, right_col - 1] {
                    if !func.is_function(x, y) {
                        positions.push((x, y));
                    }
                }
            }
            upward = !upward;
            right -= 2;
        }

        positions
    }

    /// Pack the data modules into codewords, MSB first.
    ///
    /// Trailing remainder bits that do not fill a byte are dropped.
    pub fn codewords(matrix: &BitMatrix, func: &FunctionMask) -> Vec<u8> {
        Self::positions(func)
            .chunks_exact(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .fold(0u8, |byte, &(x, y)| (byte << 1) | matrix.get(x, y) as u8)
            })
            .collect()
    }
}
