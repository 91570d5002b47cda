/// Version information extraction for QR codes v7+
use crate::decoder::bch::BchDecoder;
use crate::models::{BitMatrix, Version};
use tracing::trace;

/// Version info is 18 bits (6 data + 12 ECC) for versions 7-40, stored in a
/// 6x3 block beside the top-right finder and its transpose beside the
/// bottom-left finder.
pub struct VersionInfo;

impl VersionInfo {
    /// Read the version encoded in a sampled grid.
    ///
    /// Returns `None` for grids too small to carry version info or when
    /// neither copy is within correction range.
    pub fn extract(matrix: &BitMatrix) -> Option<Version> {
        let size = matrix.width();
        if size < 45 {
            return None;
        }

        let copies = [Self::read_top_right(matrix), Self::read_bottom_left(matrix)];
        let (version, distance) = copies
            .iter()
            .filter_map(|&bits| BchDecoder::decode_version(bits))
            .min_by_key(|&(_, distance)| distance)?;
        trace!(version, corrected_bits = distance, "version info decoded");

        Version::new(version)
    }

    /// Bit i (LSB first) at column size-11+i%3, row i/3
    fn read_top_right(matrix: &BitMatrix) -> u32 {
        let size = matrix.width();
        (0..18).fold(0u32, |bits, i| {
            bits | (matrix.get(size - 11 + i % 3, i / 3) as u32) << i
        })
    }

    /// Transposed copy: bit i at column i/3, row size-11+i%3
    fn read_bottom_left(matrix: &BitMatrix) -> u32 {
        let size = matrix.width();
        (0..18).fold(0u32, |bits, i| {
            bits | (matrix.get(i / 3, size - 11 + i % 3) as u32) << i
        })
    }
}

#[cfg(test)]
pub(crate) fn write_version_info(matrix: &mut BitMatrix, version: u8) {
    let size = matrix.width();
    let bits = BchDecoder::encode_version(version);
    for i in 0..18 {
        let bit = (bits >> i) & 1 == 1;
        matrix.set(size - 11 + i % 3, i / 3, bit);
        matrix.set(i / 3, size - 11 + i % 3, bit);
    }
}
