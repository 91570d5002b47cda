//! Image loading and diagnostics shared by `qrtool` and the benchmarks

use crate::config::DecoderConfig;
use crate::error;
use crate::models::{BitMatrix, GrayscaleImage};
use crate::utils::binarization::adaptive_binarize;
use image::GenericImageView;
use std::env;
use std::path::Path;
use thiserror::Error;

/// Failure to turn a file into a [`GrayscaleImage`]
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read or decoded
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    /// The decoded image has unusable dimensions
    #[error(transparent)]
    Dimensions(#[from] error::Error),
}

fn max_dim_from_env() -> Option<u32> {
    match env::var("QR_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Load any image format and convert it to 8-bit luma.
///
/// When `QR_MAX_DIM` is set, images with a longer side are downscaled first.
pub fn load_gray<P: AsRef<Path>>(path: P) -> Result<GrayscaleImage, LoadError> {
    let img = image::open(path)?;
    let img = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => {
            img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
        }
        _ => img,
    };
    let luma = img.to_luma8();
    let (width, height) = luma.dimensions();
    Ok(GrayscaleImage::new(
        width as usize,
        height as usize,
        luma.into_raw(),
    )?)
}

/// Grayscale summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayStats {
    /// Darkest sample
    pub min: u8,
    /// Brightest sample
    pub max: u8,
    /// Mean sample
    pub avg: u8,
}

/// Binary bitmap summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryStats {
    /// Foreground pixels
    pub black_pixels: usize,
    /// All pixels
    pub total_pixels: usize,
    /// Foreground share
    pub black_ratio: f64,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(image: &GrayscaleImage) -> GrayStats {
    let gray = image.as_slice();
    let (min, max, sum) = gray.iter().fold((u8::MAX, u8::MIN, 0u64), |(lo, hi, sum), &v| {
        (lo.min(v), hi.max(v), sum + v as u64)
    });
    GrayStats {
        min,
        max,
        avg: (sum / gray.len() as u64) as u8,
    }
}

/// Compute foreground stats for a binary matrix.
pub fn binary_stats(binary: &BitMatrix) -> BinaryStats {
    let black = binary.count_ones();
    let total = binary.width() * binary.height();
    let ratio = if total == 0 {
        0.0
    } else {
        black as f64 / total as f64
    };
    BinaryStats {
        black_pixels: black,
        total_pixels: total,
        black_ratio: ratio,
    }
}

/// Binarize with the same policy as decoding
pub fn binarize(image: &GrayscaleImage, config: &DecoderConfig) -> BitMatrix {
    adaptive_binarize(image, config.cell_size, config.contrast_floor)
}

/// Payload as text for display; invalid UTF-8 is replaced
pub fn payload_text(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats() {
        let image = GrayscaleImage::new(4, 1, vec![10, 20, 30, 40]).unwrap();
        assert_eq!(
            grayscale_stats(&image),
            GrayStats {
                min: 10,
                max: 40,
                avg: 25
            }
        );

        let mut bitmap = BitMatrix::new(4, 2);
        bitmap.set(1, 1, true);
        bitmap.set(3, 0, true);
        let stats = binary_stats(&bitmap);
        assert_eq!(stats.black_pixels, 2);
        assert_eq!(stats.total_pixels, 8);
        assert!((stats.black_ratio - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_gray("/nonexistent/qr_reader/missing.png").unwrap_err();
        assert!(matches!(err, LoadError::Image(_)));
    }

    #[test]
    fn test_payload_text_is_lossy() {
        assert_eq!(payload_text(b"abc"), "abc");
        assert_eq!(payload_text(&[0x61, 0xFF]), "a\u{FFFD}");
    }
}
