//! qr_reader - QR code locator and decoder for 8-bit grayscale images
//!
//! The pipeline binarizes with per-cell adaptive thresholds, labels
//! connected regions, picks out finder patterns by their ring-and-stone
//! shape, groups them into symbol candidates, unprojects each candidate's
//! module grid and decodes it with Reed-Solomon correction.
//!
//! ```
//! // A blank frame holds no symbols
//! let pixels = vec![255u8; 64 * 64];
//! let results = qr_reader::decode(64, 64, &pixels).unwrap();
//! assert!(results.is_empty());
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Pipeline tunables
pub mod config;
/// QR code decoding modules (error correction, format extraction, data modes)
pub mod decoder;
/// QR code detection modules (regions, finder patterns, grid sampling)
pub mod detector;
/// Call-fatal and per-candidate error types
pub mod error;
/// Core data structures (GrayscaleImage, BitMatrix, DecodedSymbol, etc.)
pub mod models;
mod pipeline;
/// Helpers for the command-line tool and benchmarks
pub mod tools;
/// Utility functions (binarization, geometry)
pub mod utils;

pub use config::DecoderConfig;
pub use detector::finder::{FinderCandidate, FinderPattern};
pub use error::{DecodeError, Error, Result};
pub use models::{
    BitMatrix, DataType, DecodedSymbol, ECLevel, GrayscaleImage, MaskPattern, Point,
    StructuredAppend, SymbolGrid, Version,
};

use rayon::prelude::*;

/// Outcome for one symbol candidate
pub type DecodeResult = std::result::Result<DecodedSymbol, DecodeError>;

/// Decode every symbol in a `width` x `height` grayscale buffer with the
/// default configuration.
///
/// Fails only when the buffer length does not match the dimensions or a
/// dimension is zero. Candidates that are found but cannot be decoded show
/// up as `Err` entries.
pub fn decode(width: u32, height: u32, pixels: &[u8]) -> Result<Vec<DecodeResult>> {
    Decoder::default().decode_raw(width, height, pixels)
}

/// Configured decoder
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder with the given configuration
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode all symbol candidates in an image, in detection order
    pub fn decode(&self, image: &GrayscaleImage) -> Vec<DecodeResult> {
        pipeline::decode_image(image, &self.config)
    }

    /// Validate a raw buffer and decode it
    pub fn decode_raw(&self, width: u32, height: u32, pixels: &[u8]) -> Result<Vec<DecodeResult>> {
        let image = GrayscaleImage::from_slice(width as usize, height as usize, pixels)?;
        Ok(self.decode(&image))
    }

    /// Decode independent images in parallel; output order follows input
    pub fn decode_batch(&self, images: &[GrayscaleImage]) -> Vec<Vec<DecodeResult>> {
        images.par_iter().map(|image| self.decode(image)).collect()
    }

    /// Detection only: finder triples in detection order
    pub fn locate(&self, image: &GrayscaleImage) -> Vec<FinderCandidate> {
        pipeline::locate(image, &self.config).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_bad_dimensions() {
        assert_eq!(
            decode(4, 4, &[0u8; 15]),
            Err(Error::InvalidDimensions {
                width: 4,
                height: 4,
                len: 15
            })
        );
        assert!(matches!(
            decode(0, 4, &[]),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_decode_blank_images() {
        assert_eq!(decode(32, 32, &[255u8; 32 * 32]), Ok(Vec::new()));
        assert_eq!(decode(32, 32, &[0u8; 32 * 32]), Ok(Vec::new()));
    }

    #[test]
    fn test_batch_preserves_order() {
        let decoder = Decoder::default();
        let images: Vec<GrayscaleImage> = (1..=3)
            .map(|n| GrayscaleImage::new(8 * n, 8, vec![200; 64 * n]).unwrap())
            .collect();
        let results = decoder.decode_batch(&images);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_empty()));
    }
}
