//! Utility functions for image processing
//!
//! - Binarization (adaptive per-cell thresholding)
//! - Geometry (perspective transforms)

/// Grayscale to binary conversion
pub mod binarization;
/// Four-point perspective transforms
pub mod geometry;
