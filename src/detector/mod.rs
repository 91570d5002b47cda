//! QR code detection modules
//!
//! This module contains all the logic for locating QR codes in a binary
//! bitmap and pulling out their module grids:
//! - Connected region labeling
//! - Finder pattern detection (the three square markers) and grouping
//! - Alignment pattern search (for larger QR codes)
//! - Timing pattern scoring
//! - Perspective transform and grid sampling

/// Alignment pattern search for QR versions 2+
pub mod alignment;
/// Connected component labeling of foreground pixels
pub mod connected_components;
/// Finder pattern detection on ring-and-stone regions
pub mod finder;
/// Timing pattern scoring of module-to-image transforms
pub mod timing;
/// Version estimate, homography fit and grid sampling
pub mod transform;
