//! Tunables for every pipeline stage
//!
//! Defaults suit printed or screen-captured symbols with a quiet zone.
//! [`DecoderConfig::from_env`] overlays `QR_*` environment variables, which
//! is how the CLI and benchmarks are tuned without recompiling.

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    /// Side of a binarizer cell in pixels
    pub cell_size: usize,
    /// Minimum (max - min) luminance for a cell to set its own threshold
    pub contrast_floor: u8,
    /// Regions with fewer pixels are discarded as noise
    pub min_region_pixels: usize,
    /// Accepted width/height ratio band of a finder ring's bounding box
    pub aspect_range: (f32, f32),
    /// Accepted pixels/bbox-area band of a finder ring
    pub ring_fill_range: (f32, f32),
    /// Accepted stone/ring pixel-count band
    pub stone_ratio_range: (f32, f32),
    /// Largest module-size ratio between finders of one symbol
    pub max_module_ratio: f32,
    /// Leg and hypotenuse tolerance relative to the longest leg
    pub side_tolerance: f32,
    /// Upper bound on finder patterns considered per image
    pub max_finder_patterns: usize,
    /// Retry a failed grid as its mirror image
    pub try_mirrored: bool,
    /// Decode candidates of one image on the rayon pool
    pub parallel_candidates: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            cell_size: 8,
            contrast_floor: 24,
            min_region_pixels: 8,
            aspect_range: (0.7, 1.4),
            ring_fill_range: (0.2, 0.75),
            stone_ratio_range: (0.2, 0.75),
            max_module_ratio: 1.5,
            side_tolerance: 0.2,
            max_finder_patterns: 64,
            try_mirrored: true,
            parallel_candidates: false,
        }
    }
}

impl DecoderConfig {
    /// Defaults overlaid with `QR_*` environment variables.
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cell_size: parse_env_usize("QR_CELL_SIZE", defaults.cell_size).clamp(2, 256),
            contrast_floor: parse_env_u8("QR_CONTRAST_FLOOR", defaults.contrast_floor),
            min_region_pixels: parse_env_usize("QR_MIN_REGION_PIXELS", defaults.min_region_pixels),
            max_finder_patterns: parse_env_usize("QR_MAX_FINDERS", defaults.max_finder_patterns)
                .clamp(3, 1024),
            try_mirrored: parse_env_bool_u8("QR_TRY_MIRRORED", defaults.try_mirrored),
            parallel_candidates: parse_env_bool_u8(
                "QR_PARALLEL_CANDIDATES",
                defaults.parallel_candidates,
            ),
            ..defaults
        }
    }
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_u8(name: &str, default: u8) -> u8 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}
