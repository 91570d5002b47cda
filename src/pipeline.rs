//! Per-image pipeline: binarize, label, find, group, then sample and decode
//! every candidate behind its own failure boundary.

use crate::DecodeResult;
use crate::config::DecoderConfig;
use crate::decoder::qr_decoder::QrDecoder;
use crate::detector::connected_components::LabelMap;
use crate::detector::finder::{FinderCandidate, FinderDetector};
use crate::detector::transform::GridSampler;
use crate::models::{BitMatrix, GrayscaleImage};
use crate::utils::binarization::adaptive_binarize;
use rayon::prelude::*;
use tracing::{debug, trace};

/// Run detection only. Returns the binary bitmap alongside the candidates
/// so sampling can reuse it.
pub(crate) fn locate(
    image: &GrayscaleImage,
    config: &DecoderConfig,
) -> (BitMatrix, Vec<FinderCandidate>) {
    let bitmap = adaptive_binarize(image, config.cell_size, config.contrast_floor);
    let map = LabelMap::build(&bitmap, config.min_region_pixels);
    let finders = FinderDetector::detect(&map, config);
    let candidates = FinderDetector::group(&finders, config);
    debug!(
        width = image.width(),
        height = image.height(),
        regions = map.regions().len(),
        finders = finders.len(),
        candidates = candidates.len(),
        "located symbol candidates"
    );
    (bitmap, candidates)
}

/// Full decode of one image, one result per candidate in detection order
pub(crate) fn decode_image(image: &GrayscaleImage, config: &DecoderConfig) -> Vec<DecodeResult> {
    let (bitmap, candidates) = locate(image, config);
    if config.parallel_candidates {
        candidates
            .par_iter()
            .map(|candidate| decode_candidate(&bitmap, candidate, config))
            .collect()
    } else {
        candidates
            .iter()
            .map(|candidate| decode_candidate(&bitmap, candidate, config))
            .collect()
    }
}

fn decode_candidate(
    bitmap: &BitMatrix,
    candidate: &FinderCandidate,
    config: &DecoderConfig,
) -> DecodeResult {
    let result = GridSampler::sample(bitmap, candidate)
        .and_then(|grid| QrDecoder::decode(&grid, config.try_mirrored));

    let origin = candidate.top_left.center;
    match &result {
        Ok(symbol) => trace!(
            x = origin.x,
            y = origin.y,
            version = symbol.version.number(),
            bytes = symbol.payload.len(),
            mirrored = symbol.mirrored,
            "decoded symbol"
        ),
        Err(err) => debug!(x = origin.x, y = origin.y, error = %err, "candidate failed"),
    }
    result
}
