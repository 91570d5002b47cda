/// Finder pattern detection on labeled regions, and grouping of finder
/// triples into symbol candidates
use crate::config::DecoderConfig;
use crate::detector::connected_components::{LabelMap, Region};
use crate::models::Point;
use std::f32::consts::FRAC_1_SQRT_2;
use tracing::trace;

/// Ring fill of an undistorted finder: 24 of 49 bbox modules
const IDEAL_RING_FILL: f32 = 24.0 / 49.0;
/// Stone/ring pixel ratio of an undistorted finder
const IDEAL_STONE_RATIO: f32 = 9.0 / 24.0;
/// Module span between finder centres of a version 1 symbol
const MIN_FINDER_SPAN: f32 = 14.0;
/// Module span between finder centres of a version 40 symbol
const MAX_FINDER_SPAN: f32 = 170.0;

/// A finder pattern: the outer dark ring and the stone nested inside it
#[derive(Debug, Clone, PartialEq)]
pub struct FinderPattern {
    /// Centre in image coordinates
    pub center: Point,
    /// Estimated module size in pixels, from the ring's outer edges
    pub module_size: f32,
    /// Outer corners of the ring, clockwise on screen
    pub corners: [Point; 4],
    /// Label of the ring region
    pub ring_label: u32,
    /// Label of the stone region
    pub stone_label: u32,
}

/// Three finder patterns in their symbol roles
#[derive(Debug, Clone, PartialEq)]
pub struct FinderCandidate {
    /// Finder at the right-angle corner
    pub top_left: FinderPattern,
    /// Finder along the first row
    pub top_right: FinderPattern,
    /// Finder along the first column
    pub bottom_left: FinderPattern,
    /// Mean module size of the three finders
    pub module_size: f32,
    /// Geometric residual of the triple, in modules
    pub residual: f32,
}

/// Finder pattern detection and grouping
pub struct FinderDetector;

impl FinderDetector {
    /// Find all finder patterns among the labeled regions, in scan order
    ///
    /// Past `max_finder_patterns`, the patterns whose shape is furthest from
    /// an ideal finder are dropped first.
    pub fn detect(map: &LabelMap, config: &DecoderConfig) -> Vec<FinderPattern> {
        let mut scored: Vec<(f32, FinderPattern)> = map
            .regions()
            .iter()
            .filter_map(|ring| Self::check_ring(map, ring, config))
            .collect();
        if scored.len() > config.max_finder_patterns {
            trace!(
                found = scored.len(),
                kept = config.max_finder_patterns,
                "truncating finder patterns"
            );
            scored.sort_by(|a, b| a.0.total_cmp(&b.0));
            scored.truncate(config.max_finder_patterns);
            scored.sort_by_key(|(_, p)| p.ring_label);
        }
        scored.into_iter().map(|(_, p)| p).collect()
    }

    /// A finder pattern and its shape error, when `ring` passes every check
    fn check_ring(
        map: &LabelMap,
        ring: &Region,
        config: &DecoderConfig,
    ) -> Option<(f32, FinderPattern)> {
        let (w, h) = (ring.width(), ring.height());
        if w < 7 || h < 7 {
            return None;
        }
        let aspect = w as f32 / h as f32;
        if !in_range(aspect, config.aspect_range) {
            return None;
        }
        if !in_range(ring.fill_ratio(), config.ring_fill_range) {
            return None;
        }

        let center = ring.centroid();
        let stone = map.region_at(&center)?;
        if stone.label == ring.label {
            return None;
        }
        let stone_ratio = stone.pixel_count as f32 / ring.pixel_count as f32;
        if !in_range(stone_ratio, config.stone_ratio_range) {
            return None;
        }

        let corners = ring_corners(map, ring, center);
        let perimeter: f32 = (0..4).map(|i| corners[i].distance(&corners[(i + 1) % 4])).sum();
        let module_size = perimeter / 28.0;
        if stone.centroid().distance(&center) > module_size {
            return None;
        }

        let shape_error =
            (ring.fill_ratio() - IDEAL_RING_FILL).abs() + (stone_ratio - IDEAL_STONE_RATIO).abs();
        Some((
            shape_error,
            FinderPattern {
                center,
                module_size,
                corners,
                ring_label: ring.label,
                stone_label: stone.label,
            },
        ))
    }

    /// Group finder patterns into non-overlapping symbol candidates.
    ///
    /// Every consistent triple is scored; lower residual wins when triples
    /// share a finder. Candidates come back in scan order of their
    /// top-left finder.
    pub fn group(patterns: &[FinderPattern], config: &DecoderConfig) -> Vec<FinderCandidate> {
        let mut triples: Vec<(usize, [usize; 3], FinderCandidate)> = Vec::new();

        for i in 0..patterns.len() {
            for j in (i + 1)..patterns.len() {
                for k in (j + 1)..patterns.len() {
                    if let Some(candidate) =
                        Self::check_triple(&patterns[i], &patterns[j], &patterns[k], config)
                    {
                        let tl_index = [i, j, k]
                            .into_iter()
                            .find(|&idx| patterns[idx].ring_label == candidate.top_left.ring_label)
                            .unwrap_or(i);
                        triples.push((tl_index, [i, j, k], candidate));
                    }
                }
            }
        }

        triples.sort_by(|a, b| a.2.residual.total_cmp(&b.2.residual));

        let mut used = vec![false; patterns.len()];
        let mut accepted: Vec<(usize, FinderCandidate)> = Vec::new();
        for (tl_index, members, candidate) in triples {
            if members.iter().any(|&m| used[m]) {
                continue;
            }
            for m in members {
                used[m] = true;
            }
            accepted.push((tl_index, candidate));
        }

        accepted.sort_by_key(|(tl_index, _)| *tl_index);
        accepted.into_iter().map(|(_, c)| c).collect()
    }

    fn check_triple(
        a: &FinderPattern,
        b: &FinderPattern,
        c: &FinderPattern,
        config: &DecoderConfig,
    ) -> Option<FinderCandidate> {
        let sizes = [a.module_size, b.module_size, c.module_size];
        let min_size = sizes.iter().fold(f32::INFINITY, |acc, &s| acc.min(s));
        let max_size = sizes.iter().fold(0.0f32, |acc, &s| acc.max(s));
        if min_size <= 0.0 || max_size / min_size > config.max_module_ratio {
            return None;
        }
        let module_size = (sizes[0] + sizes[1] + sizes[2]) / 3.0;

        // Try each finder as the right-angle corner; keep the best fit.
        let patterns = [a, b, c];
        let mut best: Option<(f32, usize)> = None;
        for corner in 0..3 {
            let tl = patterns[corner];
            let p1 = patterns[(corner + 1) % 3];
            let p2 = patterns[(corner + 2) % 3];

            let d1 = tl.center.distance(&p1.center);
            let d2 = tl.center.distance(&p2.center);
            let diag = p1.center.distance(&p2.center);
            let hyp = (d1 * d1 + d2 * d2).sqrt();

            let leg_min = d1.min(d2) / module_size;
            let leg_max = d1.max(d2) / module_size;
            if leg_min < MIN_FINDER_SPAN * 0.75 || leg_max > MAX_FINDER_SPAN * 1.25 {
                continue;
            }

            let tolerance = config.side_tolerance * d1.max(d2) + 2.0 * module_size;
            let leg_error = (d1 - d2).abs();
            let diag_error = (diag - hyp).abs();
            if leg_error > tolerance || diag_error > tolerance {
                continue;
            }

            let residual = (leg_error + diag_error) / module_size;
            if best.is_none_or(|(r, _)| residual < r) {
                best = Some((residual, corner));
            }
        }

        let (residual, corner) = best?;
        let tl = patterns[corner];
        let p1 = patterns[(corner + 1) % 3];
        let p2 = patterns[(corner + 2) % 3];

        // With y pointing down, (TR - TL) x (BL - TL) is positive.
        let cross = tl.center.to(&p1.center).cross(&tl.center.to(&p2.center));
        let (tr, bl) = if cross > 0.0 { (p1, p2) } else { (p2, p1) };

        Some(FinderCandidate {
            top_left: tl.clone(),
            top_right: tr.clone(),
            bottom_left: bl.clone(),
            module_size,
            residual,
        })
    }
}

/// Pixel centres of a region
fn region_pixels<'a>(map: &'a LabelMap, region: &'a Region) -> impl Iterator<Item = Point> + 'a {
    (region.min_y..=region.max_y).flat_map(move |y| {
        (region.min_x..=region.max_x)
            .filter(move |&x| map.label_at(x, y) == region.label)
            .map(move |x| Point::new(x as f32 + 0.5, y as f32 + 0.5))
    })
}

/// Outer corners of a ring region.
///
/// The pixel farthest from the centroid is one corner; the others are the
/// extremes along that direction turned by quarter turns. Each corner is
/// pushed half a pixel diagonal outward, from the pixel centre to its edge.
fn ring_corners(map: &LabelMap, ring: &Region, center: Point) -> [Point; 4] {
    let far = region_pixels(map, ring)
        .max_by(|a, b| a.distance_squared(&center).total_cmp(&b.distance_squared(&center)))
        .unwrap_or(center);
    let r = center.to(&far);
    let directions = [
        r,
        Point::new(-r.y, r.x),
        Point::new(-r.x, -r.y),
        Point::new(r.y, -r.x),
    ];

    let mut best = [(f32::NEG_INFINITY, center); 4];
    for p in region_pixels(map, ring) {
        let d = center.to(&p);
        for (slot, dir) in best.iter_mut().zip(&directions) {
            let score = d.x * dir.x + d.y * dir.y;
            if score > slot.0 {
                *slot = (score, p);
            }
        }
    }

    best.map(|(_, p)| {
        let d = center.to(&p);
        let len = (d.x * d.x + d.y * d.y).sqrt();
        if len > 0.0 {
            p.translate(d.x / len * FRAC_1_SQRT_2, d.y / len * FRAC_1_SQRT_2)
        } else {
            p
        }
    })
}

fn in_range(value: f32, (lo, hi): (f32, f32)) -> bool {
    value >= lo && value <= hi
}
