/// Timing pattern scoring
/// Timing patterns run between finder patterns along row 6 and column 6
use crate::decoder::function_mask::alignment_centers;
use crate::models::{BitMatrix, Point};
use crate::utils::geometry::PerspectiveTransform;

/// Read the bitmap pixel under a point; anything outside is light
pub(crate) fn sample(bitmap: &BitMatrix, p: &Point) -> bool {
    if !p.x.is_finite() || !p.y.is_finite() {
        return false;
    }
    bitmap.get_signed(p.x.floor() as i64, p.y.floor() as i64)
}

/// How well a module-to-image transform lines up with the timing patterns.
///
/// Counts the modules of both timing lines (between the separators) whose
/// sampled colour matches the expected alternation, dark on even indices.
pub fn timing_fitness(bitmap: &BitMatrix, transform: &PerspectiveTransform, dim: usize) -> usize {
    (8..dim.saturating_sub(8))
        .map(|i| {
            let expected = i % 2 == 0;
            let along_row = Point::new(i as f32 + 0.5, 6.5);
            let along_col = Point::new(6.5, i as f32 + 0.5);
            (sample(bitmap, &transform.transform(&along_row)) == expected) as usize
                + (sample(bitmap, &transform.transform(&along_col)) == expected) as usize
        })
        .sum()
}

/// How well a transform lines up with every fixed pattern of a `dim`-module
/// symbol: both timing lines, the three finders and the alignment patterns.
///
/// A transform that hits every expected module scores the maximum, so any
/// strict improvement means a better fit.
pub fn grid_fitness(bitmap: &BitMatrix, transform: &PerspectiveTransform, dim: usize) -> usize {
    let matches = |x: usize, y: usize, expected: bool| {
        let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
        (sample(bitmap, &transform.transform(&center)) == expected) as usize
    };

    let mut score = timing_fitness(bitmap, transform, dim);
    if dim < 21 {
        return score;
    }

    for (ox, oy) in [(0, 0), (dim - 7, 0), (0, dim - 7)] {
        for j in 0..7usize {
            for i in 0..7usize {
                // Ring and stone are dark, the gap between them light
                let ring = i.abs_diff(3).max(j.abs_diff(3));
                score += matches(ox + i, oy + j, ring != 2);
            }
        }
    }

    let version = ((dim - 17) / 4) as u8;
    for (cx, cy) in alignment_centers(version) {
        for y in cy - 2..=cy + 2 {
            for x in cx - 2..=cx + 2 {
                score += matches(x, y, x.abs_diff(cx).max(y.abs_diff(cy)) != 1);
            }
        }
    }

    score
}

/// Number of dark/light runs crossed on the segment `from`-`to`, sampled
/// about once per pixel
pub fn count_runs(bitmap: &BitMatrix, from: &Point, to: &Point) -> usize {
    let length = from.distance(to);
    if !length.is_finite() {
        return 0;
    }
    let steps = length.ceil().max(1.0) as usize;
    let step = from.to(to);

    let mut runs = 0;
    let mut last = None;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let dark = sample(bitmap, &from.translate(step.x * t, step.y * t));
        if last != Some(dark) {
            runs += 1;
            last = Some(dark);
        }
    }
    runs
}
