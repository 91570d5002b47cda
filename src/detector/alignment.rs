/// Alignment pattern detection
/// Alignment patterns appear in QR codes version 2 and above: a 5x5 dark
/// ring, a light ring and a single dark centre module.
use crate::detector::timing::sample;
use crate::models::{BitMatrix, Point};
use crate::utils::geometry::PerspectiveTransform;

/// Search radius around the predicted centre, in modules
const SEARCH_RADIUS: f32 = 2.0;
/// Search step, in modules
const SEARCH_STEP: f32 = 0.25;
/// Template cells that must match out of 25
const MIN_SCORE: usize = 23;

/// Locate the alignment pattern whose centre should sit at module
/// coordinate `module`.
///
/// The template is matched at every offset within two modules of the
/// transform's prediction. Returns the image-space centre of the best match
/// scoring at least 23 of 25 cells; among equal scores the smallest offset
/// wins.
pub fn find_alignment_pattern(
    bitmap: &BitMatrix,
    transform: &PerspectiveTransform,
    module: Point,
) -> Option<Point> {
    let predicted = transform.transform(&module);
    let u = predicted.to(&transform.transform(&module.translate(1.0, 0.0)));
    let v = predicted.to(&transform.transform(&module.translate(0.0, 1.0)));
    if !(u.x.is_finite() && u.y.is_finite() && v.x.is_finite() && v.y.is_finite()) {
        return None;
    }

    let steps = (SEARCH_RADIUS / SEARCH_STEP) as i32;
    let mut best: Option<(usize, f32, Point)> = None;
    for sy in -steps..=steps {
        for sx in -steps..=steps {
            let (dx, dy) = (sx as f32 * SEARCH_STEP, sy as f32 * SEARCH_STEP);
            let center = predicted.translate(dx * u.x + dy * v.x, dx * u.y + dy * v.y);
            let score = template_score(bitmap, center, u, v);
            let offset = dx * dx + dy * dy;
            let better = match best {
                None => true,
                Some((s, o, _)) => score > s || (score == s && offset < o),
            };
            if better {
                best = Some((score, offset, center));
            }
        }
    }

    best.filter(|&(score, _, _)| score >= MIN_SCORE)
        .map(|(_, _, center)| center)
}

/// Matching cells of the 5x5 template centred on `center`
fn template_score(bitmap: &BitMatrix, center: Point, u: Point, v: Point) -> usize {
    let mut score = 0;
    for j in -2i32..=2 {
        for i in -2i32..=2 {
            let expected = i.abs().max(j.abs()) != 1;
            let (fi, fj) = (i as f32, j as f32);
            let p = center.translate(fi * u.x + fj * v.x, fi * u.y + fj * v.y);
            if sample(bitmap, &p) == expected {
                score += 1;
            }
        }
    }
    score
}
