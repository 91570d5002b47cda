/// Sample grid extraction from perspective-corrected QR code
use crate::decoder::version::VersionInfo;
use crate::detector::alignment::find_alignment_pattern;
use crate::detector::finder::{FinderCandidate, FinderPattern};
use crate::detector::timing::{count_runs, grid_fitness, sample};
use crate::error::DecodeError;
use crate::models::{BitMatrix, Point, SymbolGrid, Version};
use crate::utils::geometry::PerspectiveTransform;
use tracing::{debug, trace};

/// Modules below this size in pixels are read from a single pixel
const MIN_VOTE_MODULE_SIZE: f32 = 3.0;
/// Largest gap, in versions, between the timing count and the finder
/// distance for the timing count to be trusted
const TIMING_VERSION_TOLERANCE: f32 = 1.5;
/// Refinement passes; the step halves after each
const JIGGLE_PASSES: usize = 6;

/// Projects a finder candidate's module grid out of the binary bitmap
pub struct GridSampler;

impl GridSampler {
    /// Estimate the version, fit the module-to-image homography and sample
    /// every module.
    ///
    /// For version 7 and up the version information blocks are read back
    /// from the sampled grid; when they name a different version the grid
    /// is sampled again at that size.
    pub fn sample(bitmap: &BitMatrix, candidate: &FinderCandidate) -> Result<SymbolGrid, DecodeError> {
        let frame = FinderFrame::new(candidate).ok_or(DecodeError::UnrecognizedVersion)?;
        let estimated = Self::estimate_version(bitmap, candidate)?;
        let grid = Self::sample_version(bitmap, candidate, &frame, estimated)?;
        if estimated.number() < 7 {
            return Ok(grid);
        }

        match VersionInfo::extract(grid.modules()) {
            Some(read) if read != estimated => {
                debug!(
                    estimated = estimated.number(),
                    read = read.number(),
                    "resampling at version from version info"
                );
                Self::sample_version(bitmap, candidate, &frame, read)
            }
            _ => Ok(grid),
        }
    }

    /// Version from the module count along each finder-to-finder edge.
    ///
    /// Each edge counts the alternating modules of its timing pattern,
    /// from the top-left finder's inner corner to the far finder. When that
    /// count is unreadable or strays from the finder distance in module
    /// sizes, the distance is used instead.
    pub fn estimate_version(bitmap: &BitMatrix, candidate: &FinderCandidate) -> Result<Version, DecodeError> {
        let module_size = candidate.module_size;
        if module_size.is_nan() || module_size <= 0.0 {
            return Err(DecodeError::UnrecognizedVersion);
        }
        let frame = FinderFrame::new(candidate).ok_or(DecodeError::UnrecognizedVersion)?;
        let start = finder_transform(&frame.top_left)
            .map(|t| t.transform(&Point::new(6.5, 6.5)));

        let leg_version = |end: &FinderPattern, corners: &[Point; 4], local: Point| {
            let dim = candidate.top_left.center.distance(&end.center) / module_size + 7.0;
            let from_distance = (dim - 17.0) / 4.0;

            let from_timing = start.zip(finder_transform(corners)).map(|(start, t)| {
                let runs = count_runs(bitmap, &start, &t.transform(&local));
                (runs as f32 + 12.0 - 17.0) / 4.0
            });
            let version = match from_timing {
                Some(v) if (v - from_distance).abs() <= TIMING_VERSION_TOLERANCE => v.round(),
                _ => from_distance.round(),
            };
            if (1.0..=40.0).contains(&version) {
                Ok(version as i32)
            } else {
                Err(DecodeError::UnrecognizedVersion)
            }
        };

        let across = leg_version(&candidate.top_right, &frame.top_right, Point::new(0.5, 6.5))?;
        let down = leg_version(&candidate.bottom_left, &frame.bottom_left, Point::new(6.5, 0.5))?;
        if (across - down).abs() > 1 {
            trace!(across, down, "finder legs disagree on version");
            return Err(DecodeError::UnrecognizedVersion);
        }

        let mean = ((across + down) as f32 / 2.0).round() as u8;
        Version::new(mean).ok_or(DecodeError::UnrecognizedVersion)
    }

    fn sample_version(
        bitmap: &BitMatrix,
        candidate: &FinderCandidate,
        frame: &FinderFrame,
        version: Version,
    ) -> Result<SymbolGrid, DecodeError> {
        let dim = version.size();
        let transform = Self::fit_transform(bitmap, frame, dim, candidate.module_size)?;

        let vote = candidate.module_size >= MIN_VOTE_MODULE_SIZE;
        let mut modules = BitMatrix::new(dim, dim);
        for y in 0..dim {
            for x in 0..dim {
                let center = transform.transform(&Point::new(x as f32 + 0.5, y as f32 + 0.5));
                let dark = if vote {
                    majority_dark(bitmap, &center)
                } else {
                    sample(bitmap, &center)
                };
                modules.set(x, y, dark);
            }
        }

        let d = dim as f32;
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(d, 0.0),
            Point::new(d, d),
            Point::new(0.0, d),
        ]
        .map(|p| transform.transform(&p));

        SymbolGrid::new(modules, corners).ok_or(DecodeError::UnrecognizedVersion)
    }

    /// Homography from the finders' outer corners, refined on the
    /// bottom-right alignment pattern, then jiggled against the fixed
    /// patterns
    fn fit_transform(
        bitmap: &BitMatrix,
        frame: &FinderFrame,
        dim: usize,
        module_size: f32,
    ) -> Result<PerspectiveTransform, DecodeError> {
        let d = dim as f32;
        let mut modules = [
            Point::new(0.0, 0.0),
            Point::new(d, 0.0),
            Point::new(d, d),
            Point::new(0.0, d),
        ];
        let mut image = frame.symbol_corners();
        let mut best = PerspectiveTransform::from_points(&modules, &image)
            .ok_or(DecodeError::UnrecognizedVersion)?;
        let mut best_fitness = grid_fitness(bitmap, &best, dim);

        if dim >= 25 {
            let alignment = Point::new(d - 6.5, d - 6.5);
            match find_alignment_pattern(bitmap, &best, alignment) {
                Some(found) => {
                    let refined_modules = [modules[0], modules[1], alignment, modules[3]];
                    let refined_image = [image[0], image[1], found, image[3]];
                    if let Some(refined) =
                        PerspectiveTransform::from_points(&refined_modules, &refined_image)
                    {
                        let refined_fitness = grid_fitness(bitmap, &refined, dim);
                        trace!(best_fitness, refined_fitness, "alignment refinement");
                        if refined_fitness >= best_fitness {
                            modules = refined_modules;
                            image = refined_image;
                            best = refined;
                            best_fitness = refined_fitness;
                        }
                    }
                }
                None => trace!("no alignment pattern near prediction"),
            }
        }

        Ok(jiggle(bitmap, dim, &modules, image, best, best_fitness, module_size))
    }
}

/// Nudge each image-side control point by shrinking steps, keeping every
/// move that raises the fixed-pattern fitness
fn jiggle(
    bitmap: &BitMatrix,
    dim: usize,
    modules: &[Point; 4],
    mut image: [Point; 4],
    mut best: PerspectiveTransform,
    mut best_fitness: usize,
    module_size: f32,
) -> PerspectiveTransform {
    let start_fitness = best_fitness;
    let mut step = module_size;
    for _ in 0..JIGGLE_PASSES {
        for i in 0..8 {
            for sign in [-1.0f32, 1.0] {
                let mut trial = image;
                let delta = sign * step;
                if i % 2 == 0 {
                    trial[i / 2].x += delta;
                } else {
                    trial[i / 2].y += delta;
                }
                let Some(transform) = PerspectiveTransform::from_points(modules, &trial) else {
                    continue;
                };
                let fitness = grid_fitness(bitmap, &transform, dim);
                if fitness > best_fitness {
                    image = trial;
                    best = transform;
                    best_fitness = fitness;
                }
            }
        }
        step *= 0.5;
    }
    if best_fitness > start_fitness {
        trace!(start_fitness, best_fitness, "jiggled transform");
    }
    best
}

/// Outer corners of each finder, as top-left, top-right, bottom-right,
/// bottom-left in symbol orientation
#[derive(Debug, Clone, PartialEq)]
struct FinderFrame {
    top_left: [Point; 4],
    top_right: [Point; 4],
    bottom_left: [Point; 4],
}

impl FinderFrame {
    fn new(candidate: &FinderCandidate) -> Option<Self> {
        let origin = candidate.top_left.center;
        let ex = origin.to(&candidate.top_right.center);
        let ey = origin.to(&candidate.bottom_left.center);
        let det = ex.cross(&ey);
        if !det.is_finite() || det.abs() < f32::EPSILON {
            return None;
        }

        // Corner offsets in the (ex, ey) basis pick out each corner's role
        let orient = |finder: &FinderPattern| {
            let coords = finder.corners.map(|c| {
                let d = finder.center.to(&c);
                (d.cross(&ey) / det, ex.cross(&d) / det)
            });
            let extreme = |key: fn(f32, f32) -> f32| {
                let score = |i: usize| key(coords[i].0, coords[i].1);
                let best = (0..4).max_by(|&i, &j| score(i).total_cmp(&score(j))).unwrap_or(0);
                finder.corners[best]
            };
            [
                extreme(|a, b| -(a + b)),
                extreme(|a, b| a - b),
                extreme(|a, b| a + b),
                extreme(|a, b| b - a),
            ]
        };

        Some(Self {
            top_left: orient(&candidate.top_left),
            top_right: orient(&candidate.top_right),
            bottom_left: orient(&candidate.bottom_left),
        })
    }

    /// Image corners of the whole symbol. The bottom-right one is where the
    /// top-right finder's right edge meets the bottom-left finder's bottom
    /// edge.
    fn symbol_corners(&self) -> [Point; 4] {
        let tl = self.top_left[0];
        let tr = self.top_right[1];
        let bl = self.bottom_left[3];
        let br = line_intersection(tr, self.top_right[2], bl, self.bottom_left[2])
            .unwrap_or_else(|| Point::new(tr.x + bl.x - tl.x, tr.y + bl.y - tl.y));
        [tl, tr, br, bl]
    }
}

/// Map from a finder's own 7x7 module square onto its corners
fn finder_transform(corners: &[Point; 4]) -> Option<PerspectiveTransform> {
    let local = [
        Point::new(0.0, 0.0),
        Point::new(7.0, 0.0),
        Point::new(7.0, 7.0),
        Point::new(0.0, 7.0),
    ];
    PerspectiveTransform::from_points(&local, corners)
}

/// Intersection of the line through `a0`, `a1` with the line through `b0`, `b1`
fn line_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<Point> {
    let da = a0.to(&a1);
    let db = b0.to(&b1);
    let denom = da.cross(&db);
    let scale = (da.x * da.x + da.y * da.y).sqrt() * (db.x * db.x + db.y * db.y).sqrt();
    if !denom.is_finite() || denom.abs() <= 1e-3 * scale {
        return None;
    }
    let t = a0.to(&b0).cross(&db) / denom;
    Some(a0.translate(da.x * t, da.y * t))
}

/// Majority over the 3x3 pixel neighbourhood of a module centre
fn majority_dark(bitmap: &BitMatrix, center: &Point) -> bool {
    if !center.x.is_finite() || !center.y.is_finite() {
        return false;
    }
    let (cx, cy) = (center.x.floor() as i64, center.y.floor() as i64);
    let mut dark = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if bitmap.get_signed(cx + dx, cy + dy) {
                dark += 1;
            }
        }
    }
    dark >= 5
}
