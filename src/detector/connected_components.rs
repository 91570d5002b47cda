/// Connected component labeling of foreground pixels.
///
/// Regions live in an arena: a flat label raster with one `u32` per pixel and
/// a table indexed by `label - 1`. Label 0 is background; [`NOISE_LABEL`]
/// marks pixels of components that fell under the pixel-count floor.
use crate::models::{BitMatrix, Point};

/// Label of background pixels
pub const BACKGROUND_LABEL: u32 = 0;
/// Label of pixels whose component was discarded as noise
pub const NOISE_LABEL: u32 = u32::MAX;

/// A connected foreground component
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Label stored in the raster for this region's pixels
    pub label: u32,
    /// Number of pixels
    pub pixel_count: usize,
    /// Leftmost column
    pub min_x: usize,
    /// Topmost row
    pub min_y: usize,
    /// Rightmost column (inclusive)
    pub max_x: usize,
    /// Bottom row (inclusive)
    pub max_y: usize,
    sum_x: u64,
    sum_y: u64,
}

impl Region {
    fn seed(label: u32, x: usize, y: usize) -> Self {
        Self {
            label,
            pixel_count: 0,
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            sum_x: 0,
            sum_y: 0,
        }
    }

    fn add(&mut self, x: usize, y: usize) {
        self.pixel_count += 1;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.sum_x += x as u64;
        self.sum_y += y as u64;
    }

    /// Bounding box width in pixels
    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    /// Bounding box height in pixels
    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }

    /// Foreground pixels over bounding box area
    pub fn fill_ratio(&self) -> f32 {
        self.pixel_count as f32 / (self.width() * self.height()) as f32
    }

    /// Centroid in continuous image coordinates (pixel centres at +0.5)
    pub fn centroid(&self) -> Point {
        let n = self.pixel_count.max(1) as f64;
        Point::new(
            (self.sum_x as f64 / n + 0.5) as f32,
            (self.sum_y as f64 / n + 0.5) as f32,
        )
    }
}

/// Label raster plus region table for one bitmap
#[derive(Debug, Clone)]
pub struct LabelMap {
    width: usize,
    height: usize,
    labels: Vec<u32>,
    regions: Vec<Region>,
}

impl LabelMap {
    /// Label every 8-connected foreground component of `matrix`.
    ///
    /// Components with fewer than `min_pixels` pixels are relabeled as
    /// [`NOISE_LABEL`] and left out of the region table.
    pub fn build(matrix: &BitMatrix, min_pixels: usize) -> Self {
        let width = matrix.width();
        let height = matrix.height();
        let mut labels = vec![BACKGROUND_LABEL; width * height];
        let mut regions: Vec<Region> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut members: Vec<usize> = Vec::new();

        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                if labels[idx] != BACKGROUND_LABEL || !matrix.get(x, y) {
                    continue;
                }

                let label = regions.len() as u32 + 1;
                let mut region = Region::seed(label, x, y);
                members.clear();
                labels[idx] = label;
                stack.push(idx);

                while let Some(p) = stack.pop() {
                    let px = p % width;
                    let py = p / width;
                    region.add(px, py);
                    members.push(p);

                    for ny in py.saturating_sub(1)..=(py + 1).min(height - 1) {
                        for nx in px.saturating_sub(1)..=(px + 1).min(width - 1) {
                            let n = ny * width + nx;
                            if labels[n] == BACKGROUND_LABEL && matrix.get(nx, ny) {
                                labels[n] = label;
                                stack.push(n);
                            }
                        }
                    }
                }

                if region.pixel_count < min_pixels {
                    for &m in &members {
                        labels[m] = NOISE_LABEL;
                    }
                } else {
                    regions.push(region);
                }
            }
        }

        Self {
            width,
            height,
            labels,
            regions,
        }
    }

    /// Surviving regions in scan order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Label at (x, y); background outside the raster
    pub fn label_at(&self, x: usize, y: usize) -> u32 {
        if x >= self.width || y >= self.height {
            return BACKGROUND_LABEL;
        }
        self.labels[y * self.width + x]
    }

    /// Region owning `label`, if it survived the noise floor
    pub fn region(&self, label: u32) -> Option<&Region> {
        if label == BACKGROUND_LABEL || label == NOISE_LABEL {
            return None;
        }
        self.regions.get(label as usize - 1)
    }

    /// Region covering the pixel under a continuous image point
    pub fn region_at(&self, p: &Point) -> Option<&Region> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        self.region(self.label_at(p.x as usize, p.y as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(matrix: &mut BitMatrix, x0: usize, y0: usize, w: usize, h: usize) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                matrix.set(x, y, true);
            }
        }
    }

    #[test]
    fn test_find_black_regions() {
        let mut matrix = BitMatrix::new(10, 10);
        fill(&mut matrix, 2, 2, 2, 2);

        let map = LabelMap::build(&matrix, 1);
        assert_eq!(map.regions().len(), 1);
        let r = &map.regions()[0];
        assert_eq!((r.min_x, r.min_y, r.max_x, r.max_y), (2, 2, 3, 3));
        assert_eq!(r.pixel_count, 4);
        assert_eq!(r.centroid(), Point::new(3.0, 3.0));
        assert_eq!(map.label_at(3, 3), r.label);
        assert_eq!(map.label_at(0, 0), BACKGROUND_LABEL);
    }

    #[test]
    fn test_diagonal_pixels_connect() {
        let mut matrix = BitMatrix::new(6, 6);
        for i in 0..6 {
            matrix.set(i, i, true);
        }
        let map = LabelMap::build(&matrix, 1);
        assert_eq!(map.regions().len(), 1);
        assert_eq!(map.regions()[0].pixel_count, 6);
    }

    #[test]
    fn test_noise_floor_and_label_table() {
        let mut matrix = BitMatrix::new(20, 10);
        matrix.set(1, 1, true); // single-pixel speck
        fill(&mut matrix, 5, 2, 4, 4);
        fill(&mut matrix, 12, 2, 3, 3);

        let map = LabelMap::build(&matrix, 5);
        assert_eq!(map.regions().len(), 2);
        assert_eq!(map.label_at(1, 1), NOISE_LABEL);
        assert!(map.region(NOISE_LABEL).is_none());

        for region in map.regions() {
            assert_eq!(map.region(region.label), Some(region));
        }
        let square = map.region_at(&Point::new(13.5, 3.5)).unwrap();
        assert_eq!(square.pixel_count, 9);
        assert!((square.fill_ratio() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_large_region_does_not_recurse() {
        let mut matrix = BitMatrix::new(400, 400);
        fill(&mut matrix, 0, 0, 400, 400);
        let map = LabelMap::build(&matrix, 1);
        assert_eq!(map.regions().len(), 1);
        assert_eq!(map.regions()[0].pixel_count, 160_000);
    }
}
