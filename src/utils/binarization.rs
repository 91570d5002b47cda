/// Adaptive binarization from per-cell luminance statistics
use crate::models::{BitMatrix, GrayscaleImage};
use std::collections::VecDeque;

/// Convert a grayscale image to a binary bitmap (true = dark/foreground).
///
/// The image is split into `cell_size`-square cells. Each cell with enough
/// contrast (max - min >= `contrast_floor`) gets the midpoint of its range
/// as threshold; flat cells inherit the threshold of the nearest contrasty
/// cell. Per-pixel thresholds are bilinearly blended between cell centres.
/// An image without any contrasty cell is all background.
pub fn adaptive_binarize(image: &GrayscaleImage, cell_size: usize, contrast_floor: u8) -> BitMatrix {
    let width = image.width();
    let height = image.height();
    let cell_size = cell_size.max(1);
    let mut binary = BitMatrix::new(width, height);

    let Some(grid) = CellThresholds::compute(image, cell_size, contrast_floor) else {
        return binary;
    };

    for y in 0..height {
        let row = image.row(y);
        let (cy0, cy1, fy) = grid.axis(y, grid.cells_y);
        for (x, &pixel) in row.iter().enumerate() {
            let (cx0, cx1, fx) = grid.axis(x, grid.cells_x);
            let top = lerp(grid.at(cx0, cy0), grid.at(cx1, cy0), fx);
            let bottom = lerp(grid.at(cx0, cy1), grid.at(cx1, cy1), fx);
            let threshold = lerp(top, bottom, fy);
            if (pixel as f32) < threshold {
                binary.set(x, y, true);
            }
        }
    }

    binary
}

struct CellThresholds {
    cell_size: usize,
    cells_x: usize,
    cells_y: usize,
    thresholds: Vec<f32>,
}

impl CellThresholds {
    fn compute(image: &GrayscaleImage, cell_size: usize, contrast_floor: u8) -> Option<Self> {
        let width = image.width();
        let height = image.height();
        let cells_x = width.div_ceil(cell_size);
        let cells_y = height.div_ceil(cell_size);

        let mut min = vec![u8::MAX; cells_x * cells_y];
        let mut max = vec![u8::MIN; cells_x * cells_y];
        for y in 0..height {
            let base = (y / cell_size) * cells_x;
            for (x, &pixel) in image.row(y).iter().enumerate() {
                let idx = base + x / cell_size;
                min[idx] = min[idx].min(pixel);
                max[idx] = max[idx].max(pixel);
            }
        }

        // Multi-source BFS: flat cells take the threshold of the nearest
        // cell that has contrast.
        let mut thresholds = vec![0.0f32; cells_x * cells_y];
        let mut assigned = vec![false; cells_x * cells_y];
        let mut queue = VecDeque::new();
        for idx in 0..cells_x * cells_y {
            if max[idx].saturating_sub(min[idx]) >= contrast_floor.max(1) {
                thresholds[idx] = (min[idx] as f32 + max[idx] as f32) / 2.0;
                assigned[idx] = true;
                queue.push_back(idx);
            }
        }
        if queue.is_empty() {
            return None;
        }

        while let Some(idx) = queue.pop_front() {
            let cx = idx % cells_x;
            let cy = idx / cells_x;
            let neighbors = [
                (cx > 0).then(|| idx - 1),
                (cx + 1 < cells_x).then(|| idx + 1),
                (cy > 0).then(|| idx - cells_x),
                (cy + 1 < cells_y).then(|| idx + cells_x),
            ];
            for n in neighbors.into_iter().flatten() {
                if !assigned[n] {
                    assigned[n] = true;
                    thresholds[n] = thresholds[idx];
                    queue.push_back(n);
                }
            }
        }

        Some(Self {
            cell_size,
            cells_x,
            cells_y,
            thresholds,
        })
    }

    fn at(&self, cx: usize, cy: usize) -> f32 {
        self.thresholds[cy * self.cells_x + cx]
    }

    /// Neighbouring cell indices and blend weight for a pixel coordinate
    fn axis(&self, p: usize, cells: usize) -> (usize, usize, f32) {
        let pos = (p as f32 + 0.5) / self.cell_size as f32 - 0.5;
        if pos <= 0.0 {
            return (0, 0, 0.0);
        }
        let c0 = (pos.floor() as usize).min(cells - 1);
        let c1 = (c0 + 1).min(cells - 1);
        (c0, c1, (pos - c0 as f32).clamp(0.0, 1.0))
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
