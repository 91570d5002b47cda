use crate::models::BitMatrix;

/// Function module mask for a specific QR version.
/// true = function module (not data), false = data module.
#[derive(Debug, Clone)]
pub struct FunctionMask {
    mask: BitMatrix,
    version: u8,
}

impl FunctionMask {
    /// Build the mask for `version` (1-40)
    pub fn new(version: u8) -> Self {
        let size = 17 + 4 * version as usize;
        let mut mask = BitMatrix::new(size, size);

        // Finder patterns + separators (8x8 areas, clipped to bounds)
        Self::mark_finder_area(&mut mask, 0, 0);
        Self::mark_finder_area(&mut mask, size - 7, 0);
        Self::mark_finder_area(&mut mask, 0, size - 7);

        // Timing patterns (row 6 and column 6)
        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        for (cx, cy) in alignment_centers(version) {
            for y in cy - 2..=cy + 2 {
                for x in cx - 2..=cx + 2 {
                    mask.set(x, y, true);
                }
            }
        }

        // Format info areas
        for i in 0..9 {
            if i != 6 {
                mask.set(8, i, true);
                mask.set(i, 8, true);
            }
        }
        for i in 0..8 {
            mask.set(size - 1 - i, 8, true);
            mask.set(8, size - 1 - i, true);
        }

        // Version info (v7+)
        if version >= 7 {
            for dy in 0..6 {
                for dx in 0..3 {
                    mask.set(size - 11 + dx, dy, true);
                    mask.set(dy, size - 11 + dx, true);
                }
            }
        }

        Self { mask, version }
    }

    /// Modules per side
    pub fn size(&self) -> usize {
        self.mask.width()
    }

    /// Version the mask was built for
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Whether the module at column `x`, row `y` is a function module
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    /// Number of data modules, remainder bits included
    pub fn data_modules_count(&self) -> usize {
        let size = self.size();
        size * size - self.mask.count_ones()
    }

    fn mark_finder_area(mask: &mut BitMatrix, x: usize, y: usize) {
        let size = mask.width();
        let end_x = (x + 8).min(size);
        let end_y = (y + 8).min(size);
        for yy in y.saturating_sub(1)..end_y {
            for xx in x.saturating_sub(1)..end_x {
                mask.set(xx, yy, true);
            }
        }
    }
}

/// Centres (x, y) of the alignment patterns of `version`, leaving out the
/// three that would overlap a finder pattern
pub fn alignment_centers(version: u8) -> Vec<(usize, usize)> {
    let size = 17 + 4 * version as usize;
    let axis = alignment_pattern_positions(version);
    let mut centers = Vec::with_capacity(axis.len() * axis.len());
    for &cy in &axis {
        for &cx in &axis {
            let in_tl = cx <= 8 && cy <= 8;
            let in_tr = cx >= size - 9 && cy <= 8;
            let in_bl = cx <= 8 && cy >= size - 9;
            if !(in_tl || in_tr || in_bl) {
                centers.push((cx, cy));
            }
        }
    }
    centers
}

/// Alignment pattern centers (one axis) for a given version.
pub fn alignment_pattern_positions(version: u8) -> Vec<usize> {
    if version <= 1 {
        return Vec::new();
    }
    let num_align = version as usize / 7 + 2;
    let size = 17 + 4 * version as usize;
    let step = if version == 32 {
        26
    } else {
        (version as usize * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
    };

    let mut positions = vec![0usize; num_align];
    positions[0] = 6;
    let mut pos = size - 7;
    for i in (1..num_align).rev() {
        positions[i] = pos;
        pos = pos.saturating_sub(step);
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_centers_skip_finders() {
        assert!(alignment_centers(1).is_empty());
        assert_eq!(alignment_centers(2), vec![(18, 18)]);
        // 3x3 grid minus the three finder corners
        let centers = alignment_centers(7);
        assert_eq!(centers.len(), 6);
        assert!(centers.contains(&(22, 6)));
        assert!(centers.contains(&(38, 38)));
        assert!(!centers.contains(&(6, 6)));
        assert!(!centers.contains(&(38, 6)));
        assert!(!centers.contains(&(6, 38)));
    }

    #[test]
    fn test_alignment_positions() {
        assert!(alignment_pattern_positions(1).is_empty());
        assert_eq!(alignment_pattern_positions(2), vec![6, 18]);
        assert_eq!(alignment_pattern_positions(7), vec![6, 22, 38]);
        assert_eq!(alignment_pattern_positions(15), vec![6, 26, 48, 70]);
        assert_eq!(alignment_pattern_positions(32), vec![6, 34, 60, 86, 112, 138]);
        assert_eq!(
            alignment_pattern_positions(40),
            vec![6, 30, 58, 86, 114, 142, 170]
        );
    }

    #[test]
    fn test_data_module_counts() {
        // Raw data modules per version from the QR tables
        assert_eq!(FunctionMask::new(1).data_modules_count(), 208);
        assert_eq!(FunctionMask::new(2).data_modules_count(), 359);
        assert_eq!(FunctionMask::new(7).data_modules_count(), 1568);
        assert_eq!(FunctionMask::new(40).data_modules_count(), 29648);
    }
}
