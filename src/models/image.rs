use crate::error::{Error, Result};

/// Immutable 8-bit grayscale image (row-major, one byte per pixel)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayscaleImage {
    width: usize,
    height: usize,
    samples: Vec<u8>,
}

impl GrayscaleImage {
    /// Wrap a luminance buffer.
    ///
    /// Fails with [`Error::InvalidDimensions`] when either dimension is zero
    /// or `samples.len() != width * height`.
    pub fn new(width: usize, height: usize, samples: Vec<u8>) -> Result<Self> {
        let expected = width.checked_mul(height);
        if width == 0 || height == 0 || expected != Some(samples.len()) {
            return Err(Error::InvalidDimensions {
                width,
                height,
                len: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Copy a borrowed buffer into a new image
    pub fn from_slice(width: usize, height: usize, samples: &[u8]) -> Result<Self> {
        if width.checked_mul(height) != Some(samples.len()) {
            return Err(Error::InvalidDimensions {
                width,
                height,
                len: samples.len(),
            });
        }
        Self::new(width, height, samples.to_vec())
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bounds-checked pixel read
    pub fn get(&self, x: usize, y: usize) -> Result<u8> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.samples[y * self.width + x])
    }

    /// Raw samples, row-major
    pub fn as_slice(&self) -> &[u8] {
        &self.samples
    }

    /// One row of samples
    pub(crate) fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.samples[start..start + self.width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_validation() {
        assert!(GrayscaleImage::new(2, 2, vec![0; 4]).is_ok());
        assert_eq!(
            GrayscaleImage::new(2, 2, vec![0; 3]),
            Err(Error::InvalidDimensions {
                width: 2,
                height: 2,
                len: 3
            })
        );
        assert!(GrayscaleImage::new(0, 5, vec![]).is_err());
        assert!(GrayscaleImage::new(5, 0, vec![]).is_err());
        assert!(GrayscaleImage::from_slice(3, 1, &[1, 2]).is_err());
    }

    #[test]
    fn test_bounds_checked_read() {
        let img = GrayscaleImage::new(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(img.get(2, 1), Ok(6));
        assert_eq!(img.get(0, 1), Ok(4));
        assert!(matches!(img.get(3, 0), Err(Error::OutOfBounds { x: 3, .. })));
        assert!(matches!(img.get(0, 2), Err(Error::OutOfBounds { y: 2, .. })));
        assert_eq!(img.row(1), &[4, 5, 6]);
    }
}
