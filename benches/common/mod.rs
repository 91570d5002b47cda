#![allow(dead_code)]

use qr_reader::GrayscaleImage;
use qrcode::{Color, EcLevel, QrCode};

/// Canvas of `width` x `height` with `count` symbols laid out left to right,
/// each rendered at `scale` pixels per module on a light-gray background
pub fn scene(width: usize, height: usize, count: usize, scale: usize) -> GrayscaleImage {
    let mut pixels = vec![200u8; width * height];
    let mut left = 4 * scale;
    for i in 0..count {
        let text = format!("https://example.org/item/{i:04}");
        let code = match QrCode::with_error_correction_level(text.as_bytes(), EcLevel::M) {
            Ok(code) => code,
            Err(_) => continue,
        };
        let size = code.width();
        if left + (size + 4) * scale > width || (size + 8) * scale > height {
            break;
        }
        let top = 4 * scale;
        for (idx, color) in code.to_colors().into_iter().enumerate() {
            if color != Color::Dark {
                continue;
            }
            let (mx, my) = (idx % size, idx / size);
            for py in 0..scale {
                let row = (top + my * scale + py) * width;
                let start = row + left + mx * scale;
                pixels[start..start + scale].fill(30);
            }
        }
        left += (size + 8) * scale;
    }
    GrayscaleImage::new(width, height, pixels).expect("scene dimensions")
}
