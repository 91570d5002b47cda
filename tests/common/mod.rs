//! Synthetic symbol fixtures rendered with the `qrcode` encoder

#![allow(dead_code)]

use qr_reader::decoder::bitstream::BitstreamExtractor;
use qr_reader::decoder::function_mask::FunctionMask;
use qr_reader::utils::geometry::PerspectiveTransform;
use qr_reader::{DecodeResult, ECLevel, GrayscaleImage, Point};
use qrcode::bits::Bits;
use qrcode::{Color, EcLevel, QrCode};

/// Quiet zone width in modules
pub const QUIET_ZONE: usize = 4;

const DARK: u8 = 0;
const LIGHT: u8 = 255;

/// Module grid of an encoded symbol, row-major, `true` = dark
#[derive(Debug, Clone, PartialEq)]
pub struct Modules {
    size: usize,
    dark: Vec<bool>,
}

impl Modules {
    /// Encode with the smallest version that fits at `ec_level`
    pub fn encode(data: &[u8], ec_level: ECLevel) -> Self {
        let code = QrCode::with_error_correction_level(data, ec_level_for(ec_level))
            .expect("payload fits a symbol");
        Self::from_code(&code)
    }

    /// Encode at a fixed version
    pub fn encode_version(data: &[u8], version: i16, ec_level: ECLevel) -> Self {
        let code = QrCode::with_version(
            data,
            qrcode::Version::Normal(version),
            ec_level_for(ec_level),
        )
        .expect("payload fits the requested version");
        Self::from_code(&code)
    }

    /// Encode a hand-built bit stream
    pub fn from_bits(bits: Bits, ec_level: ECLevel) -> Self {
        let code = QrCode::with_bits(bits, ec_level_for(ec_level)).expect("valid bit stream");
        Self::from_code(&code)
    }

    fn from_code(code: &QrCode) -> Self {
        Self {
            size: code.width(),
            dark: code.to_colors().into_iter().map(|c| c == Color::Dark).collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.dark[y * self.size + x]
    }

    pub fn toggle(&mut self, x: usize, y: usize) {
        let idx = y * self.size + x;
        self.dark[idx] = !self.dark[idx];
    }

    /// Quarter turn clockwise
    pub fn rotated(&self) -> Self {
        let n = self.size;
        let mut dark = vec![false; n * n];
        for y in 0..n {
            for x in 0..n {
                dark[y * n + x] = self.get(y, n - 1 - x);
            }
        }
        Self { size: n, dark }
    }

    /// `turns` quarter turns clockwise
    pub fn rotated_by(&self, turns: usize) -> Self {
        (0..turns % 4).fold(self.clone(), |m, _| m.rotated())
    }

    /// Mirror image across the main diagonal
    pub fn transposed(&self) -> Self {
        let n = self.size;
        let mut dark = vec![false; n * n];
        for y in 0..n {
            for x in 0..n {
                dark[y * n + x] = self.get(y, x);
            }
        }
        Self { size: n, dark }
    }

    /// Flip the first bit of each listed codeword (in reading order)
    pub fn corrupt_codewords(&mut self, codewords: &[usize]) {
        let version = ((self.size - 17) / 4) as u8;
        let positions = BitstreamExtractor::positions(&FunctionMask::new(version));
        for &cw in codewords {
            let (x, y) = positions[cw * 8];
            self.toggle(x, y);
        }
    }
}

fn ec_level_for(level: ECLevel) -> EcLevel {
    match level {
        ECLevel::L => EcLevel::L,
        ECLevel::M => EcLevel::M,
        ECLevel::Q => EcLevel::Q,
        ECLevel::H => EcLevel::H,
    }
}

/// White canvas that symbols are drawn onto
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![LIGHT; width * height],
        }
    }

    /// Draw `modules` at `scale` pixels per module with the quiet zone's
    /// top-left corner at (`left`, `top`)
    pub fn place(&mut self, modules: &Modules, scale: usize, left: usize, top: usize) {
        let origin_x = left + QUIET_ZONE * scale;
        let origin_y = top + QUIET_ZONE * scale;
        for my in 0..modules.size() {
            for mx in 0..modules.size() {
                if !modules.get(mx, my) {
                    continue;
                }
                for py in 0..scale {
                    let row = (origin_y + my * scale + py) * self.width;
                    let start = row + origin_x + mx * scale;
                    self.pixels[start..start + scale].fill(DARK);
                }
            }
        }
    }

    pub fn into_image(self) -> GrayscaleImage {
        GrayscaleImage::new(self.width, self.height, self.pixels).expect("canvas dimensions")
    }

    pub fn into_raw(self) -> (u32, u32, Vec<u8>) {
        (self.width as u32, self.height as u32, self.pixels)
    }
}

/// Side in pixels of a rendered symbol including its quiet zone
pub fn rendered_side(modules: &Modules, scale: usize) -> usize {
    (modules.size() + 2 * QUIET_ZONE) * scale
}

/// Render one symbol with its quiet zone
pub fn render(modules: &Modules, scale: usize) -> GrayscaleImage {
    let side = rendered_side(modules, scale);
    let mut canvas = Canvas::new(side, side);
    canvas.place(modules, scale, 0, 0);
    canvas.into_image()
}

/// Map `image` onto the quadrilateral `quad` (corners clockwise from the
/// top left, as fractions of the image size), nearest-neighbour, light
/// outside the quad
pub fn warp(image: &GrayscaleImage, quad: [(f32, f32); 4]) -> GrayscaleImage {
    let (w, h) = (image.width(), image.height());
    let (wf, hf) = (w as f32, h as f32);
    let dst = quad.map(|(x, y)| Point::new(x * wf, y * hf));
    let src = [
        Point::new(0.0, 0.0),
        Point::new(wf, 0.0),
        Point::new(wf, hf),
        Point::new(0.0, hf),
    ];
    let inverse = PerspectiveTransform::from_points(&dst, &src).expect("non-degenerate quad");

    let mut pixels = vec![LIGHT; w * h];
    for y in 0..h {
        for x in 0..w {
            let p = inverse.transform(&Point::new(x as f32 + 0.5, y as f32 + 0.5));
            if p.x >= 0.0 && p.y >= 0.0 && p.x < wf && p.y < hf {
                pixels[y * w + x] = image.get(p.x as usize, p.y as usize).expect("in bounds");
            }
        }
    }
    GrayscaleImage::new(w, h, pixels).expect("same dimensions")
}

/// Spread the ink by `radius` pixels: each pixel takes the darkest value
/// in its square neighbourhood
pub fn spread_ink(image: &GrayscaleImage, radius: usize) -> GrayscaleImage {
    let (w, h) = (image.width(), image.height());
    let samples = image.as_slice();
    let mut pixels = vec![LIGHT; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut darkest = LIGHT;
            for ny in y.saturating_sub(radius)..(y + radius + 1).min(h) {
                for nx in x.saturating_sub(radius)..(x + radius + 1).min(w) {
                    darkest = darkest.min(samples[ny * w + nx]);
                }
            }
            pixels[y * w + x] = darkest;
        }
    }
    GrayscaleImage::new(w, h, pixels).expect("same dimensions")
}

/// Payloads of the successfully decoded candidates
pub fn payloads(results: &[DecodeResult]) -> Vec<Vec<u8>> {
    results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|s| s.payload.clone())
        .collect()
}
