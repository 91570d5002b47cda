/// Grayscale input image
pub mod image;
/// Packed boolean matrix
pub mod matrix;
/// 2D point in image or module space
pub mod point;
/// Symbol metadata, sampled grids and decode results
pub mod qr_code;

pub use image::GrayscaleImage;
pub use matrix::BitMatrix;
pub use point::Point;
pub use qr_code::{
    DataType, DecodedSymbol, ECLevel, MaskPattern, StructuredAppend, SymbolGrid, Version,
};
