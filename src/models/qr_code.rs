use super::{BitMatrix, Point};

/// QR Code version (1-40)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    /// Smallest version
    pub const MIN: Version = Version(1);
    /// Largest version
    pub const MAX: Version = Version(40);

    /// Validate a version number
    pub fn new(number: u8) -> Option<Self> {
        (1..=40).contains(&number).then_some(Self(number))
    }

    /// Version whose grid side is `size` modules, if any
    pub fn from_size(size: usize) -> Option<Self> {
        if size < 21 || (size - 17) % 4 != 0 {
            return None;
        }
        u8::try_from((size - 17) / 4).ok().and_then(Self::new)
    }

    /// Get the version number (1-40)
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Get the size in modules (width = height)
    pub fn size(&self) -> usize {
        4 * self.0 as usize + 17
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L,
    /// Medium (~15% recovery capacity)
    M,
    /// Quartile (~25% recovery capacity)
    Q,
    /// High (~30% recovery capacity)
    H,
}

impl ECLevel {
    /// Level from the two format bits (01=L, 00=M, 11=Q, 10=H)
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    /// Row index into the block tables (L, M, Q, H)
    pub(crate) fn table_index(&self) -> usize {
        match self {
            ECLevel::L => 0,
            ECLevel::M => 1,
            ECLevel::Q => 2,
            ECLevel::H => 3,
        }
    }
}

/// Mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskPattern {
    /// (x + y) % 2 == 0
    Pattern0 = 0,
    /// y % 2 == 0
    Pattern1 = 1,
    /// x % 3 == 0
    Pattern2 = 2,
    /// (x + y) % 3 == 0
    Pattern3 = 3,
    /// (x/3 + y/2) % 2 == 0
    Pattern4 = 4,
    /// (x*y)%2 + (x*y)%3 == 0
    Pattern5 = 5,
    /// ((x*y)%2 + (x*y)%3) % 2 == 0
    Pattern6 = 6,
    /// ((x+y)%2 + (x*y)%3) % 2 == 0
    Pattern7 = 7,
}

impl MaskPattern {
    /// Get mask pattern from the three low format bits
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => MaskPattern::Pattern0,
            1 => MaskPattern::Pattern1,
            2 => MaskPattern::Pattern2,
            3 => MaskPattern::Pattern3,
            4 => MaskPattern::Pattern4,
            5 => MaskPattern::Pattern5,
            6 => MaskPattern::Pattern6,
            _ => MaskPattern::Pattern7,
        }
    }

    /// Whether the module at column `x`, row `y` is inverted by this mask
    pub fn is_masked(&self, x: usize, y: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (x + y) % 2 == 0,
            MaskPattern::Pattern1 => y % 2 == 0,
            MaskPattern::Pattern2 => x % 3 == 0,
            MaskPattern::Pattern3 => (x + y) % 3 == 0,
            MaskPattern::Pattern4 => (x / 3 + y / 2) % 2 == 0,
            MaskPattern::Pattern5 => (x * y) % 2 + (x * y) % 3 == 0,
            MaskPattern::Pattern6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
            MaskPattern::Pattern7 => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
        }
    }
}

/// Widest data mode found in a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataType {
    /// Digits only
    Numeric,
    /// 0-9, A-Z, space and $%*+-./:
    Alphanumeric,
    /// 8-bit bytes
    Byte,
    /// Shift-JIS double-byte characters
    Kanji,
}

/// Structured append header (symbol `index` of `total`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructuredAppend {
    /// Position of this symbol in the sequence (0-based)
    pub index: u8,
    /// Number of symbols in the sequence
    pub total: u8,
    /// Parity byte of the complete message
    pub parity: u8,
}

/// Sampled module grid of one symbol candidate (true = dark module)
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolGrid {
    modules: BitMatrix,
    version: Version,
    corners: [Point; 4],
}

impl SymbolGrid {
    /// Wrap a square module grid; its side must be a valid version size
    pub fn new(modules: BitMatrix, corners: [Point; 4]) -> Option<Self> {
        if modules.width() != modules.height() {
            return None;
        }
        let version = Version::from_size(modules.width())?;
        Some(Self {
            modules,
            version,
            corners,
        })
    }

    /// Module values
    pub fn modules(&self) -> &BitMatrix {
        &self.modules
    }

    /// Version implied by the grid side
    pub fn version(&self) -> Version {
        self.version
    }

    /// Image-space corners: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Point; 4] {
        self.corners
    }
}

/// A successfully decoded symbol
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSymbol {
    /// Raw payload bytes (kanji segments as Shift-JIS)
    pub payload: Vec<u8>,
    /// Symbol version
    pub version: Version,
    /// Error correction level
    pub ec_level: ECLevel,
    /// Mask pattern used
    pub mask: MaskPattern,
    /// Widest data mode in the payload (None for an empty payload)
    pub data_type: Option<DataType>,
    /// ECI assignment number, if one was signalled
    pub eci: Option<u32>,
    /// Structured append header, if present
    pub structured_append: Option<StructuredAppend>,
    /// Whether the symbol was decoded from its mirror image
    pub mirrored: bool,
    /// Symbol corners in image coordinates: top-left, top-right, bottom-right, bottom-left
    pub corners: [Point; 4],
}

impl DecodedSymbol {
    /// Payload as UTF-8, when it is valid UTF-8
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_size() {
        assert_eq!(Version::new(1).unwrap().size(), 21);
        assert_eq!(Version::new(2).unwrap().size(), 25);
        assert_eq!(Version::MAX.size(), 177);
        assert_eq!(Version::new(0), None);
        assert_eq!(Version::new(41), None);
        assert_eq!(Version::from_size(45), Version::new(7));
        assert_eq!(Version::from_size(46), None);
        assert_eq!(Version::from_size(17), None);
    }

    #[test]
    fn test_symbol_grid_size() {
        let corners = [Point::new(0.0, 0.0); 4];
        let grid = SymbolGrid::new(BitMatrix::new(25, 25), corners).unwrap();
        assert_eq!(grid.version().number(), 2);
        assert!(SymbolGrid::new(BitMatrix::new(24, 24), corners).is_none());
        assert!(SymbolGrid::new(BitMatrix::new(21, 25), corners).is_none());
    }

    #[test]
    fn test_ec_level() {
        assert_eq!(ECLevel::from_format_bits(0b01), ECLevel::L);
        assert_eq!(ECLevel::from_format_bits(0b00), ECLevel::M);
        assert_eq!(ECLevel::from_format_bits(0b11), ECLevel::Q);
        assert_eq!(ECLevel::from_format_bits(0b10), ECLevel::H);
    }

    #[test]
    fn test_mask_pattern() {
        let mask = MaskPattern::Pattern0;
        assert!(mask.is_masked(0, 0));
        assert!(!mask.is_masked(0, 1));
        assert!(mask.is_masked(1, 1));

        // Pattern 4 divides columns by 3 and rows by 2
        let mask = MaskPattern::from_bits(4);
        assert!(mask.is_masked(2, 1));
        assert!(!mask.is_masked(3, 0));
        assert!(!mask.is_masked(0, 2));
    }
}
