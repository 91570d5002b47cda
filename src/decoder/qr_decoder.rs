/// Main QR code decoder - wires everything together
use crate::decoder::bitstream::BitstreamExtractor;
use crate::decoder::format::FormatInfo;
use crate::decoder::function_mask::FunctionMask;
use crate::decoder::unmask::unmask;
use crate::error::DecodeError;
use crate::models::{BitMatrix, DecodedSymbol, SymbolGrid, Version};
use tracing::{debug, trace};

mod payload;


/// Turns a sampled module grid into a decoded symbol
pub struct QrDecoder;

impl QrDecoder {
    /// Decode a sampled grid.
    ///
    /// When the grid fails and `try_mirrored` is set, its transpose is
    /// decoded as well. A mirrored success is flagged on the result; if both
    /// attempts fail the error from the unmirrored attempt is returned.
    pub fn decode(grid: &SymbolGrid, try_mirrored: bool) -> Result<DecodedSymbol, DecodeError> {
        let first = match Self::decode_modules(grid.modules(), grid.version()) {
            Ok(symbol) => return Ok(Self::finish(symbol, grid, false)),
            Err(err) => err,
        };
        if !try_mirrored {
            return Err(first);
        }

        debug!(error = %first, "retrying with mirrored grid");
        match Self::decode_modules(&grid.modules().transposed(), grid.version()) {
            Ok(symbol) => Ok(Self::finish(symbol, grid, true)),
            Err(second) => {
                trace!(error = %second, "mirrored grid failed as well");
                Err(first)
            }
        }
    }

    /// Format -> unmask -> codewords -> error correction -> segments
    fn decode_modules(modules: &BitMatrix, version: Version) -> Result<DecodedSymbol, DecodeError> {
        let format = FormatInfo::extract(modules).ok_or(DecodeError::FormatError)?;
        trace!(
            version = version.number(),
            ec_level = ?format.ec_level,
            mask = ?format.mask_pattern,
            "format info"
        );

        let func = FunctionMask::new(version.number());
        let mut unmasked = modules.clone();
        unmask(&mut unmasked, format.mask_pattern, &func);

        let codewords = BitstreamExtractor::codewords(&unmasked, &func);
        let data = payload::deinterleave_and_correct(&codewords, version, format.ec_level)?;
        let payload = payload::decode_payload(&data, version)?;

        Ok(DecodedSymbol {
            payload: payload.bytes,
            version,
            ec_level: format.ec_level,
            mask: format.mask_pattern,
            data_type: payload.data_type,
            eci: payload.eci,
            structured_append: payload.structured_append,
            mirrored: false,
            corners: [Default::default(); 4],
        })
    }

    /// Attach image geometry. A mirrored symbol runs its top edge down the
    /// grid's left side, so the top-right and bottom-left corners swap.
    fn finish(mut symbol: DecodedSymbol, grid: &SymbolGrid, mirrored: bool) -> DecodedSymbol {
        let [tl, tr, br, bl] = grid.corners();
        symbol.corners = if mirrored {
            [tl, bl, br, tr]
        } else {
            [tl, tr, br, bl]
        };
        symbol.mirrored = mirrored;
        symbol
    }
}
