use crate::decoder::modes::{
    BitReader, alphanumeric::AlphanumericDecoder, byte::ByteDecoder, kanji::KanjiDecoder,
    numeric::NumericDecoder,
};
use crate::decoder::reed_solomon::ReedSolomonDecoder;
use crate::decoder::tables::ec_block_info;
use crate::error::DecodeError;
use crate::models::{DataType, ECLevel, StructuredAppend, Version};
use tracing::trace;

/// Mode indicators
const MODE_TERMINATOR: u32 = 0b0000;
const MODE_NUMERIC: u32 = 0b0001;
const MODE_ALPHANUMERIC: u32 = 0b0010;
const MODE_STRUCTURED_APPEND: u32 = 0b0011;
const MODE_BYTE: u32 = 0b0100;
const MODE_FNC1_FIRST: u32 = 0b0101;
const MODE_ECI: u32 = 0b0111;
const MODE_KANJI: u32 = 0b1000;
const MODE_FNC1_SECOND: u32 = 0b1001;

/// Parsed data segments of one symbol
#[derive(Debug, Default, PartialEq)]
pub(super) struct Payload {
    pub bytes: Vec<u8>,
    pub data_type: Option<DataType>,
    pub eci: Option<u32>,
    pub structured_append: Option<StructuredAppend>,
}

/// Split interleaved codewords into blocks, correct each block and
/// concatenate their data codewords.
pub(super) fn deinterleave_and_correct(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> Result<Vec<u8>, DecodeError> {
    let info = ec_block_info(version, ec_level);
    if codewords.len() != info.total_codewords {
        return Err(DecodeError::UncorrectableData);
    }

    let long_len = info.short_data_len() + 1;

    let mut blocks: Vec<Vec<u8>> = (0..info.num_blocks)
        .map(|_| Vec::with_capacity(long_len + info.ecc_per_block))
        .collect();

    // Data codewords round-robin; short blocks sit out the final round
    let mut stream = codewords.iter().copied();
    for i in 0..long_len {
        for (b, block) in blocks.iter_mut().enumerate() {
            if i < info.data_len(b) {
                block.extend(stream.next());
            }
        }
    }
    for _ in 0..info.ecc_per_block {
        for block in blocks.iter_mut() {
            block.extend(stream.next());
        }
    }

    let rs = ReedSolomonDecoder::new(info.ecc_per_block);
    let mut data_out = Vec::with_capacity(info.total_data_codewords());
    for (b, block) in blocks.iter_mut().enumerate() {
        let corrected = rs.decode(block)?;
        if corrected > 0 {
            trace!(block = b, corrected, "reed-solomon corrected block");
        }
        data_out.extend_from_slice(&block[..info.data_len(b)]);
    }

    Ok(data_out)
}

/// Walk the segment list of the corrected data codewords
pub(super) fn decode_payload(data_codewords: &[u8], version: Version) -> Result<Payload, DecodeError> {
    let mut reader = BitReader::new(data_codewords);
    let mut payload = Payload::default();

    while reader.remaining() >= 4 {
        let mode = reader.read_bits(4)?;
        let data_type = match mode {
            MODE_TERMINATOR => break,
            MODE_NUMERIC => {
                let count = read_count(&mut reader, DataType::Numeric, version)?;
                payload.bytes.extend(NumericDecoder::decode(&mut reader, count)?);
                DataType::Numeric
            }
            MODE_ALPHANUMERIC => {
                let count = read_count(&mut reader, DataType::Alphanumeric, version)?;
                payload.bytes.extend(AlphanumericDecoder::decode(&mut reader, count)?);
                DataType::Alphanumeric
            }
            MODE_BYTE => {
                let count = read_count(&mut reader, DataType::Byte, version)?;
                payload.bytes.extend(ByteDecoder::decode(&mut reader, count)?);
                DataType::Byte
            }
            MODE_KANJI => {
                let count = read_count(&mut reader, DataType::Kanji, version)?;
                payload.bytes.extend(KanjiDecoder::decode(&mut reader, count)?);
                DataType::Kanji
            }
            MODE_ECI => {
                payload.eci = Some(read_eci(&mut reader)?);
                continue;
            }
            MODE_STRUCTURED_APPEND => {
                let index = reader.read_bits(4)? as u8;
                let total = reader.read_bits(4)? as u8 + 1;
                let parity = reader.read_bits(8)? as u8;
                payload.structured_append = Some(StructuredAppend {
                    index,
                    total,
                    parity,
                });
                continue;
            }
            MODE_FNC1_FIRST => continue,
            MODE_FNC1_SECOND => {
                // Application indicator
                reader.read_bits(8)?;
                continue;
            }
            other => {
                return Err(DecodeError::malformed(format!("unknown mode indicator {other:#06b}")));
            }
        };
        payload.data_type = payload.data_type.max(Some(data_type));
    }

    Ok(payload)
}

/// ECI designator: 1, 2 or 3 bytes selected by the leading bits
fn read_eci(reader: &mut BitReader) -> Result<u32, DecodeError> {
    let first = reader.read_bits(8)?;
    if first & 0x80 == 0 {
        Ok(first)
    } else if first & 0xC0 == 0x80 {
        Ok(((first & 0x3F) << 8) | reader.read_bits(8)?)
    } else if first & 0xE0 == 0xC0 {
        Ok(((first & 0x1F) << 16) | reader.read_bits(16)?)
    } else {
        Err(DecodeError::malformed(format!("invalid ECI designator {first:#04x}")))
    }
}

fn read_count(reader: &mut BitReader, mode: DataType, version: Version) -> Result<usize, DecodeError> {
    Ok(reader.read_bits(char_count_bits(mode, version))? as usize)
}

/// Width of the character count field
pub(super) fn char_count_bits(mode: DataType, version: Version) -> usize {
    let band = match version.number() {
        1..=9 => 0,
        10..=26 => 1,
        _ => 2,
    };
    let widths = match mode {
        DataType::Numeric => [10, 12, 14],
        DataType::Alphanumeric => [9, 11, 13],
        DataType::Byte => [8, 16, 16],
        DataType::Kanji => [8, 10, 12],
    };
    widths[band]
}
