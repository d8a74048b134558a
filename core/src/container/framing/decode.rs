use byteorder::{ByteOrder, LittleEndian};

use crate::container::framing::types::{BlockError, BlockHeader, BlockType, BlockView, MAX_BLOCK_BODY};
use crate::utils::compute_crc32;

/// Parse the fixed block header at the start of `wire`.
#[inline]
pub fn parse_block_header(wire: &[u8]) -> Result<BlockHeader, BlockError> {
    if wire.len() < BlockHeader::LEN {
        return Err(BlockError::Truncated);
    }

    let block_type = BlockType::try_from_u8(wire[0])?;
    let body_len = LittleEndian::read_u32(&wire[1..5]);
    let body_crc32 = LittleEndian::read_u32(&wire[5..9]);

    if body_len as usize > MAX_BLOCK_BODY {
        return Err(BlockError::BodyTooLarge { have: body_len as usize, max: MAX_BLOCK_BODY });
    }

    Ok(BlockHeader {
        block_type,
        body_len,
        body_crc32,
    })
}

/// Check a body against the CRC carried in its header.
#[inline]
pub fn verify_block_body(header: &BlockHeader, body: &[u8]) -> Result<(), BlockError> {
    if body.len() != header.body_len as usize {
        return Err(BlockError::LengthMismatch {
            expected: header.body_len as usize,
            actual: body.len(),
        });
    }

    let computed = compute_crc32(body);
    if computed != header.body_crc32 {
        return Err(BlockError::CrcMismatch {
            block_type: header.block_type,
            have: header.body_crc32,
            need: computed,
        });
    }
    Ok(())
}

/// Decode exactly one block; trailing bytes are rejected.
pub fn decode_block(wire: &[u8]) -> Result<BlockView<'_>, BlockError> {
    let header = parse_block_header(wire)?;
    let end = BlockHeader::LEN + header.body_len as usize;

    if wire.len() < end {
        return Err(BlockError::Truncated);
    }
    if wire.len() > end {
        return Err(BlockError::LengthMismatch {
            expected: end,
            actual: wire.len(),
        });
    }

    let body = &wire[BlockHeader::LEN..end];
    verify_block_body(&header, body)?;

    Ok(BlockView { header, body })
}
