use byteorder::{LittleEndian, WriteBytesExt};

use crate::container::framing::types::{BlockError, BlockHeader, BlockType};

/// Encode a block header into its fixed wire form.
///
/// Layout:
///
/// ```text
/// [ block_type (1) ]
/// [ body_len   (4) ]
/// [ body_crc32 (4) ]
/// ```
pub fn encode_block_header(header: &BlockHeader) -> [u8; BlockHeader::LEN] {
    let mut out = [0u8; BlockHeader::LEN];
    out[0] = header.block_type as u8;
    out[1..5].copy_from_slice(&header.body_len.to_le_bytes());
    out[5..9].copy_from_slice(&header.body_crc32.to_le_bytes());
    out
}

/// Encode a whole block (header + body) into one buffer.
pub fn encode_block(block_type: BlockType, body: &[u8]) -> Result<Vec<u8>, BlockError> {
    let header = BlockHeader::for_body(block_type, body)?;
    let expected = BlockHeader::LEN + body.len();

    let mut out = Vec::with_capacity(expected);
    out.write_u8(header.block_type as u8).map_err(|e| BlockError::Malformed(e.to_string()))?;
    out.write_u32::<LittleEndian>(header.body_len).map_err(|e| BlockError::Malformed(e.to_string()))?;
    out.write_u32::<LittleEndian>(header.body_crc32).map_err(|e| BlockError::Malformed(e.to_string()))?;
    out.extend_from_slice(body);

    if out.len() != expected {
        return Err(BlockError::LengthMismatch {
            expected,
            actual: out.len(),
        });
    }

    Ok(out)
}
