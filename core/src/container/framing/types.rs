use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::MAX_CHUNK_SIZE;
use crate::crypto::TAG_LEN;
use crate::utils::{compute_crc32, enum_name_or_hex};

/// Largest block body accepted on either side: one full chunk plus its AEAD
/// tag, with headroom for stream-open bodies carrying long names and extras.
pub const MAX_BLOCK_BODY: usize = MAX_CHUNK_SIZE + TAG_LEN + 2 * (u16::MAX as usize) + 64;

/// Block type identifiers.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum BlockType {
    RecipientKey    = 0x01,
    PlainStream     = 0x02,
    EncryptedStream = 0x03,
    Data            = 0x04,
    EndOfStream     = 0x05,
    EndOfContainer  = 0x7F,
}

impl BlockType {
    #[inline(always)]
    pub fn try_from_u8(v: u8) -> Result<Self, BlockError> {
        BlockType::try_from(v).map_err(|_| BlockError::InvalidBlockType(v))
    }

    /// Human-readable name for logs and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::RecipientKey => "recipient-key",
            BlockType::PlainStream => "plain-stream",
            BlockType::EncryptedStream => "encrypted-stream",
            BlockType::Data => "data",
            BlockType::EndOfStream => "end-of-stream",
            BlockType::EndOfContainer => "end-of-container",
        }
    }
}

/// Canonical block header (fixed size), all fields little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub block_type: BlockType,
    pub body_len: u32,
    /// CRC-32 of the body bytes.
    pub body_crc32: u32,
}

impl BlockHeader {
    pub const LEN: usize = 1 // block_type
        + 4                  // body_len
        + 4;                 // body_crc32

    /// Header describing `body`, with length and CRC filled in.
    pub fn for_body(block_type: BlockType, body: &[u8]) -> Result<Self, BlockError> {
        if body.len() > MAX_BLOCK_BODY {
            return Err(BlockError::BodyTooLarge { have: body.len(), max: MAX_BLOCK_BODY });
        }
        Ok(Self {
            block_type,
            body_len: body.len() as u32,
            body_crc32: compute_crc32(body),
        })
    }
}

/// Borrowed view over a decoded block.
#[derive(Debug, Clone, Copy)]
pub struct BlockView<'a> {
    pub header: BlockHeader,
    pub body: &'a [u8],
}

#[derive(Debug)]
pub enum BlockError {
    InvalidBlockType(u8),
    BodyTooLarge { have: usize, max: usize },
    CrcMismatch { block_type: BlockType, have: u32, need: u32 },
    LengthMismatch { expected: usize, actual: usize },
    Truncated,
    Malformed(String),
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BlockError::*;
        match self {
            InvalidBlockType(v) =>
                write!(f, "invalid block type: {}", enum_name_or_hex::<BlockType>(*v)),
            BodyTooLarge { have, max } =>
                write!(f, "block body too large: {} > {}", have, max),
            CrcMismatch { block_type, have, need } =>
                write!(f, "{} block crc32 mismatch: stored 0x{:08x}, computed 0x{:08x}",
                    block_type.as_str(), have, need),
            LengthMismatch { expected, actual } =>
                write!(f, "length mismatch: expected {}, got {}", expected, actual),
            Truncated =>
                write!(f, "truncated block"),
            Malformed(msg) =>
                write!(f, "malformed block: {}", msg),
        }
    }
}

impl std::error::Error for BlockError {}
