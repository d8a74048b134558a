//! Wire framing for the container.
//!
//! Responsibilities:
//! - Define block headers and typed block bodies
//! - Encode blocks into a canonical byte layout
//! - Decode blocks with strict validation
//!
//! Non-responsibilities:
//! - Cryptography
//! - IO

pub mod types;
pub mod encode;
pub mod decode;
pub mod bodies;

pub use types::{
    BlockError,
    BlockHeader,
    BlockType,
    BlockView,
    MAX_BLOCK_BODY,
};
pub use encode::{encode_block, encode_block_header};
pub use decode::{decode_block, parse_block_header, verify_block_body};
pub use bodies::{ContainerTrailer, RecipientKeyBody, StreamOpenBody, StreamTrailer};
