use std::fmt;
use std::io;

use crate::constants::{DEFAULT_CHUNK_SIZE, KEY_ID_LEN};
use crate::container::framing::{BlockError, BlockType};
use crate::crypto::CryptoError;
use crate::headers::{CipherSuite, HeaderError, HkdfPrf};

/// Parameters fixed in the container header when a writer is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    pub cipher: CipherSuite,
    pub hkdf_prf: HkdfPrf,
    pub chunk_size: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            cipher: CipherSuite::Chacha20Poly1305,
            hkdf_prf: HkdfPrf::Sha256,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// What one closed stream put on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub encrypted: bool,
    /// Data blocks written.
    pub frames: u32,
    /// Bytes handed to the stream.
    pub plaintext_len: u64,
    /// Data block bodies (ciphertext and tags for encrypted streams).
    pub payload_len: u64,
    /// Everything else: block headers, the open block and the trailer block.
    pub overhead_len: u64,
}

/// One stream recovered by the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    pub name: String,
    pub extra: Vec<u8>,
    pub encrypted: bool,
    /// `None` for encrypted streams read without a private key.
    pub data: Option<Vec<u8>>,
}

#[derive(Debug)]
pub enum ContainerError {
    Io(io::Error),
    Header(HeaderError),
    Block(BlockError),
    Crypto(CryptoError),

    /// A recipient key was already registered.
    KeyAlreadyRegistered,

    /// Key registration attempted after streams were opened.
    KeyAfterStreams { opened: u32 },

    /// An encrypted stream needs a registered recipient key.
    MissingRecipientKey,

    /// Stream names must be non-empty and fit in a u16 length prefix.
    InvalidStreamName(String),

    /// Block sequence does not follow the container grammar.
    UnexpectedBlock { expected: &'static str, found: BlockType },

    /// Input ended before the end-of-container block.
    Truncated,

    /// Stream or container trailer disagrees with what was read.
    TrailerMismatch(String),

    /// The private key does not belong to the registered recipient.
    RecipientMismatch { have: [u8; KEY_ID_LEN], need: [u8; KEY_ID_LEN] },
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ContainerError::*;
        match self {
            Io(e) => write!(f, "io error: {}", e),
            Header(e) => write!(f, "header error: {}", e),
            Block(e) => write!(f, "block error: {}", e),
            Crypto(e) => write!(f, "crypto error: {}", e),
            KeyAlreadyRegistered =>
                write!(f, "encryption key already registered"),
            KeyAfterStreams { opened } =>
                write!(f, "encryption key must be registered before streams ({} already opened)", opened),
            MissingRecipientKey =>
                write!(f, "encrypted stream requires a registered encryption key"),
            InvalidStreamName(name) =>
                write!(f, "invalid stream name: {:?}", name),
            UnexpectedBlock { expected, found } =>
                write!(f, "unexpected {} block, expected {}", found.as_str(), expected),
            Truncated =>
                write!(f, "container is truncated"),
            TrailerMismatch(msg) =>
                write!(f, "trailer mismatch: {}", msg),
            RecipientMismatch { have, need } =>
                write!(f, "private key {} does not match recipient {}", hex::encode(have), hex::encode(need)),
        }
    }
}

impl std::error::Error for ContainerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContainerError::Io(e) => Some(e),
            ContainerError::Header(e) => Some(e),
            ContainerError::Block(e) => Some(e),
            ContainerError::Crypto(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ContainerError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            ContainerError::Truncated
        } else {
            ContainerError::Io(e)
        }
    }
}

impl From<HeaderError> for ContainerError {
    fn from(e: HeaderError) -> Self {
        ContainerError::Header(e)
    }
}

impl From<BlockError> for ContainerError {
    fn from(e: BlockError) -> Self {
        ContainerError::Block(e)
    }
}

impl From<CryptoError> for ContainerError {
    fn from(e: CryptoError) -> Self {
        ContainerError::Crypto(e)
    }
}
