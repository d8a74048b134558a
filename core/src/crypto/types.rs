use std::fmt;
use crate::headers::{CipherSuite, HeaderError, HkdfPrf};
use crate::utils::enum_name_or_hex;

/// Stable key and nonce sizes.
pub const KEY_LEN_32: usize = 32;

/// Standard 12-byte nonce length for AES-GCM and ChaCha20-Poly1305.
pub const NONCE_LEN_12: usize = 12;

/// Fixed AEAD tag length (bytes).
pub const TAG_LEN: usize = 16;

/// Per-frame fields bound into the AEAD associated data.
///
/// All fields are little-endian on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameAad {
    pub block_type: u8,
    pub frame_index: u32,
    /// Plaintext length of this frame (data frames may be shorter than the chunk size).
    pub plaintext_len: u32,
}

impl FrameAad {
    pub const LEN: usize = 1 // block_type
        + 4                  // frame_index
        + 4;                 // plaintext_len
}

#[derive(Debug)]
pub enum AadError {
    /// The stream prefix was empty, meaning the stream context was never bound.
    MissingPrefix,

    /// Validation failure with context.
    Validation(String),
}

impl fmt::Display for AadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AadError::MissingPrefix =>
                write!(f, "AAD stream prefix is empty"),
            AadError::Validation(msg) =>
                write!(f, "AAD validation error: {}", msg),
        }
    }
}

impl std::error::Error for AadError {}

impl From<HeaderError> for AadError {
    fn from(e: HeaderError) -> Self {
        AadError::Validation(e.to_string())
    }
}

#[derive(Debug)]
pub enum NonceError {
    /// Salt is invalid (e.g., all zeros).
    InvalidSalt,
}

impl fmt::Display for NonceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonceError::InvalidSalt => write!(f, "invalid salt: all zeros"),
        }
    }
}

impl std::error::Error for NonceError {}

#[derive(Debug)]
pub enum CryptoError {
    /// Unsupported cipher suite ID from header.
    UnsupportedCipher { cipher_id: u16 },

    /// Unsupported HKDF PRF selection from header.
    UnsupportedPrf { prf_id: u16 },

    /// Invalid key length provided to cipher.
    InvalidKeyLen { expected: usize, actual: usize },

    /// Nonce length mismatch (must be 12 bytes for supported ciphers).
    InvalidNonceLen { expected: usize, actual: usize },

    /// AEAD tag mismatch (authentication failure).
    TagMismatch,

    /// RSA key wrapping or unwrapping failed.
    KeyWrap(String),

    /// General derivation or runtime error with context.
    Failure(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CryptoError::*;
        match self {
            UnsupportedCipher { cipher_id } =>
                write!(f, "unsupported cipher suite: {}",
                       enum_name_or_hex::<CipherSuite>(*cipher_id)),
            UnsupportedPrf { prf_id } =>
                write!(f, "unsupported HKDF PRF: {}",
                       enum_name_or_hex::<HkdfPrf>(*prf_id)),
            InvalidKeyLen { expected, actual } =>
                write!(f, "invalid key length: expected={}, actual={}", expected, actual),
            InvalidNonceLen { expected, actual } =>
                write!(f, "invalid nonce length: expected={}, actual={}", expected, actual),
            TagMismatch =>
                write!(f, "AEAD tag mismatch"),
            KeyWrap(msg) =>
                write!(f, "key wrap failure: {}", msg),
            Failure(msg) =>
                write!(f, "crypto failure: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}

impl From<NonceError> for CryptoError {
    fn from(e: NonceError) -> Self {
        CryptoError::Failure(e.to_string())
    }
}

impl From<AadError> for CryptoError {
    fn from(e: AadError) -> Self {
        CryptoError::Failure(e.to_string())
    }
}
