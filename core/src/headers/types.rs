//! headers/types.rs
//! Container header struct and typed views.
//!
//! Notes:
//! - Fixed field sizes keep the wire layout stable.
//! - Little-endian for every multi-byte integer.
//! - Reserved bytes allow future fields without changing size; always zero them.
//! - The header is 20 bytes and ends with a CRC-32 over the preceding 16.

use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::{cipher_ids, prf_ids};
use crate::constants::{CONTAINER_V1, DEFAULT_CHUNK_SIZE, MAGIC_RPK1, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
use crate::utils::{enum_name_or_hex, fmt_bytes};

/// Fixed header size in bytes.
pub const HEADER_LEN_V1: usize = 20;

/// Number of leading header bytes covered by the header CRC.
pub const HEADER_CRC_SPAN: usize = 16;

/// Cipher suites (header registry).
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum CipherSuite {
    Aes256Gcm        = cipher_ids::AES256_GCM,
    Chacha20Poly1305 = cipher_ids::CHACHA20_POLY1305,
}
impl CipherSuite {
    pub fn verify(raw: u16) -> Result<(), HeaderError> {
        match raw {
            x if x == CipherSuite::Aes256Gcm as u16        => Ok(()),
            x if x == CipherSuite::Chacha20Poly1305 as u16 => Ok(()),
            _ => Err(HeaderError::UnknownCipherSuite { raw }),
        }
    }
}

/// HKDF PRF choices (header registry).
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum HkdfPrf {
    Sha256 = prf_ids::SHA256,
    Sha512 = prf_ids::SHA512,
}
impl HkdfPrf {
    pub fn verify(raw: u16) -> Result<(), HeaderError> {
        match raw {
            x if x == HkdfPrf::Sha256 as u16 => Ok(()),
            x if x == HkdfPrf::Sha512 as u16 => Ok(()),
            _ => Err(HeaderError::UnknownHkdfPrf { raw }),
        }
    }
}

/// Container header written once at offset 0.
#[repr(C)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub magic: [u8; 4],   // "RPK1" magic marker
    pub version: u16,     // format version
    pub cipher: u16,      // cipher enum, used by every encrypted stream
    pub hkdf_prf: u16,    // PRF enum for per-stream key derivation
    pub reserved: u16,    // must be zero
    pub chunk_size: u32,  // max plaintext bytes per data block
    pub crc32: u32,       // CRC-32 over bytes 0..16
}

impl Default for ContainerHeader {
    /// ChaCha20-Poly1305, HKDF-SHA256, 64 KiB chunks.
    fn default() -> Self {
        Self {
            magic: MAGIC_RPK1,
            version: CONTAINER_V1,
            cipher: CipherSuite::Chacha20Poly1305 as u16,
            hkdf_prf: HkdfPrf::Sha256 as u16,
            reserved: 0,
            chunk_size: DEFAULT_CHUNK_SIZE as u32,
            crc32: 0,
        }
    }
}

impl ContainerHeader {
    pub const LEN: usize = HEADER_LEN_V1;

    pub fn new(cipher: CipherSuite, hkdf_prf: HkdfPrf, chunk_size: u32) -> Self {
        Self {
            cipher: cipher as u16,
            hkdf_prf: hkdf_prf as u16,
            chunk_size,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.magic != MAGIC_RPK1 {
            return Err(HeaderError::InvalidMagic {
                have: self.magic,
                need: MAGIC_RPK1,
            });
        }

        if self.version != CONTAINER_V1 {
            return Err(HeaderError::InvalidVersion { have: self.version });
        }

        CipherSuite::verify(self.cipher)?;
        HkdfPrf::verify(self.hkdf_prf)?;

        let chunk = self.chunk_size as usize;
        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&chunk) {
            return Err(HeaderError::InvalidChunkSize {
                have: self.chunk_size,
                min: MIN_CHUNK_SIZE as u32,
                max: MAX_CHUNK_SIZE as u32,
            });
        }

        if self.reserved != 0 {
            return Err(HeaderError::ReservedBytesNonZero { reserved: self.reserved });
        }

        Ok(())
    }

    /// Typed view of `cipher`. Only valid after `validate()`.
    pub fn cipher_suite(&self) -> Result<CipherSuite, HeaderError> {
        CipherSuite::try_from(self.cipher).map_err(|_| HeaderError::UnknownCipherSuite { raw: self.cipher })
    }

    /// Typed view of `hkdf_prf`.
    pub fn prf(&self) -> Result<HkdfPrf, HeaderError> {
        HkdfPrf::try_from(self.hkdf_prf).map_err(|_| HeaderError::UnknownHkdfPrf { raw: self.hkdf_prf })
    }
}

#[derive(Debug)]
pub enum HeaderError {
    /// Buffer too short to contain a header.
    BufferTooShort { have: usize, need: usize },

    /// Invalid magic marker (expected "RPK1").
    InvalidMagic { have: [u8; 4], need: [u8; 4] },

    /// Unsupported version.
    InvalidVersion { have: u16 },

    /// Unknown or unsupported cipher suite.
    UnknownCipherSuite { raw: u16 },

    /// Unknown or unsupported HKDF PRF.
    UnknownHkdfPrf { raw: u16 },

    /// Chunk size outside the accepted window.
    InvalidChunkSize { have: u32, min: u32, max: u32 },

    /// Reserved bytes must be zero.
    ReservedBytesNonZero { reserved: u16 },

    /// Stored CRC does not match the header bytes.
    InvalidCrc32 { have: u32, need: u32 },
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use HeaderError::*;
        match self {
            BufferTooShort { have, need } =>
                write!(f, "header buffer too short: {} < {}", have, need),
            InvalidMagic { have, need } =>
                write!(f, "invalid magic: expected {}, got {}", fmt_bytes(need), fmt_bytes(have)),
            InvalidVersion { have } =>
                write!(f, "invalid version: {}", have),
            UnknownCipherSuite { raw } =>
                write!(f, "unknown cipher suite: {}",
                    enum_name_or_hex::<CipherSuite>(*raw)),
            UnknownHkdfPrf { raw } =>
                write!(f, "unknown HKDF PRF: {}",
                    enum_name_or_hex::<HkdfPrf>(*raw)),
            InvalidChunkSize { have, min, max } =>
                write!(f, "invalid chunk_size: {} not in {}..={}", have, min, max),
            ReservedBytesNonZero { reserved } =>
                write!(f, "reserved bytes must be zero, got 0x{:04x}", reserved),
            InvalidCrc32 { have, need } =>
                write!(f, "header crc32 mismatch: stored 0x{:08x}, computed 0x{:08x}", have, need),
        }
    }
}

impl std::error::Error for HeaderError {}
