//! crypto/nonce.rs
//! Deterministic nonce derivation from the stream salt and frame index.
//!
//! TLS-like scheme: the first 12 salt bytes form a base IV, and the low 8 bytes
//! are XORed with the little-endian frame index. The salt is random per stream,
//! so (salt, frame_index) pairs never repeat within a container.

use crate::constants::STREAM_SALT_LEN;
use crate::crypto::types::NONCE_LEN_12;
use crate::crypto::types::NonceError;

/// Derive a 12-byte AEAD nonce from a 16-byte salt and frame index.
///
/// - nonce[0..4] stays the static salt prefix.
/// - nonce[4..12] is XORed with `frame_index` (LE), giving 2^64 distinct nonces per stream.
///
/// The same schedule is used by the writer and the reader; changing endianness
/// or the XOR region breaks every existing container.
#[inline]
pub fn derive_nonce_12_tls_style(
    salt: &[u8; STREAM_SALT_LEN],
    frame_index: u64,
) -> Result<[u8; NONCE_LEN_12], NonceError> {
    validate_salt(salt)?;

    let mut nonce = [0u8; NONCE_LEN_12];
    nonce.copy_from_slice(&salt[..NONCE_LEN_12]);

    let ctr: [u8; 8] = frame_index.to_le_bytes();
    for j in 0..8 {
        nonce[4 + j] ^= ctr[j];
    }

    Ok(nonce)
}

/// Salt must be random per stream; all-zero is forbidden.
#[inline]
pub fn validate_salt(salt: &[u8; STREAM_SALT_LEN]) -> Result<(), NonceError> {
    if salt.iter().all(|&b| b == 0) {
        return Err(NonceError::InvalidSalt);
    }
    Ok(())
}
