//! crypto/kdf.rs
//! HKDF-based stream key derivation from the container master key and the stream salt.
//!
//! Design:
//! - HKDF-Extract(salt = stream salt, ikm = master key) -> PRK
//! - HKDF-Expand(PRK, info) -> stream key (32 bytes)
//!
//! The master key is only ever used as HKDF input; every stream gets its own key.

use crate::constants::{prf_ids, STREAM_SALT_LEN};
use crate::headers::{encode_header_le, ContainerHeader};
use crate::crypto::types::KEY_LEN_32;
use crate::crypto::types::CryptoError;

use hkdf::Hkdf;
use sha2::{Sha256, Sha512};

/// Domain label separating stream keys from any other HKDF use of the master key.
const STREAM_KEY_LABEL: &[u8] = b"RPK1|stream-key";

/// Build HKDF 'info': label, encoded container header, then the stream name.
#[inline]
fn build_info(header: &ContainerHeader, stream_name: &str) -> Result<Vec<u8>, CryptoError> {
    let header_bytes = encode_header_le(header)
        .map_err(|e| CryptoError::Failure(format!("cannot bind header into key schedule: {e}")))?;

    let mut info = Vec::with_capacity(STREAM_KEY_LABEL.len() + header_bytes.len() + stream_name.len());
    info.extend_from_slice(STREAM_KEY_LABEL);
    info.extend_from_slice(&header_bytes);
    info.extend_from_slice(stream_name.as_bytes());
    Ok(info)
}

/// Derive a 32-byte stream key via HKDF from `master_key` + per-stream `salt`.
///
/// Errors:
/// - all-zero salt returns `CryptoError::Failure`.
/// - unknown PRF id returns `CryptoError::UnsupportedPrf`.
#[inline]
pub fn derive_stream_key_32(
    master_key: &[u8],
    header: &ContainerHeader,
    salt: &[u8; STREAM_SALT_LEN],
    stream_name: &str,
) -> Result<[u8; KEY_LEN_32], CryptoError> {
    if salt.iter().all(|&b| b == 0) {
        return Err(CryptoError::Failure("salt must not be all-zero".into()));
    }

    let info = build_info(header, stream_name)?;
    let mut key = [0u8; KEY_LEN_32];

    match header.hkdf_prf {
        x if x == prf_ids::SHA256 => {
            Hkdf::<Sha256>::new(Some(salt), master_key)
                .expand(&info, &mut key)
                .map_err(|_| CryptoError::Failure("HKDF expand failed (SHA-256)".into()))?;
        }
        x if x == prf_ids::SHA512 => {
            Hkdf::<Sha512>::new(Some(salt), master_key)
                .expand(&info, &mut key)
                .map_err(|_| CryptoError::Failure("HKDF expand failed (SHA-512)".into()))?;
        }
        other => return Err(CryptoError::UnsupportedPrf { prf_id: other }),
    }

    Ok(key)
}
