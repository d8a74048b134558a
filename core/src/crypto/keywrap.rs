//! crypto/keywrap.rs
//! RSA-OAEP wrapping of the container master key for a single recipient.
//!
//! - OAEP with SHA-256 for both the label hash and MGF1.
//! - The recipient is identified by the first 8 bytes of SHA-256 over its
//!   PKCS#1 DER encoding, so a reader can reject the wrong private key before
//!   attempting to unwrap.

use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::constants::{KEY_ID_LEN, MASTER_KEY_LEN};
use crate::crypto::types::CryptoError;

/// Fingerprint of a recipient public key.
pub fn recipient_key_id(key: &RsaPublicKey) -> Result<[u8; KEY_ID_LEN], CryptoError> {
    let der = key
        .to_pkcs1_der()
        .map_err(|e| CryptoError::KeyWrap(format!("cannot encode public key: {e}")))?;

    let digest = Sha256::digest(der.as_bytes());
    let mut id = [0u8; KEY_ID_LEN];
    id.copy_from_slice(&digest[..KEY_ID_LEN]);
    Ok(id)
}

/// Encrypt `master_key` to `recipient` with RSA-OAEP(SHA-256).
pub fn wrap_master_key(
    recipient: &RsaPublicKey,
    master_key: &[u8; MASTER_KEY_LEN],
) -> Result<Vec<u8>, CryptoError> {
    let mut rng = rand::thread_rng();
    recipient
        .encrypt(&mut rng, Oaep::new::<Sha256>(), master_key)
        .map_err(|e| CryptoError::KeyWrap(e.to_string()))
}

/// Recover the master key with the recipient's private key.
pub fn unwrap_master_key(
    private_key: &RsaPrivateKey,
    wrapped: &[u8],
) -> Result<[u8; MASTER_KEY_LEN], CryptoError> {
    let plain = private_key
        .decrypt(Oaep::new::<Sha256>(), wrapped)
        .map_err(|e| CryptoError::KeyWrap(e.to_string()))?;

    if plain.len() != MASTER_KEY_LEN {
        return Err(CryptoError::InvalidKeyLen {
            expected: MASTER_KEY_LEN,
            actual: plain.len(),
        });
    }

    let mut key = [0u8; MASTER_KEY_LEN];
    key.copy_from_slice(&plain);
    Ok(key)
}
