//! keys.rs
//! Recipient public key loading.
//!
//! Accepts PEM armor or raw DER. The payload is a PKCS#1 `RSAPublicKey`;
//! SubjectPublicKeyInfo is accepted as well (PEM label `PUBLIC KEY`, or DER
//! that does not parse as PKCS#1).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use tracing::debug;

use crate::constants::KEY_ID_LEN;
use crate::crypto::{recipient_key_id, CryptoError};

const PEM_BEGIN: &str = "-----BEGIN";
const SPKI_LABEL: &str = "-----BEGIN PUBLIC KEY-----";

#[derive(Debug)]
pub enum KeyError {
    Io(std::io::Error),
    /// PEM armor present but the text is not valid UTF-8.
    NotText,
    /// Bytes do not parse as an RSA public key.
    Parse(String),
    /// The key parsed but cannot be fingerprinted.
    Fingerprint(CryptoError),
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::Io(e) => write!(f, "{}", e),
            KeyError::NotText => write!(f, "PEM key file is not valid UTF-8"),
            KeyError::Parse(msg) => write!(f, "not an RSA public key: {}", msg),
            KeyError::Fingerprint(e) => write!(f, "cannot fingerprint key: {}", e),
        }
    }
}

impl std::error::Error for KeyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KeyError::Io(e) => Some(e),
            KeyError::Fingerprint(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for KeyError {
    fn from(e: std::io::Error) -> Self {
        KeyError::Io(e)
    }
}

/// A loaded recipient key with its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: RsaPublicKey,
    key_id: [u8; KEY_ID_LEN],
    path: PathBuf,
}

impl PublicKey {
    pub fn from_rsa(inner: RsaPublicKey, path: impl Into<PathBuf>) -> Result<Self, KeyError> {
        let key_id = recipient_key_id(&inner).map_err(KeyError::Fingerprint)?;
        Ok(Self { inner, key_id, path: path.into() })
    }

    pub fn rsa(&self) -> &RsaPublicKey {
        &self.inner
    }

    pub fn key_id(&self) -> [u8; KEY_ID_LEN] {
        self.key_id
    }

    pub fn fingerprint(&self) -> String {
        hex::encode(self.key_id)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.inner.size() * 8
    }
}

/// Read and parse the recipient key at `path`.
pub fn load_public_key(path: &Path) -> Result<PublicKey, KeyError> {
    let bytes = fs::read(path)?;
    let rsa = parse_public_key(&bytes)?;
    let key = PublicKey::from_rsa(rsa, path)?;
    debug!(path = %path.display(), fingerprint = %key.fingerprint(), bits = key.bits(), "loaded public key");
    Ok(key)
}

/// Parse PEM or DER bytes into an RSA public key.
pub fn parse_public_key(bytes: &[u8]) -> Result<RsaPublicKey, KeyError> {
    if contains(bytes, PEM_BEGIN.as_bytes()) {
        let text = std::str::from_utf8(bytes).map_err(|_| KeyError::NotText)?;
        let text = text.trim();
        return if text.contains(SPKI_LABEL) {
            RsaPublicKey::from_public_key_pem(text).map_err(|e| KeyError::Parse(e.to_string()))
        } else {
            RsaPublicKey::from_pkcs1_pem(text).map_err(|e| KeyError::Parse(e.to_string()))
        };
    }

    match RsaPublicKey::from_pkcs1_der(bytes) {
        Ok(key) => Ok(key),
        Err(pkcs1_err) => RsaPublicKey::from_public_key_der(bytes)
            .map_err(|_| KeyError::Parse(pkcs1_err.to_string())),
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
