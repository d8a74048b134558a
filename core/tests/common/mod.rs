//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pkcs8::LineEnding;
use rsa::{RsaPrivateKey, RsaPublicKey};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Small keys keep key generation fast in debug builds.
const TEST_KEY_BITS: usize = 1024;

pub fn keypair() -> &'static (RsaPrivateKey, RsaPublicKey) {
    static PAIR: OnceLock<(RsaPrivateKey, RsaPublicKey)> = OnceLock::new();
    PAIR.get_or_init(|| fresh_keypair())
}

pub fn other_keypair() -> &'static (RsaPrivateKey, RsaPublicKey) {
    static PAIR: OnceLock<(RsaPrivateKey, RsaPublicKey)> = OnceLock::new();
    PAIR.get_or_init(|| fresh_keypair())
}

fn fresh_keypair() -> (RsaPrivateKey, RsaPublicKey) {
    let private = RsaPrivateKey::new(&mut rand::thread_rng(), TEST_KEY_BITS).expect("generate rsa key");
    let public = private.to_public_key();
    (private, public)
}

/// Write the shared public key as PKCS#1 PEM.
pub fn write_public_pem(path: &Path) {
    let pem = keypair().1.to_pkcs1_pem(LineEnding::LF).expect("encode pem");
    fs::write(path, pem).expect("write pem");
}

/// Build a zip at `path`; names ending in `/` become directory members.
pub fn write_zip(path: &Path, members: &[(&str, &[u8])]) {
    let file = fs::File::create(path).expect("create zip");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in members {
        if name.ends_with('/') {
            zip.add_directory(*name, options).expect("add dir");
        } else {
            zip.start_file(*name, options).expect("start file");
            zip.write_all(data).expect("write member");
        }
    }
    zip.finish().expect("finish zip");
}
