/// Magic number for the container header.
/// "RPK1" = Repacked container v1
pub const MAGIC_RPK1: [u8; 4] = *b"RPK1";
pub const CONTAINER_V1: u16 = 1;

/// Defaults when the caller does not pick a chunk size.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024; // 64 KiB
/// Smallest chunk a writer accepts.
pub const MIN_CHUNK_SIZE: usize = 4 * 1024;
/// Max chunk size sanity bound (32 MiB).
pub const MAX_CHUNK_SIZE: usize = 32 * 1024 * 1024;

/// Length of the random master key wrapped for the recipient.
pub const MASTER_KEY_LEN: usize = 32;
/// Length of the per-stream salt carried in the stream-open block.
pub const STREAM_SALT_LEN: usize = 16;
/// Length of the recipient key fingerprint.
pub const KEY_ID_LEN: usize = 8;

/// Archive detection suffix (matched on the cleaned source path).
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// Destination suffixes.
pub mod suffixes {
    pub const REPACKED_PLAIN: &str = "_repacked.bin";
    pub const REPACKED_ENCRYPTED: &str = "_repacked.enc";
    pub const ALT_ENCRYPTED: &str = "_alt.enc";
}

/// Default location of the recipient public key.
pub const DEFAULT_PUBLIC_KEY_PATH: &str = "./public.pem";

/// Cipher suite identifiers (mirrored in the container header).
pub mod cipher_ids {
    pub const AES256_GCM: u16        = 0x0001;
    pub const CHACHA20_POLY1305: u16 = 0x0002;
}

/// HKDF PRF identifiers (mirrored in the container header).
pub mod prf_ids {
    pub const SHA256: u16 = 0x0001;
    pub const SHA512: u16 = 0x0002;
}
