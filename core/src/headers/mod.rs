//! headers/mod.rs
//! Container header: the first 20 bytes of every output file.
//!
//! - Explicit IDs (cipher, PRF) avoid silent incompatibilities between writer and reader.
//! - The encoded header bytes are bound into every stream key and every frame AAD.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
