//! repack-core
//!
//! Repackages a zip archive or a directory into an ordered multi-stream
//! container, optionally encrypting every stream for one RSA recipient.
//! No argument parsing and no process handling; see `repack-cli` for those.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Container format layers
pub mod headers;
pub mod crypto;
pub mod container;

// Packing pipeline
pub mod keys;
pub mod source;
pub mod sink;
pub mod config;
pub mod pipeline;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::{Encryption, RunConfig, RunOptions, Variant};
    pub use crate::container::{ContainerReader, ContainerWriter, StreamRecord, WriterOptions};
    pub use crate::headers::CipherSuite;
    pub use crate::keys::{load_public_key, PublicKey};
    pub use crate::pipeline::{run, RunSummary};
    pub use crate::types::{ErrorKind, RepackError};
}
