//! container/mod.rs
//! Ordered multi-stream container: header, optional recipient key, named
//! streams of chunked data, trailer.
//!
//! ```text
//! [ header (20) ]
//! [ recipient-key block ]?
//! ( [ plain-stream | encrypted-stream ] [ data ]* [ end-of-stream ] )*
//! [ end-of-container ]
//! ```

pub mod framing;
pub mod types;
pub mod writer;
pub mod stream;
pub mod reader;

pub use types::{ContainerError, StreamRecord, StreamStats, WriterOptions};
pub use writer::ContainerWriter;
pub use stream::StreamWriter;
pub use reader::{ContainerReader, OwnedBlock};
