//! sink.rs
//! Stream sink: one container stream per source entry.
//!
//! The plain/encrypted decision is made once, when the sink is built, by
//! picking the container's stream-opening function. Entries are then copied
//! through unchanged, one stream at a time, in the order they arrive.

use std::io::{ErrorKind, Read, Write};

use tracing::debug;

use crate::container::framing::{BlockHeader, ContainerTrailer};
use crate::container::{ContainerError, ContainerWriter, StreamStats, StreamWriter};
use crate::keys::PublicKey;
use crate::source::SourceEntry;
use crate::telemetry::PackCounters;
use crate::types::RepackError;

/// Copy buffer size for entry transfer.
const COPY_BUF_LEN: usize = 32 * 1024;

/// Signature shared by `open_plain_stream` and `open_encrypted_stream`.
pub type OpenStreamFn<W> =
    for<'c> fn(&'c mut ContainerWriter<W>, &str, Option<&[u8]>) -> Result<StreamWriter<'c, W>, ContainerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    Plain,
    Encrypted,
}

impl StreamMode {
    /// The container operation that opens a stream in this mode.
    pub fn opener<W: Write>(self) -> OpenStreamFn<W> {
        match self {
            StreamMode::Plain => ContainerWriter::<W>::open_plain_stream,
            StreamMode::Encrypted => ContainerWriter::<W>::open_encrypted_stream,
        }
    }
}

pub struct StreamSink<W: Write> {
    container: ContainerWriter<W>,
    mode: StreamMode,
    open_stream: OpenStreamFn<W>,
    counters: PackCounters,
    buf: Vec<u8>,
}

impl<W: Write> StreamSink<W> {
    /// Sink writing unencrypted streams.
    pub fn plain(container: ContainerWriter<W>) -> Self {
        Self::with_mode(container, StreamMode::Plain)
    }

    /// Sink writing encrypted streams; registers `key` with the container
    /// before any stream can be opened.
    pub fn encrypted(mut container: ContainerWriter<W>, key: &PublicKey) -> Result<Self, ContainerError> {
        container.register_encryption_key(key.rsa())?;
        Ok(Self::with_mode(container, StreamMode::Encrypted))
    }

    fn with_mode(container: ContainerWriter<W>, mode: StreamMode) -> Self {
        Self {
            container,
            mode,
            open_stream: mode.opener(),
            counters: PackCounters::default(),
            buf: vec![0u8; COPY_BUF_LEN],
        }
    }

    pub fn mode(&self) -> StreamMode {
        self.mode
    }

    pub fn counters(&self) -> &PackCounters {
        &self.counters
    }

    /// Open a stream named after the entry, copy the entry into it, close it.
    pub fn transfer(&mut self, entry: SourceEntry<'_>) -> Result<StreamStats, RepackError> {
        let SourceEntry { name, origin, mut content } = entry;
        let stream_err = |source| RepackError::StreamWrite { stream: origin.clone(), source };

        let mut stream = (self.open_stream)(&mut self.container, &name, None).map_err(stream_err)?;

        loop {
            let n = match content.read(&mut self.buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => return Err(RepackError::EntryOpen { entry: origin.clone(), source }),
            };
            stream.write_bytes(&self.buf[..n]).map_err(stream_err)?;
        }

        let stats = stream.close().map_err(stream_err)?;
        self.counters.add_stream(&stats);
        debug!(
            stream = %name,
            origin = %origin,
            bytes = stats.plaintext_len,
            frames = stats.frames,
            encrypted = stats.encrypted,
            "packed entry"
        );
        Ok(stats)
    }

    /// Finish the container; returns the inner writer and the run counters
    /// (container-level blocks included as overhead).
    pub fn finish(self) -> Result<(W, PackCounters), ContainerError> {
        let mut counters = self.counters;
        let total = self.container.bytes_written() + (BlockHeader::LEN + ContainerTrailer::LEN) as u64;
        counters.add_overhead(total.saturating_sub(counters.bytes_written()));

        let inner = self.container.finish()?;
        Ok((inner, counters))
    }
}
