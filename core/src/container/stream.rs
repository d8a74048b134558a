//! container/stream.rs
//! One open stream inside a container.
//!
//! Bytes are buffered until a full chunk is available, then emitted as one
//! data block. `close` emits the final short chunk (if any) and the
//! end-of-stream trailer. A stream dropped without `close` leaves the container
//! without its trailer; readers report it as truncated.

use std::io::{self, Write};

use bytes::BytesMut;
use crc32fast::Hasher;

use crate::constants::STREAM_SALT_LEN;
use crate::container::framing::{BlockHeader, BlockType, StreamTrailer};
use crate::container::types::{ContainerError, StreamStats};
use crate::container::writer::ContainerWriter;
use crate::crypto::{build_frame_aad, derive_nonce_12_tls_style, AeadImpl, CryptoError, FrameAad};

/// Per-stream AEAD state.
pub(crate) struct StreamSealer {
    aead: AeadImpl,
    salt: [u8; STREAM_SALT_LEN],
    aad_prefix: Vec<u8>,
}

impl StreamSealer {
    pub(crate) fn new(aead: AeadImpl, salt: [u8; STREAM_SALT_LEN], aad_prefix: Vec<u8>) -> Self {
        Self { aead, salt, aad_prefix }
    }

    fn seal(&self, block_type: BlockType, frame_index: u32, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let nonce = derive_nonce_12_tls_style(&self.salt, frame_index as u64)?;
        let aad = build_frame_aad(
            &self.aad_prefix,
            &FrameAad {
                block_type: block_type as u8,
                frame_index,
                plaintext_len: plaintext.len() as u32,
            },
        )?;
        self.aead.seal(&nonce, &aad, plaintext)
    }
}

#[must_use = "a stream must be closed to write its trailer"]
pub struct StreamWriter<'a, W: Write> {
    container: &'a mut ContainerWriter<W>,
    name: String,
    sealer: Option<StreamSealer>,
    chunk_size: usize,
    buf: BytesMut,
    frame_index: u32,
    crc: Hasher,
    stats: StreamStats,
}

impl<'a, W: Write> StreamWriter<'a, W> {
    pub(crate) fn new(
        container: &'a mut ContainerWriter<W>,
        name: String,
        sealer: Option<StreamSealer>,
        open_overhead: u64,
    ) -> Self {
        let chunk_size = container.chunk_size();
        let stats = StreamStats {
            encrypted: sealer.is_some(),
            overhead_len: open_overhead,
            ..Default::default()
        };
        Self {
            container,
            name,
            sealer,
            chunk_size,
            buf: BytesMut::with_capacity(chunk_size),
            frame_index: 0,
            crc: Hasher::new(),
            stats,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_encrypted(&self) -> bool {
        self.sealer.is_some()
    }

    /// Append bytes to the stream, emitting every chunk that fills up.
    pub fn write_bytes(&mut self, mut data: &[u8]) -> Result<(), ContainerError> {
        while !data.is_empty() {
            let room = self.chunk_size - self.buf.len();
            let take = room.min(data.len());
            self.buf.extend_from_slice(&data[..take]);
            data = &data[take..];

            if self.buf.len() == self.chunk_size {
                self.emit_chunk()?;
            }
        }
        Ok(())
    }

    /// Emit any buffered bytes and the end-of-stream trailer.
    pub fn close(mut self) -> Result<StreamStats, ContainerError> {
        if !self.buf.is_empty() {
            self.emit_chunk()?;
        }

        let trailer = StreamTrailer {
            plaintext_len: self.stats.plaintext_len,
            frame_count: self.frame_index,
            crc32: self.crc.clone().finalize(),
        };
        let encoded = trailer.encode();

        let written = match &self.sealer {
            Some(sealer) => {
                let sealed = sealer.seal(BlockType::EndOfStream, self.frame_index, &encoded)?;
                self.container.write_block(BlockType::EndOfStream, &sealed)?
            }
            None => self.container.write_block(BlockType::EndOfStream, &encoded)?,
        };
        self.stats.overhead_len += written;

        Ok(self.stats)
    }

    fn emit_chunk(&mut self) -> Result<(), ContainerError> {
        let chunk = self.buf.split().freeze();
        self.buf.reserve(self.chunk_size);

        let written = match &self.sealer {
            Some(sealer) => {
                let sealed = sealer.seal(BlockType::Data, self.frame_index, &chunk)?;
                self.container.write_block(BlockType::Data, &sealed)?
            }
            None => self.container.write_block(BlockType::Data, &chunk)?,
        };

        self.frame_index = self.frame_index.checked_add(1).ok_or_else(|| {
            ContainerError::TrailerMismatch(format!("stream {:?} exceeds u32::MAX frames", self.name))
        })?;

        let payload = written - BlockHeader::LEN as u64;
        self.crc.update(&chunk);
        self.stats.frames += 1;
        self.stats.plaintext_len += chunk.len() as u64;
        self.stats.payload_len += payload;
        self.stats.overhead_len += written - payload;
        Ok(())
    }
}

impl<W: Write> Write for StreamWriter<'_, W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.write_bytes(data)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(data.len())
    }

    /// Flushes the container's inner writer; a partial chunk stays buffered
    /// so block boundaries do not depend on flush timing.
    fn flush(&mut self) -> io::Result<()> {
        self.container.flush_inner()
    }
}
