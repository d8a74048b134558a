//! container/writer.rs
//! Sequential container writer.
//!
//! Wire order produced:
//! header, [recipient-key], { stream-open, data*, end-of-stream }*, end-of-container
//!
//! The writer never seeks; every block is appended to `inner` as soon as it is
//! complete, so memory use is bounded by one chunk regardless of stream size.

use std::io::Write;

use rand::RngCore;
use rsa::RsaPublicKey;
use tracing::debug;

use crate::constants::{KEY_ID_LEN, MASTER_KEY_LEN, STREAM_SALT_LEN};
use crate::container::framing::{
    encode_block_header, BlockHeader, BlockType, ContainerTrailer, RecipientKeyBody, StreamOpenBody,
};
use crate::container::stream::{StreamSealer, StreamWriter};
use crate::container::types::{ContainerError, WriterOptions};
use crate::crypto::{
    build_stream_aad_prefix, derive_stream_key_32, recipient_key_id, wrap_master_key, AeadImpl, CryptoError,
};
use crate::headers::{encode_header_le, ContainerHeader};

struct Recipient {
    key_id: [u8; KEY_ID_LEN],
    master_key: [u8; MASTER_KEY_LEN],
}

pub struct ContainerWriter<W: Write> {
    inner: W,
    header: ContainerHeader,
    recipient: Option<Recipient>,
    streams_opened: u32,
    bytes_written: u64,
}

impl<W: Write> ContainerWriter<W> {
    /// Start a container with default options and write its header.
    pub fn new(inner: W) -> Result<Self, ContainerError> {
        Self::with_options(inner, WriterOptions::default())
    }

    /// Start a container and write its header.
    ///
    /// Fails with `ContainerError::Header` when the chunk size is outside the
    /// accepted window.
    pub fn with_options(mut inner: W, options: WriterOptions) -> Result<Self, ContainerError> {
        let chunk_size = u32::try_from(options.chunk_size).unwrap_or(u32::MAX);
        let mut header = ContainerHeader::new(options.cipher, options.hkdf_prf, chunk_size);

        let encoded = encode_header_le(&header)?;
        header.crc32 = u32::from_le_bytes([encoded[16], encoded[17], encoded[18], encoded[19]]);
        inner.write_all(&encoded)?;

        Ok(Self {
            inner,
            header,
            recipient: None,
            streams_opened: 0,
            bytes_written: encoded.len() as u64,
        })
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    pub fn chunk_size(&self) -> usize {
        self.header.chunk_size as usize
    }

    pub fn has_recipient(&self) -> bool {
        self.recipient.is_some()
    }

    /// Fingerprint of the registered recipient, if any.
    pub fn recipient_key_id(&self) -> Option<[u8; KEY_ID_LEN]> {
        self.recipient.as_ref().map(|r| r.key_id)
    }

    pub fn streams_opened(&self) -> u32 {
        self.streams_opened
    }

    /// Total bytes handed to the inner writer so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Register the single recipient of this container.
    ///
    /// Generates the master key, wraps it with RSA-OAEP and writes the
    /// recipient block. Allowed once, and only before the first stream.
    pub fn register_encryption_key(&mut self, key: &RsaPublicKey) -> Result<[u8; KEY_ID_LEN], ContainerError> {
        if self.recipient.is_some() {
            return Err(ContainerError::KeyAlreadyRegistered);
        }
        if self.streams_opened > 0 {
            return Err(ContainerError::KeyAfterStreams { opened: self.streams_opened });
        }

        let mut master_key = [0u8; MASTER_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut master_key);

        let key_id = recipient_key_id(key)?;
        let wrapped_key = wrap_master_key(key, &master_key)?;
        let body = RecipientKeyBody { key_id, wrapped_key }.encode()?;
        self.write_block(BlockType::RecipientKey, &body)?;

        debug!(key_id = %hex::encode(key_id), "registered recipient key");
        self.recipient = Some(Recipient { key_id, master_key });
        Ok(key_id)
    }

    /// Open an unencrypted stream. The returned writer borrows the container
    /// until it is closed.
    pub fn open_plain_stream(&mut self, name: &str, extra: Option<&[u8]>) -> Result<StreamWriter<'_, W>, ContainerError> {
        check_stream_name(name)?;

        let body = StreamOpenBody {
            name: name.to_owned(),
            extra: extra.unwrap_or(&[]).to_vec(),
            salt: None,
        }
        .encode()?;

        let overhead = self.write_block(BlockType::PlainStream, &body)?;
        self.streams_opened += 1;
        debug!(stream = name, "opened plain stream");

        Ok(StreamWriter::new(self, name.to_owned(), None, overhead))
    }

    /// Open a stream encrypted under a key derived from the master key and a
    /// fresh random salt.
    pub fn open_encrypted_stream(&mut self, name: &str, extra: Option<&[u8]>) -> Result<StreamWriter<'_, W>, ContainerError> {
        check_stream_name(name)?;
        let master_key = match &self.recipient {
            Some(r) => r.master_key,
            None => return Err(ContainerError::MissingRecipientKey),
        };

        let salt = fresh_salt();
        let body = StreamOpenBody {
            name: name.to_owned(),
            extra: extra.unwrap_or(&[]).to_vec(),
            salt: Some(salt),
        }
        .encode()?;

        let stream_key = derive_stream_key_32(&master_key, &self.header, &salt, name)?;
        let aead = AeadImpl::from_header_and_key(&self.header, &stream_key)?;
        let aad_prefix = build_stream_aad_prefix(&self.header, &body).map_err(CryptoError::from)?;

        let overhead = self.write_block(BlockType::EncryptedStream, &body)?;
        self.streams_opened += 1;
        debug!(stream = name, "opened encrypted stream");

        let sealer = StreamSealer::new(aead, salt, aad_prefix);
        Ok(StreamWriter::new(self, name.to_owned(), Some(sealer), overhead))
    }

    /// Write the end-of-container block, flush and hand back the inner writer.
    pub fn finish(mut self) -> Result<W, ContainerError> {
        let trailer = ContainerTrailer { stream_count: self.streams_opened };
        self.write_block(BlockType::EndOfContainer, &trailer.encode())?;
        self.inner.flush()?;
        debug!(streams = self.streams_opened, bytes = self.bytes_written, "container finished");
        Ok(self.inner)
    }

    /// Append one block; returns the encoded length.
    pub(crate) fn write_block(&mut self, block_type: BlockType, body: &[u8]) -> Result<u64, ContainerError> {
        let header = BlockHeader::for_body(block_type, body)?;
        self.inner.write_all(&encode_block_header(&header))?;
        self.inner.write_all(body)?;

        let written = (BlockHeader::LEN + body.len()) as u64;
        self.bytes_written += written;
        Ok(written)
    }

    pub(crate) fn flush_inner(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

fn check_stream_name(name: &str) -> Result<(), ContainerError> {
    if name.is_empty() || name.len() > u16::MAX as usize {
        return Err(ContainerError::InvalidStreamName(name.to_owned()));
    }
    Ok(())
}

fn fresh_salt() -> [u8; STREAM_SALT_LEN] {
    let mut rng = rand::thread_rng();
    let mut salt = [0u8; STREAM_SALT_LEN];
    loop {
        rng.fill_bytes(&mut salt);
        if salt.iter().any(|&b| b != 0) {
            return salt;
        }
    }
}
