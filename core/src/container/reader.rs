//! container/reader.rs
//! Strict sequential decoder for containers produced by `ContainerWriter`.
//!
//! Every block CRC is checked, the block grammar is enforced, and each stream
//! trailer must agree with the data that preceded it. Encrypted streams are
//! decrypted only when the recipient's private key is supplied; without it
//! their bodies are skipped and reported as `data: None`.

use std::io::Read;

use rsa::RsaPrivateKey;
use tracing::debug;

use crate::constants::MASTER_KEY_LEN;
use crate::container::framing::{
    parse_block_header, verify_block_body, BlockHeader, BlockType, ContainerTrailer, RecipientKeyBody,
    StreamOpenBody, StreamTrailer,
};
use crate::container::types::{ContainerError, StreamRecord};
use crate::crypto::{
    build_frame_aad, build_stream_aad_prefix, derive_nonce_12_tls_style, derive_stream_key_32, recipient_key_id,
    unwrap_master_key, AeadImpl, CryptoError, FrameAad, TAG_LEN,
};
use crate::headers::{decode_header_le, ContainerHeader};
use crate::utils::compute_crc32;

/// One block read off the wire, body already CRC-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedBlock {
    pub block_type: BlockType,
    pub body: Vec<u8>,
}

pub struct ContainerReader<R: Read> {
    inner: R,
    header: ContainerHeader,
    finished: bool,
}

impl<R: Read> ContainerReader<R> {
    /// Read and validate the container header.
    pub fn new(mut inner: R) -> Result<Self, ContainerError> {
        let mut buf = [0u8; ContainerHeader::LEN];
        inner.read_exact(&mut buf)?;
        let header = decode_header_le(&buf)?;
        Ok(Self { inner, header, finished: false })
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Next block, or `None` once the end-of-container block was consumed.
    pub fn next_block(&mut self) -> Result<Option<OwnedBlock>, ContainerError> {
        if self.finished {
            return Ok(None);
        }

        let mut head = [0u8; BlockHeader::LEN];
        self.inner.read_exact(&mut head)?;
        let header = parse_block_header(&head)?;

        let mut body = vec![0u8; header.body_len as usize];
        self.inner.read_exact(&mut body)?;
        verify_block_body(&header, &body)?;

        if header.block_type == BlockType::EndOfContainer {
            self.finished = true;
        }
        Ok(Some(OwnedBlock { block_type: header.block_type, body }))
    }

    /// Decode every stream in order.
    ///
    /// With `private_key`, encrypted streams are decrypted and authenticated;
    /// a key that does not match the recipient block is rejected up front.
    pub fn read_streams(mut self, private_key: Option<&RsaPrivateKey>) -> Result<Vec<StreamRecord>, ContainerError> {
        let mut master_key: Option<[u8; MASTER_KEY_LEN]> = None;
        let mut recipient_seen = false;
        let mut records = Vec::new();

        loop {
            let block = match self.next_block()? {
                Some(b) => b,
                None => return Err(ContainerError::Truncated),
            };

            match block.block_type {
                BlockType::RecipientKey => {
                    if recipient_seen || !records.is_empty() {
                        return Err(ContainerError::UnexpectedBlock {
                            expected: "stream-open or end-of-container",
                            found: block.block_type,
                        });
                    }
                    recipient_seen = true;
                    let body = RecipientKeyBody::decode(&block.body)?;
                    if let Some(private_key) = private_key {
                        let have = recipient_key_id(&private_key.to_public_key())?;
                        if have != body.key_id {
                            return Err(ContainerError::RecipientMismatch { have, need: body.key_id });
                        }
                        master_key = Some(unwrap_master_key(private_key, &body.wrapped_key)?);
                    }
                }
                BlockType::PlainStream => {
                    let open = StreamOpenBody::decode(&block.body, false)?;
                    let data = self.read_plain_body(&open.name)?;
                    records.push(StreamRecord { name: open.name, extra: open.extra, encrypted: false, data: Some(data) });
                }
                BlockType::EncryptedStream => {
                    if !recipient_seen {
                        return Err(ContainerError::MissingRecipientKey);
                    }
                    let open = StreamOpenBody::decode(&block.body, true)?;
                    let data = match &master_key {
                        Some(mk) => Some(self.read_encrypted_body(mk, &open, &block.body)?),
                        None => {
                            self.skip_stream_body()?;
                            None
                        }
                    };
                    records.push(StreamRecord { name: open.name, extra: open.extra, encrypted: true, data });
                }
                BlockType::EndOfContainer => {
                    let trailer = ContainerTrailer::decode(&block.body)?;
                    if trailer.stream_count as usize != records.len() {
                        return Err(ContainerError::TrailerMismatch(format!(
                            "container declares {} streams, found {}",
                            trailer.stream_count,
                            records.len()
                        )));
                    }
                    debug!(streams = records.len(), "container decoded");
                    return Ok(records);
                }
                found => {
                    return Err(ContainerError::UnexpectedBlock {
                        expected: "stream-open or end-of-container",
                        found,
                    });
                }
            }
        }
    }

    /// Names of all streams, in container order. Needs no key.
    pub fn stream_names(self) -> Result<Vec<String>, ContainerError> {
        Ok(self.read_streams(None)?.into_iter().map(|r| r.name).collect())
    }

    fn next_stream_block(&mut self) -> Result<OwnedBlock, ContainerError> {
        let block = self.next_block()?.ok_or(ContainerError::Truncated)?;
        match block.block_type {
            BlockType::Data | BlockType::EndOfStream => Ok(block),
            found => Err(ContainerError::UnexpectedBlock { expected: "data or end-of-stream", found }),
        }
    }

    fn read_plain_body(&mut self, name: &str) -> Result<Vec<u8>, ContainerError> {
        let mut data = Vec::new();
        let mut frames: u32 = 0;

        loop {
            let block = self.next_stream_block()?;
            if block.block_type == BlockType::Data {
                self.check_chunk_len(block.body.len())?;
                data.extend_from_slice(&block.body);
                frames += 1;
                continue;
            }
            let trailer = StreamTrailer::decode(&block.body)?;
            check_trailer(name, &trailer, frames, &data)?;
            return Ok(data);
        }
    }

    fn read_encrypted_body(
        &mut self,
        master_key: &[u8; MASTER_KEY_LEN],
        open: &StreamOpenBody,
        open_body: &[u8],
    ) -> Result<Vec<u8>, ContainerError> {
        let salt = open
            .salt
            .ok_or_else(|| ContainerError::TrailerMismatch("encrypted stream without salt".into()))?;
        let stream_key = derive_stream_key_32(master_key, &self.header, &salt, &open.name)?;
        let aead = AeadImpl::from_header_and_key(&self.header, &stream_key)?;
        let prefix = build_stream_aad_prefix(&self.header, open_body).map_err(CryptoError::from)?;

        let open_frame = |block_type: BlockType, frame_index: u32, sealed: &[u8]| -> Result<Vec<u8>, ContainerError> {
            let plaintext_len = sealed.len().saturating_sub(TAG_LEN) as u32;
            let nonce = derive_nonce_12_tls_style(&salt, frame_index as u64).map_err(CryptoError::from)?;
            let aad = build_frame_aad(&prefix, &FrameAad { block_type: block_type as u8, frame_index, plaintext_len })
                .map_err(CryptoError::from)?;
            Ok(aead.open(&nonce, &aad, sealed)?)
        };

        let mut data = Vec::new();
        let mut frames: u32 = 0;

        loop {
            let block = self.next_stream_block()?;
            let plain = open_frame(block.block_type, frames, &block.body)?;
            if block.block_type == BlockType::Data {
                self.check_chunk_len(plain.len())?;
                data.extend_from_slice(&plain);
                frames += 1;
                continue;
            }
            let trailer = StreamTrailer::decode(&plain)?;
            check_trailer(&open.name, &trailer, frames, &data)?;
            return Ok(data);
        }
    }

    fn skip_stream_body(&mut self) -> Result<(), ContainerError> {
        loop {
            if self.next_stream_block()?.block_type == BlockType::EndOfStream {
                return Ok(());
            }
        }
    }

    fn check_chunk_len(&self, len: usize) -> Result<(), ContainerError> {
        if len == 0 || len > self.header.chunk_size as usize {
            return Err(ContainerError::TrailerMismatch(format!(
                "data block of {} bytes outside 1..={}",
                len, self.header.chunk_size
            )));
        }
        Ok(())
    }
}

fn check_trailer(name: &str, trailer: &StreamTrailer, frames: u32, data: &[u8]) -> Result<(), ContainerError> {
    if trailer.frame_count != frames || trailer.plaintext_len != data.len() as u64 {
        return Err(ContainerError::TrailerMismatch(format!(
            "stream {:?}: trailer says {} bytes in {} frames, read {} bytes in {} frames",
            name,
            trailer.plaintext_len,
            trailer.frame_count,
            data.len(),
            frames
        )));
    }
    let crc = compute_crc32(data);
    if trailer.crc32 != crc {
        return Err(ContainerError::TrailerMismatch(format!(
            "stream {:?}: crc32 0x{:08x} != 0x{:08x}",
            name, trailer.crc32, crc
        )));
    }
    Ok(())
}
