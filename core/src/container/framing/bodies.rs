//! Typed bodies of the non-data blocks.
//!
//! Each body encodes to a flat little-endian byte string and decodes strictly:
//! short input is `Truncated`, leftover input is `LengthMismatch`.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::constants::{KEY_ID_LEN, STREAM_SALT_LEN};
use crate::container::framing::types::BlockError;

fn short<E>(_: E) -> BlockError {
    BlockError::Truncated
}

fn ensure_consumed(cur: &Cursor<&[u8]>) -> Result<(), BlockError> {
    let total = cur.get_ref().len();
    let pos = cur.position() as usize;
    if pos != total {
        return Err(BlockError::LengthMismatch { expected: pos, actual: total });
    }
    Ok(())
}

fn read_vec(cur: &mut Cursor<&[u8]>, len: usize) -> Result<Vec<u8>, BlockError> {
    let remaining = cur.get_ref().len().saturating_sub(cur.position() as usize);
    if len > remaining {
        return Err(BlockError::Truncated);
    }
    let mut out = vec![0u8; len];
    cur.read_exact(&mut out).map_err(short)?;
    Ok(out)
}

fn u16_len(what: &str, len: usize) -> Result<u16, BlockError> {
    u16::try_from(len).map_err(|_| BlockError::Malformed(format!("{what} longer than {} bytes", u16::MAX)))
}

/// `RecipientKey` body: fingerprint and the RSA-wrapped master key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientKeyBody {
    pub key_id: [u8; KEY_ID_LEN],
    pub wrapped_key: Vec<u8>,
}

impl RecipientKeyBody {
    pub fn encode(&self) -> Result<Vec<u8>, BlockError> {
        let wrapped_len = u16_len("wrapped key", self.wrapped_key.len())?;
        let mut out = Vec::with_capacity(KEY_ID_LEN + 2 + self.wrapped_key.len());
        out.extend_from_slice(&self.key_id);
        out.write_u16::<LittleEndian>(wrapped_len).map_err(short)?;
        out.extend_from_slice(&self.wrapped_key);
        Ok(out)
    }

    pub fn decode(body: &[u8]) -> Result<Self, BlockError> {
        let mut cur = Cursor::new(body);
        let mut key_id = [0u8; KEY_ID_LEN];
        cur.read_exact(&mut key_id).map_err(short)?;
        let wrapped_len = cur.read_u16::<LittleEndian>().map_err(short)? as usize;
        let wrapped_key = read_vec(&mut cur, wrapped_len)?;
        ensure_consumed(&cur)?;
        Ok(Self { key_id, wrapped_key })
    }
}

/// `PlainStream` / `EncryptedStream` body.
///
/// `salt` is present exactly when the stream is encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOpenBody {
    pub name: String,
    pub extra: Vec<u8>,
    pub salt: Option<[u8; STREAM_SALT_LEN]>,
}

impl StreamOpenBody {
    pub fn encode(&self) -> Result<Vec<u8>, BlockError> {
        let name_len = u16_len("stream name", self.name.len())?;
        let extra_len = u16_len("stream extra", self.extra.len())?;

        let salt_len = if self.salt.is_some() { STREAM_SALT_LEN } else { 0 };
        let mut out = Vec::with_capacity(4 + self.name.len() + self.extra.len() + salt_len);
        out.write_u16::<LittleEndian>(name_len).map_err(short)?;
        out.extend_from_slice(self.name.as_bytes());
        out.write_u16::<LittleEndian>(extra_len).map_err(short)?;
        out.extend_from_slice(&self.extra);
        if let Some(salt) = &self.salt {
            out.extend_from_slice(salt);
        }
        Ok(out)
    }

    pub fn decode(body: &[u8], encrypted: bool) -> Result<Self, BlockError> {
        let mut cur = Cursor::new(body);

        let name_len = cur.read_u16::<LittleEndian>().map_err(short)? as usize;
        let name = String::from_utf8(read_vec(&mut cur, name_len)?)
            .map_err(|_| BlockError::Malformed("stream name is not UTF-8".into()))?;

        let extra_len = cur.read_u16::<LittleEndian>().map_err(short)? as usize;
        let extra = read_vec(&mut cur, extra_len)?;

        let salt = if encrypted {
            let mut salt = [0u8; STREAM_SALT_LEN];
            cur.read_exact(&mut salt).map_err(short)?;
            Some(salt)
        } else {
            None
        };

        ensure_consumed(&cur)?;
        Ok(Self { name, extra, salt })
    }
}

/// `EndOfStream` body (before sealing, for encrypted streams).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamTrailer {
    pub plaintext_len: u64,
    pub frame_count: u32,
    pub crc32: u32,
}

impl StreamTrailer {
    pub const LEN: usize = 8 // plaintext_len
        + 4                  // frame_count
        + 4;                 // crc32

    pub fn encode(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[0..8].copy_from_slice(&self.plaintext_len.to_le_bytes());
        out[8..12].copy_from_slice(&self.frame_count.to_le_bytes());
        out[12..16].copy_from_slice(&self.crc32.to_le_bytes());
        out
    }

    pub fn decode(body: &[u8]) -> Result<Self, BlockError> {
        if body.len() != Self::LEN {
            return Err(BlockError::LengthMismatch { expected: Self::LEN, actual: body.len() });
        }
        let mut cur = Cursor::new(body);
        Ok(Self {
            plaintext_len: cur.read_u64::<LittleEndian>().map_err(short)?,
            frame_count: cur.read_u32::<LittleEndian>().map_err(short)?,
            crc32: cur.read_u32::<LittleEndian>().map_err(short)?,
        })
    }
}

/// `EndOfContainer` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerTrailer {
    pub stream_count: u32,
}

impl ContainerTrailer {
    pub const LEN: usize = 4;

    pub fn encode(&self) -> [u8; Self::LEN] {
        self.stream_count.to_le_bytes()
    }

    pub fn decode(body: &[u8]) -> Result<Self, BlockError> {
        if body.len() != Self::LEN {
            return Err(BlockError::LengthMismatch { expected: Self::LEN, actual: body.len() });
        }
        let mut cur = Cursor::new(body);
        Ok(Self { stream_count: cur.read_u32::<LittleEndian>().map_err(short)? })
    }
}
