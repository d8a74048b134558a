//! headers/decode.rs
//!
//! Deserializes the fixed 20-byte container header. The CRC is checked before
//! field validation so corrupted bytes report as corruption, not as an
//! unknown cipher.

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::MAGIC_RPK1;
use crate::headers::types::{ContainerHeader, HeaderError, HEADER_CRC_SPAN};
use crate::utils::compute_crc32;

#[inline]
pub fn decode_header_le(buf: &[u8]) -> Result<ContainerHeader, HeaderError> {
    if buf.len() < ContainerHeader::LEN {
        return Err(HeaderError::BufferTooShort { have: buf.len(), need: ContainerHeader::LEN });
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&buf[0..4]);

    let h = ContainerHeader {
        magic,
        version:    LittleEndian::read_u16(&buf[4..6]),
        cipher:     LittleEndian::read_u16(&buf[6..8]),
        hkdf_prf:   LittleEndian::read_u16(&buf[8..10]),
        reserved:   LittleEndian::read_u16(&buf[10..12]),
        chunk_size: LittleEndian::read_u32(&buf[12..16]),
        crc32:      LittleEndian::read_u32(&buf[16..20]),
    };

    // Not one of ours at all; report that before any CRC noise.
    if h.magic != MAGIC_RPK1 {
        return Err(HeaderError::InvalidMagic { have: h.magic, need: MAGIC_RPK1 });
    }

    let computed = compute_crc32(&buf[..HEADER_CRC_SPAN]);
    if h.crc32 != computed {
        return Err(HeaderError::InvalidCrc32 { have: h.crc32, need: computed });
    }

    h.validate()?;

    Ok(h)
}
