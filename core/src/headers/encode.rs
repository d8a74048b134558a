//! headers/encode.rs
//!
//! Serializes `ContainerHeader` into its fixed 20-byte form.
//! Validation runs first so an invalid header never reaches the wire.

use crate::headers::types::{HEADER_CRC_SPAN, HEADER_LEN_V1};
use crate::headers::types::{ContainerHeader, HeaderError};
use crate::utils::compute_crc32;

/// Serialize a `ContainerHeader` into a 20-byte buffer in little-endian order.
///
/// The trailing CRC is computed here; the `crc32` field of `h` is ignored.
#[inline]
pub fn encode_header_le(h: &ContainerHeader) -> Result<[u8; HEADER_LEN_V1], HeaderError> {
    h.validate()?;

    let mut out = [0u8; HEADER_LEN_V1];
    let mut i = 0usize;

    fn put_u16(out: &mut [u8], i: &mut usize, v: u16) {
        out[*i..*i + 2].copy_from_slice(&v.to_le_bytes());
        *i += 2;
    }
    fn put_u32(out: &mut [u8], i: &mut usize, v: u32) {
        out[*i..*i + 4].copy_from_slice(&v.to_le_bytes());
        *i += 4;
    }
    fn put_bytes(out: &mut [u8], i: &mut usize, b: &[u8]) {
        out[*i..*i + b.len()].copy_from_slice(b);
        *i += b.len();
    }

    put_bytes(&mut out, &mut i, &h.magic);    // 0..4   magic number
    put_u16(&mut out, &mut i, h.version);     // 4..6   version
    put_u16(&mut out, &mut i, h.cipher);      // 6..8   cipher suite
    put_u16(&mut out, &mut i, h.hkdf_prf);    // 8..10  HKDF PRF
    put_u16(&mut out, &mut i, h.reserved);    // 10..12 reserved
    put_u32(&mut out, &mut i, h.chunk_size);  // 12..16 chunk size

    let crc = compute_crc32(&out[..HEADER_CRC_SPAN]);
    put_u32(&mut out, &mut i, crc);           // 16..20 crc32

    debug_assert_eq!(i, HEADER_LEN_V1, "encoding wrote incorrect length");

    Ok(out)
}
