use crate::headers::{encode_header_le, ContainerHeader};
use crate::crypto::types::{AadError, FrameAad};

/// Stream-level AAD prefix: encoded container header followed by the
/// stream-open block body (name, extra, salt).
///
/// Computed once per stream; every frame of the stream appends its own fields.
#[inline]
pub fn build_stream_aad_prefix(
    header: &ContainerHeader,
    stream_open_body: &[u8],
) -> Result<Vec<u8>, AadError> {
    let header_bytes = encode_header_le(header)?;

    let mut out = Vec::with_capacity(header_bytes.len() + stream_open_body.len());
    out.extend_from_slice(&header_bytes);
    out.extend_from_slice(stream_open_body);
    Ok(out)
}

/// Full per-frame AAD: stream prefix plus the frame fields known before encryption.
#[inline]
pub fn build_frame_aad(
    stream_prefix: &[u8],
    frame: &FrameAad,
) -> Result<Vec<u8>, AadError> {
    if stream_prefix.is_empty() {
        return Err(AadError::MissingPrefix);
    }

    let mut out = Vec::with_capacity(stream_prefix.len() + FrameAad::LEN);
    out.extend_from_slice(stream_prefix);
    out.push(frame.block_type);
    out.extend_from_slice(&frame.frame_index.to_le_bytes());
    out.extend_from_slice(&frame.plaintext_len.to_le_bytes());

    debug_assert_eq!(out.len(), stream_prefix.len() + FrameAad::LEN);
    Ok(out)
}
