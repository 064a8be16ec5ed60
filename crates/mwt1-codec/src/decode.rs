//! Frame decoding, the inverse of [`crate::packet::encode`].
//!
//! This works on one complete frame that starts at the preamble. Finding
//! frames in a continuous sample or bit stream is the receiver's job.

use bytes::Bytes;

use crate::bits::{codewords_from_bits, unpack_bits, CODEWORD_BITS};
use crate::crc::crc8;
use crate::error::{CodecError, Result};
use crate::linecode::line_decode;
use crate::packet::{ACCESS_CODE, PREAMBLE};

/// Payload recovered from a frame whose checksum verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    /// The original payload.
    pub payload: Bytes,
    /// The check byte carried by the frame.
    pub checksum: u8,
}

/// Decode a complete frame.
///
/// The body ends at the first zero byte after the access code. Line-coded
/// bytes are never zero (runs are at most four bits), so the first zero is
/// the start of the trailer.
pub fn decode_frame(frame: &[u8]) -> Result<DecodedFrame> {
    let rest = frame
        .strip_prefix(&PREAMBLE)
        .and_then(|rest| rest.strip_prefix(&ACCESS_CODE))
        .ok_or(CodecError::MissingSync)?;

    let body_len = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
    decode_body(&rest[..body_len])
}

/// Decode a bare encoded body (no preamble, access code, or trailer).
pub fn decode_body(body: &[u8]) -> Result<DecodedFrame> {
    let bits = unpack_bits(body);
    // Whole bytes only: two codewords each. Anything past that is tail fill.
    let byte_count = bits.len() / (2 * CODEWORD_BITS);
    let codewords = codewords_from_bits(&bits[..byte_count * 2 * CODEWORD_BITS]);

    let mut raw = line_decode(&codewords)?;
    let found = raw.pop().ok_or(CodecError::TruncatedBody)?;
    let expected = crc8(&raw);
    if expected != found {
        return Err(CodecError::ChecksumMismatch { expected, found });
    }

    Ok(DecodedFrame {
        payload: Bytes::from(raw),
        checksum: found,
    })
}
