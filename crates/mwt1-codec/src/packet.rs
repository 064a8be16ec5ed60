use bytes::{BufMut, Bytes, BytesMut};
use mwt1_transport::{BlockAlignment, ModulationParams, SampleAlignment};
use tracing::trace;

use crate::bits::{bits_from_codewords, pack_bits};
use crate::crc::crc8;
use crate::error::{CodecError, Result};
use crate::linecode::line_encode;

/// Receiver training pattern sent ahead of every frame.
pub const PREAMBLE: [u8; 16] = [0xAA; 16];

/// Synchronization word marking the start of the encoded body.
pub const ACCESS_CODE: [u8; 4] = [0xFF, 0x00, 0xFF, 0x00];

/// Zero bytes closing every frame.
pub const TRAILER_PADDING: [u8; 10] = [0x00; 10];

/// Preamble plus access code.
pub const SYNC_LEN: usize = PREAMBLE.len() + ACCESS_CODE.len();

/// Largest payload a frame may carry.
pub const MAX_PAYLOAD: usize = 4096;

/// How frames are laid out for the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketConfig {
    /// Samples per modulated symbol. Only used for alignment padding.
    pub samples_per_symbol: usize,
    /// Bits per modulated symbol. Only used for alignment padding.
    pub bits_per_symbol: usize,
    /// Append zero bytes so the frame fills whole transport sample blocks.
    pub pad_for_transport: bool,
}

impl PacketConfig {
    /// Config for the given modulation with transport padding enabled.
    pub fn new(samples_per_symbol: usize, bits_per_symbol: usize) -> Self {
        Self {
            samples_per_symbol,
            bits_per_symbol,
            pad_for_transport: true,
        }
    }

    /// Same modulation, no alignment padding.
    pub fn without_padding(self) -> Self {
        Self {
            pad_for_transport: false,
            ..self
        }
    }

    /// Validated modulation parameters.
    pub fn modulation(&self) -> Result<ModulationParams> {
        Ok(ModulationParams::new(
            self.samples_per_symbol,
            self.bits_per_symbol,
        )?)
    }
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self::new(2, 1)
    }
}

/// Section lengths of one frame, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub preamble: usize,
    pub access_code: usize,
    pub body: usize,
    pub trailer: usize,
    pub alignment: usize,
}

impl FrameLayout {
    /// Total frame length.
    pub fn total(&self) -> usize {
        self.preamble + self.access_code + self.body + self.trailer + self.alignment
    }
}

/// Length of the line-coded body for a payload of `payload_len` bytes.
///
/// `payload || check` is `payload_len + 1` bytes, two 6-bit codewords each,
/// rounded up to whole bytes.
pub fn encoded_body_len(payload_len: usize) -> usize {
    ((payload_len + 1) * 12).div_ceil(8)
}

/// Section layout of the frame `encode` would build for `payload_len` bytes.
pub fn frame_layout(payload_len: usize, config: &PacketConfig) -> Result<FrameLayout> {
    layout_with(payload_len, config, &BlockAlignment::default())
}

fn layout_with(
    payload_len: usize,
    config: &PacketConfig,
    alignment: &dyn SampleAlignment,
) -> Result<FrameLayout> {
    check_payload_len(payload_len)?;

    let mut layout = FrameLayout {
        preamble: PREAMBLE.len(),
        access_code: ACCESS_CODE.len(),
        body: encoded_body_len(payload_len),
        trailer: TRAILER_PADDING.len(),
        alignment: 0,
    };
    if config.pad_for_transport {
        layout.alignment = alignment.padding_bytes(layout.total(), config.modulation()?)?;
    }
    Ok(layout)
}

fn check_payload_len(len: usize) -> Result<()> {
    if len > MAX_PAYLOAD {
        return Err(CodecError::PayloadTooLarge {
            size: len,
            max: MAX_PAYLOAD,
        });
    }
    Ok(())
}

/// Encode a payload into a frame and append it to `dst`.
///
/// Wire format:
/// ```text
/// ┌────────────┬─────────────┬──────────────────────────┬───────────┬───────────┐
/// │ Preamble   │ Access code │ 4b/6b(payload || crc8)   │ Trailer   │ Alignment │
/// │ 0xAA × 16  │ FF 00 FF 00 │ packed MSB first         │ 0x00 × 10 │ 0x00 × n  │
/// └────────────┴─────────────┴──────────────────────────┴───────────┴───────────┘
/// ```
///
/// Nothing is written to `dst` when the payload or modulation is rejected.
pub fn encode_packet(
    payload: &[u8],
    config: &PacketConfig,
    alignment: &dyn SampleAlignment,
    dst: &mut BytesMut,
) -> Result<()> {
    let layout = layout_with(payload.len(), config, alignment)?;

    let mut raw = Vec::with_capacity(payload.len() + 1);
    raw.extend_from_slice(payload);
    raw.push(crc8(payload));
    let body = pack_bits(&bits_from_codewords(&line_encode(&raw)));
    debug_assert_eq!(body.len(), layout.body);

    dst.reserve(layout.total());
    dst.put_slice(&PREAMBLE);
    dst.put_slice(&ACCESS_CODE);
    dst.put_slice(&body);
    dst.put_slice(&TRAILER_PADDING);
    dst.put_bytes(0, layout.alignment);

    trace!(
        payload_len = payload.len(),
        frame_len = layout.total(),
        alignment = layout.alignment,
        rule = alignment.name(),
        "encoded packet"
    );
    Ok(())
}

/// Encode a payload into a frame using a caller-supplied alignment rule.
pub fn encode_with_alignment(
    payload: &[u8],
    config: &PacketConfig,
    alignment: &dyn SampleAlignment,
) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    encode_packet(payload, config, alignment, &mut dst)?;
    Ok(dst.freeze())
}

/// Encode a payload into a frame, aligned to 128-sample transport blocks when
/// `config.pad_for_transport` is set.
pub fn encode(payload: &[u8], config: &PacketConfig) -> Result<Bytes> {
    encode_with_alignment(payload, config, &BlockAlignment::default())
}

/// Build a frame from loose modulation arguments.
pub fn make_packet(
    payload: &[u8],
    samples_per_symbol: usize,
    bits_per_symbol: usize,
    pad_for_transport: bool,
) -> Result<Bytes> {
    let config = PacketConfig {
        samples_per_symbol,
        bits_per_symbol,
        pad_for_transport,
    };
    encode(payload, &config)
}
