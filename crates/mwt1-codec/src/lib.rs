//! Packet framing and line coding for the MWT1 radio link.
//!
//! Every payload leaves this crate as a frame the modulator can send as is:
//! - 16 bytes of `0xAA` preamble for bit timing recovery
//! - The `FF 00 FF 00` access code marking the start of data
//! - `payload || crc8(payload)`, 4b/6b line coded and packed MSB first
//! - 10 zero bytes of trailer, then optional zero bytes for sample alignment
//!
//! Encoding is a pure function of the payload and the [`PacketConfig`]. The
//! matching [`decode_frame`] recovers the payload from a complete frame.

pub mod bits;
pub mod crc;
pub mod decode;
pub mod error;
#[cfg(feature = "async")]
pub mod framed;
pub mod linecode;
pub mod packet;
pub mod writer;

pub use crc::{crc8, crc8_update, CRC8_TABLE};
pub use decode::{decode_body, decode_frame, DecodedFrame};
pub use error::{CodecError, Result};
#[cfg(feature = "async")]
pub use framed::PacketCodec;
pub use linecode::{line_decode, line_encode, ENCODE_TABLE};
pub use packet::{
    encode, encode_packet, encode_with_alignment, encoded_body_len, frame_layout, make_packet,
    FrameLayout, PacketConfig, ACCESS_CODE, MAX_PAYLOAD, PREAMBLE, SYNC_LEN, TRAILER_PADDING,
};
pub use writer::PacketWriter;
