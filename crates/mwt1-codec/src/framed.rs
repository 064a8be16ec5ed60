//! `tokio_util` codec adapter for async sinks.

use bytes::{Bytes, BytesMut};
use mwt1_transport::{BlockAlignment, SampleAlignment};
use tokio_util::codec::Encoder;

use crate::error::CodecError;
use crate::packet::{encode_packet, PacketConfig};

/// Encodes payloads into frames for a `FramedWrite`.
#[derive(Debug, Clone, Default)]
pub struct PacketCodec<A = BlockAlignment> {
    config: PacketConfig,
    alignment: A,
}

impl PacketCodec {
    /// Codec with 128-sample block alignment.
    pub fn new(config: PacketConfig) -> Self {
        Self::with_alignment(config, BlockAlignment::default())
    }
}

impl<A: SampleAlignment> PacketCodec<A> {
    /// Codec with an explicit alignment rule.
    pub fn with_alignment(config: PacketConfig, alignment: A) -> Self {
        Self { config, alignment }
    }

    /// Packet configuration applied to every item.
    pub fn config(&self) -> &PacketConfig {
        &self.config
    }
}

impl<A: SampleAlignment> Encoder<Bytes> for PacketCodec<A> {
    type Error = CodecError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_packet(&item, &self.config, &self.alignment, dst)
    }
}

impl<'a, A: SampleAlignment> Encoder<&'a [u8]> for PacketCodec<A> {
    type Error = CodecError;

    fn encode(&mut self, item: &'a [u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_packet(item, &self.config, &self.alignment, dst)
    }
}
