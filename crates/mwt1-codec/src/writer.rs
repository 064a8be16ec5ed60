use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use mwt1_transport::{BlockAlignment, SampleAlignment};
use tracing::debug;

use crate::error::{CodecError, Result};
use crate::packet::{encode_packet, PacketConfig, MAX_PAYLOAD};

/// Fits the largest frame (4096-byte payload) with alignment headroom.
const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Encodes payloads and writes complete frames to any `Write` sink.
pub struct PacketWriter<T> {
    inner: T,
    buf: BytesMut,
    config: PacketConfig,
    alignment: Box<dyn SampleAlignment>,
}

impl<T: Write> PacketWriter<T> {
    /// Create a packet writer with the default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, PacketConfig::default())
    }

    /// Create a packet writer with explicit configuration.
    pub fn with_config(inner: T, config: PacketConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            alignment: Box::new(BlockAlignment::default()),
        }
    }

    /// Replace the transport alignment rule.
    pub fn with_alignment(mut self, alignment: impl SampleAlignment + 'static) -> Self {
        self.alignment = Box::new(alignment);
        self
    }

    /// Encode `payload` and write the frame (blocking). Returns the frame
    /// length.
    pub fn send(&mut self, payload: &[u8]) -> Result<usize> {
        if payload.len() > MAX_PAYLOAD {
            return Err(CodecError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD,
            });
        }

        let mut buf = std::mem::take(&mut self.buf);
        buf.clear();
        let result = encode_packet(payload, &self.config, self.alignment.as_ref(), &mut buf)
            .and_then(|()| self.write_frame(&buf));
        let frame_len = buf.len();
        self.buf = buf;
        result.map(|()| frame_len)
    }

    /// Write an already encoded frame (blocking), then flush.
    pub fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < frame.len() {
            match self.inner.write(&frame[offset..]) {
                Ok(0) => return Err(CodecError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                // A blocking socket reports an expired write timeout as EAGAIN.
                Err(err) if err.kind() == ErrorKind::WouldBlock => {
                    return Err(CodecError::Io(ErrorKind::TimedOut.into()))
                }
                Err(err) => return Err(CodecError::Io(err)),
            }
        }
        debug!(frame_len = frame.len(), "frame written");

        self.flush()
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(CodecError::Io(err)),
            }
        }
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner sink.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current packet configuration.
    pub fn config(&self) -> &PacketConfig {
        &self.config
    }
}
