use mwt1_transport::TransportError;

/// Errors that can occur while building or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload exceeds the frame's payload limit.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The alignment parameters were rejected by the transport.
    #[error("transport alignment error: {0}")]
    Transport(#[from] TransportError),

    /// The frame does not start with the preamble and access code.
    #[error("frame does not start with preamble and access code")]
    MissingSync,

    /// The frame body is too short to hold the check byte.
    #[error("frame body truncated (no check byte)")]
    TruncatedBody,

    /// A 6-bit symbol is not in the line-code table.
    #[error("invalid 4b/6b codeword 0x{value:02x} at symbol {index}")]
    InvalidCodeword { index: usize, value: u8 },

    /// The embedded check byte does not match the recovered payload.
    #[error("checksum mismatch (computed 0x{expected:02x}, frame carries 0x{found:02x})")]
    ChecksumMismatch { expected: u8, found: u8 },

    /// An I/O error occurred while writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink stopped accepting bytes mid-frame.
    #[error("sink closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, CodecError>;
