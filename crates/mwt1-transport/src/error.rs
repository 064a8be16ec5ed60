use std::path::PathBuf;

/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Samples per symbol and bits per symbol must both be positive.
    #[error(
        "invalid modulation parameters ({samples_per_symbol} samples/symbol, {bits_per_symbol} bits/symbol)"
    )]
    InvalidModulation {
        samples_per_symbol: usize,
        bits_per_symbol: usize,
    },

    /// The sample block size cannot be expressed in whole bytes.
    #[error("invalid sample modulus {0} (must be a positive multiple of 8)")]
    InvalidModulus(usize),

    /// The alignment block for these modulation parameters is too large to
    /// pad a frame to.
    #[error(
        "alignment block too large ({samples_per_symbol} samples/symbol, {bits_per_symbol} bits/symbol, max {max} bytes)"
    )]
    AlignmentOverflow {
        samples_per_symbol: usize,
        bits_per_symbol: usize,
        max: usize,
    },

    /// Failed to bind to the specified address.
    #[error("failed to bind to {path}: {source}")]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to connect to the specified address.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to accept an incoming connection.
    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// An I/O error occurred on the sink.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
