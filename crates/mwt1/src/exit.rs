use std::fmt;
use std::io;

use mwt1_codec::CodecError;
use mwt1_transport::TransportError;
use mwt1_tx::TxError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound
        | io::ErrorKind::ConnectionRefused
        | io::ErrorKind::BrokenPipe => FAILURE,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Bind { source, .. }
        | TransportError::Connect { source, .. }
        | TransportError::Accept(source)
        | TransportError::Io(source) => io_error(context, source),
        TransportError::InvalidModulation { .. }
        | TransportError::InvalidModulus(_)
        | TransportError::AlignmentOverflow { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    match err {
        CodecError::Io(source) => io_error(context, source),
        CodecError::Transport(err) => transport_error(context, err),
        CodecError::PayloadTooLarge { .. }
        | CodecError::MissingSync
        | CodecError::TruncatedBody
        | CodecError::InvalidCodeword { .. }
        | CodecError::ChecksumMismatch { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        CodecError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn tx_error(context: &str, err: TxError) -> CliError {
    match err {
        TxError::Codec(err) => codec_error(context, err),
        TxError::Transport(err) => transport_error(context, err),
        TxError::Io(source) => io_error(context, source),
        TxError::SinkFailed { source, stats } => {
            let mut err = tx_error(context, *source);
            err.message = format!(
                "{} (after {} frames, {} dropped)",
                err.message, stats.frames_written, stats.frames_dropped
            );
            err
        }
        TxError::InvalidConfig(_) => CliError::new(USAGE, format!("{context}: {err}")),
        TxError::Closed | TxError::QueueFull => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
        TxError::WorkerPanicked => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_frames_are_data_errors() {
        let err = codec_error(
            "decode failed",
            CodecError::ChecksumMismatch {
                expected: 0x29,
                found: 0x28,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode failed: "));
    }

    #[test]
    fn bad_modulation_is_usage_error() {
        let err = tx_error(
            "transmit failed",
            TxError::Codec(CodecError::Transport(TransportError::InvalidModulation {
                samples_per_symbol: 0,
                bits_per_symbol: 1,
            })),
        );
        assert_eq!(err.code, USAGE);

        let err = codec_error(
            "encode failed",
            CodecError::Transport(TransportError::AlignmentOverflow {
                samples_per_symbol: 3,
                bits_per_symbol: usize::MAX,
                max: 1 << 20,
            }),
        );
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn stalled_sink_is_timeout() {
        let err = tx_error(
            "transmit failed",
            TxError::SinkFailed {
                source: Box::new(TxError::Codec(CodecError::Io(io::Error::from(
                    io::ErrorKind::TimedOut,
                )))),
                stats: mwt1_tx::TxStats {
                    frames_written: 3,
                    bytes_written: 120,
                    frames_dropped: 2,
                },
            },
        );
        assert_eq!(err.code, TIMEOUT);
        assert!(err.message.ends_with("(after 3 frames, 2 dropped)"));
    }

    #[test]
    fn permission_denied_maps_through_layers() {
        let err = tx_error(
            "open failed",
            TxError::Transport(TransportError::Io(io::Error::from(
                io::ErrorKind::PermissionDenied,
            ))),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }
}
