/// Errors that can occur in the transmit queue.
#[derive(Debug, thiserror::Error)]
pub enum TxError {
    /// The payload could not be framed, or a frame could not be written.
    #[error("codec error: {0}")]
    Codec(#[from] mwt1_codec::CodecError),

    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] mwt1_transport::TransportError),

    /// I/O error outside frame writes (e.g. spawning the worker thread).
    #[error("transmit I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The queue is at capacity (non-blocking submission only).
    #[error("transmit queue full")]
    QueueFull,

    /// The queue has been closed, or the worker has stopped.
    #[error("transmit queue closed")]
    Closed,

    /// The transmit configuration is unusable.
    #[error("invalid transmit config: {0}")]
    InvalidConfig(String),

    /// The sink failed mid-stream. `stats` covers frames written before the
    /// failure; frames still queued are counted as dropped.
    #[error("sink failed after {} frames ({} bytes): {source}", .stats.frames_written, .stats.bytes_written)]
    SinkFailed {
        source: Box<TxError>,
        stats: crate::worker::TxStats,
    },

    /// The worker panicked before finishing.
    #[error("transmit worker panicked")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, TxError>;
