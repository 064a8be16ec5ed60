use std::io::Write;
use std::sync::Arc;
use std::thread::JoinHandle;

use bytes::Bytes;
use mwt1_codec::PacketWriter;
use tokio::sync::mpsc::{self, Receiver};
use tracing::{debug, info, warn};

use crate::config::{ShutdownPolicy, TxConfig};
use crate::encoder::{PacketEncoder, Shared};
use crate::error::{Result, TxError};

/// Counters reported when the consumer stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxStats {
    /// Frames fully written to the sink.
    pub frames_written: u64,
    /// Bytes written to the sink.
    pub bytes_written: u64,
    /// Frames discarded by an abort.
    pub frames_dropped: u64,
}

/// Start a transmit queue draining into `sink` on a dedicated thread.
pub fn spawn<W>(sink: W, config: TxConfig) -> Result<(PacketEncoder, TxWorker)>
where
    W: Write + Send + 'static,
{
    config.validate()?;

    let (tx, rx) = mpsc::channel(config.queue_limit);
    let shared = Shared::new(tx);
    let writer = PacketWriter::with_config(sink, config.packet);

    let consumer = Arc::clone(&shared);
    let handle = std::thread::Builder::new()
        .name("mwt1-tx".to_string())
        .spawn(move || drain(rx, writer, &consumer))?;

    debug!(queue_limit = config.queue_limit, "transmit worker started");

    Ok((
        PacketEncoder::new(Arc::clone(&shared), config.packet),
        TxWorker {
            handle: Some(handle),
            shared,
            policy: config.shutdown,
        },
    ))
}

fn drain<W: Write>(
    mut rx: Receiver<Bytes>,
    mut writer: PacketWriter<W>,
    shared: &Shared,
) -> Result<TxStats> {
    let mut stats = TxStats::default();

    while let Some(frame) = rx.blocking_recv() {
        if shared.is_aborted() {
            stats.frames_dropped += 1;
            continue;
        }
        if let Err(err) = writer.write_frame(&frame) {
            return Err(sink_failed(err.into(), &mut rx, stats));
        }
        stats.frames_written += 1;
        stats.bytes_written += frame.len() as u64;
    }

    if stats.frames_dropped > 0 {
        warn!(dropped = stats.frames_dropped, "queued frames discarded");
    }
    info!(
        frames = stats.frames_written,
        bytes = stats.bytes_written,
        "transmit worker stopped"
    );
    Ok(stats)
}

/// Close the queue after a sink failure, counting unsent frames as dropped.
pub(crate) fn sink_failed(
    source: TxError,
    rx: &mut Receiver<Bytes>,
    mut stats: TxStats,
) -> TxError {
    rx.close();
    while rx.try_recv().is_ok() {
        stats.frames_dropped += 1;
    }
    warn!(
        error = %source,
        frames = stats.frames_written,
        bytes = stats.bytes_written,
        dropped = stats.frames_dropped,
        "sink write failed; stopping transmit worker"
    );
    TxError::SinkFailed {
        source: Box::new(source),
        stats,
    }
}

/// Consumer side of the transmit queue.
///
/// Dropping the worker closes the queue; the thread finishes in the
/// background under the drain policy.
#[derive(Debug)]
pub struct TxWorker {
    handle: Option<JoinHandle<Result<TxStats>>>,
    shared: Arc<Shared>,
    policy: ShutdownPolicy,
}

impl TxWorker {
    /// Close the queue with the configured policy and wait for the consumer.
    pub fn shutdown(self) -> Result<TxStats> {
        let policy = self.policy;
        self.shutdown_with(policy)
    }

    /// Close the queue with an explicit policy and wait for the consumer.
    pub fn shutdown_with(self, policy: ShutdownPolicy) -> Result<TxStats> {
        self.close(policy);
        self.join()
    }

    /// Close the queue without waiting.
    pub fn close(&self, policy: ShutdownPolicy) {
        self.shared.close(policy == ShutdownPolicy::Abort);
    }

    /// Wait for the consumer to finish. Returns once the queue is closed and
    /// drained (or the sink failed).
    pub fn join(mut self) -> Result<TxStats> {
        let handle = self.handle.take().ok_or(TxError::Closed)?;
        handle.join().map_err(|_| TxError::WorkerPanicked)?
    }
}

impl Drop for TxWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shared.close(false);
        }
    }
}
