//! Async consumer for the transmit queue.

use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{self, Receiver};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{ShutdownPolicy, TxConfig};
use crate::encoder::{PacketEncoder, Shared};
use crate::error::{Result, TxError};
use crate::worker::{sink_failed, TxStats};

/// Start a transmit queue draining into an async sink on the current runtime.
///
/// Producers inside the runtime should use `send_pkt_async`.
pub fn spawn_async<W>(sink: W, config: TxConfig) -> Result<(PacketEncoder, AsyncTxWorker)>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    config.validate()?;

    let (tx, rx) = mpsc::channel(config.queue_limit);
    let shared = Shared::new(tx);
    let handle = tokio::spawn(drain(rx, sink, Arc::clone(&shared)));

    debug!(queue_limit = config.queue_limit, "async transmit worker started");

    Ok((
        PacketEncoder::new(Arc::clone(&shared), config.packet),
        AsyncTxWorker {
            handle: Some(handle),
            shared,
            policy: config.shutdown,
        },
    ))
}

async fn drain<W>(mut rx: Receiver<Bytes>, mut sink: W, shared: Arc<Shared>) -> Result<TxStats>
where
    W: AsyncWrite + Unpin,
{
    let mut stats = TxStats::default();

    while let Some(frame) = rx.recv().await {
        if shared.is_aborted() {
            stats.frames_dropped += 1;
            continue;
        }
        let written = async {
            sink.write_all(&frame).await?;
            sink.flush().await
        }
        .await;
        if let Err(err) = written {
            return Err(sink_failed(TxError::Io(err), &mut rx, stats));
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

/// Async consumer side of the transmit queue.
#[derive(Debug)]
pub struct AsyncTxWorker {
    handle: Option<JoinHandle<Result<TxStats>>>,
    shared: Arc<Shared>,
    policy: ShutdownPolicy,
}

impl AsyncTxWorker {
    /// Close the queue with the configured policy and wait for the consumer.
    pub async fn shutdown(self) -> Result<TxStats> {
        let policy = self.policy;
        self.shutdown_with(policy).await
    }

    /// Close the queue with an explicit policy and wait for the consumer.
    pub async fn shutdown_with(self, policy: ShutdownPolicy) -> Result<TxStats> {
        self.close(policy);
        self.join().await
    }

    /// Close the queue without waiting.
    pub fn close(&self, policy: ShutdownPolicy) {
        self.shared.close(policy == ShutdownPolicy::Abort);
    }

    /// Wait for the consumer task to finish.
    pub async fn join(mut self) -> Result<TxStats> {
        let handle = self.handle.take().ok_or(TxError::Closed)?;
        handle.await.map_err(|_| TxError::WorkerPanicked)?
    }
}

impl Drop for AsyncTxWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shared.close(false);
        }
    }
}
