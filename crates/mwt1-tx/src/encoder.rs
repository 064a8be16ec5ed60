use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use mwt1_codec::{encode, PacketConfig};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;
use tracing::{debug, trace};

use crate::config::ShutdownPolicy;
use crate::error::{Result, TxError};

/// State shared by every producer handle and the consumer.
#[derive(Debug)]
pub(crate) struct Shared {
    /// Taken on close; producers then see `Closed`.
    tx: Mutex<Option<Sender<Bytes>>>,
    aborted: AtomicBool,
}

impl Shared {
    pub(crate) fn new(tx: Sender<Bytes>) -> Arc<Self> {
        Arc::new(Self {
            tx: Mutex::new(Some(tx)),
            aborted: AtomicBool::new(false),
        })
    }

    /// Stop accepting frames. With `abort`, the consumer discards what is
    /// still queued.
    pub(crate) fn close(&self, abort: bool) {
        if abort {
            self.aborted.store(true, Ordering::SeqCst);
        }
        let sender = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if sender.is_some() {
            debug!(abort, "transmit queue closed");
        }
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    fn sender(&self) -> Result<Sender<Bytes>> {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(TxError::Closed)
    }
}

/// Producer handle for the transmit queue.
///
/// Cheap to clone; every clone feeds the same queue. Payloads are framed on
/// the caller's thread, so a bad payload fails at submission and never
/// reaches the queue.
#[derive(Debug, Clone)]
pub struct PacketEncoder {
    shared: Arc<Shared>,
    config: PacketConfig,
}

impl PacketEncoder {
    pub(crate) fn new(shared: Arc<Shared>, config: PacketConfig) -> Self {
        Self { shared, config }
    }

    /// Frame `payload` and queue it, blocking while the queue is full.
    ///
    /// Must not be called from inside an async runtime; use
    /// `send_pkt_async` there.
    pub fn send_pkt(&self, payload: &[u8]) -> Result<()> {
        let frame = self.frame(payload)?;
        self.shared
            .sender()?
            .blocking_send(frame)
            .map_err(|_| TxError::Closed)
    }

    /// Frame `payload` and queue it without blocking.
    pub fn try_send_pkt(&self, payload: &[u8]) -> Result<()> {
        let frame = self.frame(payload)?;
        self.shared
            .sender()?
            .try_send(frame)
            .map_err(|err| match err {
                TrySendError::Full(_) => TxError::QueueFull,
                TrySendError::Closed(_) => TxError::Closed,
            })
    }

    /// Frame `payload` and queue it, waiting asynchronously for space.
    #[cfg(feature = "async")]
    pub async fn send_pkt_async(&self, payload: &[u8]) -> Result<()> {
        let frame = self.frame(payload)?;
        let sender = self.shared.sender()?;
        sender.send(frame).await.map_err(|_| TxError::Closed)
    }

    /// Close the queue for every handle. Queued frames are still written.
    pub fn close(&self) {
        self.close_with(ShutdownPolicy::Drain);
    }

    /// Close the queue for every handle under an explicit policy. Lets a
    /// signal handler stop the queue without owning the worker.
    pub fn close_with(&self, policy: ShutdownPolicy) {
        self.shared.close(policy == ShutdownPolicy::Abort);
    }

    /// Whether the queue still accepts frames.
    pub fn is_closed(&self) -> bool {
        self.shared.sender().is_err()
    }

    /// Framing applied to submitted payloads.
    pub fn config(&self) -> &PacketConfig {
        &self.config
    }

    fn frame(&self, payload: &[u8]) -> Result<Bytes> {
        let frame = encode(payload, &self.config)?;
        trace!(
            payload_len = payload.len(),
            frame_len = frame.len(),
            "frame queued"
        );
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use mwt1_codec::{decode_frame, CodecError, MAX_PAYLOAD};
    use tokio::sync::mpsc;

    use super::*;

    fn encoder(capacity: usize) -> (PacketEncoder, mpsc::Receiver<Bytes>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            PacketEncoder::new(Shared::new(tx), PacketConfig::default()),
            rx,
        )
    }

    #[test]
    fn submitted_payload_arrives_framed() {
        let (encoder, mut rx) = encoder(2);

        encoder.send_pkt(b"queued").unwrap();

        let frame = rx.blocking_recv().unwrap();
        assert_eq!(decode_frame(&frame).unwrap().payload.as_ref(), b"queued");
    }

    #[test]
    fn try_send_reports_full_queue() {
        let (encoder, _rx) = encoder(1);

        encoder.try_send_pkt(b"one").unwrap();
        assert!(matches!(
            encoder.try_send_pkt(b"two"),
            Err(TxError::QueueFull)
        ));
    }

    #[test]
    fn close_applies_to_every_clone() {
        let (encoder, mut rx) = encoder(2);
        let other = encoder.clone();

        encoder.send_pkt(b"before").unwrap();
        other.close();

        assert!(encoder.is_closed());
        assert!(matches!(encoder.send_pkt(b"after"), Err(TxError::Closed)));
        assert!(matches!(other.try_send_pkt(b"after"), Err(TxError::Closed)));

        // Frames queued before the close are still delivered, then the queue ends.
        assert!(rx.blocking_recv().is_some());
        assert!(rx.blocking_recv().is_none());
    }

    #[test]
    fn oversized_payload_rejected_before_queueing() {
        let (encoder, mut rx) = encoder(2);

        let err = encoder.send_pkt(&vec![0u8; MAX_PAYLOAD + 1]).unwrap_err();
        assert!(matches!(
            err,
            TxError::Codec(CodecError::PayloadTooLarge { .. })
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_reports_closed() {
        let (encoder, rx) = encoder(2);
        drop(rx);
        assert!(matches!(encoder.send_pkt(b"x"), Err(TxError::Closed)));
    }
}
