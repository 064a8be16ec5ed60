//! Transmit queue between payload producers and a modulator sink.
//!
//! Producers hand payloads to a [`PacketEncoder`], which frames them right
//! away and submits the frame to a bounded queue. A single consumer drains
//! the queue into the sink, one whole frame at a time. A full queue blocks
//! (or, with `try_send_pkt`, rejects) the producer.
//!
//! Shutdown closes the queue for every producer. Under
//! [`ShutdownPolicy::Drain`] queued frames are still written; under
//! [`ShutdownPolicy::Abort`] they are discarded.

pub mod config;
pub mod encoder;
pub mod error;
pub mod worker;

#[cfg(feature = "async")]
pub mod async_worker;

#[cfg(feature = "async")]
pub use async_worker::{spawn_async, AsyncTxWorker};
pub use config::{ShutdownPolicy, TxConfig, DEFAULT_QUEUE_LIMIT};
pub use encoder::PacketEncoder;
pub use error::{Result, TxError};
pub use worker::{spawn, TxStats, TxWorker};
