use mwt1_codec::PacketConfig;

use crate::error::{Result, TxError};

/// Frames that may wait in the queue before producers block.
pub const DEFAULT_QUEUE_LIMIT: usize = 2;

/// What happens to queued frames when the queue is shut down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShutdownPolicy {
    /// Write every frame already queued, then stop.
    #[default]
    Drain,
    /// Discard queued frames. A frame already being written is finished.
    Abort,
}

/// Transmit queue configuration.
#[derive(Debug, Clone)]
pub struct TxConfig {
    /// Queue capacity in frames. Default: 2.
    pub queue_limit: usize,
    /// Framing applied to every payload.
    pub packet: PacketConfig,
    /// Policy applied by `shutdown()`.
    pub shutdown: ShutdownPolicy,
}

impl TxConfig {
    /// Config with default queue settings for the given framing.
    pub fn new(packet: PacketConfig) -> Self {
        Self {
            queue_limit: DEFAULT_QUEUE_LIMIT,
            packet,
            shutdown: ShutdownPolicy::default(),
        }
    }

    /// Same config with a different shutdown policy.
    pub fn with_shutdown(self, shutdown: ShutdownPolicy) -> Self {
        Self { shutdown, ..self }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.queue_limit == 0 {
            return Err(TxError::InvalidConfig(
                "queue_limit must be at least 1".to_string(),
            ));
        }
        if self.packet.pad_for_transport {
            self.packet.modulation()?;
        }
        Ok(())
    }
}

impl Default for TxConfig {
    fn default() -> Self {
        Self::new(PacketConfig::default())
    }
}
