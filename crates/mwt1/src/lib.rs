//! Packet framing and line coding for DC-balanced radio links.
//!
//! mwt1 turns application payloads into frames a modulator can send as-is:
//! CRC-8 protected, 4b/6b line coded, wrapped in a preamble and access code,
//! and padded to whole transport sample blocks.
//!
//! # Crate Structure
//!
//! - [`transport`]: modulation parameters, sample alignment, byte sinks
//! - [`codec`]: CRC-8, line code, frame encoder and decoder
//! - [`tx`]: bounded transmit queue feeding a sink

/// Re-export transport types.
pub mod transport {
    pub use mwt1_transport::*;
}

/// Re-export codec types.
pub mod codec {
    pub use mwt1_codec::*;
}

/// Re-export transmit queue types.
pub mod tx {
    pub use mwt1_tx::*;
}
