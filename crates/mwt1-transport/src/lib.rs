//! Transport side of the MWT1 transmit chain.
//!
//! The codec hands finished frames to a modulator that consumes bytes from a
//! sink. This crate owns the two things that belong to that collaborator:
//! - The sample-alignment rule that decides how many zero bytes a frame needs
//!   so the modulated output fills whole transfer blocks
//! - The byte sinks themselves (file, stdout, Unix domain socket)
//!
//! Everything above this layer treats the alignment rule as an opaque
//! function of (frame length, samples per symbol, bits per symbol).

pub mod alignment;
pub mod error;
pub mod sink;

#[cfg(unix)]
pub mod uds;

pub use alignment::{
    BlockAlignment, ModulationParams, NoAlignment, SampleAlignment, DEFAULT_SAMPLE_MODULUS,
    MAX_ALIGNMENT_BYTES,
};
pub use error::{Result, TransportError};
pub use sink::SinkStream;

#[cfg(unix)]
pub use uds::UnixDomainSocket;
