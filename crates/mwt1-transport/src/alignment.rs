//! Sample alignment rules.
//!
//! A modulator turns every `bits_per_symbol` bits into `samples_per_symbol`
//! samples. Hardware front ends move samples in fixed-size blocks, so a frame
//! that stops mid-block either stalls in the driver or gets flushed with
//! garbage. The rules here compute how many zero bytes to append so the
//! modulated frame lands on a block boundary.

use crate::error::{Result, TransportError};

/// Default transfer granularity in samples (512-byte USB packets of 4-byte
/// I/Q samples).
pub const DEFAULT_SAMPLE_MODULUS: usize = 128;

/// Largest alignment step, in bytes, a rule may ask a frame to pad to.
pub const MAX_ALIGNMENT_BYTES: usize = 1 << 20;

/// Modulation parameters that drive alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModulationParams {
    /// Samples produced per modulated symbol.
    pub samples_per_symbol: usize,
    /// Bits carried per modulated symbol.
    pub bits_per_symbol: usize,
}

impl ModulationParams {
    /// Validate and build modulation parameters. Both values must be positive.
    pub fn new(samples_per_symbol: usize, bits_per_symbol: usize) -> Result<Self> {
        if samples_per_symbol == 0 || bits_per_symbol == 0 {
            return Err(TransportError::InvalidModulation {
                samples_per_symbol,
                bits_per_symbol,
            });
        }
        Ok(Self {
            samples_per_symbol,
            bits_per_symbol,
        })
    }

    fn overflow(self) -> TransportError {
        TransportError::AlignmentOverflow {
            samples_per_symbol: self.samples_per_symbol,
            bits_per_symbol: self.bits_per_symbol,
            max: MAX_ALIGNMENT_BYTES,
        }
    }
}

/// Decides how many zero bytes must follow a frame of a given length.
pub trait SampleAlignment: Send + Sync {
    /// Number of zero bytes to append to a frame of `frame_len` bytes.
    ///
    /// Fails when the parameters call for more padding than
    /// [`MAX_ALIGNMENT_BYTES`].
    fn padding_bytes(&self, frame_len: usize, params: ModulationParams) -> Result<usize>;

    /// Rule name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Pads frames to a whole number of `sample_modulus`-sample blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockAlignment {
    sample_modulus: usize,
}

impl BlockAlignment {
    /// Build a rule for a block size in samples. The block must map onto whole
    /// bytes, so it has to be a positive multiple of 8.
    pub fn new(sample_modulus: usize) -> Result<Self> {
        if sample_modulus == 0 || sample_modulus % 8 != 0 {
            return Err(TransportError::InvalidModulus(sample_modulus));
        }
        Ok(Self { sample_modulus })
    }

    /// Block size in samples.
    pub fn sample_modulus(&self) -> usize {
        self.sample_modulus
    }

    /// Smallest frame length step (in bytes) that keeps frames block aligned:
    /// `lcm(sample_modulus / 8, sps) * bps / sps`.
    pub fn byte_modulus(&self, params: ModulationParams) -> Result<usize> {
        let block = self.sample_modulus / 8;
        // lcm(block, sps) / sps == block / gcd(block, sps), which cannot overflow.
        let per_symbol = block / gcd(block, params.samples_per_symbol);
        per_symbol
            .checked_mul(params.bits_per_symbol)
            .filter(|&modulus| modulus <= MAX_ALIGNMENT_BYTES)
            .ok_or_else(|| params.overflow())
    }
}

impl Default for BlockAlignment {
    fn default() -> Self {
        Self {
            sample_modulus: DEFAULT_SAMPLE_MODULUS,
        }
    }
}

impl SampleAlignment for BlockAlignment {
    fn padding_bytes(&self, frame_len: usize, params: ModulationParams) -> Result<usize> {
        let modulus = self.byte_modulus(params)?;
        Ok(match frame_len % modulus {
            0 => 0,
            r => modulus - r,
        })
    }

    fn name(&self) -> &'static str {
        "block"
    }
}

/// Never pads. Useful for sinks that accept arbitrary sample counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoAlignment;

impl SampleAlignment for NoAlignment {
    fn padding_bytes(&self, _frame_len: usize, _params: ModulationParams) -> Result<usize> {
        Ok(0)
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
