//! Bit layout of an identifier
//!
//! Fields are packed below the sign bit, most significant first:
//! elapsed, sequence, worker id.

use crate::error::ConfigError;

/// Widths, masks and shifts derived from the worker and sequence widths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
    worker_bits: u8,
    sequence_bits: u8,
    elapsed_bits: u8,
    worker_mask: u32,
    sequence_mask: u32,
    elapsed_mask: u64,
}

impl Layout {
    /// Bits available below the sign bit
    pub(crate) const TOTAL_BITS: u8 = 63;
    /// Exclusive upper bound for the worker and sequence widths
    pub(crate) const MAX_FIELD_BITS: u8 = 32;

    /// Calculate mask for given number of bits
    #[inline]
    pub(crate) const fn calculate_mask(bits: u8) -> u64 {
        (1u64 << bits) - 1
    }

    pub(crate) fn new(worker_bits: u8, sequence_bits: u8) -> Result<Self, ConfigError> {
        let invalid = ConfigError::InvalidBits {
            worker_bits,
            sequence_bits,
        };
        if worker_bits >= Self::MAX_FIELD_BITS || sequence_bits >= Self::MAX_FIELD_BITS {
            return Err(invalid);
        }
        let elapsed_bits = Self::TOTAL_BITS
            .checked_sub(worker_bits + sequence_bits)
            .filter(|bits| *bits > 0)
            .ok_or(invalid)?;

        Ok(Self {
            worker_bits,
            sequence_bits,
            elapsed_bits,
            worker_mask: Self::calculate_mask(worker_bits) as u32,
            sequence_mask: Self::calculate_mask(sequence_bits) as u32,
            elapsed_mask: Self::calculate_mask(elapsed_bits),
        })
    }

    #[inline(always)]
    pub(crate) const fn worker_bits(&self) -> u8 {
        self.worker_bits
    }

    #[inline(always)]
    pub(crate) const fn sequence_bits(&self) -> u8 {
        self.sequence_bits
    }

    #[inline(always)]
    pub(crate) const fn elapsed_bits(&self) -> u8 {
        self.elapsed_bits
    }

    #[inline(always)]
    pub(crate) const fn worker_mask(&self) -> u32 {
        self.worker_mask
    }

    #[inline(always)]
    pub(crate) const fn sequence_mask(&self) -> u32 {
        self.sequence_mask
    }

    #[inline(always)]
    pub(crate) const fn elapsed_mask(&self) -> u64 {
        self.elapsed_mask
    }

    #[inline(always)]
    const fn sequence_shift(&self) -> u8 {
        self.worker_bits
    }

    #[inline(always)]
    const fn elapsed_shift(&self) -> u8 {
        self.worker_bits + self.sequence_bits
    }

    /// Pack the three fields. Callers guarantee each value fits its width.
    #[inline(always)]
    pub(crate) const fn assemble(&self, worker: u32, sequence: u32, elapsed: u64) -> u64 {
        (elapsed << self.elapsed_shift())
            | ((sequence as u64) << self.sequence_shift())
            | worker as u64
    }

    /// Split a packed value into `(worker, sequence, elapsed)`
    #[inline]
    pub(crate) const fn decompose(&self, raw: u64) -> (u32, u32, u64) {
        let worker = (raw & self.worker_mask as u64) as u32;
        let sequence = ((raw >> self.sequence_shift()) & self.sequence_mask as u64) as u32;
        let elapsed = (raw >> self.elapsed_shift()) & self.elapsed_mask;
        (worker, sequence, elapsed)
    }
}
