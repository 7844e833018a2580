//! FactoryBuilder for constructing a validated factory

use chrono::{DateTime, Utc};

use super::{Factory, DEFAULT_BASE};
use crate::clock::{Clock, SystemClock};
use crate::error::ConfigError;

/// Default configuration values
pub(super) const DEFAULT_UNIT_MS: u64 = 1;
pub(super) const DEFAULT_WORKER_BITS: u8 = 10;
pub(super) const DEFAULT_SEQUENCE_BITS: u8 = 12;
pub(super) const DEFAULT_ROLLBACK_TOLERANCE_MS: u64 = 5;

/// Builder for [`Factory`]
///
/// Nothing is validated until [`FactoryBuilder::build`], so setters can be
/// chained in any order.
#[derive(Debug, Clone)]
pub struct FactoryBuilder<C = SystemClock> {
    pub(super) unit_ms: u64,
    pub(super) base: DateTime<Utc>,
    pub(super) worker_bits: u8,
    pub(super) sequence_bits: u8,
    pub(super) rollback_tolerance_ms: u64,
    pub(super) clock: C,
}

impl FactoryBuilder<SystemClock> {
    /// Create a new FactoryBuilder with default values
    pub fn new() -> Self {
        Self {
            unit_ms: DEFAULT_UNIT_MS,
            base: *DEFAULT_BASE,
            worker_bits: DEFAULT_WORKER_BITS,
            sequence_bits: DEFAULT_SEQUENCE_BITS,
            rollback_tolerance_ms: DEFAULT_ROLLBACK_TOLERANCE_MS,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> FactoryBuilder<C> {
    /// Set the duration of one elapsed unit in milliseconds
    pub fn unit(mut self, unit_ms: u64) -> Self {
        self.unit_ms = unit_ms;
        self
    }

    /// Set the base epoch; it must lie strictly in the past
    pub fn base(mut self, base: DateTime<Utc>) -> Self {
        self.base = base;
        self
    }

    /// Set the number of bits for the worker id (0-31)
    pub fn worker_bits(mut self, bits: u8) -> Self {
        self.worker_bits = bits;
        self
    }

    /// Set the number of bits for the per-unit sequence (0-31)
    pub fn sequence_bits(mut self, bits: u8) -> Self {
        self.sequence_bits = bits;
        self
    }

    /// Set how far back, in milliseconds, the clock may jump before workers
    /// report a rollback instead of absorbing it
    pub fn rollback_tolerance(mut self, tolerance_ms: u64) -> Self {
        self.rollback_tolerance_ms = tolerance_ms;
        self
    }

    /// Replace the time source
    pub fn clock<T: Clock>(self, clock: T) -> FactoryBuilder<T> {
        FactoryBuilder {
            unit_ms: self.unit_ms,
            base: self.base,
            worker_bits: self.worker_bits,
            sequence_bits: self.sequence_bits,
            rollback_tolerance_ms: self.rollback_tolerance_ms,
            clock,
        }
    }

    /// Validate the parameters and build the factory
    pub fn build(self) -> Result<Factory<C>, ConfigError> {
        Factory::from_builder(self)
    }
}

impl Default for FactoryBuilder<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}
