use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while validating a factory layout
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The elapsed unit is zero or too large to express in nanoseconds
    #[error("unit {unit_ms}ms is invalid, it must be greater than 0")]
    InvalidUnit { unit_ms: u64 },
    /// The base epoch is not strictly before the current instant
    #[error("the base timestamp {base} must be before now ({now})")]
    BaseNotInPast {
        base: DateTime<Utc>,
        now: DateTime<Utc>,
    },
    /// Worker and sequence widths break the 63-bit budget
    #[error(
        "worker bits {worker_bits} and sequence bits {sequence_bits} must be less than 32 \
         and leave at least one elapsed bit"
    )]
    InvalidBits { worker_bits: u8, sequence_bits: u8 },
    /// The elapsed field runs out less than ten years from now
    #[error("layout is only valid until {valid_until}, it must cover ten years from now (until {required})")]
    InsufficientLifetime {
        valid_until: DateTime<Utc>,
        required: DateTime<Utc>,
    },
}

/// Represents errors that can occur during sfid operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SfidError {
    /// The factory parameters were rejected
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Error when worker id exceeds the maximum allowed by the layout
    #[error("worker id {worker_id} is invalid, maximum allowed value is {max}")]
    InvalidWorkerId { worker_id: u32, max: u32 },
    /// Error when clock moves backwards further than the tolerance
    #[error("invalid system clock, clock moved backwards {delta_ms}ms")]
    ClockMovedBackwards { delta_ms: u64 },
    /// The clock reports an instant before the factory base
    #[error("invalid system clock, now ({now}) is before the base timestamp {base}")]
    ClockBeforeBase {
        now: DateTime<Utc>,
        base: DateTime<Utc>,
    },
    /// The elapsed field cannot hold the current unit any more
    #[error("elapsed units {elapsed} exceed the layout maximum {max}")]
    HorizonExceeded { elapsed: u64, max: u64 },
}
