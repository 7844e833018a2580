//! # sfid
//!
//! Snowflake ids issued by independent workers without coordination.
//!
//! Every id is a non-negative `i64` packing three fields below the sign bit:
//!
//! ```text
//! | sign |     elapsed     |    sequence    |   worker id   |
//! |  0   |  elapsed_bits   | sequence_bits  |  worker_bits  |
//! ```
//!
//! A [`Factory`] fixes the layout and the base epoch and proves at startup
//! that the layout lasts at least ten years. A [`Worker`] allocates ids for
//! one worker id:
//! - 🔒 Thread-safe, one short critical section per id
//! - 📈 Time-sorted, strictly increasing per worker
//! - ⏸️ Sleeps into the next unit instead of overflowing the sequence
//! - ⏪ Absorbs small clock jitter and reports real rollbacks
//!
//! ```no_run
//! use sfid::Worker;
//!
//! let worker = Worker::with_default(1).unwrap();
//! let id = worker.id().unwrap();
//! let (worker_id, _sequence, _elapsed) = worker.extract().decompose(id);
//! assert_eq!(worker_id, 1);
//! ```

#![forbid(unsafe_code)]

pub mod clock;
pub mod context;
mod error;
mod extractor;
mod factory;
pub mod net;
mod worker;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use context::IdGenerator;
pub use error::{ConfigError, SfidError};
pub use extractor::Extractor;
pub use factory::{Factory, FactoryBuilder, DEFAULT_BASE};
pub use worker::Worker;
