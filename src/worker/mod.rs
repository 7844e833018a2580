//! Per-worker snowflake allocator
//!
//! Split into modules for testability:
//! - `state` - The `(gap, sequence)` pair guarded by the worker lock
//! - `allocate` - ID allocation and clock rollback handling

mod allocate;
mod state;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::context::IdGenerator;
use crate::error::SfidError;
use crate::extractor::Extractor;
use crate::factory::{Factory, DEFAULT_BASE};

use state::State;

/// Allocates ids for one worker id.
///
/// All callers of one worker are serialized through a single lock that
/// guards the last issued unit and sequence together. Share a worker between
/// threads with an [`Arc`].
#[derive(Debug)]
pub struct Worker<C: Clock = SystemClock> {
    state: Mutex<State>,
    factory: Arc<Factory<C>>,
    worker_id: u32,
}

impl Worker {
    /// Create a worker with its own factory on the system clock
    pub fn new(
        worker_id: u32,
        unit_ms: u64,
        base: DateTime<Utc>,
        worker_bits: u8,
        sequence_bits: u8,
    ) -> Result<Self, SfidError> {
        let factory = Factory::new(unit_ms, base, worker_bits, sequence_bits)?;
        Self::with_factory(Arc::new(factory), worker_id)
    }

    /// Create a worker with the default layout: 1ms units from
    /// [`DEFAULT_BASE`], 10 worker bits and 12 sequence bits
    pub fn with_default(worker_id: u32) -> Result<Self, SfidError> {
        Self::new(worker_id, 1, *DEFAULT_BASE, 10, 12)
    }
}

impl<C: Clock> Worker<C> {
    /// Create a worker on a shared factory
    pub fn with_factory(factory: Arc<Factory<C>>, worker_id: u32) -> Result<Self, SfidError> {
        Self::validate_worker_id(worker_id, &factory)?;
        Ok(Self {
            state: Mutex::new(State::default()),
            factory,
            worker_id,
        })
    }

    fn validate_worker_id(worker_id: u32, factory: &Factory<C>) -> Result<(), SfidError> {
        let max = factory.worker_max();
        if worker_id > max {
            return Err(SfidError::InvalidWorkerId { worker_id, max });
        }
        Ok(())
    }

    #[inline(always)]
    pub fn worker_id(&self) -> u32 {
        self.worker_id
    }

    /// Layout tag of the underlying factory
    pub fn tag(&self) -> &str {
        self.factory.tag()
    }

    pub fn factory(&self) -> &Arc<Factory<C>> {
        &self.factory
    }

    /// Decoder for ids issued by this worker
    pub fn extract(&self) -> Extractor {
        self.factory.extract()
    }
}

impl<C: Clock> IdGenerator for Worker<C> {
    fn next_id(&self) -> Result<i64, SfidError> {
        self.id()
    }
}
