//! ID allocation logic
//!
//! One critical section per id: read the clock, compare with the last
//! issued unit, then either claim the new unit, refuse a rollback, or bump
//! the sequence and wait out an exhausted unit.

use std::cmp::Ordering;

use tracing::{debug, instrument, trace, warn};

use super::state::State;
use super::Worker;
use crate::clock::Clock;
use crate::error::SfidError;

impl<C: Clock> Worker<C> {
    /// Generate a new id.
    ///
    /// Ids from one worker are unique and strictly increasing. When the
    /// sequence space of the current unit is exhausted the call sleeps, with
    /// the lock held, until the next unit begins.
    ///
    /// # Errors
    /// - [`SfidError::ClockMovedBackwards`] when the clock reports a unit
    ///   older than the last issued one by more than the factory's rollback
    ///   tolerance. No id is issued and the state is left untouched.
    /// - [`SfidError::ClockBeforeBase`] when the clock is before the base.
    /// - [`SfidError::HorizonExceeded`] once the elapsed field is full.
    #[instrument(level = "trace", skip(self), fields(worker_id = self.worker_id))]
    pub fn id(&self) -> Result<i64, SfidError> {
        let mut state = self.state.lock();
        let now_gap = self.factory.elapsed()?;

        match state.gap().cmp(&now_gap) {
            Ordering::Less => {
                *state = State::claim(now_gap, self.factory.mask(1));
                return self.assemble(*state);
            }
            Ordering::Greater => self.check_rollback(state.gap() - now_gap)?,
            Ordering::Equal => {}
        }

        let next = state.increment(self.factory.mask(state.sequence().wrapping_add(1)));
        if next.gap() > state.gap() {
            // sequence exhausted: the next unit must really begin before use
            let ahead = next.gap() - now_gap;
            trace!(gap = next.gap(), ahead, "sequence exhausted, waiting for next unit");
            *state = next;
            self.factory.next(i64::try_from(ahead).unwrap_or(i64::MAX))?;
        } else {
            *state = next;
        }
        self.assemble(*state)
    }

    /// Like [`Worker::id`] but panics on error.
    ///
    /// # Panics
    /// Panics with the error message when [`Worker::id`] fails.
    pub fn must_id(&self) -> i64 {
        self.id().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Accept a clock that is `behind` units older than the last issued
    /// unit only when the drift is within the rollback tolerance
    fn check_rollback(&self, behind: u64) -> Result<(), SfidError> {
        let delta_ms = behind.saturating_mul(self.factory.unit());
        if delta_ms > self.factory.rollback_tolerance() {
            warn!(
                worker_id = self.worker_id,
                delta_ms, "clock moved backwards, refusing to issue id"
            );
            return Err(SfidError::ClockMovedBackwards { delta_ms });
        }
        debug!(worker_id = self.worker_id, delta_ms, "absorbed backward clock jitter");
        Ok(())
    }

    #[inline(always)]
    fn assemble(&self, state: State) -> Result<i64, SfidError> {
        let max = self.factory.elapsed_max();
        if state.gap() > max {
            return Err(SfidError::HorizonExceeded {
                elapsed: state.gap(),
                max,
            });
        }
        Ok(self
            .factory
            .build(self.worker_id, state.sequence(), state.gap()))
    }
}
