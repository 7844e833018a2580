//! Time sources for the allocator
//!
//! [`Clock`] is the seam between the allocator and wall-clock time. Workers
//! read the current instant through it and block on it when the sequence
//! space of a unit is exhausted. [`SystemClock`] is the production source;
//! [`ManualClock`] is a settable source for simulating rollbacks and pacing.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Remaining wait below which [`SystemClock`] spins instead of sleeping
const SPIN_WINDOW: Duration = Duration::from_micros(50);

/// A source of wall-clock time that can also block until a given instant.
///
/// # Example
///
/// ```
/// use chrono::{DateTime, Utc};
/// use sfid::Clock;
///
/// struct Frozen(DateTime<Utc>);
///
/// impl Clock for Frozen {
///     fn now(&self) -> DateTime<Utc> {
///         self.0
///     }
///
///     fn sleep_until(&self, _deadline: DateTime<Utc>) {}
/// }
///
/// let at = DateTime::from_timestamp_millis(1_750_000_000_000).unwrap();
/// assert_eq!(Frozen(at).now(), at);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Blocks the calling thread until `now() >= deadline`.
    fn sleep_until(&self, deadline: DateTime<Utc>);
}

/// The operating system's wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline(always)]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep_until(&self, deadline: DateTime<Utc>) {
        loop {
            // negative remaining time fails the conversion: deadline reached
            let Ok(remaining) = (deadline - Utc::now()).to_std() else {
                return;
            };
            if remaining.is_zero() {
                return;
            }
            if remaining > SPIN_WINDOW {
                thread::sleep(remaining - SPIN_WINDOW);
            } else {
                std::hint::spin_loop();
                thread::yield_now();
            }
        }
    }
}

/// A shareable clock that only moves when told to.
///
/// Clones share the same instant. [`Clock::sleep_until`] never blocks: it
/// jumps the clock forward to the deadline and records the time skipped.
#[derive(Debug, Clone)]
pub struct ManualClock {
    nanos: Arc<AtomicI64>,
    slept: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            nanos: Arc::new(AtomicI64::new(to_nanos(start))),
            slept: Arc::new(AtomicI64::new(0)),
        }
    }

    /// Move the clock to an arbitrary instant, backwards included
    pub fn set(&self, instant: DateTime<Utc>) {
        self.nanos.store(to_nanos(instant), Ordering::SeqCst);
    }

    /// Move the clock forward by `delta`
    pub fn advance(&self, delta: TimeDelta) {
        let delta = delta.num_nanoseconds().unwrap_or(i64::MAX);
        self.shift(delta);
    }

    /// Move the clock backward by `delta`
    pub fn rewind(&self, delta: TimeDelta) {
        let delta = delta.num_nanoseconds().unwrap_or(i64::MAX);
        self.shift(delta.saturating_neg());
    }

    /// Total time skipped by `sleep_until` calls
    pub fn slept(&self) -> TimeDelta {
        TimeDelta::nanoseconds(self.slept.load(Ordering::SeqCst))
    }

    fn shift(&self, delta: i64) {
        let _ = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_add(delta))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn sleep_until(&self, deadline: DateTime<Utc>) {
        let deadline = to_nanos(deadline);
        let before = self.nanos.fetch_max(deadline, Ordering::SeqCst);
        if deadline > before {
            self.slept.fetch_add(deadline - before, Ordering::SeqCst);
        }
    }
}

/// Nanoseconds since the Unix epoch, saturating outside the i64 range
fn to_nanos(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_nanos_opt().unwrap_or(if instant.timestamp() < 0 {
        i64::MIN
    } else {
        i64::MAX
    })
}
