//! Immutable identifier layout shared by workers
//!
//! Split into modules:
//! - `builder` - Chained configuration with defaults
//! - `layout` - Bit widths, masks and packing

mod builder;
mod layout;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Offset, TimeDelta, Utc};
use once_cell::sync::Lazy;
use tracing::debug;

pub use builder::FactoryBuilder;
pub(crate) use layout::Layout;

use crate::clock::{Clock, SystemClock};
use crate::error::{ConfigError, SfidError};
use crate::extractor::Extractor;
use crate::worker::Worker;

/// Default base epoch: 2025-05-21T00:00:00.000Z
pub static DEFAULT_BASE: Lazy<DateTime<Utc>> = Lazy::new(|| {
    DateTime::parse_from_rfc3339("2025-05-21T00:00:00.000Z")
        .expect("default base timestamp is valid RFC 3339")
        .with_timezone(&Utc)
});

/// Minimum lifetime a layout must cover from the moment it is built
const MIN_LIFETIME: TimeDelta = TimeDelta::days(10 * 365);

const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Offset of the zone used to render [`Factory`] diagnostics (UTC+08:00)
const DISPLAY_OFFSET_SECS: i32 = 8 * 60 * 60;
const DISPLAY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:::z";

/// Snowflake id factory
///
/// Fixes the bit layout, the unit and the base epoch, and guarantees at
/// construction that the elapsed field lasts at least ten years from now.
/// Immutable afterwards: share it between workers with an [`Arc`].
#[derive(Debug)]
pub struct Factory<C: Clock = SystemClock> {
    layout: Layout,
    unit_ms: u64,
    unit_nanos: u64,
    base: DateTime<Utc>,
    /// Units from the Unix epoch to `base`
    gap0: i64,
    valid_until: DateTime<Utc>,
    rollback_tolerance_ms: u64,
    tag: String,
    clock: C,
}

impl Factory {
    /// Create a factory on the system clock.
    ///
    /// # Arguments
    /// * `unit_ms` - Duration of one elapsed unit in milliseconds
    /// * `base` - Epoch of the elapsed field, strictly before now
    /// * `worker_bits` - Width of the worker id field
    /// * `sequence_bits` - Width of the per-unit sequence field
    pub fn new(
        unit_ms: u64,
        base: DateTime<Utc>,
        worker_bits: u8,
        sequence_bits: u8,
    ) -> Result<Self, ConfigError> {
        Self::builder()
            .unit(unit_ms)
            .base(base)
            .worker_bits(worker_bits)
            .sequence_bits(sequence_bits)
            .build()
    }

    /// Create a new factory builder
    pub fn builder() -> FactoryBuilder {
        FactoryBuilder::new()
    }
}

impl<C: Clock> Factory<C> {
    pub(crate) fn from_builder(b: FactoryBuilder<C>) -> Result<Self, ConfigError> {
        let unit_nanos = b
            .unit_ms
            .checked_mul(NANOS_PER_MILLI)
            .filter(|nanos| *nanos > 0 && i64::try_from(*nanos).is_ok())
            .ok_or(ConfigError::InvalidUnit { unit_ms: b.unit_ms })?;
        let layout = Layout::new(b.worker_bits, b.sequence_bits)?;

        let now = b.clock.now();
        if b.base >= now {
            return Err(ConfigError::BaseNotInPast { base: b.base, now });
        }

        // 64x64 bit product, never overflows in u128
        let span_ms = u128::from(layout.elapsed_mask()) * u128::from(b.unit_ms);
        let valid_until = i64::try_from(span_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .and_then(|span| b.base.checked_add_signed(span))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let required = now
            .checked_add_signed(MIN_LIFETIME)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        if valid_until < required {
            return Err(ConfigError::InsufficientLifetime {
                valid_until,
                required,
            });
        }

        let gap0 = gaps_of(b.base, unit_nanos);
        let tag = format!(
            "0x{:02X}_0x{:02X}_0x{:02X}",
            b.unit_ms,
            layout.sequence_bits(),
            layout.worker_bits()
        );
        debug!(%tag, base = %b.base, %valid_until, "snowflake factory ready");

        Ok(Self {
            layout,
            unit_ms: b.unit_ms,
            unit_nanos,
            base: b.base,
            gap0,
            valid_until,
            rollback_tolerance_ms: b.rollback_tolerance_ms,
            tag,
            clock: b.clock,
        })
    }

    /// Units between the Unix epoch and `instant`, rounded down
    #[inline]
    pub fn gaps(&self, instant: DateTime<Utc>) -> i64 {
        gaps_of(instant, self.unit_nanos)
    }

    /// Start of the unit with index `gaps` counted from the Unix epoch
    #[inline]
    pub fn instant_of(&self, gaps: i64) -> DateTime<Utc> {
        instant_of(gaps, self.unit_nanos)
    }

    /// Units elapsed from the base epoch to now
    pub fn elapsed(&self) -> Result<u64, SfidError> {
        let now = self.clock.now();
        u64::try_from(self.gaps(now) - self.gap0).map_err(|_| SfidError::ClockBeforeBase {
            now,
            base: self.base,
        })
    }

    /// Truncate a raw sequence to the sequence field
    #[inline(always)]
    pub fn mask(&self, sequence: u32) -> u32 {
        sequence & self.layout.sequence_mask()
    }

    /// Pack a worker id, a sequence and an elapsed unit count into an id.
    ///
    /// # Panics
    /// Panics if `gap` exceeds [`Factory::elapsed_max`].
    #[inline]
    pub fn build(&self, worker: u32, sequence: u32, gap: u64) -> i64 {
        assert!(
            gap <= self.layout.elapsed_mask(),
            "assigned elapsed {gap} is greater than max units of factory {}",
            self.layout.elapsed_mask()
        );
        debug_assert!(worker <= self.layout.worker_mask());
        debug_assert!(sequence <= self.layout.sequence_mask());
        self.layout.assemble(worker, sequence, gap) as i64
    }

    /// Block until the `n`-th upcoming unit boundary, then return
    /// [`Factory::elapsed`]. Returns immediately when `n <= 0`.
    pub fn next(&self, n: i64) -> Result<u64, SfidError> {
        if n > 0 {
            let now = self.clock.now();
            let deadline = self.instant_of(self.gaps(now).saturating_add(n));
            self.clock.sleep_until(deadline);
        }
        self.elapsed()
    }

    /// Create a worker sharing this factory
    pub fn worker(self: &Arc<Self>, worker_id: u32) -> Result<Worker<C>, SfidError> {
        Worker::with_factory(Arc::clone(self), worker_id)
    }

    /// Decoder for ids built by this factory
    pub fn extract(&self) -> Extractor {
        Extractor::new(self.layout, self.gap0, self.unit_nanos)
    }

    #[inline(always)]
    pub fn unit(&self) -> u64 {
        self.unit_ms
    }

    #[inline(always)]
    pub fn base(&self) -> DateTime<Utc> {
        self.base
    }

    /// Last instant the elapsed field can represent
    #[inline(always)]
    pub fn valid_until(&self) -> DateTime<Utc> {
        self.valid_until
    }

    #[inline(always)]
    pub fn gap0(&self) -> i64 {
        self.gap0
    }

    /// Short layout tag: `0x<unit>_0x<sequence bits>_0x<worker bits>`
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline(always)]
    pub fn worker_bits(&self) -> u8 {
        self.layout.worker_bits()
    }

    #[inline(always)]
    pub fn sequence_bits(&self) -> u8 {
        self.layout.sequence_bits()
    }

    #[inline(always)]
    pub fn elapsed_bits(&self) -> u8 {
        self.layout.elapsed_bits()
    }

    #[inline(always)]
    pub fn worker_max(&self) -> u32 {
        self.layout.worker_mask()
    }

    #[inline(always)]
    pub fn sequence_max(&self) -> u32 {
        self.layout.sequence_mask()
    }

    #[inline(always)]
    pub fn elapsed_max(&self) -> u64 {
        self.layout.elapsed_mask()
    }

    /// Backward clock jump in milliseconds absorbed by workers
    #[inline(always)]
    pub fn rollback_tolerance(&self) -> u64 {
        self.rollback_tolerance_ms
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> fmt::Display for Factory<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zone = FixedOffset::east_opt(DISPLAY_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
        write!(
            f,
            "BASE[{}]_END[{}]_{}",
            self.base.with_timezone(&zone).format(DISPLAY_FORMAT),
            self.valid_until.with_timezone(&zone).format(DISPLAY_FORMAT),
            self.tag
        )
    }
}

/// `floor(instant_ns / unit_ns)`
#[inline]
pub(crate) fn gaps_of(instant: DateTime<Utc>, unit_nanos: u64) -> i64 {
    let nanos = i128::from(instant.timestamp()) * NANOS_PER_SEC
        + i128::from(instant.timestamp_subsec_nanos());
    // every representable instant divided by at least 1ms fits in i64
    nanos.div_euclid(i128::from(unit_nanos)) as i64
}

/// Start instant of unit `gaps`, saturating at the representable range
pub(crate) fn instant_of(gaps: i64, unit_nanos: u64) -> DateTime<Utc> {
    let nanos = i128::from(gaps) * i128::from(unit_nanos);
    let secs = nanos.div_euclid(NANOS_PER_SEC);
    let subsec = nanos.rem_euclid(NANOS_PER_SEC) as u32;
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, subsec))
        .unwrap_or(if gaps < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}
