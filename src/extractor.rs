use chrono::{DateTime, Utc};

use crate::factory::{instant_of, Layout};

/// Snowflake id component extractor
#[derive(Debug, Copy, Clone)]
pub struct Extractor {
    layout: Layout,
    gap0: i64,
    unit_nanos: u64,
}

impl Extractor {
    /// Create a new extractor for a factory's layout
    pub(crate) fn new(layout: Layout, gap0: i64, unit_nanos: u64) -> Self {
        Self {
            layout,
            gap0,
            unit_nanos,
        }
    }

    /// Extract worker id component from an id
    #[inline(always)]
    pub fn worker(&self, id: i64) -> u32 {
        self.decompose(id).0
    }

    /// Extract sequence component from an id
    #[inline(always)]
    pub fn sequence(&self, id: i64) -> u32 {
        self.decompose(id).1
    }

    /// Extract elapsed units since the factory base from an id
    #[inline(always)]
    pub fn elapsed(&self, id: i64) -> u64 {
        self.decompose(id).2
    }

    /// Decompose an id into its components: worker id, sequence and elapsed
    #[inline]
    pub fn decompose(&self, id: i64) -> (u32, u32, u64) {
        self.layout.decompose(id as u64)
    }

    /// Start of the unit an id was issued in
    pub fn timestamp(&self, id: i64) -> DateTime<Utc> {
        let elapsed = i64::try_from(self.elapsed(id)).unwrap_or(i64::MAX);
        instant_of(self.gap0.saturating_add(elapsed), self.unit_nanos)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use crate::{Factory, DEFAULT_BASE};

    #[test]
    fn test_decompose() {
        let factory = Factory::new(1, *DEFAULT_BASE, 10, 12).unwrap();
        let extract = factory.extract();

        let worker = 42;
        let sequence = 123;
        let elapsed = 0x1234567;
        let id = factory.build(worker, sequence, elapsed);

        // Test individual component extraction
        assert_eq!(extract.worker(id), worker);
        assert_eq!(extract.sequence(id), sequence);
        assert_eq!(extract.elapsed(id), elapsed);

        // Test combined extraction
        assert_eq!(extract.decompose(id), (worker, sequence, elapsed));
    }

    #[test]
    fn test_component_boundaries() {
        let factory = Factory::new(1, *DEFAULT_BASE, 10, 12).unwrap();
        let id = factory.build(
            factory.worker_max(),
            factory.sequence_max(),
            factory.elapsed_max(),
        );

        assert_eq!(id, i64::MAX);
        assert_eq!(
            factory.extract().decompose(id),
            (
                factory.worker_max(),
                factory.sequence_max(),
                factory.elapsed_max()
            )
        );
    }

    #[test]
    fn test_timestamp() {
        let factory = Factory::new(10, *DEFAULT_BASE, 10, 12).unwrap();
        let id = factory.build(1, 1, 360_000);
        assert_eq!(
            factory.extract().timestamp(id),
            *DEFAULT_BASE + TimeDelta::hours(1)
        );
    }
}
