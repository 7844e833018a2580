#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeDelta, Utc};
    use rand::Rng;

    use crate::tests::test_utils::{manual_clock, manual_factory};
    use crate::*;

    #[test]
    fn test_field_round_trip_across_layouts() {
        let mut rng = rand::rng();
        for (worker_bits, sequence_bits) in [(10, 12), (4, 4), (0, 20), (16, 0), (31, 1), (8, 16)] {
            let factory = Factory::new(1000, *DEFAULT_BASE, worker_bits, sequence_bits).unwrap();
            let extract = factory.extract();

            for _ in 0..1_000 {
                let worker = rng.random_range(0..=factory.worker_max());
                let sequence = rng.random_range(0..=factory.sequence_max());
                let gap = rng.random_range(0..=factory.elapsed_max());

                let id = factory.build(worker, sequence, gap);
                assert!(id >= 0);
                assert_eq!(
                    extract.decompose(id),
                    (worker, sequence, gap),
                    "layout {}",
                    factory.tag()
                );
            }
        }
    }

    #[test]
    fn test_id_bit_structure() {
        let factory = Factory::new(1, *DEFAULT_BASE, 10, 12).unwrap();
        let id = factory.build(0b1010101010, 0xABC, 0x1F);

        // Verify bit positions: worker=10 bits, seq=12 bits, elapsed=41 bits
        assert_eq!(id & 0x3FF, 0b1010101010);
        assert_eq!((id >> 10) & 0xFFF, 0xABC);
        assert_eq!(id >> 22, 0x1F);
    }

    #[test]
    fn test_later_unit_sorts_after_full_sequence() {
        let factory = Factory::new(1, *DEFAULT_BASE, 10, 12).unwrap();
        let late_in_unit = factory.build(0, factory.sequence_max(), 100);
        let next_unit = factory.build(0, 0, 101);
        assert!(next_unit > late_in_unit);
    }

    #[test]
    fn test_generated_ids_decode() {
        let clock = manual_clock();
        let worker = Arc::new(manual_factory(&clock, 10, 12)).worker(42).unwrap();

        for _ in 0..100 {
            let id = worker.id().unwrap();
            let (worker_id, sequence, elapsed) = worker.extract().decompose(id);
            assert_eq!(worker_id, 42);
            assert!(sequence >= 1);
            assert_eq!(elapsed, worker.factory().elapsed().unwrap());
        }
    }

    #[test]
    fn test_timestamp_of_generated_id() {
        let worker = Worker::with_default(9).unwrap();
        let before = Utc::now() - TimeDelta::milliseconds(1);
        let id = worker.id().unwrap();
        let after = Utc::now();

        let issued = worker.extract().timestamp(id);
        assert!(before <= issued && issued <= after, "{before} <= {issued} <= {after}");
    }

    #[test]
    fn test_timestamp_on_manual_clock() {
        let clock = manual_clock();
        let worker = Arc::new(manual_factory(&clock, 10, 12)).worker(1).unwrap();

        clock.advance(TimeDelta::microseconds(1_500));
        let id = worker.id().unwrap();
        assert_eq!(
            worker.extract().timestamp(id),
            *DEFAULT_BASE + TimeDelta::days(30) + TimeDelta::milliseconds(1)
        );
    }
}
