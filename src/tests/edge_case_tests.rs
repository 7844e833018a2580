//! Edge case tests for layouts, worker ids and clocks

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use chrono::TimeDelta;

    use crate::tests::test_utils::{manual_clock, manual_factory, recent_base};
    use crate::*;

    #[test]
    fn test_worker_id_out_of_range() {
        let err = Worker::new(1024, 1, *DEFAULT_BASE, 10, 12).unwrap_err();
        assert_eq!(
            err,
            SfidError::InvalidWorkerId {
                worker_id: 1024,
                max: 1023
            }
        );
        assert!(Worker::new(1023, 1, *DEFAULT_BASE, 10, 12).is_ok());
    }

    #[test]
    fn test_worker_propagates_config_error() {
        let err = Worker::new(1, 1, recent_base(), 20, 20).unwrap_err();
        assert!(matches!(
            err,
            SfidError::Config(ConfigError::InsufficientLifetime { .. })
        ));
    }

    #[test]
    fn test_zero_worker_bits() {
        let clock = manual_clock();
        let factory = Arc::new(manual_factory(&clock, 0, 12));
        assert_eq!(factory.worker_max(), 0);
        assert!(factory.worker(1).is_err());

        let worker = factory.worker(0).unwrap();
        let id = worker.id().unwrap();
        assert_eq!(worker.extract().worker(id), 0);
    }

    #[test]
    fn test_widest_worker_field() {
        // 31 worker bits leave 32 elapsed bits: one second units last 136 years
        let worker = Worker::new(u32::MAX >> 1, 1000, *DEFAULT_BASE, 31, 0).unwrap();
        let id = worker.id().unwrap();
        assert!(id > 0);
        assert_eq!(worker.extract().worker(id), u32::MAX >> 1);
    }

    #[test]
    fn test_worker_accessors() {
        let factory = Arc::new(Factory::new(1, *DEFAULT_BASE, 10, 12).unwrap());
        let g1 = factory.worker(1).unwrap();
        let g2 = Worker::new(1, 1, *DEFAULT_BASE, 10, 12).unwrap();
        assert_eq!(g1.worker_id(), g2.worker_id());
        assert_eq!(g1.tag(), g2.tag());
        assert!(Arc::ptr_eq(g1.factory(), &factory));
    }

    #[test]
    fn test_cross_worker_uniqueness() {
        let factory = Arc::new(Factory::new(1, *DEFAULT_BASE, 10, 12).unwrap());
        let mut all_ids = HashSet::new();

        for worker_id in 0..10 {
            let worker = factory.worker(worker_id).unwrap();
            for _ in 0..100 {
                let id = worker.id().unwrap();
                assert!(all_ids.insert(id), "Collision from worker {}", worker_id);
            }
        }
        assert_eq!(all_ids.len(), 1000);
    }

    #[test]
    fn test_recent_base() {
        let worker = Worker::new(1, 1, recent_base(), 10, 12).unwrap();
        let elapsed = worker.extract().elapsed(worker.id().unwrap());

        // one second since the base, give or take scheduling
        assert!((1_000..60_000).contains(&elapsed), "elapsed {elapsed}");
    }

    #[test]
    fn test_horizon_exceeded() {
        let clock = manual_clock();
        let factory = Arc::new(manual_factory(&clock, 10, 12));
        let worker = factory.worker(1).unwrap();
        worker.id().unwrap();

        clock.set(factory.valid_until() + TimeDelta::days(1));
        assert!(matches!(
            worker.id(),
            Err(SfidError::HorizonExceeded { max, .. }) if max == factory.elapsed_max()
        ));
    }

    #[test]
    fn test_rollback_reports_magnitude() {
        let clock = manual_clock();
        let factory = Arc::new(
            Factory::builder()
                .unit(10)
                .clock(clock.clone())
                .build()
                .unwrap(),
        );
        let worker = factory.worker(1).unwrap();
        worker.id().unwrap();

        // one 10ms unit back is already beyond the 5ms tolerance
        clock.rewind(TimeDelta::milliseconds(10));
        let err = worker.id().unwrap_err();
        assert_eq!(err, SfidError::ClockMovedBackwards { delta_ms: 10 });
        assert_eq!(
            err.to_string(),
            "invalid system clock, clock moved backwards 10ms"
        );
    }

    #[test]
    fn test_rollback_inside_unit_is_invisible() {
        let clock = manual_clock();
        let factory = Arc::new(
            Factory::builder()
                .unit(10)
                .rollback_tolerance(0)
                .clock(clock.clone())
                .build()
                .unwrap(),
        );
        let worker = factory.worker(1).unwrap();

        clock.advance(TimeDelta::milliseconds(8));
        let first = worker.id().unwrap();
        clock.rewind(TimeDelta::milliseconds(6));
        let second = worker.id().unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_ids_are_non_negative() {
        let worker = Worker::new(0x3FF, 1, *DEFAULT_BASE, 10, 12).unwrap();
        for _ in 0..1_000 {
            assert!(worker.id().unwrap() >= 0);
        }
    }
}
