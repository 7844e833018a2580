use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use sfid::Factory;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 5ms units, 12 bits of workers (4096 workers), 9 bits of sequence per unit
    let factory = Factory::builder()
        .unit(5)
        .base(Utc::now() - TimeDelta::days(1))
        .worker_bits(12)
        .sequence_bits(9)
        .rollback_tolerance(10)
        .build()
        .unwrap();
    let factory = Arc::new(factory);

    println!("Factory configuration:");
    println!("  Layout: {factory}");
    println!("  Unit: {}ms", factory.unit());
    println!("  Worker bits: {} (max id {})", factory.worker_bits(), factory.worker_max());
    println!("  Sequence bits: {} (max {} per unit)", factory.sequence_bits(), factory.sequence_max());
    println!("  Elapsed bits: {}", factory.elapsed_bits());
    println!("  Valid until: {}", factory.valid_until());

    // Derive the worker id from the host address, clamped to the layout
    let worker_id = sfid::net::worker_id_from_local_ip() & factory.worker_max();
    let worker = factory.worker(worker_id).unwrap();

    // Generate and analyze an ID
    let id = worker.must_id();
    let (worker_id, seq, elapsed) = worker.extract().decompose(id);

    println!("\nGenerated ID: {}", id);
    println!("Components:");
    println!("  Elapsed: {} units of {}ms", elapsed, factory.unit());
    println!("  Worker ID: {} (of {})", worker_id, factory.worker_max());
    println!("  Sequence: {} (of {})", seq, factory.sequence_max());

    // Too small a layout is rejected up front
    let err = Factory::new(1, Utc::now() - TimeDelta::seconds(1), 20, 20).unwrap_err();
    println!("\nRejected layout: {err}");
}
