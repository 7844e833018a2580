use rand::{rng, Rng};
use sfid::{context, IdGenerator, Worker};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // One worker shared by every thread of this process
    let generator: Arc<dyn IdGenerator> = Arc::new(Worker::with_default(1).unwrap());
    let mut handles = vec![];

    // Spawn multiple threads simulating concurrent request handlers
    for thread_id in 0..4 {
        let generator = Arc::clone(&generator);
        handles.push(thread::spawn(move || {
            context::with(generator, || {
                let mut ids = HashSet::new();
                let mut rng = rng();

                // Generate some IDs with random delays
                for i in 0..5 {
                    // Handlers deep in the call stack find the generator in scope
                    let id = context::must().must_id();
                    println!("Thread {} generated ID {}: {}", thread_id, i, id);

                    // Verify ID uniqueness
                    assert!(ids.insert(id), "Duplicate ID generated!");

                    // Random delay to simulate work
                    let delay = rng.random_range(0..=9);
                    thread::sleep(Duration::from_millis(delay));
                }
                ids
            })
        }));
    }

    // Collect all generated IDs
    let mut all_ids = HashSet::new();
    for handle in handles {
        all_ids.extend(handle.join().unwrap());
    }

    // Verify total number of unique IDs
    println!("\nTotal unique IDs generated: {}", all_ids.len());
    assert_eq!(all_ids.len(), 20);
    println!("All IDs are unique!");
}
