use sfid::Worker;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Create a worker with worker id 1 on the default layout
    let worker = Worker::with_default(1).unwrap();
    println!("Factory: {}", worker.factory());

    // Generate some IDs
    let id1 = worker.must_id();
    let id2 = worker.must_id();
    let id3 = worker.must_id();

    println!("Generated IDs (strictly increasing):");
    for id in [id1, id2, id3] {
        print_id(id, &worker);
    }

    // Or extract components individually
    let extract = worker.extract();
    println!("\nComponents of ID2 (extracted individually):");
    println!("  Elapsed: {} units since base", extract.elapsed(id2));
    println!("  Worker ID: {}", extract.worker(id2));
    println!("  Sequence: {}", extract.sequence(id2));
}

fn print_id(id: i64, worker: &Worker) {
    let (worker_id, sequence, elapsed) = worker.extract().decompose(id);
    let issued = worker.extract().timestamp(id);

    println!("  ID: {id}, Elapsed: {elapsed}, Issued: {issued}, Worker ID: {worker_id}, Sequence: {sequence}");
}
