//! Example demonstrating backpressure on the release path of a bounded pool.
//!
//! A producer thread keeps releasing buffers into a pool of capacity 4 while a slow consumer
//! leases them. Once the pool is full, the producer can only continue as fast as the consumer
//! frees up space.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use lease_pool::{Pool, QueuePool};
use new_zealand::nz;

fn main() {
    let pool = Arc::new(QueuePool::bounded(nz!(4), || vec![0_u8; 1024]));

    let producer = thread::spawn({
        let pool = Arc::clone(&pool);
        move || {
            let start = Instant::now();

            for i in 1..=12 {
                pool.release(vec![0_u8; 1024]);
                println!(
                    "Producer released buffer {i} after {:?} (pool size {})",
                    start.elapsed(),
                    pool.size()
                );
            }
        }
    });

    // Let the producer fill the pool before consuming.
    thread::sleep(Duration::from_millis(200));

    for i in 1..=8 {
        let Ok(_buffer) = pool.lease();
        println!("Consumer leased buffer {i}");
        thread::sleep(Duration::from_millis(100));
    }

    producer.join().expect("producer thread panicked");

    println!("Final pool size: {}", pool.size());
    pool.shutdown();
    println!("Pool size after shutdown: {}", pool.size());
}
