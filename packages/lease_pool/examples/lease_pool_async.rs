//! Example demonstrating a release with a deadline on a cooperative scheduler.
//!
//! The pool is full, so the release would wait indefinitely. Racing it against a timer bounds
//! the wait; when the timer wins, the release is cancelled and the buffer is dropped.

use std::time::Duration;

use lease_pool::{Pool, QueuePool};
use new_zealand::nz;

#[tokio::main]
async fn main() {
    let pool = QueuePool::bounded(nz!(1), || String::with_capacity(256));

    pool.release_async(String::with_capacity(256)).await;
    println!("Pool size after first release: {}", pool.size());

    tokio::select! {
        () = pool.release_async(String::with_capacity(256)) => {
            println!("Second release completed");
        }
        () = tokio::time::sleep(Duration::from_millis(100)) => {
            println!("Pool stayed full for 100 ms, dropped the buffer instead");
        }
    }

    let Ok(_buffer) = pool.lease();
    println!("Pool size after leasing: {}", pool.size());

    pool.release_async(String::with_capacity(256)).await;
    println!("Pool size after releasing into the freed slot: {}", pool.size());
}
