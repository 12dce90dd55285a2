//! Example that demonstrates the exact usage shown in the README.md file.

use lease_pool::{Pool, QueuePool};

fn main() {
    // The factory runs only when the pool has nothing to hand out.
    let pool = QueuePool::unbounded(|| Vec::<u8>::with_capacity(4096));

    let Ok(mut buffer) = pool.lease();
    buffer.extend_from_slice(b"request payload");
    println!("Leased a buffer holding {} bytes", buffer.len());

    // The pool does not reset instances, so clear the buffer before giving it back.
    buffer.clear();
    pool.release(buffer);

    let Ok(buffer) = pool.lease();
    println!(
        "Leased the same buffer again, capacity {}",
        buffer.capacity()
    );
}
