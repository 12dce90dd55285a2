#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Reuse pool for objects that are expensive to construct.
//!
//! A pool holds instances that callers have returned to it and hands them out again on request,
//! constructing new instances through a caller-supplied factory only when it has nothing to give.
//! This reduces allocation pressure in high-throughput, multi-threaded workloads that repeatedly
//! need the same kind of object (buffers, scratch structures, connections).
//!
//! # Quick start
//!
//! ```rust
//! use lease_pool::{Pool, QueuePool};
//!
//! let pool = QueuePool::unbounded(|| Vec::<u8>::with_capacity(4096));
//!
//! let Ok(mut buffer) = pool.lease();
//! buffer.extend_from_slice(b"hello");
//! buffer.clear();
//! pool.release(buffer);
//!
//! assert_eq!(pool.size(), 1);
//!
//! // The next lease reuses the returned buffer instead of allocating a new one.
//! let Ok(buffer) = pool.lease();
//! assert!(buffer.capacity() >= 4096);
//! ```
//!
//! # Strategies
//!
//! Two standard strategies are provided, differing only in the container backing the pool:
//!
//! * [`QueuePool::unbounded()`] - a lock-free queue without an upper bound. Releasing never
//!   blocks and the pool grows to hold whatever is returned to it. Appropriate when the number of
//!   outstanding instances is naturally limited by the callers (e.g. one per in-flight operation).
//! * [`QueuePool::bounded()`] - a fixed-capacity queue. Releasing into a full pool blocks the
//!   releasing thread until another thread leases an instance or the pool is shut down. This
//!   applies backpressure to the code returning instances.
//!
//! In both strategies [`lease()`][Pool::lease] never blocks: if the pool is empty, the factory
//! constructs a new instance instead.
//!
//! Pools can also be built over any custom [`Container`] via [`QueuePool::with_container()`].
//!
//! # Async
//!
//! For cooperative schedulers, [`QueuePool::release_async()`] expresses the blocking release as a
//! suspension point. Dropping the returned future cancels the wait (the instance is dropped).
//!
//! # Fallible construction
//!
//! Use [`QueuePool::try_unbounded()`] or [`QueuePool::try_bounded()`] when the factory can fail.
//! The factory error is returned from [`lease()`][Pool::lease] unchanged and is never retried.
//!
//! # Caller responsibilities
//!
//! The pool is a plain reuse buffer. It does not reset or validate instances, does not check that
//! a released instance came from this pool and does not detect double releases. If instances are
//! never returned, a full bounded pool will block releasers indefinitely.

mod bounded_queue;
mod container;
mod factory;
mod metrics;
mod pool;
mod queue_pool;
mod unbounded_queue;

pub use bounded_queue::*;
pub use container::*;
pub use factory::*;
pub use pool::*;
pub use queue_pool::*;
pub use unbounded_queue::*;
