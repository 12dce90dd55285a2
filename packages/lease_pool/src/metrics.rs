//! Metrics for pool activity.
//!
//! The events are per-thread instances to avoid contention on the hot lease/release path.

use nm::{Event, Magnitude};

/// Histogram buckets for the time a release spent waiting for space, in milliseconds.
///
/// A healthy bounded pool should almost never wait; long waits mean the pool is undersized or
/// instances are being held for a long time.
const RELEASE_WAIT_MS_BUCKETS: &[Magnitude] = &[0, 1, 2, 5, 10, 20, 50, 100, 200, 500, 1000];

thread_local! {
    /// A lease was served by an instance already held in the pool.
    pub(crate) static LEASES_RECYCLED: Event = Event::builder()
        .name("lease_pool_leases_recycled")
        .build();

    /// A lease found the pool empty and called the factory.
    pub(crate) static LEASES_CONSTRUCTED: Event = Event::builder()
        .name("lease_pool_leases_constructed")
        .build();

    /// The factory returned an error to a lease.
    pub(crate) static FACTORY_FAILURES: Event = Event::builder()
        .name("lease_pool_factory_failures")
        .build();

    /// A release found a bounded container full and had to wait.
    ///
    /// The magnitude is the time spent waiting, in milliseconds.
    pub(crate) static RELEASE_WAIT_MS: Event = Event::builder()
        .name("lease_pool_release_wait_ms")
        .histogram(RELEASE_WAIT_MS_BUCKETS)
        .build();

    /// A released instance was dropped because the container was closed.
    pub(crate) static RELEASES_DISCARDED: Event = Event::builder()
        .name("lease_pool_releases_discarded")
        .build();
}
