/// A reuse buffer that hands out instances of `T` and takes them back for later reuse.
///
/// Instances are obtained with [`lease()`][Self::lease] and returned with
/// [`release()`][Self::release]. While leased, an instance belongs to the caller; the pool only
/// owns the instances currently held inside it.
///
/// The trait is object-safe, so consumers can be written against `&dyn Pool<T, Error = E>`
/// without knowing which strategy backs the pool.
///
/// # Example
///
/// ```rust
/// use std::convert::Infallible;
///
/// use lease_pool::{Pool, QueuePool};
///
/// fn checksum(pool: &dyn Pool<Vec<u8>, Error = Infallible>, data: &[u8]) -> u32 {
///     let Ok(mut scratch) = pool.lease();
///     scratch.clear();
///     scratch.extend_from_slice(data);
///     let sum = scratch.iter().map(|b| u32::from(*b)).sum();
///     pool.release(scratch);
///     sum
/// }
///
/// let pool = QueuePool::unbounded(Vec::new);
/// assert_eq!(checksum(&pool, &[1, 2, 3]), 6);
/// assert_eq!(pool.size(), 1);
/// ```
pub trait Pool<T> {
    /// The error returned when a new instance cannot be constructed.
    type Error;

    /// Obtains an instance, reusing a held one if available and constructing one otherwise.
    ///
    /// This never blocks waiting for an instance to be released.
    ///
    /// # Errors
    ///
    /// Returns the factory error if the pool was empty and construction failed. The failure is
    /// not retried and does not affect later calls.
    fn lease(&self) -> Result<T, Self::Error>;

    /// Returns an instance to the pool for future reuse.
    ///
    /// Bounded pools block the calling thread while they are at capacity, until another thread
    /// leases an instance or the pool is shut down. Instances released after shutdown are dropped.
    ///
    /// The pool does not check where the instance came from.
    fn release(&self, instance: T);

    /// The number of instances currently held by the pool (not the number in circulation).
    ///
    /// Advisory only: under concurrent use the value may be stale by the time it is observed.
    fn size(&self) -> usize;

    /// Discards the held instances and stops accepting new ones.
    ///
    /// Threads blocked in [`release()`][Self::release] are woken up and their instances dropped.
    /// Calling this more than once has no further effect. Leasing remains possible afterwards
    /// but is always served by the factory.
    ///
    /// Implementations that do not own their storage may treat this as a no-op.
    fn shutdown(&self);
}
