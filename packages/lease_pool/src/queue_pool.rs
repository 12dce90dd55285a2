use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::num::NonZero;

use tracing::{debug, trace};

use crate::metrics::{FACTORY_FAILURES, LEASES_CONSTRUCTED, LEASES_RECYCLED, RELEASES_DISCARDED};
use crate::{BoundedQueue, Closed, Container, Factory, FromFn, Pool, TryFromFn, UnboundedQueue};

/// A [`QueuePool`] backed by an [`UnboundedQueue`].
pub type UnboundedPool<T, F> = QueuePool<T, UnboundedQueue<T>, F>;

/// A [`QueuePool`] backed by a [`BoundedQueue`].
pub type BoundedPool<T, F> = QueuePool<T, BoundedQueue<T>, F>;

/// A [`Pool`] that keeps its instances in a [`Container`] and constructs new ones with a
/// [`Factory`] when the container is empty.
///
/// Leasing takes an instance from the container without waiting and falls back to the factory if
/// there is none, so consumers never stall on an empty pool. Releasing inserts into the
/// container, which for bounded containers blocks while the container is full.
///
/// # Construction
///
/// * [`unbounded()`][Self::unbounded] / [`try_unbounded()`][Self::try_unbounded] - lock-free and
///   without an upper bound. The pool grows to hold everything released into it.
/// * [`bounded()`][Self::bounded] / [`try_bounded()`][Self::try_bounded] - holds at most
///   `capacity` instances; releasing into a full pool blocks until space frees up.
/// * [`with_container()`][Self::with_container] - over a caller-supplied container. The pool
///   never clears or closes such a container; the caller manages its lifecycle.
///
/// # Shutdown
///
/// [`shutdown()`][Pool::shutdown] closes and clears the container of pools built through the
/// standard constructors, waking any thread blocked in `release()`. Instances released after
/// shutdown are dropped; leases after shutdown are served by the factory. Dropping the pool drops
/// every instance it holds.
///
/// # Example
///
/// ```rust
/// use lease_pool::{Pool, QueuePool};
/// use new_zealand::nz;
///
/// let pool = QueuePool::bounded(nz!(2), String::new);
///
/// let Ok(a) = pool.lease();
/// let Ok(b) = pool.lease();
/// let Ok(c) = pool.lease();
///
/// pool.release(a);
/// pool.release(b);
/// assert_eq!(pool.size(), 2);
///
/// // The pool is full; releasing `c` now would block until someone leases.
/// let Ok(_reused) = pool.lease();
/// pool.release(c);
/// assert_eq!(pool.size(), 2);
/// ```
pub struct QueuePool<T, C, F> {
    container: C,
    factory: F,

    /// Only pools created by the standard constructors own their container and clean it up
    /// on shutdown.
    clear_on_shutdown: bool,

    _item: PhantomData<fn() -> T>,
}

impl<T, C, F> QueuePool<T, C, F> {
    fn new_inner(container: C, factory: F, clear_on_shutdown: bool) -> Self {
        Self {
            container,
            factory,
            clear_on_shutdown,
            _item: PhantomData,
        }
    }
}

impl<T, F> QueuePool<T, UnboundedQueue<T>, FromFn<F>>
where
    F: Fn() -> T,
{
    /// Creates an unbounded pool with an infallible factory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lease_pool::{Pool, QueuePool};
    ///
    /// let pool = QueuePool::unbounded(|| vec![0_u8; 1024]);
    ///
    /// let Ok(buffer) = pool.lease();
    /// assert_eq!(buffer.len(), 1024);
    /// ```
    #[must_use]
    pub fn unbounded(factory: F) -> Self {
        Self::new_inner(UnboundedQueue::new(), FromFn(factory), true)
    }
}

impl<T, E, F> QueuePool<T, UnboundedQueue<T>, TryFromFn<F>>
where
    F: Fn() -> Result<T, E>,
{
    /// Creates an unbounded pool whose factory can fail.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::fs::File;
    ///
    /// use lease_pool::{Pool, QueuePool};
    ///
    /// let pool = QueuePool::try_unbounded(|| File::open("/definitely/not/here"));
    ///
    /// assert!(pool.lease().is_err());
    /// ```
    #[must_use]
    pub fn try_unbounded(factory: F) -> Self {
        Self::new_inner(UnboundedQueue::new(), TryFromFn(factory), true)
    }
}

impl<T, F> QueuePool<T, BoundedQueue<T>, FromFn<F>>
where
    F: Fn() -> T,
{
    /// Creates a pool that holds at most `capacity` instances, with an infallible factory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lease_pool::{Pool, QueuePool};
    /// use new_zealand::nz;
    ///
    /// let pool = QueuePool::bounded(nz!(16), || [0_u64; 8]);
    ///
    /// assert_eq!(pool.capacity(), Some(nz!(16)));
    /// ```
    #[must_use]
    pub fn bounded(capacity: NonZero<usize>, factory: F) -> Self {
        Self::new_inner(BoundedQueue::new(capacity), FromFn(factory), true)
    }
}

impl<T, E, F> QueuePool<T, BoundedQueue<T>, TryFromFn<F>>
where
    F: Fn() -> Result<T, E>,
{
    /// Creates a pool that holds at most `capacity` instances, with a factory that can fail.
    #[must_use]
    pub fn try_bounded(capacity: NonZero<usize>, factory: F) -> Self {
        Self::new_inner(BoundedQueue::new(capacity), TryFromFn(factory), true)
    }
}

impl<T, C, F> QueuePool<T, C, F>
where
    C: Container<T>,
    F: Factory<T>,
{
    /// Creates a pool over a caller-supplied container.
    ///
    /// The pool does not clear or close the container on shutdown. Pass an `Arc` to keep a
    /// handle to the container outside the pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    ///
    /// use lease_pool::{Container, FromFn, Pool, QueuePool, UnboundedQueue};
    ///
    /// let queue = Arc::new(UnboundedQueue::new());
    /// let pool = QueuePool::with_container(Arc::clone(&queue), FromFn(|| 0_u32));
    ///
    /// pool.release(5);
    /// pool.shutdown();
    ///
    /// // The caller still owns the contents.
    /// assert_eq!(queue.poll(), Some(5));
    /// ```
    #[must_use]
    pub fn with_container(container: C, factory: F) -> Self {
        Self::new_inner(container, factory, false)
    }

    /// The maximum number of instances the pool can hold, or `None` if it is unbounded.
    #[must_use]
    pub fn capacity(&self) -> Option<NonZero<usize>> {
        self.container.capacity()
    }

    /// Whether the pool has been shut down and drops released instances.
    ///
    /// Always `false` for pools over a caller-supplied container unless the caller closed it.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.container.is_closed()
    }

    /// Returns an instance to the pool without blocking the current thread.
    ///
    /// While a bounded pool is full, the returned future stays pending until another caller
    /// leases an instance or the pool is shut down. Dropping the future cancels the release and
    /// drops the instance.
    ///
    /// # Example
    ///
    /// ```rust
    /// use futures::executor::block_on;
    /// use lease_pool::{Pool, QueuePool};
    /// use new_zealand::nz;
    ///
    /// let pool = QueuePool::bounded(nz!(4), || 0_u8);
    ///
    /// block_on(async {
    ///     let Ok(value) = pool.lease();
    ///     pool.release_async(value).await;
    /// });
    ///
    /// assert_eq!(pool.size(), 1);
    /// ```
    pub async fn release_async(&self, instance: T) {
        if let Err(rejected) = self.container.offer_async(instance).await {
            Self::discard(rejected);
        }
    }

    fn discard(rejected: Closed<T>) {
        RELEASES_DISCARDED.with(|e| e.observe_once());
        trace!(
            item_type = type_name::<T>(),
            "pool is shut down, dropping released instance"
        );

        drop(rejected.into_inner());
    }
}

impl<T, C, F> Pool<T> for QueuePool<T, C, F>
where
    C: Container<T>,
    F: Factory<T>,
{
    type Error = F::Error;

    fn lease(&self) -> Result<T, Self::Error> {
        if let Some(instance) = self.container.poll() {
            LEASES_RECYCLED.with(|e| e.observe_once());
            return Ok(instance);
        }

        LEASES_CONSTRUCTED.with(|e| e.observe_once());
        trace!(
            item_type = type_name::<T>(),
            "pool is empty, constructing new instance"
        );

        self.factory.create().inspect_err(|_| {
            FACTORY_FAILURES.with(|e| e.observe_once());
        })
    }

    fn release(&self, instance: T) {
        if let Err(rejected) = self.container.offer(instance) {
            Self::discard(rejected);
        }
    }

    fn size(&self) -> usize {
        self.container.len()
    }

    fn shutdown(&self) {
        if !self.clear_on_shutdown {
            trace!("pool does not own its container, leaving it untouched on shutdown");
            return;
        }

        // Close before clearing. A release that passed the closed check just before this point
        // may still land in the container afterwards.
        self.container.close();
        let discarded = self.container.clear();

        debug!(
            item_type = type_name::<T>(),
            discarded, "pool shut down"
        );
    }
}

impl<T, C, F> fmt::Debug for QueuePool<T, C, F>
where
    C: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("container", &self.container)
            .field("clear_on_shutdown", &self.clear_on_shutdown)
            .finish_non_exhaustive()
    }
}
