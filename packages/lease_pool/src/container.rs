use std::fmt;
use std::num::NonZero;
use std::sync::Arc;

use thiserror::Error;

/// Concurrent storage for the instances held by a [`QueuePool`][crate::QueuePool].
///
/// A container is a thread-safe multiset with "take one if any" removal and insertion that may
/// block while the container is at capacity. All synchronization between pool users happens
/// inside the container; the pool layer adds none of its own.
///
/// No ordering of removals is required. The bundled containers happen to be FIFO.
///
/// Two implementations are provided: [`UnboundedQueue`][crate::UnboundedQueue] and
/// [`BoundedQueue`][crate::BoundedQueue].
pub trait Container<T> {
    /// Removes and returns an arbitrary held instance, or `None` if the container is empty.
    ///
    /// Never blocks.
    fn poll(&self) -> Option<T>;

    /// Inserts an instance, blocking the current thread while the container is at capacity.
    ///
    /// # Errors
    ///
    /// Returns the instance inside [`Closed`] if the container is closed, including when it is
    /// closed while this call is blocked.
    fn offer(&self, item: T) -> Result<(), Closed<T>>;

    /// Inserts an instance, suspending the current task while the container is at capacity.
    ///
    /// Dropping the returned future before it completes cancels the insertion and drops the
    /// instance.
    ///
    /// # Errors
    ///
    /// Returns the instance inside [`Closed`] if the container is closed, including when it is
    /// closed while the future is pending.
    fn offer_async(&self, item: T) -> impl Future<Output = Result<(), Closed<T>>> + Send;

    /// The number of instances currently held. Advisory under concurrent use.
    fn len(&self) -> usize;

    /// Whether the container currently holds no instances. Advisory under concurrent use.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The maximum number of instances the container can hold, or `None` if unbounded.
    fn capacity(&self) -> Option<NonZero<usize>>;

    /// Drops all held instances, returning how many were dropped.
    fn clear(&self) -> usize;

    /// Stops accepting new instances and wakes up every blocked insertion.
    ///
    /// Instances already held remain in the container until removed or cleared.
    fn close(&self);

    /// Whether [`close()`][Self::close] has been called.
    fn is_closed(&self) -> bool;
}

/// An instance rejected by a closed [`Container`].
///
/// The rejected instance is handed back to the caller, who decides whether to drop it.
#[derive(Error)]
#[error("container is closed and no longer accepts instances")]
pub struct Closed<T>(pub T);

impl<T> Closed<T> {
    /// Returns the rejected instance.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

// Does not require `T: Debug`, so any instance type can travel inside the error.
impl<T> fmt::Debug for Closed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closed").finish_non_exhaustive()
    }
}

/// Shares one container between a pool and other owners.
///
/// A pool built over an `Arc` via [`QueuePool::with_container()`][crate::QueuePool::with_container]
/// leaves the container alone on shutdown; the remaining holders of the `Arc` stay in charge of
/// its lifecycle.
impl<T, C> Container<T> for Arc<C>
where
    C: Container<T>,
{
    fn poll(&self) -> Option<T> {
        self.as_ref().poll()
    }

    fn offer(&self, item: T) -> Result<(), Closed<T>> {
        self.as_ref().offer(item)
    }

    fn offer_async(&self, item: T) -> impl Future<Output = Result<(), Closed<T>>> + Send {
        self.as_ref().offer_async(item)
    }

    fn len(&self) -> usize {
        self.as_ref().len()
    }

    fn is_empty(&self) -> bool {
        self.as_ref().is_empty()
    }

    fn capacity(&self) -> Option<NonZero<usize>> {
        self.as_ref().capacity()
    }

    fn clear(&self) -> usize {
        self.as_ref().clear()
    }

    fn close(&self) {
        self.as_ref().close();
    }

    fn is_closed(&self) -> bool {
        self.as_ref().is_closed()
    }
}
