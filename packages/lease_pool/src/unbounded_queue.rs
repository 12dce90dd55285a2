use std::any::type_name;
use std::fmt;
use std::num::NonZero;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::queue::SegQueue;

use crate::{Closed, Container};

/// A lock-free [`Container`] without an upper bound on the number of held instances.
///
/// Insertion never blocks, so the container grows to hold whatever is returned to it. This is
/// deliberate: use it when the number of outstanding instances is already limited by the callers.
///
/// # Example
///
/// ```rust
/// use lease_pool::{Container, UnboundedQueue};
///
/// let queue = UnboundedQueue::new();
///
/// queue.offer("first").unwrap();
/// queue.offer("second").unwrap();
///
/// assert_eq!(queue.len(), 2);
/// assert_eq!(queue.poll(), Some("first"));
/// ```
pub struct UnboundedQueue<T> {
    items: SegQueue<T>,
    closed: AtomicBool,
}

impl<T> UnboundedQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: SegQueue::new(),
            closed: AtomicBool::new(false),
        }
    }
}

impl<T> Default for UnboundedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for UnboundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("len", &self.items.len())
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

impl<T: Send> Container<T> for UnboundedQueue<T> {
    fn poll(&self) -> Option<T> {
        self.items.pop()
    }

    fn offer(&self, item: T) -> Result<(), Closed<T>> {
        // Acquire pairs with the Release in close() so a closed queue is never written to
        // by a thread that has observed the close.
        if self.closed.load(Ordering::Acquire) {
            return Err(Closed(item));
        }

        self.items.push(item);
        Ok(())
    }

    fn offer_async(&self, item: T) -> impl Future<Output = Result<(), Closed<T>>> + Send {
        async move { self.offer(item) }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn capacity(&self) -> Option<NonZero<usize>> {
        None
    }

    fn clear(&self) -> usize {
        let mut cleared: usize = 0;

        while self.items.pop().is_some() {
            cleared = cleared.wrapping_add(1);
        }

        cleared
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
