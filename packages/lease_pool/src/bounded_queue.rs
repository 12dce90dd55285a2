use std::any::type_name;
use std::fmt;
use std::num::NonZero;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crossbeam::queue::ArrayQueue;
use event_listener::{Event, IntoNotification, Listener};

use crate::metrics::RELEASE_WAIT_MS;
use crate::{Closed, Container};

/// A fixed-capacity [`Container`] whose insertions block while it is full.
///
/// Removal never blocks. Insertion into a full queue waits until a removal frees a slot or the
/// queue is closed. The blocking insertion is available both as a thread-blocking call
/// ([`offer()`][Container::offer]) and as a cancellable future
/// ([`offer_async()`][Container::offer_async]).
///
/// The number of held instances never exceeds the capacity.
///
/// # Example
///
/// ```rust
/// use lease_pool::{BoundedQueue, Container};
/// use new_zealand::nz;
///
/// let queue = BoundedQueue::new(nz!(2));
///
/// queue.offer(1).unwrap();
/// queue.offer(2).unwrap();
///
/// assert!(queue.is_full());
/// assert_eq!(queue.poll(), Some(1));
/// assert!(!queue.is_full());
/// ```
pub struct BoundedQueue<T> {
    items: ArrayQueue<T>,

    /// Notified whenever a slot becomes free and when the queue is closed.
    space_freed: Event,

    closed: AtomicBool,
}

enum TryOffer<T> {
    Full(T),
    Closed(T),
}

impl<T> BoundedQueue<T> {
    /// Creates an empty queue that holds at most `capacity` instances.
    #[must_use]
    pub fn new(capacity: NonZero<usize>) -> Self {
        Self {
            items: ArrayQueue::new(capacity.get()),
            space_freed: Event::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Whether the queue is currently at capacity. Advisory under concurrent use.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.is_full()
    }

    fn try_offer(&self, item: T) -> Result<(), TryOffer<T>> {
        // Acquire pairs with the Release in close() so a thread that has observed the close
        // never writes to the queue.
        if self.closed.load(Ordering::Acquire) {
            return Err(TryOffer::Closed(item));
        }

        self.items.push(item).map_err(TryOffer::Full)
    }

    /// Whether a waiter that just registered a listener should try again instead of sleeping.
    fn should_retry(&self) -> bool {
        self.closed.load(Ordering::Acquire) || !self.items.is_full()
    }

    #[cfg_attr(test, mutants::skip)] // Removing this causes timeouts (blocked offers never wake).
    fn notify_space_freed(&self, count: usize) {
        // Additional notifications are required. A listener that was notified earlier but has
        // not yet woken up would otherwise absorb the notification, leaving another waiter asleep
        // next to a free slot.
        self.space_freed.notify(count.additional());
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("len", &self.items.len())
            .field("capacity", &self.items.capacity())
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<T: Send> Container<T> for BoundedQueue<T> {
    fn poll(&self) -> Option<T> {
        let item = self.items.pop()?;
        self.notify_space_freed(1);
        Some(item)
    }

    fn offer(&self, item: T) -> Result<(), Closed<T>> {
        let mut item = match self.try_offer(item) {
            Ok(()) => return Ok(()),
            Err(TryOffer::Closed(item)) => return Err(Closed(item)),
            Err(TryOffer::Full(item)) => item,
        };

        let wait_started = Instant::now();

        loop {
            let listener = self.space_freed.listen();

            // Re-check after registering the listener to avoid lost wakeups.
            if !self.should_retry() {
                listener.wait();
            }

            item = match self.try_offer(item) {
                Ok(()) => {
                    RELEASE_WAIT_MS.with(|e| e.observe_millis(wait_started.elapsed()));
                    return Ok(());
                }
                Err(TryOffer::Closed(item)) => return Err(Closed(item)),
                Err(TryOffer::Full(item)) => item,
            };
        }
    }

    fn offer_async(&self, item: T) -> impl Future<Output = Result<(), Closed<T>>> + Send {
        async move {
            let mut item = match self.try_offer(item) {
                Ok(()) => return Ok(()),
                Err(TryOffer::Closed(item)) => return Err(Closed(item)),
                Err(TryOffer::Full(item)) => item,
            };

            let wait_started = Instant::now();

            loop {
                let listener = self.space_freed.listen();

                // Re-check after registering the listener to avoid lost wakeups.
                if !self.should_retry() {
                    listener.await;
                }

                item = match self.try_offer(item) {
                    Ok(()) => {
                        RELEASE_WAIT_MS.with(|e| e.observe_millis(wait_started.elapsed()));
                        return Ok(());
                    }
                    Err(TryOffer::Closed(item)) => return Err(Closed(item)),
                    Err(TryOffer::Full(item)) => item,
                };
            }
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn capacity(&self) -> Option<NonZero<usize>> {
        NonZero::new(self.items.capacity())
    }

    fn clear(&self) -> usize {
        let mut cleared: usize = 0;

        while self.items.pop().is_some() {
            cleared = cleared.wrapping_add(1);
        }

        if cleared > 0 {
            self.notify_space_freed(cleared);
        }

        cleared
    }

    fn close(&self) {
        // Release ensures that waiters woken below observe the flag.
        self.closed.store(true, Ordering::Release);
        self.space_freed.notify(usize::MAX);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
