use std::any::type_name;
use std::convert::Infallible;
use std::fmt;

/// Constructs new instances of `T` when a pool has none to hand out.
///
/// The pool calls [`create()`][Self::create] at most once per lease that finds the pool empty.
/// Closures are adapted via [`FromFn`] (infallible) and [`TryFromFn`] (fallible); implement the
/// trait directly for factories that carry their own state.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// use lease_pool::{Factory, Pool, QueuePool, UnboundedQueue};
///
/// struct Connections {
///     next_id: AtomicU32,
///     limit: u32,
/// }
///
/// impl Factory<u32> for Connections {
///     type Error = &'static str;
///
///     fn create(&self) -> Result<u32, Self::Error> {
///         let id = self.next_id.fetch_add(1, Ordering::Relaxed);
///         if id < self.limit { Ok(id) } else { Err("connection limit reached") }
///     }
/// }
///
/// let pool = QueuePool::with_container(
///     UnboundedQueue::new(),
///     Connections {
///         next_id: AtomicU32::new(0),
///         limit: 1,
///     },
/// );
///
/// assert_eq!(pool.lease(), Ok(0));
/// assert_eq!(pool.lease(), Err("connection limit reached"));
/// ```
pub trait Factory<T> {
    /// The error returned when construction fails.
    type Error;

    /// Constructs a new instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance cannot be constructed. The pool passes the error on to
    /// the caller of `lease()` unchanged.
    fn create(&self) -> Result<T, Self::Error>;
}

/// Adapts an infallible closure into a [`Factory`].
#[derive(Clone, Copy)]
pub struct FromFn<F>(pub F);

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FromFn").field(&type_name::<F>()).finish()
    }
}

impl<T, F> Factory<T> for FromFn<F>
where
    F: Fn() -> T,
{
    type Error = Infallible;

    #[inline]
    fn create(&self) -> Result<T, Self::Error> {
        Ok((self.0)())
    }
}

/// Adapts a fallible closure into a [`Factory`].
#[derive(Clone, Copy)]
pub struct TryFromFn<F>(pub F);

impl<F> fmt::Debug for TryFromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TryFromFn").field(&type_name::<F>()).finish()
    }
}

impl<T, E, F> Factory<T> for TryFromFn<F>
where
    F: Fn() -> Result<T, E>,
{
    type Error = E;

    #[inline]
    fn create(&self) -> Result<T, Self::Error> {
        (self.0)()
    }
}
