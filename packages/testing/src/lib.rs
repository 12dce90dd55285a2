#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for testing and examples in the `lease_pool` workspace.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long a thread must stay blocked before [`assert_still_blocked()`] believes it.
pub const BLOCKED_GRACE_PERIOD: Duration = Duration::from_millis(150);

/// Runs a test with a timeout so that a deadlocked pool fails the test instead of hanging it.
///
/// The timeout is 10 seconds, or 60 seconds under Miri where thread synchronization is much
/// slower.
///
/// When the `MUTATION_TESTING` environment variable is set to "1", the watchdog is disabled so
/// that mutation testing can detect hanging mutations by its own timeout.
///
/// # Panics
///
/// Panics if the test exceeds the timeout, or re-raises the panic of the test itself.
///
/// # Example
///
/// ```rust
/// use testing::with_watchdog;
///
/// with_watchdog(|| {
///     assert_eq!(2 + 2, 4);
/// });
/// ```
pub fn with_watchdog<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    if std::env::var("MUTATION_TESTING").as_deref() == Ok("1") {
        return test_fn();
    }

    let (tx, rx) = mpsc::channel();

    let test_handle = thread::spawn(move || {
        let result = test_fn();
        // If this fails, the receiver has already timed out.
        drop(tx.send(result));
    });

    let timeout = if cfg!(miri) {
        Duration::from_secs(60)
    } else {
        Duration::from_secs(10)
    };

    match rx.recv_timeout(timeout) {
        Ok(result) => {
            test_handle.join().expect("test thread should not panic after sending its result");
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("test exceeded {timeout:?} timeout, probably blocked forever");
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => match test_handle.join() {
            Ok(()) => panic!("test thread disconnected unexpectedly"),
            Err(e) => std::panic::resume_unwind(e),
        },
    }
}

/// Asserts that a spawned thread has not finished after [`BLOCKED_GRACE_PERIOD`].
///
/// Used to check that an operation blocks. A passing check is evidence, not proof: the thread
/// might simply be slow to start.
///
/// # Panics
///
/// Panics if the thread has already finished.
pub fn assert_still_blocked<R>(handle: &JoinHandle<R>, what: &str) {
    thread::sleep(BLOCKED_GRACE_PERIOD);

    assert!(
        !handle.is_finished(),
        "{what} was expected to block but completed"
    );
}

/// Source of unique, increasing tokens for use as pool factories.
///
/// Starts at zero. Optionally fails on exactly one invocation, to exercise factory failure paths.
///
/// # Example
///
/// ```rust
/// use testing::Tokens;
///
/// let tokens = Tokens::failing_on(2);
///
/// assert_eq!(tokens.issue(), Ok(0));
/// assert!(tokens.issue().is_err());
/// assert_eq!(tokens.issue(), Ok(1));
/// ```
#[derive(Debug, Default)]
pub struct Tokens {
    issued: AtomicU64,
    invocations: AtomicU64,
    fail_on_invocation: Option<u64>,
}

impl Tokens {
    /// Creates a source that never fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source that fails on the `nth` invocation (counting from 1) and only then.
    #[must_use]
    pub fn failing_on(nth: u64) -> Self {
        Self {
            fail_on_invocation: Some(nth),
            ..Self::default()
        }
    }

    /// Issues the next token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError`] if this is the invocation configured to fail. A failed invocation
    /// does not consume a token.
    pub fn issue(&self) -> Result<u64, TokenError> {
        let invocation = self
            .invocations
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_add(1);

        if self.fail_on_invocation == Some(invocation) {
            return Err(TokenError { invocation });
        }

        Ok(self.issued.fetch_add(1, Ordering::Relaxed))
    }

    /// Issues the next token from a source that is not configured to fail.
    ///
    /// # Panics
    ///
    /// Panics if the source was created with [`failing_on()`][Self::failing_on] and this is the
    /// failing invocation.
    #[must_use]
    pub fn issue_infallible(&self) -> u64 {
        self.issue().expect("token source configured to fail was used as infallible")
    }

    /// How many tokens have been issued so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }
}

/// The configured failure of a [`Tokens`] source.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TokenError {
    /// The invocation (counting from 1) that failed.
    pub invocation: u64,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token construction failed on invocation {}", self.invocation)
    }
}

impl std::error::Error for TokenError {}
