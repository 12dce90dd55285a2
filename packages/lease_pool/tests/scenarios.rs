//! Behavioral scenarios for the two standard pool strategies.
//!
//! Tests that spawn threads and sleep are ignored under Miri.

use std::sync::Arc;
use std::thread;

use lease_pool::{Pool, QueuePool};
use new_zealand::nz;
use testing::{TokenError, Tokens, assert_still_blocked, with_watchdog};

#[test]
fn unbounded_first_lease_constructs_then_recycles() {
    let tokens = Arc::new(Tokens::new());
    let pool = QueuePool::unbounded({
        let tokens = Arc::clone(&tokens);
        move || tokens.issue_infallible()
    });

    let Ok(first) = pool.lease();
    assert_eq!(first, 0);

    pool.release(first);

    // Recycled, not freshly constructed.
    assert_eq!(pool.lease(), Ok(0));
    assert_eq!(tokens.issued(), 1);
}

#[test]
fn unbounded_size_tracks_unmatched_releases() {
    let pool = QueuePool::unbounded(|| 0_u32);

    let mut unmatched = 0_usize;

    for round in 0..50_u32 {
        if round % 3 == 0 {
            let _leased = pool.lease();
            unmatched = unmatched.saturating_sub(1);
        } else {
            pool.release(round);
            unmatched += 1;
        }

        assert!(pool.size() <= unmatched);
    }
}

#[test]
fn unbounded_grows_without_limit() {
    let pool = QueuePool::unbounded(|| 0_u64);

    for value in 0..100_000 {
        pool.release(value);
    }

    assert_eq!(pool.size(), 100_000);
}

#[test]
fn lease_release_round_trip_loses_nothing() {
    let tokens = Arc::new(Tokens::new());
    let pool = QueuePool::bounded(nz!(8), {
        let tokens = Arc::clone(&tokens);
        move || tokens.issue_infallible()
    });

    for _ in 0..1000 {
        let Ok(instance) = pool.lease();
        pool.release(instance);
    }

    assert_eq!(tokens.issued(), 1);
    assert_eq!(pool.size(), 1);
}

#[test]
fn factory_failure_surfaces_only_on_that_lease() {
    let tokens = Arc::new(Tokens::failing_on(3));
    let pool = QueuePool::try_unbounded({
        let tokens = Arc::clone(&tokens);
        move || tokens.issue()
    });

    assert_eq!(pool.lease(), Ok(0));
    assert_eq!(pool.lease(), Ok(1));
    assert_eq!(pool.lease(), Err(TokenError { invocation: 3 }));
    assert_eq!(pool.lease(), Ok(2));
    assert_eq!(pool.lease(), Ok(3));
}

#[test]
fn factory_failure_is_not_retried() {
    let tokens = Arc::new(Tokens::failing_on(1));
    let pool = QueuePool::try_bounded(nz!(2), {
        let tokens = Arc::clone(&tokens);
        move || tokens.issue()
    });

    assert!(pool.lease().is_err());
    assert_eq!(tokens.issued(), 0);
}

#[test]
fn factory_failure_does_not_disturb_held_instances() {
    let pool = QueuePool::try_unbounded(|| Err::<u32, _>("exhausted"));

    pool.release(42);

    assert_eq!(pool.lease(), Ok(42));
    assert_eq!(pool.lease(), Err("exhausted"));
}

#[test]
fn lease_from_empty_bounded_pool_does_not_block() {
    with_watchdog(|| {
        let pool = QueuePool::bounded(nz!(1), || "fresh");

        for _ in 0..100 {
            assert_eq!(pool.lease(), Ok("fresh"));
        }

        assert_eq!(pool.size(), 0);
    });
}

#[cfg_attr(miri, ignore)] // Relies on real sleeps.
#[test]
fn bounded_release_at_capacity_waits_for_lease() {
    with_watchdog(|| {
        let tokens = Arc::new(Tokens::new());
        let pool = Arc::new(QueuePool::bounded(nz!(1), {
            let tokens = Arc::clone(&tokens);
            move || tokens.issue_infallible()
        }));

        // Thread A leases X; the pool is now empty.
        let Ok(x) = pool.lease();
        assert_eq!(x, 0);

        // Something else fills the only slot.
        pool.release(100);
        assert_eq!(pool.size(), 1);

        // Thread B releases Y and must wait for space.
        let releaser = thread::spawn({
            let pool = Arc::clone(&pool);
            move || pool.release(200)
        });

        assert_still_blocked(&releaser, "release into a full pool");
        assert_eq!(pool.size(), 1);

        // A lease drains capacity, which lets B complete.
        assert_eq!(pool.lease(), Ok(100));
        releaser.join().unwrap();

        assert_eq!(pool.size(), 1);
        assert_eq!(pool.lease(), Ok(200));
    });
}

#[cfg_attr(miri, ignore)] // Relies on real sleeps.
#[test]
fn shutdown_releases_blocked_releaser() {
    with_watchdog(|| {
        let pool = Arc::new(QueuePool::bounded(nz!(1), || Arc::new(0)));
        pool.release(Arc::new(1));

        let stuck = Arc::new(2);
        let releaser = thread::spawn({
            let pool = Arc::clone(&pool);
            let stuck = Arc::clone(&stuck);
            move || pool.release(stuck)
        });

        assert_still_blocked(&releaser, "release into a full pool");

        pool.shutdown();
        releaser.join().unwrap();

        // The blocked instance was dropped rather than stored.
        assert_eq!(Arc::strong_count(&stuck), 1);
        assert_eq!(pool.size(), 0);
    });
}

#[test]
fn shutdown_twice_matches_shutdown_once() {
    fn zero() -> u8 {
        0
    }

    let once = QueuePool::bounded(nz!(4), zero);
    let twice = QueuePool::bounded(nz!(4), zero);

    for pool in [&once, &twice] {
        pool.release(1);
        pool.release(2);
    }

    once.shutdown();
    twice.shutdown();
    twice.shutdown();

    assert_eq!(once.size(), twice.size());
    assert_eq!(once.size(), 0);
    assert_eq!(once.is_shut_down(), twice.is_shut_down());
}

#[test]
fn pool_accepts_foreign_instances() {
    let pool = QueuePool::unbounded(String::new);

    pool.release("never leased".to_string());

    assert_eq!(pool.lease(), Ok("never leased".to_string()));
}

#[test]
fn dropping_pool_drops_held_instances() {
    let tracked = Arc::new(());

    {
        let pool = QueuePool::bounded(nz!(4), || Arc::new(()));
        pool.release(Arc::clone(&tracked));
        pool.release(Arc::clone(&tracked));
        assert_eq!(Arc::strong_count(&tracked), 3);
    }

    assert_eq!(Arc::strong_count(&tracked), 1);
}
