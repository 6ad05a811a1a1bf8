//! ## svikt-core::context
//! **Process default profile and the implicit per-thread injector**
//!
//! The process-wide default profile is the only state shared across
//! threads, and each thread reads it exactly once: when its own injector
//! is lazily created on first use. Changing the default afterwards
//! affects only threads created from then on; existing per-thread copies
//! are untouched. This is documented behavior, not a race, and keeps the
//! decision hot path free of any cross-thread synchronization.
//!
//! Thread seeds come from a process-global counter mixed through
//! SplitMix64, so parallel threads get decorrelated random sequences
//! without any shared generator.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::guard::ThreadGuard;
use crate::injector::FaultInjector;
use crate::profile::FailureProfile;
use crate::stats;

static DEFAULT_PROFILE: Lazy<RwLock<FailureProfile>> =
    Lazy::new(|| RwLock::new(FailureProfile::default()));

/// Base value mixed into every thread seed; 0 until set explicitly.
static BASE_SEED: AtomicU64 = AtomicU64::new(0);

/// Monotonic ordinal handed to each new thread injector.
static NEXT_CONTEXT: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static INJECTOR: RefCell<FaultInjector> =
        RefCell::new(FaultInjector::with_seed(default_profile(), next_seed()));
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

fn next_seed() -> u64 {
    let ordinal = NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed);
    splitmix64(BASE_SEED.load(Ordering::Relaxed).wrapping_add(ordinal))
}

/// Sets the process-wide default profile.
///
/// Applies to threads whose injector is created after this call; threads
/// that already made a decision keep their private copy.
///
/// # Panics
///
/// Panics if the values violate the profile invariant.
pub fn set_default_profile(fail_once_per: u32, max_run_length: u32) {
    let profile = FailureProfile::new(fail_once_per, max_run_length);
    *DEFAULT_PROFILE.write() = profile;
    tracing::debug!(fail_once_per, max_run_length, "default failure profile updated");
}

/// Snapshot of the current process-wide default profile.
pub fn default_profile() -> FailureProfile {
    *DEFAULT_PROFILE.read()
}

/// Sets the base value thread seeds are derived from, for reproducible
/// whole-process runs. Affects only threads created afterwards.
pub fn set_base_seed(seed: u64) {
    BASE_SEED.store(seed, Ordering::Relaxed);
    tracing::debug!(seed, "injection base seed updated");
}

/// Runs `f` with exclusive access to the calling thread's injector,
/// creating it on first use.
pub fn with<R>(f: impl FnOnce(&mut FaultInjector) -> R) -> R {
    INJECTOR.with(|injector| f(&mut injector.borrow_mut()))
}

/// Decision entry point for the calling thread. See
/// [`FaultInjector::should_fail`].
#[inline]
pub fn should_fail() -> bool {
    let failed = with(|injector| injector.should_fail());
    stats::global().record_decision(failed);
    failed
}

/// Failure-signaling entry point for allocation call sites on the calling
/// thread. Identical to [`should_fail`]; the caller raises its own OOM
/// convention on `true`.
#[inline]
pub fn inject() -> bool {
    should_fail()
}

/// Pauses or resumes injection on the calling thread only.
pub fn pause(on: bool) {
    with(|injector| injector.pause(on));
    tracing::debug!(on, "thread failure injection pause toggled");
}

/// Overrides the calling thread's profile only; the process default and
/// other threads are unaffected.
pub fn set_profile(fail_once_per: u32, max_run_length: u32) {
    with(|injector| injector.set_profile(fail_once_per, max_run_length));
    tracing::debug!(fail_once_per, max_run_length, "thread failure profile updated");
}

/// Saves the calling thread's injector state, restored when the returned
/// guard drops.
pub fn save() -> ThreadGuard {
    ThreadGuard::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_thread_injector_copies_default_at_creation() {
        std::thread::spawn(|| {
            // First use copies whatever the default was at creation.
            let inherited = with(|injector| injector.profile());

            // Later default changes must not leak into this thread's copy.
            set_default_profile(inherited.fail_once_per().saturating_add(1), 9);
            assert_eq!(with(|injector| injector.profile()), inherited);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn test_threads_get_distinct_seeds() {
        assert_ne!(next_seed(), next_seed());
    }

    #[test]
    fn test_paused_thread_never_fails() {
        std::thread::spawn(|| {
            set_profile(1, 1);
            pause(true);
            for _ in 0..1_000 {
                assert!(!inject());
            }
            pause(false);
            assert!(inject());
        })
        .join()
        .unwrap();
    }

    #[test]
    fn test_decisions_feed_global_stats() {
        std::thread::spawn(|| {
            let decisions_before = stats::global().decisions();
            let failures_before = stats::global().failures();

            set_profile(1, 1);
            for _ in 0..100 {
                assert!(should_fail());
            }

            assert!(stats::global().decisions() >= decisions_before + 100);
            assert!(stats::global().failures() >= failures_before + 100);
        })
        .join()
        .unwrap();
    }

    #[traced_test]
    #[test]
    fn test_profile_updates_are_logged() {
        set_default_profile(5_000, 3);
        assert!(logs_contain("default failure profile updated"));
    }
}
