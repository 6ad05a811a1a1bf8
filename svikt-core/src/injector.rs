//! ## svikt-core::injector
//! **The per-thread failure decision state machine**
//!
//! One `FaultInjector` per execution context, owning its own seeded
//! `SmallRng` so concurrent threads never share or contend on randomness
//! state. The single hot-path operation is [`FaultInjector::should_fail`].
//!
//! ### Expectations:
//! - O(1), never blocks, never allocates, never panics in release
//! - Reproducible: the decision sequence is a pure function of the seed,
//!   the profile, and the call sequence

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::profile::FailureProfile;

/// Full mutable state of an injector, as captured by [`FaultInjector::snapshot`].
///
/// Restoring a snapshot puts back the profile, the paused flag, and the
/// in-progress run counter. RNG state is deliberately not part of the
/// snapshot: a restored injector continues its own random sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectorState {
    pub profile: FailureProfile,
    pub paused: bool,
    pub run_remaining: u32,
}

/// Decides, per allocation attempt, whether to signal an injected failure.
#[derive(Debug)]
pub struct FaultInjector {
    profile: FailureProfile,
    paused: bool,
    run_remaining: u32,
    runs_started: u64,
    rng: SmallRng,
}

impl FaultInjector {
    /// Creates an injector with a deterministic seed.
    pub fn with_seed(profile: FailureProfile, seed: u64) -> Self {
        Self {
            profile,
            paused: false,
            run_remaining: 0,
            runs_started: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Returns true if this allocation attempt should fail.
    ///
    /// While paused this always returns false and leaves run accounting
    /// untouched, so injection resumes as if uninterrupted. Otherwise a
    /// new run is triggered with probability
    /// [`FailureProfile::trigger_probability`] and consumed one call at a
    /// time until exhausted.
    #[inline]
    pub fn should_fail(&mut self) -> bool {
        debug_assert!(self.profile.invariant());

        if self.paused {
            return false;
        }

        if self.run_remaining == 0 {
            let draw: f64 = self.rng.random();
            if draw < self.profile.trigger_probability() {
                let length: f64 = self.rng.random();
                self.run_remaining =
                    1 + (length * (self.profile.max_run_length() - 1) as f64) as u32;
                self.runs_started += 1;
                debug_assert!(
                    self.run_remaining >= 1
                        && self.run_remaining <= self.profile.max_run_length()
                );
            }
        }

        if self.run_remaining > 0 {
            self.run_remaining -= 1;
            true
        } else {
            false
        }
    }

    /// Failure-signaling entry point for allocation call sites.
    ///
    /// Returns true when the caller should raise its environment's OOM
    /// convention (null return, `Err`, aborting handler) instead of
    /// performing the allocation. This path performs no allocation
    /// itself; all state it touches is already resident.
    #[inline]
    pub fn inject(&mut self) -> bool {
        self.should_fail()
    }

    /// Pauses or resumes injection on this injector.
    ///
    /// Pausing freezes, not resets: an in-flight run keeps its remaining
    /// count and continues once unpaused. Useful around calls into code
    /// that cannot tolerate injected failures.
    pub fn pause(&mut self, on: bool) {
        self.paused = on;
    }

    /// Replaces this injector's profile. Other injectors and the process
    /// default are unaffected.
    ///
    /// # Panics
    ///
    /// Panics if the new values violate the profile invariant.
    pub fn set_profile(&mut self, fail_once_per: u32, max_run_length: u32) {
        self.profile.set(fail_once_per, max_run_length);
    }

    #[inline]
    pub fn profile(&self) -> FailureProfile {
        self.profile
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Failures still owed by the currently active run; 0 means no run.
    #[inline]
    pub fn run_remaining(&self) -> u32 {
        self.run_remaining
    }

    /// Number of failure runs started since construction.
    #[inline]
    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    /// Captures profile, paused flag and run counter for later [`restore`].
    ///
    /// [`restore`]: FaultInjector::restore
    pub fn snapshot(&self) -> InjectorState {
        InjectorState {
            profile: self.profile,
            paused: self.paused,
            run_remaining: self.run_remaining,
        }
    }

    /// Overwrites the live state with a snapshot taken earlier.
    pub fn restore(&mut self, state: InjectorState) {
        self.profile = state.profile;
        self.paused = state.paused;
        self.run_remaining = state.run_remaining;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_always_fail_profile_saturates() {
        // Trigger probability >= 1.0, run length locked to 1: every call fails.
        let mut injector = FaultInjector::with_seed(FailureProfile::new(1, 1), 7);
        for _ in 0..1_000 {
            assert!(injector.should_fail());
        }
    }

    #[test]
    fn test_huge_spacing_yields_no_failures() {
        let mut injector = FaultInjector::with_seed(FailureProfile::new(1_000_000_000, 1), 7);
        let failures = (0..10_000).filter(|_| injector.should_fail()).count();
        assert_eq!(failures, 0);
    }

    #[test]
    fn test_pause_freezes_run_accounting() {
        let mut injector = FaultInjector::with_seed(FailureProfile::new(2, 8), 99);

        // Drive until a run is in flight with at least one failure owed.
        while injector.run_remaining() == 0 {
            injector.should_fail();
        }
        let owed = injector.run_remaining();

        injector.pause(true);
        for _ in 0..10_000 {
            assert!(!injector.should_fail());
        }
        // Nothing consumed or invented during the pause window.
        assert_eq!(injector.run_remaining(), owed);

        injector.pause(false);
        for _ in 0..owed {
            assert!(injector.should_fail());
        }
        assert_eq!(injector.run_remaining(), 0);
    }

    #[test]
    fn test_deterministic_per_seed() {
        let profile = FailureProfile::new(10, 10);
        let mut a = FaultInjector::with_seed(profile, 1234);
        let mut b = FaultInjector::with_seed(profile, 1234);
        for _ in 0..50_000 {
            assert_eq!(a.should_fail(), b.should_fail());
        }
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut injector = FaultInjector::with_seed(FailureProfile::new(3, 4), 5);
        while injector.run_remaining() == 0 {
            injector.should_fail();
        }
        injector.pause(true);
        let saved = injector.snapshot();

        injector.pause(false);
        injector.set_profile(77, 2);
        while injector.run_remaining() == saved.run_remaining {
            injector.should_fail();
        }

        injector.restore(saved);
        assert_eq!(injector.snapshot(), saved);
    }

    #[test]
    fn test_statistical_failure_rate() {
        // Compensated trigger probability keeps the mean spacing between
        // injected failures at fail_once_per, independent of run length.
        let mut injector = FaultInjector::with_seed(FailureProfile::new(10, 10), 42);
        let calls = 100_000;
        let failures = (0..calls).filter(|_| injector.should_fail()).count();

        let expected = calls / 10;
        let tolerance = expected * 3 / 10;
        assert!(
            failures.abs_diff(expected) < tolerance,
            "observed {} failures, expected {} ± {}",
            failures,
            expected,
            tolerance
        );
    }

    #[test]
    fn test_statistical_run_lengths() {
        let mut injector = FaultInjector::with_seed(FailureProfile::new(10, 10), 42);
        let mut lengths = Vec::new();
        let mut current = 0u32;
        let mut runs_at_streak_start = 0;
        for _ in 0..100_000 {
            let runs_before = injector.runs_started();
            if injector.should_fail() {
                if current == 0 {
                    runs_at_streak_start = runs_before;
                }
                current += 1;
            } else if current > 0 {
                // A new run can trigger on the call right after one ends,
                // merging two runs into one failure streak; only streaks
                // from a single run measure that run's length.
                if injector.runs_started() == runs_at_streak_start + 1 {
                    lengths.push(current);
                }
                current = 0;
            }
        }

        assert!(lengths.len() > 100, "too few runs observed to judge spread");
        assert!(lengths.iter().all(|&len| len >= 1 && len <= 10));
        // Spread, not a point mass: short, medium and long runs all occur.
        assert!(lengths.iter().any(|&len| len <= 2));
        assert!(lengths.iter().any(|&len| (4..=6).contains(&len)));
        assert!(lengths.iter().any(|&len| len >= 8));
    }

    proptest! {
        #[test]
        fn prop_run_remaining_stays_bounded(
            fail_once_per in 1u32..10_000,
            max_run_length in 1u32..64,
            seed in any::<u64>(),
            calls in 1usize..2_000,
        ) {
            let profile = FailureProfile::new(fail_once_per, max_run_length);
            let mut injector = FaultInjector::with_seed(profile, seed);
            for _ in 0..calls {
                injector.should_fail();
                prop_assert!(injector.run_remaining() <= max_run_length);
            }
        }

        #[test]
        fn prop_run_length_one_never_clusters(
            fail_once_per in 1u32..100,
            seed in any::<u64>(),
        ) {
            let mut injector =
                FaultInjector::with_seed(FailureProfile::new(fail_once_per, 1), seed);
            for _ in 0..2_000 {
                injector.should_fail();
                prop_assert!(injector.run_remaining() <= 1);
            }
        }
    }
}
