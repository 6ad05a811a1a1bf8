//! ## svikt-core::profile
//! **Failure frequency and run-length configuration**
//!
//! A profile is the pair (mean allocations between failure runs, maximum
//! consecutive failures once a run starts). One process-wide default
//! profile seeds each new thread's injector; after that the thread's copy
//! is private and independently mutable.

/// Failure injection profile.
///
/// Invariant: `fail_once_per > 0` and `max_run_length >= 1`. Violating it
/// is a programmer error and asserts immediately; it is never reported as
/// a recoverable condition. Every construction path goes through
/// [`FailureProfile::new`] or [`FailureProfile::set`], so no profile with
/// the invariant broken can exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureProfile {
    fail_once_per: u32,
    max_run_length: u32,
}

impl FailureProfile {
    /// Creates a new profile.
    ///
    /// # Panics
    ///
    /// Panics if `fail_once_per == 0` or `max_run_length == 0`.
    pub fn new(fail_once_per: u32, max_run_length: u32) -> Self {
        let profile = Self {
            fail_once_per,
            max_run_length,
        };
        assert!(profile.invariant(), "invalid failure profile");
        profile
    }

    /// Replaces both fields. Same panics as [`FailureProfile::new`].
    pub fn set(&mut self, fail_once_per: u32, max_run_length: u32) {
        self.fail_once_per = fail_once_per;
        self.max_run_length = max_run_length;
        assert!(self.invariant(), "invalid failure profile");
    }

    /// Mean number of allocation attempts between the starts of failure runs.
    #[inline]
    pub fn fail_once_per(&self) -> u32 {
        self.fail_once_per
    }

    /// Upper bound on consecutive failures once a run starts.
    #[inline]
    pub fn max_run_length(&self) -> u32 {
        self.max_run_length
    }

    /// Probability that any given decision starts a new failure run.
    ///
    /// A run consumes `max_run_length / 2` calls on average once started,
    /// so the trigger probability compensates by the same factor to keep
    /// the mean spacing between failures at `fail_once_per`. The division
    /// is real-valued: `max_run_length == 1` yields `2 / fail_once_per`,
    /// never a division by zero. The result may exceed 1.0 for extreme
    /// profiles such as `(1, 1)`, which simply saturates to "always fail".
    #[inline]
    pub fn trigger_probability(&self) -> f64 {
        1.0 / (self.fail_once_per as f64 * (self.max_run_length as f64 / 2.0))
    }

    #[inline]
    pub(crate) fn invariant(&self) -> bool {
        self.fail_once_per > 0 && self.max_run_length >= 1
    }
}

impl Default for FailureProfile {
    /// Documented process defaults: one run per 100_000 allocations, at
    /// most 5 consecutive failures.
    fn default() -> Self {
        Self {
            fail_once_per: 100_000,
            max_run_length: 5,
        }
    }
}
