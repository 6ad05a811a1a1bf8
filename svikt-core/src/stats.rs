//! ## svikt-core::stats
//! **Process-wide injection counters**
//!
//! Increment-only atomic counters fed by the context-level decision
//! wrappers. Relaxed ordering is sufficient; these are reporting
//! counters, not synchronization.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global injection statistics tracker.
pub struct InjectionStats {
    decisions: AtomicU64,
    failures: AtomicU64,
}

static GLOBAL: InjectionStats = InjectionStats::new();

/// The process-wide statistics instance.
pub fn global() -> &'static InjectionStats {
    &GLOBAL
}

impl InjectionStats {
    pub const fn new() -> Self {
        Self {
            decisions: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Records one decision and whether it injected a failure.
    #[inline]
    pub fn record_decision(&self, failed: bool) {
        self.decisions.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Total decisions taken across all threads.
    pub fn decisions(&self) -> u64 {
        self.decisions.load(Ordering::Relaxed)
    }

    /// Total failures injected across all threads.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

impl Default for InjectionStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_read() {
        let stats = InjectionStats::new();
        assert_eq!(stats.decisions(), 0);
        assert_eq!(stats.failures(), 0);

        stats.record_decision(false);
        stats.record_decision(true);

        assert_eq!(stats.decisions(), 2);
        assert_eq!(stats.failures(), 1);
    }

    #[test]
    fn test_counters_accumulate() {
        let stats = InjectionStats::new();
        for _ in 0..100 {
            stats.record_decision(true);
        }
        assert_eq!(stats.decisions(), 100);
        assert_eq!(stats.failures(), 100);
    }
}
