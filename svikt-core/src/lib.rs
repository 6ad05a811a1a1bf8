//! # svikt-core
//!
//! Deterministic allocation-failure injection for tests and fuzzing.
//! Makes a configurable fraction of allocation attempts fail, in clustered
//! runs rather than uniformly at random, so out-of-memory error paths get
//! exercised without actually exhausting memory.
//!
//! ### Expectations:
//! - Zero heap allocations on the decision path (`should_fail` may be
//!   called from inside an allocator)
//! - No locking on the hot path: every thread owns its own injector
//! - Deterministic per thread: same seed + same profile + same call
//!   sequence = same true/false sequence
//!
//! ### Key Submodules:
//! - `profile`: failure frequency and run-length configuration
//! - `injector`: the per-thread decision state machine
//! - `guard`: RAII save/restore of injector state
//! - `context`: process default profile + implicit per-thread injectors
//! - `stats`: process-wide injection counters
//! - `telemetry`: tracing subscriber setup
//!
//! ### Future:
//! - Size- and call-site-filtered injection
//! - Failure schedules recorded for exact replay

pub mod context;
pub mod guard;
pub mod injector;
pub mod profile;
pub mod stats;
pub mod telemetry;

pub use guard::{StateGuard, ThreadGuard};
pub use injector::{FaultInjector, InjectorState};
pub use profile::FailureProfile;
pub use stats::InjectionStats;
pub use telemetry::EventLogger;

pub mod prelude {
    pub use crate::context;
    pub use crate::guard::{StateGuard, ThreadGuard};
    pub use crate::injector::{FaultInjector, InjectorState};
    pub use crate::profile::FailureProfile;
}
