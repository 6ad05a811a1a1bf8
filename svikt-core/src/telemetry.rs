//! ## svikt-core::telemetry
//! **Tracing subscriber setup**
//!
//! Structured logging for profile changes and pause toggles. The decision
//! hot path itself emits nothing: it may run inside an allocator and must
//! not allocate.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs a fmt subscriber honoring `RUST_LOG`, defaulting to `info`.
    ///
    /// Safe to call more than once; later calls are no-ops.
    pub fn init() {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .try_init();
    }
}
