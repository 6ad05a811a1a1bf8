//! Failure-injection configuration parameters.
//!
//! Mirrors the engine's profile invariant at the validation layer so a
//! bad harness config surfaces as a `ConfigError`, not as an assertion
//! deep inside an allocation path.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Failure-injection configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct InjectionConfig {
    /// Mean number of allocation attempts between failure runs.
    #[serde(default = "default_fail_once_per")]
    #[validate(range(min = 1))]
    pub fail_once_per: u32,

    /// Maximum consecutive failures once a run starts.
    #[serde(default = "default_max_run_length")]
    #[validate(range(min = 1))]
    pub max_run_length: u32,

    /// Start with injection paused on the applying thread.
    #[serde(default)]
    pub start_paused: bool,

    /// Base value for per-thread seeds; set for reproducible runs.
    #[serde(default)]
    pub base_seed: Option<u64>,
}

fn default_fail_once_per() -> u32 {
    100_000
}

fn default_max_run_length() -> u32 {
    5
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            fail_once_per: default_fail_once_per(),
            max_run_length: default_max_run_length(),
            start_paused: false,
            base_seed: None,
        }
    }
}

impl InjectionConfig {
    /// Applies this configuration to the engine. Only threads created
    /// after this call pick up the new defaults; `start_paused` applies
    /// to the calling thread.
    pub fn apply(&self) {
        if let Some(seed) = self.base_seed {
            svikt_core::context::set_base_seed(seed);
        }
        svikt_core::context::set_default_profile(self.fail_once_per, self.max_run_length);
        if self.start_paused {
            svikt_core::context::pause(true);
        }
    }
}
