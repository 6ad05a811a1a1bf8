//! # Svikt Configuration System
//!
//! Hierarchical configuration for the failure-injection engine: defaults,
//! an optional YAML file, then `SVIKT_*` environment variables, validated
//! before anything reaches the process-wide profile.
//!
//! ## Features
//! - **Unified Configuration**: one validated source of truth for harnesses
//! - **Validation**: profile invariants checked before they can assert
//!   deep inside the engine
//! - **Environment Awareness**: CI can steer injection without code changes

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod injection;

pub use error::ConfigError;
pub use injection::InjectionConfig;

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct SviktConfig {
    /// Failure-injection parameters (profile, pause, seeding).
    #[validate(nested)]
    pub injection: InjectionConfig,
}

impl SviktConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/svikt.yaml` - base settings. If missing, defaults are used.
    /// 3. `SVIKT_*` environment variables (`__` separates nesting levels).
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(SviktConfig::default()));

        if Path::new("config/svikt.yaml").exists() {
            figment = figment.merge(Yaml::file("config/svikt.yaml"));
        } else {
            tracing::debug!("config/svikt.yaml not found, using default configuration");
        }

        figment
            .merge(Env::prefixed("SVIKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Load configuration from a specific path for testing/validation.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(
                path.to_string_lossy().to_string(),
            )));
        }

        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("SVIKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Pushes the validated values into the engine: the process-wide
    /// default profile, the thread-seed base, and the calling thread's
    /// pause state when `start_paused` is set.
    pub fn apply(&self) {
        self.injection.apply();
    }
}
