//! Error types for injection settings loading.
//!
//! A bad profile arriving through a file or the environment is reported
//! here, before it can assert deep inside an allocation path.

use std::path::PathBuf;
use thiserror::Error;
use validator::ValidationErrors;

/// Errors produced while loading injection settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested settings file does not exist.
    #[error("injection settings file not found: {0}")]
    FileNotFound(PathBuf),

    /// Settings parsed but violate a profile bound.
    #[error("invalid injection settings:\n{}", render_violations(.0))]
    Validation(#[source] ValidationErrors),

    /// Figment could not parse or merge a settings source.
    #[error("failed to read injection settings: {0}")]
    Parsing(#[from] figment::Error),
}

/// One `field: reason` line per violation, so a harness log names the
/// offending knob directly.
fn render_violations(errors: &ValidationErrors) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    for (field, errors) in errors.field_errors() {
        for error in errors {
            let reason = error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| error.code.to_string());
            let _ = writeln!(out, "  {}: {}", field, reason);
        }
    }
    out
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}
