//! Observability subsystem: trait-based event and metric recording.
//!
//! Provides a pluggable [`Observer`] trait with two backends:
//!
//! | Backend | Description |
//! |---------|-------------|
//! | `noop`  | Zero overhead, discards everything (default) |
//! | `log`   | Emits structured events via `tracing` |
//!
//! The [`create_observer`] factory builds the right backend from
//! [`ObservabilityConfig`].

mod log;
mod noop;
pub mod traits;

#[cfg(test)]
pub mod recording;

use serde::{Deserialize, Serialize};

pub use self::log::LogObserver;
pub use self::noop::NoopObserver;
pub use self::traits::{Observer, ObserverEvent, ObserverMetric};

/// Configuration for the observability backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Backend name: "none", "noop" or "log".
    #[serde(default = "default_backend")]
    pub backend: String,
}

fn default_backend() -> String {
    "none".into()
}

impl ObservabilityConfig {
    /// Build from `SLOTKEEPER_OBSERVABILITY`, defaulting to "none".
    pub fn from_env() -> Result<Self, crate::error::ConfigError> {
        Ok(Self {
            backend: crate::config::optional_env("SLOTKEEPER_OBSERVABILITY")?
                .unwrap_or_else(default_backend),
        })
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

/// Create an observer from configuration.
///
/// Returns a [`LogObserver`] for "log" and a [`NoopObserver`] for
/// "none"/"noop" (or unknown values).
pub fn create_observer(config: &ObservabilityConfig) -> Box<dyn Observer> {
    match config.backend.as_str() {
        "log" => Box::new(LogObserver),
        "none" | "noop" | "" => Box::new(NoopObserver),
        other => {
            tracing::warn!(
                "Unknown observability backend '{}', falling back to noop",
                other
            );
            Box::new(NoopObserver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(backend: &str) -> ObservabilityConfig {
        ObservabilityConfig {
            backend: backend.into(),
        }
    }

    #[test]
    fn default_config_is_none() {
        assert_eq!(ObservabilityConfig::default().backend, "none");
    }

    #[test]
    fn factory_returns_noop_for_none() {
        assert_eq!(create_observer(&test_config("none")).name(), "noop");
    }

    #[test]
    fn factory_returns_noop_for_empty() {
        assert_eq!(create_observer(&test_config("")).name(), "noop");
    }

    #[test]
    fn factory_returns_noop_for_unknown() {
        assert_eq!(create_observer(&test_config("prometheus")).name(), "noop");
    }

    #[test]
    fn factory_returns_log_for_log() {
        assert_eq!(create_observer(&test_config("log")).name(), "log");
    }
}
