//! Configuration for slotkeeper.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::observability::ObservabilityConfig;
use crate::tracker::{DefaultTracker, DialogueStateTracker, FeaturizedTracker, ReferenceSnapshot};

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            tracker: TrackerConfig::from_env()?,
            observability: ObservabilityConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(raw).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tracker.validate()
    }
}

/// Which slot tracker a session wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerKind {
    /// Binary presence features only.
    #[default]
    Default,
    /// Presence, change and novelty features with their sums.
    #[serde(alias = "featurized_tracker")]
    Featurized,
}

impl FromStr for TrackerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "featurized" | "featurized_tracker" => Ok(Self::Featurized),
            other => Err(format!(
                "unknown tracker '{other}', expected 'default' or 'featurized'"
            )),
        }
    }
}

impl fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Featurized => f.write_str("featurized"),
        }
    }
}

/// Parameters for building a session's [`DialogueStateTracker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub kind: TrackerKind,
    /// Known slots, in feature order.
    pub slot_names: Vec<String>,
    /// Length of the previous-action vector.
    pub n_actions: usize,
    /// Width of each half of the recurrent network state.
    pub hidden_size: usize,
    /// Reference state for featurized diff/novelty blocks.
    #[serde(default)]
    pub reference: ReferenceSnapshot,
}

impl TrackerConfig {
    pub fn new<I, S>(slot_names: I, n_actions: usize, hidden_size: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: TrackerKind::default(),
            slot_names: slot_names.into_iter().map(Into::into).collect(),
            n_actions,
            hidden_size,
            reference: ReferenceSnapshot::default(),
        }
    }

    pub fn kind(mut self, kind: TrackerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn reference(mut self, reference: ReferenceSnapshot) -> Self {
        self.reference = reference;
        self
    }

    fn from_env() -> Result<Self, ConfigError> {
        let slot_names = optional_env("SLOTKEEPER_SLOT_NAMES")?
            .ok_or_else(|| ConfigError::MissingRequired {
                key: "SLOTKEEPER_SLOT_NAMES".to_string(),
                hint: "Set a comma-separated list of slot names, e.g. 'food,area,price'"
                    .to_string(),
            })?
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        Ok(Self {
            kind: parse_optional_env("SLOTKEEPER_TRACKER", TrackerKind::default())?,
            slot_names,
            n_actions: parse_required_env("SLOTKEEPER_N_ACTIONS", "number of policy actions")?,
            hidden_size: parse_required_env(
                "SLOTKEEPER_HIDDEN_SIZE",
                "policy network hidden state width",
            )?,
            reference: parse_optional_env(
                "SLOTKEEPER_DIFF_REFERENCE",
                ReferenceSnapshot::default(),
            )?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_names.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "slot_names".to_string(),
                message: "at least one slot name is required".to_string(),
            });
        }
        let mut seen = HashSet::new();
        for name in &self.slot_names {
            if name.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "slot_names".to_string(),
                    message: "slot names must not be empty".to_string(),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    key: "slot_names".to_string(),
                    message: format!("duplicate slot name '{name}'"),
                });
            }
        }
        if self.n_actions == 0 {
            return Err(ConfigError::InvalidValue {
                key: "n_actions".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }
        if self.hidden_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "hidden_size".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }
        Ok(())
    }

    /// Feature width the policy input layer must accept.
    pub fn num_features(&self) -> usize {
        let k = self.slot_names.len();
        match self.kind {
            TrackerKind::Default => k,
            TrackerKind::Featurized => 3 * k + 3,
        }
    }

    /// Build a session tracker wrapping the configured slot tracker.
    pub fn build<V>(&self) -> DialogueStateTracker<V>
    where
        V: PartialEq + Clone + Send + 'static,
    {
        let names = self.slot_names.iter().cloned();
        match self.kind {
            TrackerKind::Default => DialogueStateTracker::new(
                DefaultTracker::<V>::new(names),
                self.n_actions,
                self.hidden_size,
            ),
            TrackerKind::Featurized => DialogueStateTracker::new(
                FeaturizedTracker::<V>::with_reference(names, self.reference),
                self.n_actions,
                self.hidden_size,
            ),
        }
    }
}

pub(crate) fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(val) if val.is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::ParseError(format!(
            "failed to read {key}: {e}"
        ))),
    }
}

pub(crate) fn parse_optional_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    optional_env(key)?
        .map(|s| {
            s.parse().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{e}"),
            })
        })
        .transpose()
        .map(|opt| opt.unwrap_or(default))
}

fn parse_required_env<T>(key: &str, what: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = optional_env(key)?.ok_or_else(|| ConfigError::MissingRequired {
        key: key.to_string(),
        hint: format!("Set {key} to the {what}"),
    })?;
    raw.parse().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{e}"),
    })
}
