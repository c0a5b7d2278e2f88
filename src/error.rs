//! Error types for slotkeeper.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised when the policy loop writes continuity data back into a
/// [`DialogueStateTracker`](crate::tracker::DialogueStateTracker).
///
/// Slot updates never produce errors; unknown slot names are dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("{field} has length {actual}, expected {expected}")]
    DimensionMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Action index {index} out of range for {n_actions} actions")]
    ActionOutOfRange { index: usize, n_actions: usize },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_top_level() {
        let err: Error = ConfigError::ParseError("bad toml".to_string()).into();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Failed to parse configuration: bad toml"
        );
    }

    #[test]
    fn dimension_mismatch_message_names_field() {
        let err = TrackerError::DimensionMismatch {
            field: "prev_action",
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "prev_action has length 3, expected 4");
    }
}
