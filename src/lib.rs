//! Dialogue state tracking for turn-based conversational policies.
//!
//! A tracker records the slots extracted from each user turn, keeps the
//! latest value per slot, and exposes a fixed-length feature vector for the
//! policy network. [`DialogueStateTracker`] adds the per-session data the
//! policy carries between turns, and [`TrackerRegistry`] keeps one tracker
//! per session id.
//!
//! ```rust
//! use serde_json::json;
//! use slotkeeper::{ConfigTrackerFactory, Tracker, TrackerConfig, TrackerKind, TrackerRegistry};
//!
//! let params = TrackerConfig::new(["food", "area"], 8, 32).kind(TrackerKind::Featurized);
//! let registry: TrackerRegistry = TrackerRegistry::new();
//!
//! let session = registry.get_or_create("user-1", &ConfigTrackerFactory, &params);
//! let mut tracker = session.lock();
//! tracker.update_state([("food", json!("thai")), ("noise", json!(1))]);
//!
//! assert_eq!(tracker.get_features().len(), params.num_features());
//! assert_eq!(tracker.get_state()["food"], json!("thai"));
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod registry;
pub mod tracker;

pub use config::{Config, TrackerConfig, TrackerKind};
pub use error::{ConfigError, Error, Result, TrackerError};
pub use registry::{ConfigTrackerFactory, SessionHandle, TrackerFactory, TrackerRegistry};
pub use tracker::{
    DefaultTracker, DialogueStateTracker, FeatureVector, FeaturizedTracker, NetworkState,
    ReferenceSnapshot, SlotFilter, SlotState, SlotUpdates, Tracker,
};
