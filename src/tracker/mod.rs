//! Dialogue state trackers.
//!
//! A tracker accumulates slot updates across the turns of one dialogue and
//! turns the resulting state into a fixed-length feature vector for the
//! policy:
//!
//! | Tracker | Features |
//! |---------|----------|
//! | [`DefaultTracker`] | binary presence per known slot (`K`) |
//! | [`FeaturizedTracker`] | presence, change, novelty and their sums (`3K + 3`) |
//! | [`DialogueStateTracker`] | whatever the wrapped tracker produces |
//!
//! All trackers share the [`Tracker`] contract, so the policy loop can hold
//! any of them behind a trait object.

mod default;
mod dialogue;
mod featurized;
mod features;
mod slots;

use std::collections::BTreeMap;

pub use default::DefaultTracker;
pub use dialogue::{DialogueStateTracker, NetworkState};
pub use featurized::{FeaturizedTracker, ReferenceSnapshot};
pub use features::FeatureVector;
pub use slots::{FilteredUpdates, SlotFilter, SlotUpdates};

/// Current value of every slot seen since the last reset, keyed by name.
pub type SlotState<V> = BTreeMap<String, V>;

/// Shared contract for all trackers.
///
/// `V` is the slot value type. Values are compared only for equality, so any
/// `PartialEq` type works; the crate defaults to [`serde_json::Value`].
pub trait Tracker<V> {
    /// Filter `updates` against the known slots, append the accepted ones to
    /// the history and recompute the feature vector.
    fn apply_updates(&mut self, updates: SlotUpdates<V>);

    /// Last-write-wins view of the history.
    fn get_state(&self) -> SlotState<V>;

    /// Clear the history and zero the feature vector.
    fn reset_state(&mut self);

    /// Feature vector computed by the most recent update or reset.
    fn get_features(&self) -> &FeatureVector;

    /// Number of known slots.
    fn state_size(&self) -> usize;

    /// Length of the vector returned by [`get_features`](Self::get_features).
    fn num_features(&self) -> usize;

    /// Chaining form of [`apply_updates`](Self::apply_updates).
    ///
    /// Accepts anything convertible into [`SlotUpdates`]: a `Vec` or array of
    /// `(name, value)` pairs, a `HashMap` or a `BTreeMap`.
    fn update_state<U>(&mut self, updates: U) -> &mut Self
    where
        U: Into<SlotUpdates<V>>,
        Self: Sized,
    {
        self.apply_updates(updates.into());
        self
    }
}

/// Collapse a history into its last-write-wins state.
pub(crate) fn derive_state<V: Clone>(history: &[(String, V)]) -> SlotState<V> {
    let mut lasts = SlotState::new();
    for (slot, value) in history {
        lasts.insert(slot.clone(), value.clone());
    }
    lasts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_state_keeps_rightmost_value_per_name() {
        let history = vec![
            ("a".to_string(), 1),
            ("b".to_string(), 2),
            ("a".to_string(), 3),
        ];
        let state = derive_state(&history);
        assert_eq!(state.len(), 2);
        assert_eq!(state["a"], 3);
        assert_eq!(state["b"], 2);
    }

    #[test]
    fn derive_state_of_empty_history_is_empty() {
        let history: Vec<(String, i32)> = Vec::new();
        assert!(derive_state(&history).is_empty());
    }
}
