//! Overwriting tracker with binary presence features.

use crate::tracker::{FeatureVector, SlotFilter, SlotState, SlotUpdates, Tracker, derive_state};

/// Tracker that overwrites slots with new values.
///
/// Features are binary indicators, one per known slot in configured order:
/// 1.0 if the slot has a value in the current state, 0.0 otherwise.
#[derive(Debug, Clone)]
pub struct DefaultTracker<V = serde_json::Value> {
    filter: SlotFilter,
    history: Vec<(String, V)>,
    features: FeatureVector,
}

impl<V: PartialEq + Clone> DefaultTracker<V> {
    pub fn new<I, S>(slot_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filter = SlotFilter::new(slot_names);
        let features = FeatureVector::zeros(filter.len());
        Self {
            filter,
            history: Vec::new(),
            features,
        }
    }

    /// Known slot names in feature order.
    pub fn slot_names(&self) -> &[String] {
        self.filter.names()
    }

    /// Accepted updates since the last reset, oldest first.
    pub fn history(&self) -> &[(String, V)] {
        &self.history
    }

    pub(crate) fn binary_features(&self, state: &SlotState<V>) -> FeatureVector {
        FeatureVector::indicators(self.filter.names().iter().map(|s| state.contains_key(s)))
    }
}

impl<V: PartialEq + Clone> Tracker<V> for DefaultTracker<V> {
    fn apply_updates(&mut self, updates: SlotUpdates<V>) {
        let filtered = self.filter.filter(updates);
        tracing::debug!(
            accepted = filtered.accepted.len(),
            dropped = filtered.dropped,
            "tracker: slot updates filtered"
        );
        self.history.extend(filtered.accepted);

        let state = self.get_state();
        self.features = self.binary_features(&state);
    }

    fn get_state(&self) -> SlotState<V> {
        derive_state(&self.history)
    }

    fn reset_state(&mut self) {
        self.history.clear();
        self.features = FeatureVector::zeros(self.state_size());
    }

    fn get_features(&self) -> &FeatureVector {
        &self.features
    }

    fn state_size(&self) -> usize {
        self.filter.len()
    }

    fn num_features(&self) -> usize {
        self.state_size()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn state_of(pairs: &[(&str, &'static str)]) -> SlotState<&'static str> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn walkthrough_with_two_slots() {
        let mut tracker: DefaultTracker<&'static str> = DefaultTracker::new(["a", "b"]);
        assert!(tracker.get_state().is_empty());
        assert_eq!(tracker.get_features().as_slice(), &[0.0, 0.0]);

        tracker.update_state([("a", "x")]);
        assert_eq!(tracker.get_state(), state_of(&[("a", "x")]));
        assert_eq!(tracker.get_features().as_slice(), &[1.0, 0.0]);

        let mut map = HashMap::new();
        map.insert("b", "y");
        tracker.update_state(map);
        assert_eq!(tracker.get_state(), state_of(&[("a", "x"), ("b", "y")]));
        assert_eq!(tracker.get_features().as_slice(), &[1.0, 1.0]);

        tracker.update_state([("a", "z")]);
        assert_eq!(tracker.get_state(), state_of(&[("a", "z"), ("b", "y")]));

        tracker.update_state([("c", "w")]);
        assert_eq!(tracker.get_state(), state_of(&[("a", "z"), ("b", "y")]));
        assert_eq!(tracker.get_features().as_slice(), &[1.0, 1.0]);

        tracker.reset_state();
        assert!(tracker.get_state().is_empty());
        assert_eq!(tracker.get_features().as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn num_features_equals_state_size() {
        let mut tracker: DefaultTracker = DefaultTracker::new(["food", "area", "price"]);
        assert_eq!(tracker.state_size(), 3);
        assert_eq!(tracker.num_features(), 3);

        tracker.update_state([("food", json!("thai")), ("area", json!("north"))]);
        assert_eq!(tracker.num_features(), 3);
        assert_eq!(tracker.get_features().len(), 3);
    }

    #[test]
    fn same_name_twice_in_one_batch_keeps_last() {
        let mut tracker: DefaultTracker<i32> = DefaultTracker::new(["a"]);
        tracker.update_state(vec![("a", 1), ("a", 2)]);
        assert_eq!(tracker.get_state()["a"], 2);
        assert_eq!(tracker.history().len(), 2);
    }

    #[test]
    fn unknown_only_batch_leaves_history_untouched() {
        let mut tracker: DefaultTracker<i32> = DefaultTracker::new(["a"]);
        tracker.update_state([("a", 1)]);
        let before = tracker.get_features().clone();

        tracker.update_state([("zzz", 9), ("qqq", 8)]);

        assert_eq!(tracker.history(), &[("a".to_string(), 1)]);
        assert_eq!(tracker.get_features(), &before);
    }

    #[test]
    fn binary_position_follows_configured_order() {
        let mut tracker: DefaultTracker<i32> = DefaultTracker::new(["c", "a", "b"]);
        tracker.update_state([("b", 1)]);
        assert_eq!(tracker.get_features().as_slice(), &[0.0, 0.0, 1.0]);
        tracker.update_state([("c", 1)]);
        assert_eq!(tracker.get_features().as_slice(), &[1.0, 0.0, 1.0]);
    }

    #[test]
    fn get_state_is_repeatable() {
        let mut tracker: DefaultTracker<i32> = DefaultTracker::new(["a", "b"]);
        tracker.update_state([("a", 1), ("b", 2)]);
        assert_eq!(tracker.get_state(), tracker.get_state());
    }

    #[test]
    fn update_state_chains() {
        let mut tracker: DefaultTracker<i32> = DefaultTracker::new(["a", "b"]);
        let features = tracker
            .update_state([("a", 1)])
            .update_state([("b", 2)])
            .get_features()
            .clone();
        assert_eq!(features.as_slice(), &[1.0, 1.0]);
    }
}
