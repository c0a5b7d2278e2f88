//! Overwriting tracker with change and novelty features.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::tracker::{DefaultTracker, FeatureVector, SlotState, SlotUpdates, Tracker};

/// Which state the diff and novelty blocks are compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSnapshot {
    /// Reference re-derived from the history after the update is applied.
    ///
    /// The reference then always equals the current state, so the diff and
    /// novelty blocks (and their sums) stay zero. Kept as the default for
    /// parity with policies trained against that feature layout.
    #[default]
    Literal,
    /// Reference captured before the update is applied, so the blocks
    /// report what the latest update changed or introduced.
    #[serde(alias = "pre-update")]
    PreUpdate,
}

impl FromStr for ReferenceSnapshot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "pre_update" | "pre-update" => Ok(Self::PreUpdate),
            other => Err(format!(
                "unknown reference snapshot '{other}', expected 'literal' or 'pre_update'"
            )),
        }
    }
}

impl fmt::Display for ReferenceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal => f.write_str("literal"),
            Self::PreUpdate => f.write_str("pre_update"),
        }
    }
}

/// Tracker that overwrites slots with new values.
///
/// Features are laid out as
/// `[binary(K), diff(K), novelty(K), sum(binary), sum(diff), sum(novelty)]`:
///
/// - **binary**: slot is present in the current state.
/// - **diff**: slot is present in both the current and the reference state
///   with different values.
/// - **novelty**: slot is present now but absent from the reference state.
///
/// See [`ReferenceSnapshot`] for how the reference state is chosen.
#[derive(Debug, Clone)]
pub struct FeaturizedTracker<V = serde_json::Value> {
    base: DefaultTracker<V>,
    reference: ReferenceSnapshot,
    features: FeatureVector,
}

impl<V: PartialEq + Clone> FeaturizedTracker<V> {
    pub fn new<I, S>(slot_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_reference(slot_names, ReferenceSnapshot::default())
    }

    pub fn with_reference<I, S>(slot_names: I, reference: ReferenceSnapshot) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let base = DefaultTracker::new(slot_names);
        let features = FeatureVector::zeros(Self::width(base.state_size()));
        Self {
            base,
            reference,
            features,
        }
    }

    pub fn reference(&self) -> ReferenceSnapshot {
        self.reference
    }

    pub fn slot_names(&self) -> &[String] {
        self.base.slot_names()
    }

    pub fn history(&self) -> &[(String, V)] {
        self.base.history()
    }

    fn width(state_size: usize) -> usize {
        state_size * 3 + 3
    }

    fn diff_features(&self, current: &SlotState<V>, reference: &SlotState<V>) -> FeatureVector {
        FeatureVector::indicators(self.slot_names().iter().map(|slot| {
            match (current.get(slot), reference.get(slot)) {
                (Some(now), Some(before)) => now != before,
                _ => false,
            }
        }))
    }

    fn novelty_features(&self, current: &SlotState<V>, reference: &SlotState<V>) -> FeatureVector {
        FeatureVector::indicators(
            self.slot_names()
                .iter()
                .map(|slot| current.contains_key(slot) && !reference.contains_key(slot)),
        )
    }
}

impl<V: PartialEq + Clone> Tracker<V> for FeaturizedTracker<V> {
    fn apply_updates(&mut self, updates: SlotUpdates<V>) {
        let before = match self.reference {
            ReferenceSnapshot::PreUpdate => Some(self.base.get_state()),
            ReferenceSnapshot::Literal => None,
        };

        self.base.apply_updates(updates);
        let current = self.base.get_state();
        let reference = before.unwrap_or_else(|| self.base.get_state());

        let binary = self.base.binary_features(&current);
        let diff = self.diff_features(&current, &reference);
        let novelty = self.novelty_features(&current, &reference);
        self.features = FeatureVector::with_block_sums(&[&binary, &diff, &novelty]);
    }

    fn get_state(&self) -> SlotState<V> {
        self.base.get_state()
    }

    fn reset_state(&mut self) {
        self.base.reset_state();
        self.features = FeatureVector::zeros(self.num_features());
    }

    fn get_features(&self) -> &FeatureVector {
        &self.features
    }

    fn state_size(&self) -> usize {
        self.base.state_size()
    }

    fn num_features(&self) -> usize {
        Self::width(self.state_size())
    }
}
