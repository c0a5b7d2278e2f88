//! Slot update batches and the known-slot filter.

use std::collections::{BTreeMap, HashMap, HashSet};

/// One turn's worth of slot updates.
///
/// Updates arrive either as an ordered list of pairs or as a name-to-value
/// mapping. Mappings are held in a `BTreeMap`, so they iterate in name order
/// and a given mapping always produces the same sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotUpdates<V> {
    Sequence(Vec<(String, V)>),
    Mapping(BTreeMap<String, V>),
}

impl<V> SlotUpdates<V> {
    /// Normalize into an ordered sequence of pairs.
    pub fn into_pairs(self) -> Vec<(String, V)> {
        match self {
            Self::Sequence(pairs) => pairs,
            Self::Mapping(map) => map.into_iter().collect(),
        }
    }
}

impl<K: Into<String>, V> From<Vec<(K, V)>> for SlotUpdates<V> {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::Sequence(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, V, const N: usize> From<[(K, V); N]> for SlotUpdates<V> {
    fn from(pairs: [(K, V); N]) -> Self {
        Self::Sequence(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, V> From<BTreeMap<K, V>> for SlotUpdates<V> {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::Mapping(map.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, V, S> From<HashMap<K, V, S>> for SlotUpdates<V> {
    fn from(map: HashMap<K, V, S>) -> Self {
        Self::Mapping(map.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Result of running a batch through a [`SlotFilter`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredUpdates<V> {
    /// Updates for known slots, in presentation order.
    pub accepted: Vec<(String, V)>,
    /// Number of updates discarded because their slot is unknown.
    pub dropped: usize,
}

/// Ordered set of slot names a tracker recognizes.
///
/// The order fixes the position of each slot in the feature vector.
#[derive(Debug, Clone)]
pub struct SlotFilter {
    names: Vec<String>,
    known: HashSet<String>,
}

impl SlotFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let known = names.iter().cloned().collect();
        Self { names, known }
    }

    /// Known slot names in feature order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.known.contains(name)
    }

    /// Keep only the updates whose slot is known. Never fails.
    pub fn filter<V>(&self, updates: SlotUpdates<V>) -> FilteredUpdates<V> {
        let pairs = updates.into_pairs();
        let total = pairs.len();
        let accepted: Vec<(String, V)> = pairs
            .into_iter()
            .filter(|(slot, _)| self.contains(slot))
            .collect();
        FilteredUpdates {
            dropped: total - accepted.len(),
            accepted,
        }
    }
}
