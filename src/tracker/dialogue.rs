//! Session-scoped wrapper that carries policy continuity across turns.

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::tracker::{FeatureVector, SlotState, SlotUpdates, Tracker};

/// Recurrent state pair the policy network carries between turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkState {
    pub cell: Vec<f32>,
    pub hidden: Vec<f32>,
}

impl NetworkState {
    pub fn zeros(hidden_size: usize) -> Self {
        Self {
            cell: vec![0.0; hidden_size],
            hidden: vec![0.0; hidden_size],
        }
    }

    pub fn is_zero(&self) -> bool {
        self.cell.iter().chain(&self.hidden).all(|v| *v == 0.0)
    }
}

/// Dialogue tracker for one session.
///
/// Slot tracking and features are delegated unchanged to the wrapped
/// tracker. On top of that the wrapper owns the data the policy loop reads
/// and writes between turns: the previous action, the recurrent network
/// state, and the latest database results. None of these are folded into
/// [`get_features`](Tracker::get_features).
pub struct DialogueStateTracker<V = serde_json::Value> {
    inner: Box<dyn Tracker<V> + Send>,
    n_actions: usize,
    hidden_size: usize,
    prev_action: Vec<f32>,
    network_state: NetworkState,
    db_result: Option<serde_json::Value>,
    current_db_result: Option<serde_json::Value>,
}

impl<V> DialogueStateTracker<V> {
    pub fn new<T>(tracker: T, n_actions: usize, hidden_size: usize) -> Self
    where
        T: Tracker<V> + Send + 'static,
    {
        Self::from_boxed(Box::new(tracker), n_actions, hidden_size)
    }

    pub fn from_boxed(
        tracker: Box<dyn Tracker<V> + Send>,
        n_actions: usize,
        hidden_size: usize,
    ) -> Self {
        Self {
            inner: tracker,
            n_actions,
            hidden_size,
            prev_action: vec![0.0; n_actions],
            network_state: NetworkState::zeros(hidden_size),
            db_result: None,
            current_db_result: None,
        }
    }

    pub fn inner(&self) -> &dyn Tracker<V> {
        self.inner.as_ref()
    }

    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn prev_action(&self) -> &[f32] {
        &self.prev_action
    }

    /// Store the action vector the policy emitted this turn.
    pub fn set_prev_action(&mut self, action: Vec<f32>) -> Result<(), TrackerError> {
        if action.len() != self.n_actions {
            return Err(TrackerError::DimensionMismatch {
                field: "prev_action",
                expected: self.n_actions,
                actual: action.len(),
            });
        }
        self.prev_action = action;
        Ok(())
    }

    /// Store the chosen action as a one-hot vector.
    pub fn set_prev_action_index(&mut self, index: usize) -> Result<(), TrackerError> {
        if index >= self.n_actions {
            return Err(TrackerError::ActionOutOfRange {
                index,
                n_actions: self.n_actions,
            });
        }
        self.prev_action.fill(0.0);
        self.prev_action[index] = 1.0;
        Ok(())
    }

    pub fn network_state(&self) -> &NetworkState {
        &self.network_state
    }

    pub fn set_network_state(&mut self, state: NetworkState) -> Result<(), TrackerError> {
        for (field, len) in [
            ("network_state.cell", state.cell.len()),
            ("network_state.hidden", state.hidden.len()),
        ] {
            if len != self.hidden_size {
                return Err(TrackerError::DimensionMismatch {
                    field,
                    expected: self.hidden_size,
                    actual: len,
                });
            }
        }
        self.network_state = state;
        Ok(())
    }

    pub fn db_result(&self) -> Option<&serde_json::Value> {
        self.db_result.as_ref()
    }

    pub fn set_db_result(&mut self, result: Option<serde_json::Value>) {
        self.db_result = result;
    }

    pub fn current_db_result(&self) -> Option<&serde_json::Value> {
        self.current_db_result.as_ref()
    }

    pub fn set_current_db_result(&mut self, result: Option<serde_json::Value>) {
        self.current_db_result = result;
    }
}

impl<V> Tracker<V> for DialogueStateTracker<V> {
    fn apply_updates(&mut self, updates: SlotUpdates<V>) {
        self.inner.apply_updates(updates);
    }

    fn get_state(&self) -> SlotState<V> {
        self.inner.get_state()
    }

    fn reset_state(&mut self) {
        self.inner.reset_state();
        self.db_result = None;
        self.current_db_result = None;
        self.prev_action = vec![0.0; self.n_actions];
        self.network_state = NetworkState::zeros(self.hidden_size);
    }

    fn get_features(&self) -> &FeatureVector {
        self.inner.get_features()
    }

    fn state_size(&self) -> usize {
        self.inner.state_size()
    }

    fn num_features(&self) -> usize {
        self.inner.num_features()
    }
}

impl<V> std::fmt::Debug for DialogueStateTracker<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueStateTracker")
            .field("state_size", &self.inner.state_size())
            .field("num_features", &self.inner.num_features())
            .field("n_actions", &self.n_actions)
            .field("hidden_size", &self.hidden_size)
            .field("db_result", &self.db_result)
            .field("current_db_result", &self.current_db_result)
            .finish_non_exhaustive()
    }
}
