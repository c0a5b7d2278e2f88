//! Per-session tracker registry.
//!
//! The registry maps session ids to their [`DialogueStateTracker`] and is
//! shared by every request handler in a multi-session deployment. It is
//! created once at startup and emptied with [`TrackerRegistry::clear`] at
//! shutdown. Sessions never expire on their own; whoever owns the session
//! lifecycle calls [`TrackerRegistry::remove_session`].
//!
//! Use [`TrackerRegistry::get_or_create`] from request handlers. The
//! lookup and the insertion happen under one write lock, so concurrent
//! first requests for the same id end up sharing one tracker.
//! [`TrackerRegistry::create_session`] always builds a fresh tracker and
//! replaces whatever was stored under the id.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::TrackerConfig;
use crate::observability::{NoopObserver, Observer, ObserverEvent, ObserverMetric};
use crate::tracker::DialogueStateTracker;

/// Builds the tracker for a new session.
///
/// Implemented for [`ConfigTrackerFactory`] and for any
/// `Fn(&TrackerConfig) -> DialogueStateTracker<V>` closure.
pub trait TrackerFactory<V>: Send + Sync {
    fn build(&self, params: &TrackerConfig) -> DialogueStateTracker<V>;
}

impl<V, F> TrackerFactory<V> for F
where
    F: Fn(&TrackerConfig) -> DialogueStateTracker<V> + Send + Sync,
{
    fn build(&self, params: &TrackerConfig) -> DialogueStateTracker<V> {
        self(params)
    }
}

/// Factory that builds whichever tracker kind the parameters name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigTrackerFactory;

impl<V> TrackerFactory<V> for ConfigTrackerFactory
where
    V: PartialEq + Clone + Send + 'static,
{
    fn build(&self, params: &TrackerConfig) -> DialogueStateTracker<V> {
        params.build()
    }
}

/// Shared handle to one session's tracker.
pub struct SessionHandle<V = serde_json::Value> {
    tracker: Arc<Mutex<DialogueStateTracker<V>>>,
}

impl<V> SessionHandle<V> {
    fn new(tracker: DialogueStateTracker<V>) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }

    /// Lock the tracker for this turn, recovering from poison.
    ///
    /// A poisoned lock means a handler panicked mid-turn. The tracker is
    /// still structurally valid, so the session keeps going.
    pub fn lock(&self) -> MutexGuard<'_, DialogueStateTracker<V>> {
        self.tracker.lock().unwrap_or_else(|e| {
            tracing::warn!("session tracker mutex was poisoned, recovering");
            e.into_inner()
        })
    }

    /// Whether both handles point at the same tracker.
    pub fn same_session(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tracker, &other.tracker)
    }
}

impl<V> Clone for SessionHandle<V> {
    fn clone(&self) -> Self {
        Self {
            tracker: Arc::clone(&self.tracker),
        }
    }
}

impl<V> std::fmt::Debug for SessionHandle<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").finish_non_exhaustive()
    }
}

/// Registry of live dialogue sessions.
pub struct TrackerRegistry<V = serde_json::Value> {
    sessions: RwLock<HashMap<String, SessionHandle<V>>>,
    observer: Arc<dyn Observer>,
}

impl<V> TrackerRegistry<V> {
    pub fn new() -> Self {
        Self::with_observer(Arc::new(NoopObserver))
    }

    pub fn with_observer(observer: Arc<dyn Observer>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            observer,
        }
    }

    /// Whether a tracker exists for `session_id`.
    pub fn has_session(&self, session_id: &str) -> bool {
        self.read_sessions().contains_key(session_id)
    }

    /// Build a tracker for `session_id` and store it, replacing any tracker
    /// already registered under that id.
    ///
    /// Callers racing on the same new id can each replace the other's
    /// tracker. Request handlers should use
    /// [`get_or_create`](Self::get_or_create) instead.
    pub fn create_session<F>(
        &self,
        session_id: &str,
        factory: &F,
        params: &TrackerConfig,
    ) -> SessionHandle<V>
    where
        F: TrackerFactory<V> + ?Sized,
    {
        let session_id = session_id.to_string();
        let handle = SessionHandle::new(factory.build(params));

        let (replaced, active) = {
            let mut sessions = self.write_sessions();
            let replaced = sessions.insert(session_id.clone(), handle.clone()).is_some();
            (replaced, sessions.len())
        };

        let event = if replaced {
            ObserverEvent::SessionReplaced { session_id }
        } else {
            ObserverEvent::SessionCreated { session_id }
        };
        self.observer.record_event(&event);
        self.record_active(active);
        handle
    }

    /// Return the tracker for `session_id`, building it first if the session
    /// is new. At most one tracker is ever built per id.
    pub fn get_or_create<F>(
        &self,
        session_id: &str,
        factory: &F,
        params: &TrackerConfig,
    ) -> SessionHandle<V>
    where
        F: TrackerFactory<V> + ?Sized,
    {
        // Observers run with no registry lock held; they may call back in.
        let existing = self.read_sessions().get(session_id).cloned();
        if let Some(handle) = existing {
            self.observer.record_event(&ObserverEvent::SessionReused {
                session_id: session_id.to_string(),
            });
            return handle;
        }

        let (handle, created, active) = {
            let mut sessions = self.write_sessions();
            // Another caller may have inserted between the read and write locks.
            let (handle, created) = match sessions.entry(session_id.to_string()) {
                Entry::Occupied(entry) => (entry.get().clone(), false),
                Entry::Vacant(entry) => {
                    let handle = SessionHandle::new(factory.build(params));
                    (entry.insert(handle).clone(), true)
                }
            };
            (handle, created, sessions.len())
        };

        let session_id = session_id.to_string();
        if created {
            self.observer
                .record_event(&ObserverEvent::SessionCreated { session_id });
            self.record_active(active);
        } else {
            self.observer
                .record_event(&ObserverEvent::SessionReused { session_id });
        }
        handle
    }

    pub fn get_session(&self, session_id: &str) -> Option<SessionHandle<V>> {
        self.read_sessions().get(session_id).cloned()
    }

    /// Drop the session's tracker. Handles already given out stay usable.
    pub fn remove_session(&self, session_id: &str) -> Option<SessionHandle<V>> {
        let (removed, active) = {
            let mut sessions = self.write_sessions();
            (sessions.remove(session_id), sessions.len())
        };
        if removed.is_some() {
            self.observer.record_event(&ObserverEvent::SessionRemoved {
                session_id: session_id.to_string(),
            });
            self.record_active(active);
        }
        removed
    }

    /// Ids of all live sessions, sorted.
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read_sessions().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.read_sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_sessions().is_empty()
    }

    /// Drop every session. Called at shutdown.
    pub fn clear(&self) {
        let sessions = {
            let mut map = self.write_sessions();
            let count = map.len();
            map.clear();
            count
        };
        self.observer
            .record_event(&ObserverEvent::RegistryCleared { sessions });
        self.record_active(0);
        self.observer.flush();
    }

    fn record_active(&self, active: usize) {
        self.observer
            .record_metric(&ObserverMetric::ActiveSessions(active as u64));
    }

    fn read_sessions(&self) -> RwLockReadGuard<'_, HashMap<String, SessionHandle<V>>> {
        self.sessions.read().unwrap_or_else(|e| {
            tracing::warn!("session registry lock was poisoned, recovering");
            e.into_inner()
        })
    }

    fn write_sessions(&self) -> RwLockWriteGuard<'_, HashMap<String, SessionHandle<V>>> {
        self.sessions.write().unwrap_or_else(|e| {
            tracing::warn!("session registry lock was poisoned, recovering");
            e.into_inner()
        })
    }
}

impl<V> Default for TrackerRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}
