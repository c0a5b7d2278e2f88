//! Core observer trait and event/metric types.

/// Observer for tracker registry lifecycle events and metrics.
///
/// Implementations can log to tracing or do nothing at all. The registry
/// records events at session lifecycle points and the observer decides what
/// to do with them.
///
/// Thread-safe and cheaply cloneable behind `Arc<dyn Observer>`.
pub trait Observer: Send + Sync {
    /// Record a discrete lifecycle event.
    fn record_event(&self, event: &ObserverEvent);

    /// Record a numeric metric sample.
    fn record_metric(&self, metric: &ObserverMetric);

    /// Flush any buffered data. No-op by default.
    fn flush(&self) {}

    /// Human-readable backend name (e.g. "noop", "log").
    fn name(&self) -> &str;
}

/// Discrete session lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverEvent {
    /// A tracker was built for a session id that had none.
    SessionCreated { session_id: String },

    /// `create_session` replaced the tracker of an existing session.
    SessionReplaced { session_id: String },

    /// `get_or_create` found an existing tracker and returned it.
    SessionReused { session_id: String },

    /// A session was evicted by its owner.
    SessionRemoved { session_id: String },

    /// All sessions were dropped at shutdown.
    RegistryCleared { sessions: usize },
}

/// Numeric metric samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverMetric {
    /// Current number of live sessions (gauge).
    ActiveSessions(u64),
}

#[cfg(test)]
mod tests {
    use crate::observability::traits::*;

    #[test]
    fn event_variants_are_constructible() {
        let _ = ObserverEvent::SessionCreated {
            session_id: "u1".into(),
        };
        let _ = ObserverEvent::SessionReplaced {
            session_id: "u1".into(),
        };
        let _ = ObserverEvent::SessionReused {
            session_id: "u1".into(),
        };
        let _ = ObserverEvent::SessionRemoved {
            session_id: "u1".into(),
        };
        let _ = ObserverEvent::RegistryCleared { sessions: 3 };
    }

    #[test]
    fn metric_variants_are_constructible() {
        let _ = ObserverMetric::ActiveSessions(7);
    }
}
