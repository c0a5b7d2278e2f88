//! Tracing-based observer that emits structured log events.
//!
//! Uses the existing `tracing` infrastructure so events appear alongside
//! normal application logs.

use crate::observability::traits::{Observer, ObserverEvent, ObserverMetric};

/// Observer that logs events and metrics via `tracing`.
pub struct LogObserver;

impl Observer for LogObserver {
    fn record_event(&self, event: &ObserverEvent) {
        match event {
            ObserverEvent::SessionCreated { session_id } => {
                tracing::info!(session_id, "observer: session.created");
            }
            ObserverEvent::SessionReplaced { session_id } => {
                tracing::warn!(session_id, "observer: session.replaced");
            }
            ObserverEvent::SessionReused { session_id } => {
                tracing::debug!(session_id, "observer: session.reused");
            }
            ObserverEvent::SessionRemoved { session_id } => {
                tracing::info!(session_id, "observer: session.removed");
            }
            ObserverEvent::RegistryCleared { sessions } => {
                tracing::info!(sessions, "observer: registry.cleared");
            }
        }
    }

    fn record_metric(&self, metric: &ObserverMetric) {
        match metric {
            ObserverMetric::ActiveSessions(count) => {
                tracing::debug!(active_sessions = count, "observer: metric.sessions");
            }
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn name_is_log() {
        assert_eq!(LogObserver.name(), "log");
    }

    #[test]
    #[traced_test]
    fn replacement_is_logged_as_warning() {
        LogObserver.record_event(&ObserverEvent::SessionReplaced {
            session_id: "u42".into(),
        });
        assert!(logs_contain("observer: session.replaced"));
        assert!(logs_contain("u42"));
    }

    #[test]
    #[traced_test]
    fn all_events_and_metrics_log_without_panic() {
        let obs = LogObserver;
        obs.record_event(&ObserverEvent::SessionCreated {
            session_id: "a".into(),
        });
        obs.record_event(&ObserverEvent::SessionReused {
            session_id: "a".into(),
        });
        obs.record_event(&ObserverEvent::SessionRemoved {
            session_id: "a".into(),
        });
        obs.record_event(&ObserverEvent::RegistryCleared { sessions: 0 });
        obs.record_metric(&ObserverMetric::ActiveSessions(0));
        obs.flush();
        assert!(logs_contain("observer: registry.cleared"));
    }
}
