//! Test-only observer that captures all events into a shared vector.

use std::sync::{Arc, Mutex};

use crate::observability::traits::{Observer, ObserverEvent, ObserverMetric};

/// Observer that records all events for test assertions.
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ObserverEvent>>>,
    metrics: Arc<Mutex<Vec<ObserverMetric>>>,
}

impl RecordingObserver {
    /// Create a new recording observer and return handles to the captured data.
    #[allow(clippy::type_complexity)]
    pub fn new() -> (
        Self,
        Arc<Mutex<Vec<ObserverEvent>>>,
        Arc<Mutex<Vec<ObserverMetric>>>,
    ) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let metrics = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: Arc::clone(&events),
                metrics: Arc::clone(&metrics),
            },
            events,
            metrics,
        )
    }
}

impl Observer for RecordingObserver {
    fn record_event(&self, event: &ObserverEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn record_metric(&self, metric: &ObserverMetric) {
        self.metrics.lock().unwrap().push(metric.clone());
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_events() {
        let (obs, events, _) = RecordingObserver::new();

        obs.record_event(&ObserverEvent::SessionCreated {
            session_id: "u1".into(),
        });
        obs.record_event(&ObserverEvent::RegistryCleared { sessions: 1 });

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 2);
        assert!(matches!(captured[0], ObserverEvent::SessionCreated { .. }));
        assert!(matches!(captured[1], ObserverEvent::RegistryCleared { .. }));
    }

    #[test]
    fn captures_metrics() {
        let (obs, _, metrics) = RecordingObserver::new();
        obs.record_metric(&ObserverMetric::ActiveSessions(2));
        assert_eq!(
            *metrics.lock().unwrap(),
            vec![ObserverMetric::ActiveSessions(2)]
        );
    }
}
