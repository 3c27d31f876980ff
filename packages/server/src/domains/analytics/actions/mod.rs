//! Analytics capture

use serde::Serialize;
use tracing::{debug, warn};

use crate::common::{AnalyticsEventId, DomainResult};
use crate::domains::analytics::models::NewAnalyticsEvent;
use crate::kernel::stores::{AnalyticsStore, StoreError};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TrackOutcome {
    Recorded { event_id: AnalyticsEventId },
    /// Store unavailable; tracking is optional so the request still succeeds
    Skipped,
}

pub async fn track_event(event: NewAnalyticsEvent, deps: &ServerDeps) -> DomainResult<TrackOutcome> {
    match deps.store.insert_analytics_event(event).await {
        Ok(event) => {
            debug!(event_id = %event.id, event_type = %event.event_type, "analytics event recorded");
            Ok(TrackOutcome::Recorded { event_id: event.id })
        }
        Err(StoreError::Unavailable(e)) => {
            warn!(error = %e, "analytics tracking skipped");
            Ok(TrackOutcome::Skipped)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::TestDependencies;

    fn event() -> NewAnalyticsEvent {
        NewAnalyticsEvent {
            event_type: "page_view".into(),
            page: "/".into(),
            session_id: "s-1".into(),
            timestamp: "2025-01-01T00:00:00Z".into(),
            user_agent: "test".into(),
            location: "home".into(),
            element: None,
            value: None,
            referrer: None,
        }
    }

    #[tokio::test]
    async fn test_records_event() {
        let test = TestDependencies::new();
        let outcome = track_event(event(), &test.server_deps()).await.unwrap();
        assert!(matches!(outcome, TrackOutcome::Recorded { .. }));
        assert_eq!(test.store.count_analytics_events().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_skips_instead_of_failing() {
        let test = TestDependencies::new();
        test.store.set_unavailable(true);
        let outcome = track_event(event(), &test.server_deps()).await.unwrap();
        assert_eq!(outcome, TrackOutcome::Skipped);
    }
}
