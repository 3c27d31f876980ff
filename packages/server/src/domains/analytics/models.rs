use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::AnalyticsEventId;

/// A client-side interaction event. `timestamp` is whatever the client sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: AnalyticsEventId,
    pub event_type: String,
    pub page: String,
    pub session_id: String,
    pub timestamp: String,
    pub user_agent: String,
    pub location: String,
    pub element: Option<String>,
    pub value: Option<String>,
    pub referrer: Option<String>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnalyticsEvent {
    pub event_type: String,
    pub page: String,
    pub session_id: String,
    pub timestamp: String,
    pub user_agent: String,
    pub location: String,
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
}

impl NewAnalyticsEvent {
    pub fn into_event(self) -> AnalyticsEvent {
        AnalyticsEvent {
            id: AnalyticsEventId::new(),
            event_type: self.event_type,
            page: self.page,
            session_id: self.session_id,
            timestamp: self.timestamp,
            user_agent: self.user_agent,
            location: self.location,
            element: self.element,
            value: self.value,
            referrer: self.referrer,
            received_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeCount {
    pub event_type: String,
    pub count: i64,
}
