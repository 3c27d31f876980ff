//! Read-side admin views and the manual mirror resync.

use serde::Serialize;
use tracing::{info, warn};

use crate::common::DomainResult;
use crate::domains::analytics::models::EventTypeCount;
use crate::domains::applications::models::JobApplication;
use crate::domains::contacts::models::ContactMessage;
use crate::domains::sync::MirrorCollection;
use crate::domains::waitlist::models::WaitlistEntry;
use crate::kernel::stores::{
    AnalyticsStore, ApplicationStore, ContactStore, ReadOrder, UserStore, WaitlistStore,
};
use crate::kernel::ServerDeps;

/// Admin list endpoints return at most this many records.
pub const ADMIN_LIST_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_waitlist: i64,
    pub total_contacts: i64,
    pub total_applications: i64,
    pub total_users: i64,
    pub total_analytics_events: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total: i64,
    pub by_type: Vec<EventTypeCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionSyncResult {
    pub collection: MirrorCollection,
    pub synced: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResyncReport {
    pub success: bool,
    pub results: Vec<CollectionSyncResult>,
}

pub async fn stats(deps: &ServerDeps) -> DomainResult<AdminStats> {
    let store = &deps.store;
    Ok(AdminStats {
        total_waitlist: store.count_waitlist_entries().await?,
        total_contacts: store.count_contact_messages().await?,
        total_applications: store.count_job_applications().await?,
        total_users: store.count_users().await?,
        total_analytics_events: store.count_analytics_events().await?,
    })
}

pub async fn list_waitlist(deps: &ServerDeps) -> DomainResult<Vec<WaitlistEntry>> {
    Ok(deps
        .store
        .list_waitlist_entries(ReadOrder::CreatedDesc, ADMIN_LIST_LIMIT)
        .await?)
}

pub async fn list_contacts(deps: &ServerDeps) -> DomainResult<Vec<ContactMessage>> {
    Ok(deps
        .store
        .list_contact_messages(ReadOrder::CreatedDesc, ADMIN_LIST_LIMIT)
        .await?)
}

pub async fn list_applications(deps: &ServerDeps) -> DomainResult<Vec<JobApplication>> {
    Ok(deps
        .store
        .list_job_applications(ReadOrder::CreatedDesc, ADMIN_LIST_LIMIT)
        .await?)
}

pub async fn analytics_summary(deps: &ServerDeps) -> DomainResult<AnalyticsSummary> {
    Ok(AnalyticsSummary {
        total: deps.store.count_analytics_events().await?,
        by_type: deps.store.count_events_by_type().await?,
    })
}

/// Mirror every collection now, on the caller's task.
///
/// Runs even when the background queue is disabled.
pub async fn resync(deps: &ServerDeps) -> ResyncReport {
    let results: Vec<CollectionSyncResult> = deps
        .mirror
        .sync_each()
        .await
        .into_iter()
        .map(|(collection, synced)| CollectionSyncResult { collection, synced })
        .collect();
    let success = results.iter().all(|r| r.synced);
    if success {
        info!("manual resync complete");
    } else {
        warn!(
            failed = results.iter().filter(|r| !r.synced).count(),
            "manual resync incomplete"
        );
    }
    ResyncReport { success, results }
}
