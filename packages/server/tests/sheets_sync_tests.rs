//! Ledger writes flowing through the sync worker into the mock spreadsheet.

mod common;

use std::time::Duration;

use crate::common::TestHarness;
use api_core::domains::sync::{MirrorCollection, SyncQueueConfig};
use api_core::kernel::test_dependencies::{wait_until, TEST_SPREADSHEET_ID};
use api_core::kernel::SheetsCall;
use serde_json::json;

const WAITLIST_RANGE: &str = "Waitlist!A2:F1000";

fn fast_retries() -> SyncQueueConfig {
    SyncQueueConfig {
        retry_delay: Duration::from_millis(10),
        ..SyncQueueConfig::default()
    }
}

#[tokio::test]
async fn waitlist_scenario_mirrors_two_rows() {
    let harness = TestHarness::with_sync(fast_retries());
    let client = &harness.client;

    assert_eq!(
        client
            .post("/api/waitlist", json!({ "email": "a@x.com", "name": "A" }))
            .await
            .body["position"],
        1
    );
    assert_eq!(
        client
            .post("/api/waitlist", json!({ "email": "b@x.com", "name": "B" }))
            .await
            .body["position"],
        2
    );
    assert_eq!(
        client
            .post("/api/waitlist", json!({ "email": "a@x.com", "name": "A" }))
            .await
            .status,
        409
    );

    // The worker may coalesce the two joins; wait for a write holding both rows.
    let sheets = harness.deps.sheets.clone();
    assert!(
        wait_until(|| sheets
            .writes_to(WAITLIST_RANGE)
            .last()
            .is_some_and(|rows| rows.len() == 2))
        .await
    );

    let rows = sheets.writes_to(WAITLIST_RANGE).pop().unwrap();
    let mut emails: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    emails.sort();
    assert_eq!(emails, vec!["a@x.com", "b@x.com"]);
    for row in &rows {
        assert_eq!(row.len(), 6);
        assert_eq!(row[5], "active");
    }

    harness.shutdown().await;
}

#[tokio::test]
async fn join_succeeds_while_spreadsheet_is_down() {
    let harness = TestHarness::with_sync(fast_retries());
    harness.deps.sheets.set_fail_auth(true);

    let response = harness
        .client
        .post("/api/waitlist", json!({ "email": "a@x.com", "name": "A" }))
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body["position"], 1);

    let dead_letters = harness.deps.dead_letters.clone();
    assert!(wait_until(|| !dead_letters.letters().is_empty()).await);
    let letter = &dead_letters.letters()[0];
    assert_eq!(letter.collection, MirrorCollection::Waitlist);
    assert_eq!(letter.attempts, 3);

    harness.shutdown().await;
}

#[tokio::test]
async fn manual_resync_reports_per_collection() {
    let harness = TestHarness::new();
    harness
        .client
        .post("/api/waitlist", json!({ "email": "a@x.com", "name": "A" }))
        .await;
    let token = harness.admin_token().await;

    let response = harness
        .client
        .post_authed("/api/admin/sync-sheets", json!({}), &token)
        .await;
    assert_eq!(response.status, 200, "{}", response.body);
    assert_eq!(response.body["data"]["success"], true);
    assert_eq!(response.body["data"]["results"].as_array().unwrap().len(), 3);

    let writes = harness.deps.sheets.calls();
    assert!(writes.iter().any(|call| matches!(
        call,
        SheetsCall::Write { spreadsheet_id, range, .. }
            if spreadsheet_id == TEST_SPREADSHEET_ID && range == WAITLIST_RANGE
    )));

    harness.deps.sheets.set_fail_auth(true);
    let failed = harness
        .client
        .post_authed("/api/admin/sync-sheets", json!({}), &token)
        .await;
    assert_eq!(failed.status, 500);
    assert_eq!(failed.body["data"]["success"], false);
}
