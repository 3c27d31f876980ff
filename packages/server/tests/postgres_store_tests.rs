//! PostgresStore against a real database (testcontainers).
//!
//! Tests return early when no container runtime is available.

mod common;

use api_core::common::ContactMessageId;
use api_core::domains::auth::models::NewUser;
use api_core::domains::contacts::models::NewContactMessage;
use api_core::domains::contacts::ContactStatus;
use api_core::domains::waitlist::models::NewWaitlistEntry;
use api_core::domains::waitlist::WaitlistStatus;
use api_core::kernel::stores::{
    ContactStore, ReadOrder, StoreError, StoreHealth, UserStore, WaitlistStore,
};

use crate::common::PostgresHarness;

fn entry(email: &str) -> NewWaitlistEntry {
    NewWaitlistEntry {
        email: email.to_string(),
        name: "Tester".to_string(),
        interests: vec!["stocks".to_string(), "crypto".to_string()],
    }
}

#[tokio::test]
async fn append_round_trips_interests_and_status() {
    let Some(pg) = PostgresHarness::new().await else {
        return;
    };

    let appended = pg.store.append_waitlist_entry(entry("a@x.com")).await.unwrap();
    assert_eq!(appended.position, 1);

    let stored = pg
        .store
        .find_waitlist_entry("a@x.com")
        .await
        .unwrap()
        .expect("entry persisted");
    assert_eq!(stored.id, appended.id);
    assert_eq!(stored.interests, vec!["stocks", "crypto"]);
    assert_eq!(stored.status, WaitlistStatus::Active);
    assert_eq!(stored.referrals, 0);

    // Exact match only
    assert!(pg.store.find_waitlist_entry("A@x.com").await.unwrap().is_none());
    assert_eq!(pg.store.backend(), "postgres");
    pg.store.ping().await.unwrap();
}

#[tokio::test]
async fn concurrent_appends_get_gapless_positions() {
    let Some(pg) = PostgresHarness::new().await else {
        return;
    };

    let tasks: Vec<_> = (0..25)
        .map(|i| {
            let store = pg.store.clone();
            tokio::spawn(async move {
                store
                    .append_waitlist_entry(entry(&format!("user{}@x.com", i)))
                    .await
            })
        })
        .collect();

    let mut positions = Vec::new();
    for task in tasks {
        positions.push(task.await.unwrap().unwrap().position);
    }
    positions.sort();
    assert_eq!(positions, (1..=25).collect::<Vec<i64>>());
    assert_eq!(pg.store.count_waitlist_entries().await.unwrap(), 25);
}

#[tokio::test]
async fn duplicate_email_maps_to_duplicate_key() {
    let Some(pg) = PostgresHarness::new().await else {
        return;
    };

    pg.store.append_waitlist_entry(entry("a@x.com")).await.unwrap();
    let err = pg
        .store
        .append_waitlist_entry(entry("a@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { field: "email" }));

    // The rejected append leaves no gap behind it
    let next = pg.store.append_waitlist_entry(entry("b@x.com")).await.unwrap();
    assert_eq!(next.position, 2);
}

#[tokio::test]
async fn concurrent_duplicate_appends_admit_one() {
    let Some(pg) = PostgresHarness::new().await else {
        return;
    };

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let store = pg.store.clone();
            tokio::spawn(async move { store.append_waitlist_entry(entry("race@x.com")).await })
        })
        .collect();

    let mut appended = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(entry) => {
                assert_eq!(entry.position, 1);
                appended += 1;
            }
            Err(err) => assert!(matches!(err, StoreError::DuplicateKey { field: "email" })),
        }
    }
    assert_eq!(appended, 1);
    assert_eq!(pg.store.count_waitlist_entries().await.unwrap(), 1);
}

#[tokio::test]
async fn list_honours_read_order_and_limit() {
    let Some(pg) = PostgresHarness::new().await else {
        return;
    };

    for email in ["a@x.com", "b@x.com", "c@x.com"] {
        pg.store.append_waitlist_entry(entry(email)).await.unwrap();
    }

    let emails = |entries: Vec<api_core::domains::waitlist::WaitlistEntry>| {
        entries.into_iter().map(|e| e.email).collect::<Vec<_>>()
    };

    let asc = pg
        .store
        .list_waitlist_entries(ReadOrder::CreatedAsc, 1000)
        .await
        .unwrap();
    assert_eq!(emails(asc), vec!["a@x.com", "b@x.com", "c@x.com"]);

    let desc = pg
        .store
        .list_waitlist_entries(ReadOrder::CreatedDesc, 2)
        .await
        .unwrap();
    assert_eq!(emails(desc), vec!["c@x.com", "b@x.com"]);

    let natural = pg
        .store
        .list_waitlist_entries(ReadOrder::Natural, 1000)
        .await
        .unwrap();
    assert_eq!(natural.len(), 3);
}

#[tokio::test]
async fn contact_status_updates_decode() {
    let Some(pg) = PostgresHarness::new().await else {
        return;
    };

    let message = pg
        .store
        .insert_contact_message(NewContactMessage {
            name: "Sam".to_string(),
            email: "sam@x.com".to_string(),
            message: "Hello".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(message.status, ContactStatus::New);

    let updated = pg
        .store
        .set_contact_status(message.id, ContactStatus::Replied)
        .await
        .unwrap();
    assert_eq!(updated.status, ContactStatus::Replied);

    let listed = pg
        .store
        .list_contact_messages(ReadOrder::CreatedDesc, 10)
        .await
        .unwrap();
    assert_eq!(listed[0].status, ContactStatus::Replied);

    let err = pg
        .store
        .set_contact_status(ContactMessageId::new(), ContactStatus::Read)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_user_email_maps_to_duplicate_key() {
    let Some(pg) = PostgresHarness::new().await else {
        return;
    };

    let user = || NewUser {
        email: "u@x.com".to_string(),
        name: "User".to_string(),
        password_hash: "hash".to_string(),
    };
    let created = pg.store.insert_user(user()).await.unwrap();
    assert!(created.investment_goals.is_empty());

    let err = pg.store.insert_user(user()).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { field: "email" }));
    assert_eq!(pg.store.count_users().await.unwrap(), 1);
    assert!(pg.store.find_user(created.id).await.unwrap().is_some());
}
