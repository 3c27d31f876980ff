//! Join action: the waitlist ledger's only write path.

use tracing::info;

use crate::common::validation::{require_email, require_non_empty};
use crate::common::{DomainError, DomainResult};
use crate::domains::sync::MirrorCollection;
use crate::domains::waitlist::models::{JoinReceipt, NewWaitlistEntry};
use crate::kernel::stores::{StoreError, WaitlistStore};
use crate::kernel::ServerDeps;

const ALREADY_JOINED: &str = "Email already on waitlist";

/// Append `email` to the waitlist at the next position.
///
/// Emails match exactly, so `A@x.com` and `a@x.com` are different entries.
/// A waitlist sync is queued on success; the caller never waits for it.
pub async fn join_waitlist(
    email: String,
    name: String,
    interests: Vec<String>,
    deps: &ServerDeps,
) -> DomainResult<JoinReceipt> {
    require_email(&email)?;
    require_non_empty("name", &name)?;

    if deps.store.find_waitlist_entry(&email).await?.is_some() {
        return Err(DomainError::Conflict(ALREADY_JOINED.to_string()));
    }

    let entry = match deps
        .store
        .append_waitlist_entry(NewWaitlistEntry {
            email,
            name,
            interests,
        })
        .await
    {
        Ok(entry) => entry,
        Err(StoreError::DuplicateKey { .. }) => {
            return Err(DomainError::Conflict(ALREADY_JOINED.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    info!(entry_id = %entry.id, position = entry.position, "joined waitlist");
    deps.sync_queue.enqueue(MirrorCollection::Waitlist);

    Ok(JoinReceipt {
        position: entry.position,
        id: entry.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::kernel::TestDependencies;

    async fn join(email: &str, deps: &ServerDeps) -> DomainResult<JoinReceipt> {
        join_waitlist(email.to_string(), "Tester".to_string(), vec![], deps).await
    }

    #[tokio::test]
    async fn test_distinct_emails_get_consecutive_positions() {
        let test = TestDependencies::new();
        let deps = test.server_deps();

        assert_eq!(join("a@x.com", &deps).await.unwrap().position, 1);
        assert_eq!(join("b@x.com", &deps).await.unwrap().position, 2);
        assert_eq!(join("c@x.com", &deps).await.unwrap().position, 3);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_and_leaves_ledger_unchanged() {
        let test = TestDependencies::new();
        let deps = test.server_deps();

        join("a@x.com", &deps).await.unwrap();
        let err = join("a@x.com", &deps).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(test.store.count_waitlist_entries().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_store_duplicate_key_maps_to_conflict() {
        let test = TestDependencies::new();
        let deps = test.server_deps();

        join("a@x.com", &deps).await.unwrap();
        test.store.set_blind_lookups(true);

        let err = join("a@x.com", &deps).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref msg) if msg == ALREADY_JOINED));
        assert_eq!(test.store.count_waitlist_entries().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_with_same_email_admit_one() {
        let test = TestDependencies::new();
        let deps = Arc::new(test.server_deps());

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let deps = deps.clone();
                tokio::spawn(async move { join("race@x.com", &deps).await })
            })
            .collect();

        let mut joined = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(receipt) => {
                    assert_eq!(receipt.position, 1);
                    joined += 1;
                }
                Err(err) => assert!(matches!(err, DomainError::Conflict(_))),
            }
        }
        assert_eq!(joined, 1);
        assert_eq!(test.store.count_waitlist_entries().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_get_gapless_positions() {
        let test = TestDependencies::new();
        let deps = Arc::new(test.server_deps());

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let deps = deps.clone();
                tokio::spawn(async move { join(&format!("user{}@x.com", i), &deps).await })
            })
            .collect();

        let mut positions = Vec::new();
        for task in tasks {
            positions.push(task.await.unwrap().unwrap().position);
        }
        positions.sort();
        assert_eq!(positions, (1..=20).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_positions_never_change() {
        let test = TestDependencies::new();
        let deps = test.server_deps();

        let first = join("a@x.com", &deps).await.unwrap();
        join("b@x.com", &deps).await.unwrap();
        let _ = join("a@x.com", &deps).await;

        let stored = test
            .store
            .find_waitlist_entry("a@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.position, first.position);
        assert_eq!(stored.id, first.id);
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_persisting() {
        let test = TestDependencies::new();
        let deps = test.server_deps();

        let err = join("not-an-email", &deps).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = join_waitlist("a@x.com".into(), "  ".into(), vec![], &deps)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(test.store.count_waitlist_entries().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_store_surfaces_as_unavailable() {
        let test = TestDependencies::new();
        test.store.set_unavailable(true);
        let deps = test.server_deps();

        let err = join("a@x.com", &deps).await.unwrap_err();
        assert!(matches!(err, DomainError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_join_succeeds_even_when_mirror_is_down() {
        let test = TestDependencies::new();
        test.sheets.set_fail_auth(true);
        let (deps, handle) = test.server_deps_with_sync(Default::default());

        assert_eq!(join("a@x.com", &deps).await.unwrap().position, 1);
        handle.close().await;
    }
}
