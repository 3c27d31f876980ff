// Test doubles for the infrastructure traits.
//
// `MockSheetsClient` records every successful call and can be told to fail;
// `MemoryDeadLetterSink` keeps dead letters for assertions.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sheets::SheetSpec;

use super::stores::MemoryStore;
use super::{BaseSheetsClient, ServerDeps};
use crate::domains::auth::JwtService;
use crate::domains::sync::{
    DeadLetter, DeadLetterSink, MirrorConfig, MirrorSync, SyncQueue, SyncQueueConfig,
    SyncWorkerHandle,
};

// =============================================================================
// Mock Sheets Client
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SheetsCall {
    Authenticate,
    CreateSpreadsheet {
        title: String,
        sheets: Vec<String>,
    },
    Write {
        spreadsheet_id: String,
        range: String,
        rows: Vec<Vec<String>>,
    },
    Clear {
        spreadsheet_id: String,
        range: String,
    },
}

#[derive(Default)]
pub struct MockSheetsClient {
    calls: Arc<Mutex<Vec<SheetsCall>>>,
    auth_attempts: AtomicUsize,
    fail_auth: AtomicBool,
    fail_create: AtomicBool,
    write_failures: AtomicUsize,
    clear_failures: AtomicUsize,
}

impl MockSheetsClient {
    /// Id returned by `create_spreadsheet`.
    pub const CREATED_ID: &'static str = "mock-spreadsheet";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_auth(&self, fail: bool) {
        self.fail_auth.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    /// Fail the next `n` calls to `write_range`.
    pub fn fail_next_writes(&self, n: usize) {
        self.write_failures.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` calls to `clear_range`.
    pub fn fail_next_clears(&self, n: usize) {
        self.clear_failures.store(n, Ordering::SeqCst);
    }

    /// Successful calls, in order.
    pub fn calls(&self) -> Vec<SheetsCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Authentication attempts, failed ones included.
    pub fn auth_attempts(&self) -> usize {
        self.auth_attempts.load(Ordering::SeqCst)
    }

    /// Rows of every successful write to `range`.
    pub fn writes_to(&self, range: &str) -> Vec<Vec<Vec<String>>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SheetsCall::Write {
                    range: r, rows, ..
                } if r == range => Some(rows),
                _ => None,
            })
            .collect()
    }

    /// Spreadsheet ids of every successful clear of `range`.
    pub fn clears_of(&self, range: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SheetsCall::Clear {
                    spreadsheet_id,
                    range: r,
                } if r == range => Some(spreadsheet_id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: SheetsCall) {
        self.calls.lock().unwrap().push(call);
    }

    // Every real API call carries a bearer token, so revoked credentials fail them too.
    fn check_token(&self) -> Result<()> {
        if self.fail_auth.load(Ordering::SeqCst) {
            return Err(anyhow!("mock: access token rejected"));
        }
        Ok(())
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl BaseSheetsClient for MockSheetsClient {
    async fn authenticate(&self) -> Result<()> {
        self.auth_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_auth.load(Ordering::SeqCst) {
            return Err(anyhow!("mock: invalid credentials"));
        }
        self.record(SheetsCall::Authenticate);
        Ok(())
    }

    async fn create_spreadsheet(&self, title: &str, sheets: &[SheetSpec]) -> Result<String> {
        self.check_token()?;
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(anyhow!("mock: create failed"));
        }
        self.record(SheetsCall::CreateSpreadsheet {
            title: title.to_string(),
            sheets: sheets.iter().map(|s| s.title.clone()).collect(),
        });
        Ok(Self::CREATED_ID.to_string())
    }

    async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<()> {
        self.check_token()?;
        if Self::take_failure(&self.write_failures) {
            return Err(anyhow!("mock: write to {} failed", range));
        }
        self.record(SheetsCall::Write {
            spreadsheet_id: spreadsheet_id.to_string(),
            range: range.to_string(),
            rows,
        });
        Ok(())
    }

    async fn clear_range(&self, spreadsheet_id: &str, range: &str) -> Result<()> {
        self.check_token()?;
        if Self::take_failure(&self.clear_failures) {
            return Err(anyhow!("mock: clear of {} failed", range));
        }
        self.record(SheetsCall::Clear {
            spreadsheet_id: spreadsheet_id.to_string(),
            range: range.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Dead letters
// =============================================================================

#[derive(Default)]
pub struct MemoryDeadLetterSink {
    letters: Mutex<Vec<DeadLetter>>,
}

impl MemoryDeadLetterSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn letters(&self) -> Vec<DeadLetter> {
        self.letters.lock().unwrap().clone()
    }
}

impl DeadLetterSink for MemoryDeadLetterSink {
    fn record(&self, letter: DeadLetter) {
        self.letters.lock().unwrap().push(letter);
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_JWT_ISSUER: &str = "swipr-api-test";
pub const TEST_ADMIN_PASSWORD: &str = "admin-password";
pub const TEST_SPREADSHEET_ID: &str = "test-spreadsheet";

/// In-memory store plus mock spreadsheet, wired the way the server wires them.
pub struct TestDependencies {
    pub store: Arc<MemoryStore>,
    pub sheets: Arc<MockSheetsClient>,
    pub dead_letters: Arc<MemoryDeadLetterSink>,
    pub mirror: Arc<MirrorSync>,
    pub jwt_service: Arc<JwtService>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self::with_mirror_config(MirrorConfig::default())
    }

    pub fn with_mirror_config(config: MirrorConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let sheets = Arc::new(MockSheetsClient::new());
        let mirror = Arc::new(MirrorSync::new(
            store.clone(),
            sheets.clone(),
            config,
            Some(TEST_SPREADSHEET_ID.to_string()),
        ));
        Self {
            store,
            sheets,
            dead_letters: Arc::new(MemoryDeadLetterSink::new()),
            mirror,
            jwt_service: Arc::new(JwtService::new(
                TEST_JWT_SECRET,
                TEST_JWT_ISSUER.to_string(),
            )),
        }
    }

    /// Deps with background syncing switched off.
    pub fn server_deps(&self) -> ServerDeps {
        self.build(SyncQueue::disabled())
    }

    /// Deps with a running sync worker. Close the handle when done.
    pub fn server_deps_with_sync(&self, config: SyncQueueConfig) -> (ServerDeps, SyncWorkerHandle) {
        let (queue, handle) =
            SyncQueue::open(self.mirror.clone(), self.dead_letters.clone(), config);
        (self.build(queue), handle)
    }

    fn build(&self, sync_queue: SyncQueue) -> ServerDeps {
        ServerDeps::new(
            self.store.clone(),
            sync_queue,
            self.mirror.clone(),
            self.jwt_service.clone(),
            TEST_ADMIN_PASSWORD.to_string(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

/// Poll `condition` until it holds or two seconds pass.
pub async fn wait_until(condition: impl Fn() -> bool) -> bool {
    for _ in 0..400 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
