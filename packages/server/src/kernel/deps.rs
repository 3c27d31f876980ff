// Server dependencies and adapters from concrete clients to the Base* traits.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sheets::{SheetSpec, SheetsService};

use crate::domains::auth::JwtService;
use crate::domains::sync::{MirrorSync, SyncQueue};
use crate::kernel::stores::Store;
use crate::kernel::BaseSheetsClient;

// =============================================================================
// Sheets adapter
// =============================================================================

pub struct SheetsAdapter(pub Arc<SheetsService>);

impl SheetsAdapter {
    pub fn new(service: Arc<SheetsService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseSheetsClient for SheetsAdapter {
    async fn authenticate(&self) -> Result<()> {
        self.0.authenticate().await.map_err(|e| anyhow!("{}", e))
    }

    async fn create_spreadsheet(&self, title: &str, sheets: &[SheetSpec]) -> Result<String> {
        self.0
            .create_spreadsheet(title, sheets)
            .await
            .map_err(|e| anyhow!("{}", e))
    }

    async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<()> {
        self.0
            .update_values(spreadsheet_id, range, rows)
            .await
            .map(|_| ())
            .map_err(|e| anyhow!("{}", e))
    }

    async fn clear_range(&self, spreadsheet_id: &str, range: &str) -> Result<()> {
        self.0
            .clear_values(spreadsheet_id, range)
            .await
            .map_err(|e| anyhow!("{}", e))
    }
}

/// Stand-in when no service-account credentials are configured.
/// Authentication always fails, so every sync reports `false`.
pub struct UnconfiguredSheetsClient;

#[async_trait]
impl BaseSheetsClient for UnconfiguredSheetsClient {
    async fn authenticate(&self) -> Result<()> {
        Err(anyhow!("Google service account credentials are not configured"))
    }

    async fn create_spreadsheet(&self, _title: &str, _sheets: &[SheetSpec]) -> Result<String> {
        Err(anyhow!("Google service account credentials are not configured"))
    }

    async fn write_range(&self, _id: &str, _range: &str, _rows: Vec<Vec<String>>) -> Result<()> {
        Err(anyhow!("Google service account credentials are not configured"))
    }

    async fn clear_range(&self, _id: &str, _range: &str) -> Result<()> {
        Err(anyhow!("Google service account credentials are not configured"))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Everything domain actions need, shared across requests.
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn Store>,
    /// Fire-and-forget sync requests from the write paths
    pub sync_queue: SyncQueue,
    /// Direct access for the manual resync
    pub mirror: Arc<MirrorSync>,
    pub jwt_service: Arc<JwtService>,
    pub admin_password: String,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn Store>,
        sync_queue: SyncQueue,
        mirror: Arc<MirrorSync>,
        jwt_service: Arc<JwtService>,
        admin_password: String,
    ) -> Self {
        Self {
            store,
            sync_queue,
            mirror,
            jwt_service,
            admin_password,
        }
    }
}
