//! One-way, full-overwrite mirror of collections into a spreadsheet.
//!
//! Every sync re-reads the source collection and overwrites its fixed data
//! range. Failures never propagate: they are logged and reported as `false`.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::collection::{MirrorCollection, DATA_ROW_CAPACITY, READ_LIMIT};
use crate::kernel::stores::{ReadOrder, Store, StoreError};
use crate::kernel::BaseSheetsClient;

pub const DEFAULT_SPREADSHEET_TITLE: &str = "Swipr.ai Data";

#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Title used when the target spreadsheet has to be created
    pub spreadsheet_title: String,
    pub read_order: ReadOrder,
    /// Clear the data range before writing so shrinking sources leave no stale rows
    pub clear_stale_rows: bool,
    pub read_limit: usize,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            spreadsheet_title: DEFAULT_SPREADSHEET_TITLE.to_string(),
            read_order: ReadOrder::Natural,
            clear_stale_rows: true,
            read_limit: READ_LIMIT,
        }
    }
}

/// Per-process state of the external target.
#[derive(Debug, Clone, Default)]
pub struct MirrorSyncState {
    pub target_handle: Option<String>,
    pub authenticated: bool,
    headers_pending: bool,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("authentication failed: {0}")]
    Authentication(#[source] anyhow::Error),

    #[error("could not create spreadsheet: {0}")]
    TargetCreation(#[source] anyhow::Error),

    #[error("could not read {collection}: {source}")]
    Read {
        collection: MirrorCollection,
        #[source]
        source: StoreError,
    },

    #[error("could not write {range}: {source}")]
    Write {
        range: String,
        #[source]
        source: anyhow::Error,
    },
}

impl SyncError {
    /// Failures raised by the spreadsheet service rather than the source store.
    pub fn is_remote(&self) -> bool {
        !matches!(self, SyncError::Read { .. })
    }
}

pub struct MirrorSync {
    store: Arc<dyn Store>,
    client: Arc<dyn BaseSheetsClient>,
    config: MirrorConfig,
    // Held for a whole sync: writes to the shared target never interleave.
    state: Mutex<MirrorSyncState>,
}

impl MirrorSync {
    /// `target_handle` seeds the spreadsheet id; `None` creates one on first sync.
    pub fn new(
        store: Arc<dyn Store>,
        client: Arc<dyn BaseSheetsClient>,
        config: MirrorConfig,
        target_handle: Option<String>,
    ) -> Self {
        Self {
            store,
            client,
            config,
            state: Mutex::new(MirrorSyncState {
                target_handle,
                ..Default::default()
            }),
        }
    }

    pub async fn state(&self) -> MirrorSyncState {
        self.state.lock().await.clone()
    }

    /// Mirror one collection. Returns whether the target now reflects it.
    pub async fn sync(&self, collection: MirrorCollection) -> bool {
        match self.try_sync(collection).await {
            Ok(rows) => {
                info!(collection = %collection, rows, "mirror sync complete");
                true
            }
            Err(e) => {
                error!(collection = %collection, error = %e, "mirror sync failed");
                false
            }
        }
    }

    /// Run every collection independently.
    pub async fn sync_each(&self) -> Vec<(MirrorCollection, bool)> {
        let mut results = Vec::with_capacity(MirrorCollection::ALL.len());
        for collection in MirrorCollection::ALL {
            results.push((collection, self.sync(collection).await));
        }
        results
    }

    /// True only if every collection synced.
    pub async fn sync_all(&self) -> bool {
        self.sync_each().await.iter().all(|(_, ok)| *ok)
    }

    async fn try_sync(&self, collection: MirrorCollection) -> Result<usize, SyncError> {
        let mut state = self.state.lock().await;
        let result = self.sync_locked(&mut state, collection).await;
        if let Err(e) = &result {
            if e.is_remote() {
                // Force a fresh authenticate on the next sync.
                state.authenticated = false;
            }
        }
        result
    }

    async fn sync_locked(
        &self,
        state: &mut MirrorSyncState,
        collection: MirrorCollection,
    ) -> Result<usize, SyncError> {
        self.ensure_authenticated(state).await?;
        let target = self.ensure_target(state).await?;

        let mut rows = collection
            .read_rows(self.store.as_ref(), self.config.read_order, self.config.read_limit)
            .await
            .map_err(|source| SyncError::Read { collection, source })?;

        if rows.len() > DATA_ROW_CAPACITY {
            warn!(
                collection = %collection,
                rows = rows.len(),
                capacity = DATA_ROW_CAPACITY,
                "truncating rows beyond sheet range"
            );
            rows.truncate(DATA_ROW_CAPACITY);
        }

        let range = collection.data_range();
        if self.config.clear_stale_rows {
            self.client
                .clear_range(&target, &range)
                .await
                .map_err(|source| SyncError::Write {
                    range: range.clone(),
                    source,
                })?;
        }

        if rows.is_empty() {
            debug!(collection = %collection, "source empty, nothing to write");
            return Ok(0);
        }

        let count = rows.len();
        self.client
            .write_range(&target, &range, rows)
            .await
            .map_err(|source| SyncError::Write { range, source })?;
        Ok(count)
    }

    async fn ensure_authenticated(&self, state: &mut MirrorSyncState) -> Result<(), SyncError> {
        if state.authenticated {
            return Ok(());
        }
        self.client
            .authenticate()
            .await
            .map_err(SyncError::Authentication)?;
        state.authenticated = true;
        debug!("spreadsheet client authenticated");
        Ok(())
    }

    async fn ensure_target(&self, state: &mut MirrorSyncState) -> Result<String, SyncError> {
        let target = match &state.target_handle {
            Some(id) => id.clone(),
            None => {
                let specs: Vec<_> = MirrorCollection::ALL
                    .iter()
                    .map(|c| c.sheet_spec())
                    .collect();
                let id = self
                    .client
                    .create_spreadsheet(&self.config.spreadsheet_title, &specs)
                    .await
                    .map_err(SyncError::TargetCreation)?;
                info!(spreadsheet_id = %id, title = %self.config.spreadsheet_title, "created mirror spreadsheet");
                state.target_handle = Some(id.clone());
                state.headers_pending = true;
                id
            }
        };

        if state.headers_pending {
            for collection in MirrorCollection::ALL {
                let range = collection.header_range();
                self.client
                    .write_range(&target, &range, vec![collection.header_row()])
                    .await
                    .map_err(|source| SyncError::Write { range, source })?;
            }
            state.headers_pending = false;
        }

        Ok(target)
    }
}
