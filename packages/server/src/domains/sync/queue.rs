//! Bounded sync queue drained by a single background worker.
//!
//! ```text
//! write path ──enqueue──► mpsc (bounded) ──► worker ──► MirrorSync::sync
//!                                               │ retries
//!                                               └──► DeadLetterSink
//! ```
//!
//! A collection already waiting in the queue is not queued twice: every sync
//! is a full overwrite, so one pending run covers all earlier writes. The
//! pending mark is cleared when the worker picks the request up, so a write
//! that lands during a sync queues a fresh one.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::collection::MirrorCollection;
use super::mirror::MirrorSync;

#[derive(Debug, Clone)]
pub struct SyncQueueConfig {
    pub capacity: usize,
    /// Attempts per request before it is dead-lettered
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for SyncQueueConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            max_attempts: 3,
            retry_delay: Duration::from_millis(2000),
        }
    }
}

/// A sync request that exhausted its attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    pub collection: MirrorCollection,
    pub attempts: u32,
    pub failed_at: DateTime<Utc>,
}

pub trait DeadLetterSink: Send + Sync {
    fn record(&self, letter: DeadLetter);
}

/// Records dead letters as error logs.
pub struct TracingDeadLetterSink;

impl DeadLetterSink for TracingDeadLetterSink {
    fn record(&self, letter: DeadLetter) {
        error!(
            collection = %letter.collection,
            attempts = letter.attempts,
            failed_at = %letter.failed_at,
            "mirror sync dead-lettered; run a manual resync to recover"
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Queued,
    /// Already pending; this request is covered by it
    Coalesced,
    /// Queue full
    Dropped,
    /// Worker has stopped
    Closed,
    /// Syncing is switched off
    Disabled,
}

struct Shared {
    sender: mpsc::Sender<MirrorCollection>,
    pending: Mutex<HashSet<MirrorCollection>>,
}

/// Cheap-to-clone handle used by the write paths.
#[derive(Clone)]
pub struct SyncQueue {
    shared: Option<Arc<Shared>>,
}

impl SyncQueue {
    /// Start the worker. Dropping the returned handle leaves it running;
    /// call [`SyncWorkerHandle::close`] to stop it.
    pub fn open(
        mirror: Arc<MirrorSync>,
        dead_letters: Arc<dyn DeadLetterSink>,
        config: SyncQueueConfig,
    ) -> (SyncQueue, SyncWorkerHandle) {
        let (sender, receiver) = mpsc::channel(config.capacity.max(1));
        let shared = Arc::new(Shared {
            sender,
            pending: Mutex::new(HashSet::new()),
        });
        let cancel = CancellationToken::new();

        let worker = SyncWorker {
            mirror,
            dead_letters,
            config,
            shared: shared.clone(),
            cancel: cancel.clone(),
        };
        let join = tokio::spawn(worker.run(receiver));

        (
            SyncQueue {
                shared: Some(shared),
            },
            SyncWorkerHandle { cancel, join },
        )
    }

    /// A queue that accepts and ignores every request.
    pub fn disabled() -> Self {
        Self { shared: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.is_some()
    }

    /// Request a sync without waiting for it. Never blocks.
    pub fn enqueue(&self, collection: MirrorCollection) -> EnqueueOutcome {
        let Some(shared) = &self.shared else {
            debug!(collection = %collection, "sync disabled, skipping");
            return EnqueueOutcome::Disabled;
        };

        if !shared.pending.lock().unwrap().insert(collection) {
            debug!(collection = %collection, "sync already pending");
            return EnqueueOutcome::Coalesced;
        }

        match shared.sender.try_send(collection) {
            Ok(()) => {
                debug!(collection = %collection, "sync queued");
                EnqueueOutcome::Queued
            }
            Err(TrySendError::Full(_)) => {
                shared.pending.lock().unwrap().remove(&collection);
                warn!(collection = %collection, "sync queue full, dropping request");
                EnqueueOutcome::Dropped
            }
            Err(TrySendError::Closed(_)) => {
                shared.pending.lock().unwrap().remove(&collection);
                warn!(collection = %collection, "sync worker stopped, dropping request");
                EnqueueOutcome::Closed
            }
        }
    }
}

pub struct SyncWorkerHandle {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl SyncWorkerHandle {
    /// Stop the worker after its in-flight sync and wait for it to exit.
    pub async fn close(self) {
        self.cancel.cancel();
        if let Err(e) = self.join.await {
            error!(error = %e, "sync worker task failed");
        }
    }
}

struct SyncWorker {
    mirror: Arc<MirrorSync>,
    dead_letters: Arc<dyn DeadLetterSink>,
    config: SyncQueueConfig,
    shared: Arc<Shared>,
    cancel: CancellationToken,
}

impl SyncWorker {
    async fn run(self, mut receiver: mpsc::Receiver<MirrorCollection>) {
        info!(
            capacity = self.config.capacity,
            max_attempts = self.config.max_attempts,
            retry_delay_ms = self.config.retry_delay.as_millis() as u64,
            "sync worker starting"
        );

        loop {
            let collection = tokio::select! {
                _ = self.cancel.cancelled() => break,
                next = receiver.recv() => match next {
                    Some(collection) => collection,
                    None => break,
                },
            };

            self.shared.pending.lock().unwrap().remove(&collection);
            self.process(collection).await;
        }

        receiver.close();
        let mut abandoned = 0;
        while receiver.try_recv().is_ok() {
            abandoned += 1;
        }
        info!(abandoned, "sync worker stopped");
    }

    async fn process(&self, collection: MirrorCollection) {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempts = 0;

        while attempts < max_attempts {
            attempts += 1;
            if self.mirror.sync(collection).await {
                if attempts > 1 {
                    info!(collection = %collection, attempts, "sync succeeded after retry");
                }
                return;
            }

            if attempts < max_attempts {
                warn!(
                    collection = %collection,
                    attempt = attempts,
                    max_attempts,
                    "sync failed, retrying"
                );
                tokio::select! {
                    _ = self.cancel.cancelled() => break,
                    _ = tokio::time::sleep(self.config.retry_delay) => {}
                }
            }
        }

        self.dead_letters.record(DeadLetter {
            collection,
            attempts,
            failed_at: Utc::now(),
        });
    }
}
