//! External mirror sync: spreadsheet projection, sync service, and the
//! background queue that drives it.

pub mod collection;
pub mod mirror;
pub mod queue;

pub use collection::MirrorCollection;
pub use mirror::{MirrorConfig, MirrorSync, MirrorSyncState, SyncError};
pub use queue::{
    DeadLetter, DeadLetterSink, EnqueueOutcome, SyncQueue, SyncQueueConfig, SyncWorkerHandle,
    TracingDeadLetterSink,
};
