//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod stores;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, SheetsAdapter, UnconfiguredSheetsClient};
pub use test_dependencies::{MemoryDeadLetterSink, MockSheetsClient, SheetsCall, TestDependencies};
pub use traits::*;
