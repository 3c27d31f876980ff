//! Persistence: store traits plus memory and Postgres implementations.

mod error;
mod memory;
mod postgres;
mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{
    AnalyticsStore, ApplicationStore, ChatStore, ContactStore, FollowStore, ReadOrder, Store,
    StoreHealth, UserStore, WaitlistStore,
};
