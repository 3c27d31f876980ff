pub mod actions;
pub mod models;

pub use models::{ContactMessage, ContactStatus};
