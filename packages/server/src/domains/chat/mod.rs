pub mod actions;
pub mod models;
pub mod responder;

pub use actions::{chat, ChatReply};
pub use models::*;
