use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::common::validation::require_non_empty;
use crate::common::DomainResult;
use crate::domains::chat::models::{ChatMessage, ChatRole};
use crate::domains::chat::responder::respond;
use crate::kernel::stores::ChatStore;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
}

/// Answer `message` and record both sides of the exchange in the session.
///
/// A missing or blank `session_id` starts a new session.
pub async fn chat(
    message: String,
    session_id: Option<String>,
    deps: &ServerDeps,
) -> DomainResult<ChatReply> {
    require_non_empty("message", &message)?;

    let session_id = session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::now_v7().to_string());
    let response = respond(&message);

    let session = deps
        .store
        .append_chat_messages(
            &session_id,
            vec![
                ChatMessage::now(ChatRole::User, message),
                ChatMessage::now(ChatRole::Assistant, response),
            ],
        )
        .await?;
    debug!(session_id = %session.id, messages = session.messages.len(), "chat reply");

    Ok(ChatReply {
        response: response.to_string(),
        session_id,
    })
}
