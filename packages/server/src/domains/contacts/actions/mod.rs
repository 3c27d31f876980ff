//! Contact form actions

use tracing::info;

use crate::common::validation::{require_email, require_non_empty};
use crate::common::{ContactMessageId, DomainResult};
use crate::domains::contacts::models::{ContactMessage, ContactStatus, NewContactMessage};
use crate::domains::sync::MirrorCollection;
use crate::kernel::stores::ContactStore;
use crate::kernel::ServerDeps;

pub async fn submit_contact(
    name: String,
    email: String,
    message: String,
    deps: &ServerDeps,
) -> DomainResult<ContactMessage> {
    require_non_empty("name", &name)?;
    require_email(&email)?;
    require_non_empty("message", &message)?;

    let message = deps
        .store
        .insert_contact_message(NewContactMessage {
            name,
            email,
            message,
        })
        .await?;
    info!(message_id = %message.id, "contact message received");

    deps.sync_queue.enqueue(MirrorCollection::ContactMessages);
    Ok(message)
}

pub async fn set_contact_status(
    id: ContactMessageId,
    status: ContactStatus,
    deps: &ServerDeps,
) -> DomainResult<ContactMessage> {
    let message = deps.store.set_contact_status(id, status).await?;
    info!(message_id = %id, status = %status, "contact status updated");
    deps.sync_queue.enqueue(MirrorCollection::ContactMessages);
    Ok(message)
}
