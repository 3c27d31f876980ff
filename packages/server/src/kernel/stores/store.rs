//! Storage traits, one per collection.
//!
//! - `UserStore`, `WaitlistStore`, `ContactStore`, `ApplicationStore`,
//!   `AnalyticsStore`, `ChatStore`, `FollowStore`: per-collection access
//! - `StoreHealth`: liveness probe for `/api/health`
//! - `Store`: composite trait, implemented for anything providing all of the above

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use super::error::StoreResult;
use crate::common::{ContactMessageId, JobApplicationId, ParseStatusError, UserId};
use crate::domains::analytics::models::{AnalyticsEvent, EventTypeCount, NewAnalyticsEvent};
use crate::domains::applications::models::{
    ApplicationStatus, JobApplication, NewJobApplication,
};
use crate::domains::auth::models::{NewUser, User};
use crate::domains::chat::models::{ChatMessage, ChatSession};
use crate::domains::contacts::models::{ContactMessage, ContactStatus, NewContactMessage};
use crate::domains::waitlist::models::{NewWaitlistEntry, WaitlistEntry};

/// Order in which bulk reads return records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadOrder {
    /// Whatever order the backend yields
    #[default]
    Natural,
    CreatedAsc,
    CreatedDesc,
}

impl ReadOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadOrder::Natural => "natural",
            ReadOrder::CreatedAsc => "created_asc",
            ReadOrder::CreatedDesc => "created_desc",
        }
    }
}

impl fmt::Display for ReadOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadOrder {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "natural" => Ok(ReadOrder::Natural),
            "created_asc" => Ok(ReadOrder::CreatedAsc),
            "created_desc" => Ok(ReadOrder::CreatedDesc),
            _ => Err(ParseStatusError::new("read order", s)),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with `DuplicateKey` if the email is taken.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;

    async fn count_users(&self) -> StoreResult<i64>;
}

#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Point lookup by exact email.
    async fn find_waitlist_entry(&self, email: &str) -> StoreResult<Option<WaitlistEntry>>;

    async fn count_waitlist_entries(&self) -> StoreResult<i64>;

    /// Append an entry at position `count + 1`.
    ///
    /// Counting and inserting happen as one serialized step, so concurrent
    /// appends get distinct, gapless positions. A taken email fails with
    /// `DuplicateKey`.
    async fn append_waitlist_entry(&self, entry: NewWaitlistEntry) -> StoreResult<WaitlistEntry>;

    async fn list_waitlist_entries(
        &self,
        order: ReadOrder,
        limit: usize,
    ) -> StoreResult<Vec<WaitlistEntry>>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert_contact_message(&self, message: NewContactMessage)
        -> StoreResult<ContactMessage>;

    async fn list_contact_messages(
        &self,
        order: ReadOrder,
        limit: usize,
    ) -> StoreResult<Vec<ContactMessage>>;

    async fn count_contact_messages(&self) -> StoreResult<i64>;

    async fn set_contact_status(
        &self,
        id: ContactMessageId,
        status: ContactStatus,
    ) -> StoreResult<ContactMessage>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn insert_job_application(
        &self,
        application: NewJobApplication,
    ) -> StoreResult<JobApplication>;

    async fn list_job_applications(
        &self,
        order: ReadOrder,
        limit: usize,
    ) -> StoreResult<Vec<JobApplication>>;

    async fn count_job_applications(&self) -> StoreResult<i64>;

    /// Set the status; `notes` replaces the stored notes only when present.
    async fn update_application_status(
        &self,
        id: JobApplicationId,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> StoreResult<JobApplication>;
}

#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn insert_analytics_event(&self, event: NewAnalyticsEvent)
        -> StoreResult<AnalyticsEvent>;

    async fn count_analytics_events(&self) -> StoreResult<i64>;

    /// Event counts grouped by type, most frequent first.
    async fn count_events_by_type(&self) -> StoreResult<Vec<EventTypeCount>>;
}

#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn get_chat_session(&self, id: &str) -> StoreResult<Option<ChatSession>>;

    /// Append messages to a session, creating it on first use.
    async fn append_chat_messages(
        &self,
        id: &str,
        messages: Vec<ChatMessage>,
    ) -> StoreResult<ChatSession>;
}

#[async_trait]
pub trait FollowStore: Send + Sync {
    /// Returns false when the follow already existed.
    async fn insert_follow(&self, follower: UserId, target: UserId) -> StoreResult<bool>;

    /// Returns false when there was nothing to remove.
    async fn delete_follow(&self, follower: UserId, target: UserId) -> StoreResult<bool>;

    async fn count_followers(&self, target: UserId) -> StoreResult<i64>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    fn backend(&self) -> &'static str;
}

/// Everything the application persists.
pub trait Store:
    UserStore
    + WaitlistStore
    + ContactStore
    + ApplicationStore
    + AnalyticsStore
    + ChatStore
    + FollowStore
    + StoreHealth
{
}

impl<T> Store for T where
    T: UserStore
        + WaitlistStore
        + ContactStore
        + ApplicationStore
        + AnalyticsStore
        + ChatStore
        + FollowStore
        + StoreHealth
{
}
