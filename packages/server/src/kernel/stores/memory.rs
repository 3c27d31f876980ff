//! In-memory storage for tests and database-less development.
//!
//! Data is lost on restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::{StoreError, StoreResult};
use super::store::{
    AnalyticsStore, ApplicationStore, ChatStore, ContactStore, FollowStore, ReadOrder,
    StoreHealth, UserStore, WaitlistStore,
};
use crate::common::{ContactMessageId, JobApplicationId, UserId};
use crate::domains::analytics::models::{AnalyticsEvent, EventTypeCount, NewAnalyticsEvent};
use crate::domains::applications::models::{
    ApplicationStatus, JobApplication, NewJobApplication,
};
use crate::domains::auth::models::{NewUser, User};
use crate::domains::chat::models::{ChatMessage, ChatSession};
use crate::domains::contacts::models::{ContactMessage, ContactStatus, NewContactMessage};
use crate::domains::waitlist::models::{NewWaitlistEntry, WaitlistEntry};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    // One lock for the whole ledger: the duplicate check, count and push
    // must not interleave.
    waitlist: Mutex<Vec<WaitlistEntry>>,
    contacts: RwLock<Vec<ContactMessage>>,
    applications: RwLock<Vec<JobApplication>>,
    analytics: RwLock<Vec<AnalyticsEvent>>,
    chats: RwLock<HashMap<String, ChatSession>>,
    follows: RwLock<HashMap<(UserId, UserId), DateTime<Utc>>>,
    unavailable: AtomicBool,
    blind_lookups: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make `find_waitlist_entry` miss, as if a concurrent writer landed
    /// between a caller's lookup and its append.
    pub fn set_blind_lookups(&self, blind: bool) {
        self.blind_lookups.store(blind, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store marked unavailable".into()))
        } else {
            Ok(())
        }
    }
}

/// Apply `order` and `limit` to records kept in insertion order.
fn ordered<T: Clone>(records: &[T], order: ReadOrder, limit: usize) -> Vec<T> {
    match order {
        ReadOrder::Natural | ReadOrder::CreatedAsc => records.iter().take(limit).cloned().collect(),
        ReadOrder::CreatedDesc => records.iter().rev().take(limit).cloned().collect(),
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        self.check()?;
        let mut users = self.users.write().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateKey { field: "email" });
        }
        let user = user.into_user();
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.check()?;
        let users = self.users.read().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        self.check()?;
        let users = self.users.read().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn count_users(&self) -> StoreResult<i64> {
        self.check()?;
        Ok(self.users.read().unwrap().len() as i64)
    }
}

#[async_trait]
impl WaitlistStore for MemoryStore {
    async fn find_waitlist_entry(&self, email: &str) -> StoreResult<Option<WaitlistEntry>> {
        self.check()?;
        if self.blind_lookups.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let entries = self.waitlist.lock().unwrap();
        Ok(entries.iter().find(|e| e.email == email).cloned())
    }

    async fn count_waitlist_entries(&self) -> StoreResult<i64> {
        self.check()?;
        Ok(self.waitlist.lock().unwrap().len() as i64)
    }

    async fn append_waitlist_entry(&self, entry: NewWaitlistEntry) -> StoreResult<WaitlistEntry> {
        self.check()?;
        let mut entries = self.waitlist.lock().unwrap();
        if entries.iter().any(|e| e.email == entry.email) {
            return Err(StoreError::DuplicateKey { field: "email" });
        }
        let entry = entry.into_entry(entries.len() as i64 + 1);
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn list_waitlist_entries(
        &self,
        order: ReadOrder,
        limit: usize,
    ) -> StoreResult<Vec<WaitlistEntry>> {
        self.check()?;
        Ok(ordered(&self.waitlist.lock().unwrap(), order, limit))
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn insert_contact_message(
        &self,
        message: NewContactMessage,
    ) -> StoreResult<ContactMessage> {
        self.check()?;
        let message = message.into_message();
        self.contacts.write().unwrap().push(message.clone());
        Ok(message)
    }

    async fn list_contact_messages(
        &self,
        order: ReadOrder,
        limit: usize,
    ) -> StoreResult<Vec<ContactMessage>> {
        self.check()?;
        Ok(ordered(&self.contacts.read().unwrap(), order, limit))
    }

    async fn count_contact_messages(&self) -> StoreResult<i64> {
        self.check()?;
        Ok(self.contacts.read().unwrap().len() as i64)
    }

    async fn set_contact_status(
        &self,
        id: ContactMessageId,
        status: ContactStatus,
    ) -> StoreResult<ContactMessage> {
        self.check()?;
        let mut contacts = self.contacts.write().unwrap();
        let message = contacts
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound {
                entity: "contact message",
            })?;
        message.status = status;
        Ok(message.clone())
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert_job_application(
        &self,
        application: NewJobApplication,
    ) -> StoreResult<JobApplication> {
        self.check()?;
        let application = application.into_application();
        self.applications.write().unwrap().push(application.clone());
        Ok(application)
    }

    async fn list_job_applications(
        &self,
        order: ReadOrder,
        limit: usize,
    ) -> StoreResult<Vec<JobApplication>> {
        self.check()?;
        Ok(ordered(&self.applications.read().unwrap(), order, limit))
    }

    async fn count_job_applications(&self) -> StoreResult<i64> {
        self.check()?;
        Ok(self.applications.read().unwrap().len() as i64)
    }

    async fn update_application_status(
        &self,
        id: JobApplicationId,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> StoreResult<JobApplication> {
        self.check()?;
        let mut applications = self.applications.write().unwrap();
        let application = applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound {
                entity: "job application",
            })?;
        application.status = status;
        if notes.is_some() {
            application.notes = notes;
        }
        Ok(application.clone())
    }
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn insert_analytics_event(
        &self,
        event: NewAnalyticsEvent,
    ) -> StoreResult<AnalyticsEvent> {
        self.check()?;
        let event = event.into_event();
        self.analytics.write().unwrap().push(event.clone());
        Ok(event)
    }

    async fn count_analytics_events(&self) -> StoreResult<i64> {
        self.check()?;
        Ok(self.analytics.read().unwrap().len() as i64)
    }

    async fn count_events_by_type(&self) -> StoreResult<Vec<EventTypeCount>> {
        self.check()?;
        let mut counts: HashMap<String, i64> = HashMap::new();
        for event in self.analytics.read().unwrap().iter() {
            *counts.entry(event.event_type.clone()).or_default() += 1;
        }
        let mut counts: Vec<EventTypeCount> = counts
            .into_iter()
            .map(|(event_type, count)| EventTypeCount { event_type, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.event_type.cmp(&b.event_type)));
        Ok(counts)
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn get_chat_session(&self, id: &str) -> StoreResult<Option<ChatSession>> {
        self.check()?;
        Ok(self.chats.read().unwrap().get(id).cloned())
    }

    async fn append_chat_messages(
        &self,
        id: &str,
        messages: Vec<ChatMessage>,
    ) -> StoreResult<ChatSession> {
        self.check()?;
        let mut chats = self.chats.write().unwrap();
        let session = chats.entry(id.to_string()).or_insert_with(|| ChatSession {
            id: id.to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
        });
        session.messages.extend(messages);
        Ok(session.clone())
    }
}

#[async_trait]
impl FollowStore for MemoryStore {
    async fn insert_follow(&self, follower: UserId, target: UserId) -> StoreResult<bool> {
        self.check()?;
        let mut follows = self.follows.write().unwrap();
        if follows.contains_key(&(follower, target)) {
            return Ok(false);
        }
        follows.insert((follower, target), Utc::now());
        Ok(true)
    }

    async fn delete_follow(&self, follower: UserId, target: UserId) -> StoreResult<bool> {
        self.check()?;
        Ok(self
            .follows
            .write()
            .unwrap()
            .remove(&(follower, target))
            .is_some())
    }

    async fn count_followers(&self, target: UserId) -> StoreResult<i64> {
        self.check()?;
        let follows = self.follows.read().unwrap();
        Ok(follows.keys().filter(|(_, t)| *t == target).count() as i64)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
