//! PostgreSQL storage.
//!
//! Schema lives in `packages/server/migrations`. Unique indexes on
//! `users.email`, `waitlist_entries.email` and `follows (follower_id,
//! target_user_id)` back the duplicate checks.

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::{debug, info};

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

/// Advisory lock key serializing waitlist position assignment.
const WAITLIST_POSITION_LOCK: i64 = 0x5357_4950_5257_4c31;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply embedded migrations.
    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn order_clause(order: ReadOrder, created_column: &str) -> String {
    match order {
        ReadOrder::Natural => String::new(),
        ReadOrder::CreatedAsc => format!("ORDER BY {created_column} ASC, id ASC"),
        ReadOrder::CreatedDesc => format!("ORDER BY {created_column} DESC, id DESC"),
    }
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let user = user.into_user();
        sqlx::query(
            r#"
            INSERT INTO users
                (id, email, name, password_hash, verified, risk_tolerance,
                 investment_goals, experience, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.verified)
        .bind(&user.risk_tolerance)
        .bind(&user.investment_goals)
        .bind(&user.experience)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn count_users(&self) -> StoreResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?)
    }
}

#[async_trait]
impl WaitlistStore for PostgresStore {
    async fn find_waitlist_entry(&self, email: &str) -> StoreResult<Option<WaitlistEntry>> {
        Ok(
            sqlx::query_as::<_, WaitlistEntry>("SELECT * FROM waitlist_entries WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn count_waitlist_entries(&self) -> StoreResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM waitlist_entries")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn append_waitlist_entry(&self, entry: NewWaitlistEntry) -> StoreResult<WaitlistEntry> {
        let mut tx = self.pool.begin().await?;

        // Held until commit/rollback
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(WAITLIST_POSITION_LOCK)
            .execute(&mut *tx)
            .await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM waitlist_entries")
            .fetch_one(&mut *tx)
            .await?;
        let entry = entry.into_entry(count + 1);

        sqlx::query(
            r#"
            INSERT INTO waitlist_entries
                (id, email, name, interests, position, joined_at, referrals, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.email)
        .bind(&entry.name)
        .bind(&entry.interests)
        .bind(entry.position)
        .bind(entry.joined_at)
        .bind(entry.referrals)
        .bind(entry.status.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(position = entry.position, "waitlist entry appended");
        Ok(entry)
    }

    async fn list_waitlist_entries(
        &self,
        order: ReadOrder,
        limit: usize,
    ) -> StoreResult<Vec<WaitlistEntry>> {
        let sql = format!(
            "SELECT * FROM waitlist_entries {} LIMIT $1",
            order_clause(order, "joined_at")
        );
        Ok(sqlx::query_as::<_, WaitlistEntry>(&sql)
            .bind(limit_param(limit))
            .fetch_all(&self.pool)
            .await?)
    }
}

#[async_trait]
impl ContactStore for PostgresStore {
    async fn insert_contact_message(
        &self,
        message: NewContactMessage,
    ) -> StoreResult<ContactMessage> {
        let message = message.into_message();
        sqlx::query(
            r#"
            INSERT INTO contact_messages (id, name, email, message, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.message)
        .bind(message.status.as_str())
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;
        Ok(message)
    }

    async fn list_contact_messages(
        &self,
        order: ReadOrder,
        limit: usize,
    ) -> StoreResult<Vec<ContactMessage>> {
        let sql = format!(
            "SELECT * FROM contact_messages {} LIMIT $1",
            order_clause(order, "created_at")
        );
        Ok(sqlx::query_as::<_, ContactMessage>(&sql)
            .bind(limit_param(limit))
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count_contact_messages(&self) -> StoreResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn set_contact_status(
        &self,
        id: ContactMessageId,
        status: ContactStatus,
    ) -> StoreResult<ContactMessage> {
        sqlx::query_as::<_, ContactMessage>(
            "UPDATE contact_messages SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "contact message",
        })
    }
}

#[async_trait]
impl ApplicationStore for PostgresStore {
    async fn insert_job_application(
        &self,
        application: NewJobApplication,
    ) -> StoreResult<JobApplication> {
        let application = application.into_application();
        sqlx::query(
            r#"
            INSERT INTO job_applications
                (id, position, name, email, phone, cover_letter, resume_url,
                 status, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(application.id)
        .bind(&application.position)
        .bind(&application.name)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(&application.cover_letter)
        .bind(&application.resume_url)
        .bind(application.status.as_str())
        .bind(&application.notes)
        .bind(application.created_at)
        .execute(&self.pool)
        .await?;
        Ok(application)
    }

    async fn list_job_applications(
        &self,
        order: ReadOrder,
        limit: usize,
    ) -> StoreResult<Vec<JobApplication>> {
        let sql = format!(
            "SELECT * FROM job_applications {} LIMIT $1",
            order_clause(order, "created_at")
        );
        Ok(sqlx::query_as::<_, JobApplication>(&sql)
            .bind(limit_param(limit))
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count_job_applications(&self) -> StoreResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM job_applications")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_application_status(
        &self,
        id: JobApplicationId,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> StoreResult<JobApplication> {
        sqlx::query_as::<_, JobApplication>(
            r#"
            UPDATE job_applications
            SET status = $2, notes = COALESCE($3, notes)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "job application",
        })
    }
}

#[async_trait]
impl AnalyticsStore for PostgresStore {
    async fn insert_analytics_event(
        &self,
        event: NewAnalyticsEvent,
    ) -> StoreResult<AnalyticsEvent> {
        let event = event.into_event();
        sqlx::query(
            r#"
            INSERT INTO analytics_events
                (id, event_type, page, session_id, timestamp, user_agent, location,
                 element, value, referrer, received_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(event.id)
        .bind(&event.event_type)
        .bind(&event.page)
        .bind(&event.session_id)
        .bind(&event.timestamp)
        .bind(&event.user_agent)
        .bind(&event.location)
        .bind(&event.element)
        .bind(&event.value)
        .bind(&event.referrer)
        .bind(event.received_at)
        .execute(&self.pool)
        .await?;
        Ok(event)
    }

    async fn count_analytics_events(&self) -> StoreResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM analytics_events")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn count_events_by_type(&self) -> StoreResult<Vec<EventTypeCount>> {
        Ok(sqlx::query_as::<_, EventTypeCount>(
            r#"
            SELECT event_type, COUNT(*) AS count
            FROM analytics_events
            GROUP BY event_type
            ORDER BY count DESC, event_type ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }
}

#[derive(sqlx::FromRow)]
struct ChatSessionRow {
    id: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
impl ChatStore for PostgresStore {
    async fn get_chat_session(&self, id: &str) -> StoreResult<Option<ChatSession>> {
        let Some(row) =
            sqlx::query_as::<_, ChatSessionRow>("SELECT id, created_at FROM chat_sessions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
        else {
            return Ok(None);
        };

        let messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT role, content, sent_at AS "timestamp"
            FROM chat_messages
            WHERE session_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(ChatSession {
            id: row.id,
            messages,
            created_at: row.created_at,
        }))
    }

    async fn append_chat_messages(
        &self,
        id: &str,
        messages: Vec<ChatMessage>,
    ) -> StoreResult<ChatSession> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO chat_sessions (id, created_at) VALUES ($1, now()) ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        for message in &messages {
            sqlx::query(
                "INSERT INTO chat_messages (session_id, role, content, sent_at) VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(message.role.as_str())
            .bind(&message.content)
            .bind(message.timestamp)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        self.get_chat_session(id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "chat session",
            })
    }
}

#[async_trait]
impl FollowStore for PostgresStore {
    async fn insert_follow(&self, follower: UserId, target: UserId) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO follows (follower_id, target_user_id, created_at)
            VALUES ($1, $2, now())
            ON CONFLICT (follower_id, target_user_id) DO NOTHING
            "#,
        )
        .bind(follower)
        .bind(target)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_follow(&self, follower: UserId, target: UserId) -> StoreResult<bool> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND target_user_id = $2")
                .bind(follower)
                .bind(target)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn count_followers(&self, target: UserId) -> StoreResult<i64> {
        Ok(
            sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE target_user_id = $1")
                .bind(target)
                .fetch_one(&self.pool)
                .await?,
        )
    }
}

#[async_trait]
impl StoreHealth for PostgresStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
