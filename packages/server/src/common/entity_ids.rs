//! Typed ID definitions for every persisted entity.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

pub struct User;
pub struct WaitlistEntry;
pub struct ContactMessage;
pub struct JobApplication;
pub struct AnalyticsEvent;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type UserId = Id<User>;
pub type WaitlistEntryId = Id<WaitlistEntry>;
pub type ContactMessageId = Id<ContactMessage>;
pub type JobApplicationId = Id<JobApplication>;
pub type AnalyticsEventId = Id<AnalyticsEvent>;
