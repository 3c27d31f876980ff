use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{ParseStatusError, WaitlistEntryId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitlistStatus {
    #[default]
    Active,
    Invited,
    Removed,
}

impl WaitlistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitlistStatus::Active => "active",
            WaitlistStatus::Invited => "invited",
            WaitlistStatus::Removed => "removed",
        }
    }
}

impl fmt::Display for WaitlistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaitlistStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(WaitlistStatus::Active),
            "invited" => Ok(WaitlistStatus::Invited),
            "removed" => Ok(WaitlistStatus::Removed),
            _ => Err(ParseStatusError::new("waitlist status", s)),
        }
    }
}

impl TryFrom<String> for WaitlistStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One waitlist signup. Positions are assigned once and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: WaitlistEntryId,
    pub email: String,
    pub name: String,
    pub interests: Vec<String>,
    pub position: i64,
    pub joined_at: DateTime<Utc>,
    pub referrals: i32,
    #[sqlx(try_from = "String")]
    pub status: WaitlistStatus,
}

/// Validated input for appending to the ledger.
#[derive(Debug, Clone)]
pub struct NewWaitlistEntry {
    pub email: String,
    pub name: String,
    pub interests: Vec<String>,
}

impl NewWaitlistEntry {
    /// Materialize the entry at `position`.
    pub fn into_entry(self, position: i64) -> WaitlistEntry {
        WaitlistEntry {
            id: WaitlistEntryId::new(),
            email: self.email,
            name: self.name,
            interests: self.interests,
            position,
            joined_at: Utc::now(),
            referrals: 0,
            status: WaitlistStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinReceipt {
    pub position: i64,
    pub id: WaitlistEntryId,
}
