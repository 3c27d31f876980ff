use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{JobApplicationId, ParseStatusError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    New,
    Pending,
    Reviewing,
    Interviewing,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::New => "new",
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ApplicationStatus::New),
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewing" => Ok(ApplicationStatus::Reviewing),
            "interviewing" => Ok(ApplicationStatus::Interviewing),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "hired" => Ok(ApplicationStatus::Hired),
            _ => Err(ParseStatusError::new("application status", s)),
        }
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: JobApplicationId,
    pub position: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cover_letter: String,
    pub resume_url: String,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJobApplication {
    pub position: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cover_letter: String,
    pub resume_url: String,
}

impl NewJobApplication {
    pub fn into_application(self) -> JobApplication {
        JobApplication {
            id: JobApplicationId::new(),
            position: self.position,
            name: self.name,
            email: self.email,
            phone: self.phone,
            cover_letter: self.cover_letter,
            resume_url: self.resume_url,
            status: ApplicationStatus::New,
            notes: None,
            created_at: Utc::now(),
        }
    }
}
