use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::UserId;

pub const DEFAULT_RISK_TOLERANCE: &str = "moderate";
pub const DEFAULT_EXPERIENCE: &str = "beginner";

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub verified: bool,
    pub risk_tolerance: String,
    pub investment_goals: Vec<String>,
    pub experience: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn into_user(self) -> User {
        User {
            id: UserId::new(),
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
            verified: false,
            risk_tolerance: DEFAULT_RISK_TOLERANCE.to_string(),
            investment_goals: Vec::new(),
            experience: DEFAULT_EXPERIENCE.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub risk_tolerance: String,
    pub investment_goals: Vec<String>,
    pub experience: String,
}

/// Public view of a user returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub verified: bool,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            verified: user.verified,
            profile: UserProfile {
                risk_tolerance: user.risk_tolerance.clone(),
                investment_goals: user.investment_goals.clone(),
                experience: user.experience.clone(),
            },
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_hides_password_hash() {
        let user = NewUser {
            email: "a@x.com".into(),
            name: "Ann".into(),
            password_hash: "$argon2id$secret".into(),
        }
        .into_user();
        let json = serde_json::to_string(&UserView::from(&user)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"riskTolerance\":\"moderate\""));
        assert!(json.contains("\"experience\":\"beginner\""));
    }
}
