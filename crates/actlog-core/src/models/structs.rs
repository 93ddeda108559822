use chrono::{DateTime, SubsecRound, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read-only view of an account owned by the user-management subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_super_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A record that a user performed some action.
///
/// Rows are append-only: the id and timestamp are assigned once by
/// [`ActivityLog::new`] and never rewritten. The timestamp carries
/// microsecond precision so it survives a `timestamptz` round trip unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ActivityLog {
    pub id: String,
    pub user_id: String,
    pub action_type: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl ActivityLog {
    #[must_use]
    pub fn new(user_id: String, action_type: String, description: String) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            user_id,
            action_type,
            description,
            timestamp: Utc::now().trunc_subsecs(6),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub access_token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
