use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ActivityLog, Session, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    pub kind: String,
    pub message: String,
}

impl ServiceError {
    #[must_use]
    pub fn new(kind: &str, message: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ServiceError {}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Persistence for activity logs and the user existence check that guards
/// their creation.
///
/// `create_activity_log` fails with kind `not_found` when the referenced
/// user no longer exists.
#[async_trait]
pub trait ActivityLogStore: Send + Sync {
    async fn user_exists(&self, user_id: &str) -> ServiceResult<bool>;
    async fn create_activity_log(&self, log: &ActivityLog) -> ServiceResult<()>;
    async fn list_activity_logs_by_user(&self, user_id: &str) -> ServiceResult<Vec<ActivityLog>>;
    async fn list_activity_logs(&self) -> ServiceResult<Vec<ActivityLog>>;
}

/// Read-only access to the accounts and sessions issued elsewhere.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn get_user(&self, user_id: &str) -> ServiceResult<Option<User>>;
    async fn get_session_by_access_token_hash(
        &self,
        token_hash: &str,
    ) -> ServiceResult<Option<Session>>;
}

#[async_trait]
pub trait Store: ActivityLogStore + IdentityStore {
    async fn ping(&self) -> ServiceResult<()>;
}
