use async_trait::async_trait;

use actlog_core::{
    ActivityLog, ActivityLogStore, IdentityStore, ServiceError, ServiceResult, Session, Store,
    User,
};

use crate::repo::{ActivityLogRepo, SessionRepo, UserRepo};
use crate::PgPool;

/// [`Store`] backed by the Postgres pool; every call checks out its own
/// connection for the length of a single statement.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn db_error(event: &'static str, err: sqlx_core::Error) -> ServiceError {
    tracing::error!(event = event, error = %err, "Database query failed");
    ServiceError::new("db_error", err.to_string())
}

fn is_foreign_key_violation(err: &sqlx_core::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}

#[async_trait]
impl ActivityLogStore for PgStore {
    async fn user_exists(&self, user_id: &str) -> ServiceResult<bool> {
        UserRepo::new(&self.pool)
            .exists(user_id)
            .await
            .map_err(|err| db_error("user_lookup_failed", err))
    }

    async fn create_activity_log(&self, log: &ActivityLog) -> ServiceResult<()> {
        ActivityLogRepo::new(&self.pool)
            .create(log)
            .await
            .map_err(|err| {
                // The user can be deleted between the existence check and the insert.
                if is_foreign_key_violation(&err) {
                    tracing::info!(
                        event = "activity_log_user_vanished",
                        user_id = %log.user_id
                    );
                    return ServiceError::new("not_found", "user does not exist");
                }
                db_error("activity_log_insert_failed", err)
            })
    }

    async fn list_activity_logs_by_user(&self, user_id: &str) -> ServiceResult<Vec<ActivityLog>> {
        ActivityLogRepo::new(&self.pool)
            .list_by_user(user_id)
            .await
            .map_err(|err| db_error("activity_log_list_failed", err))
    }

    async fn list_activity_logs(&self) -> ServiceResult<Vec<ActivityLog>> {
        ActivityLogRepo::new(&self.pool)
            .list_all()
            .await
            .map_err(|err| db_error("activity_log_list_failed", err))
    }
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn get_user(&self, user_id: &str) -> ServiceResult<Option<User>> {
        UserRepo::new(&self.pool)
            .get_by_id(user_id)
            .await
            .map_err(|err| db_error("user_lookup_failed", err))
    }

    async fn get_session_by_access_token_hash(
        &self,
        token_hash: &str,
    ) -> ServiceResult<Option<Session>> {
        SessionRepo::new(&self.pool)
            .get_by_access_token_hash(token_hash)
            .await
            .map_err(|err| db_error("session_lookup_failed", err))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> ServiceResult<()> {
        sqlx_core::query::query::<sqlx_postgres::Postgres>("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|err| ServiceError::new("db_error", err.to_string()))
    }
}
