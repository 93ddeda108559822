use super::prelude::*;

pub struct ActivityLogRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ActivityLogRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, log: &ActivityLog) -> Result<(), sqlx_core::Error> {
        query!(
            r#"
            INSERT INTO activity_logs (
                id,
                user_id,
                action_type,
                description,
                timestamp
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
            log.id.as_str(),
            log.user_id.as_str(),
            log.action_type.as_str(),
            log.description.as_str(),
            log.timestamp
        )
        .execute(self.pool)
        .await
        .map(|_| ())
    }

    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<ActivityLog>, sqlx_core::Error> {
        query_as!(
            ActivityLog,
            r#"
            SELECT
                id,
                user_id,
                action_type,
                description,
                timestamp
            FROM activity_logs
            WHERE user_id = $1
            ORDER BY timestamp ASC, id ASC
            "#,
            user_id
        )
        .fetch_all(self.pool)
        .await
    }

    pub async fn list_all(&self) -> Result<Vec<ActivityLog>, sqlx_core::Error> {
        query_as!(
            ActivityLog,
            r#"
            SELECT
                id,
                user_id,
                action_type,
                description,
                timestamp
            FROM activity_logs
            ORDER BY timestamp ASC, id ASC
            "#
        )
        .fetch_all(self.pool)
        .await
    }
}
