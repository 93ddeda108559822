use super::prelude::*;

pub struct SessionRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, session: &Session) -> Result<(), sqlx_core::Error> {
        query!(
            r#"
            INSERT INTO sessions (
                id,
                user_id,
                access_token_hash,
                expires_at,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
            session.id.as_str(),
            session.user_id.as_str(),
            session.access_token_hash.as_str(),
            session.expires_at,
            session.created_at
        )
        .execute(self.pool)
        .await
        .map(|_| ())
    }

    pub async fn get_by_access_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, sqlx_core::Error> {
        query_as!(
            Session,
            r#"
            SELECT
                id,
                user_id,
                access_token_hash,
                expires_at,
                created_at
            FROM sessions
            WHERE access_token_hash = $1
            "#,
            token_hash
        )
        .fetch_optional(self.pool)
        .await
    }
}
