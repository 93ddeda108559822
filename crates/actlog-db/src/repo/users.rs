use super::prelude::*;

pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User) -> Result<(), sqlx_core::Error> {
        query!(
            r#"
            INSERT INTO users (
                id,
                email,
                first_name,
                last_name,
                is_active,
                is_super_admin,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
            user.id.as_str(),
            user.email.as_str(),
            user.first_name.as_deref(),
            user.last_name.as_deref(),
            user.is_active,
            user.is_super_admin,
            user.created_at,
            user.updated_at
        )
        .execute(self.pool)
        .await
        .map(|_| ())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>, sqlx_core::Error> {
        query_as!(
            User,
            r#"
            SELECT
                id,
                email,
                first_name,
                last_name,
                is_active,
                is_super_admin,
                created_at,
                updated_at
            FROM users
            WHERE id = $1
            "#,
            id
        )
        .fetch_optional(self.pool)
        .await
    }

    pub async fn exists(&self, id: &str) -> Result<bool, sqlx_core::Error> {
        let row = query_as!(
            (bool,),
            "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)",
            id
        )
        .fetch_one(self.pool)
        .await?;
        Ok(row.0)
    }
}
