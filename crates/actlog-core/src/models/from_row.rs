#[cfg(feature = "postgres")]
use sqlx_core::from_row::FromRow;
#[cfg(feature = "postgres")]
use sqlx_core::row::Row;
#[cfg(feature = "postgres")]
use sqlx_postgres::PgRow;

#[cfg(feature = "postgres")]
use super::*;

macro_rules! impl_from_row {
    ($ty:ty, $row:ident => $body:block) => {
        #[cfg(feature = "postgres")]
        impl FromRow<'_, PgRow> for $ty {
            fn from_row($row: &PgRow) -> Result<Self, sqlx_core::Error> {
                $body
            }
        }
    };
}

impl_from_row!(User, row => {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            is_active: row.try_get("is_active")?,
            is_super_admin: row.try_get("is_super_admin")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
);

impl_from_row!(ActivityLog, row => {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            action_type: row.try_get("action_type")?,
            description: row.try_get("description")?,
            timestamp: row.try_get("timestamp")?,
        })
    }
);

impl_from_row!(Session, row => {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            access_token_hash: row.try_get("access_token_hash")?,
            expires_at: row.try_get("expires_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
);
