//! C2: the local user projection, upserted from the Kafka consumer.
//! Grounded on the `UpsertUser` contract implied by
//! `examples/original_source/internal/consumer/consumer.go`.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use wallet_core::domain::User;
use wallet_core::error::{WalletError, WalletResult};
use wallet_core::repository::UserStore;

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    user_id: Uuid,
    status: String,
    archived: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            user_id: row.user_id,
            status: row.status,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    /// Idempotent on `user_id` (distilled spec P7): inserting twice with the
    /// same values converges on one row with `created_at` preserved across
    /// the second call.
    #[instrument(skip(self))]
    async fn upsert_user(&self, user_id: Uuid, status: &str, archived: bool) -> WalletResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (user_id, status, archived, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET status = EXCLUDED.status, archived = EXCLUDED.archived, updated_at = NOW()
            RETURNING user_id, status, archived, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(archived)
        .fetch_one(&self.pool)
        .await
        .context("failed to upsert user")
        .map_err(WalletError::Internal)?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: Uuid) -> WalletResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT user_id, status, archived, created_at, updated_at FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to read user")
        .map_err(WalletError::Internal)?;

        Ok(row.map(Into::into))
    }
}
