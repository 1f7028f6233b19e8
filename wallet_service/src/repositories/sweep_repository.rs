//! C8's storage half, grounded on the idle-wallet scan implied by
//! `examples/original_source/internal/wallet-cleanup/cleaner.go` (the
//! cleaner itself is storage-agnostic there; the query shape below is this
//! crate's own SQL expression of "owner archived AND wallet idle").

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use wallet_core::error::{WalletError, WalletResult};
use wallet_core::repository::SweepStore;

#[derive(Clone)]
pub struct PgSweepStore {
    pool: PgPool,
}

impl PgSweepStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SweepStore for PgSweepStore {
    #[instrument(skip(self))]
    async fn archived_users(&self) -> WalletResult<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT user_id FROM users WHERE archived = true")
                .fetch_all(&self.pool)
                .await
                .context("failed to list archived users")
                .map_err(WalletError::Internal)?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    #[instrument(skip(self))]
    async fn inactive_wallets(&self, user_id: Uuid, inactive_days: i64) -> WalletResult<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM wallets
            WHERE user_id = $1 AND archived = false
              AND updated_at < NOW() - ($2 || ' days')::interval
            "#,
        )
        .bind(user_id)
        .bind(inactive_days.to_string())
        .fetch_all(&self.pool)
        .await
        .context("failed to list inactive wallets")
        .map_err(WalletError::Internal)?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    #[instrument(skip(self))]
    async fn archive_wallet(&self, wallet_id: Uuid) -> WalletResult<()> {
        sqlx::query("UPDATE wallets SET archived = true, updated_at = NOW() WHERE id = $1")
            .bind(wallet_id)
            .execute(&self.pool)
            .await
            .context("failed to archive inactive wallet")
            .map_err(WalletError::Internal)?;

        Ok(())
    }
}
