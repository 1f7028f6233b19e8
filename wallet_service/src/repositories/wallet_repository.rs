//! C4: Postgres-backed wallet CRUD and listing, grounded on
//! `examples/original_source/internal/database/wallets.go` (CRUD shape) and
//! `apps/backend/src/repositories/expense_repository.rs` (the
//! `FromRow` + `TryFrom` mapping idiom, `#[instrument]` usage).

use anyhow::Context;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use wallet_core::domain::{ListQuery, SortKey, Wallet, WalletPatch};
use wallet_core::error::{WalletError, WalletResult};
use wallet_core::money::Currency;
use wallet_core::repository::WalletStore;

use super::push_list_clause;

#[derive(Clone)]
pub struct PgWalletStore {
    pool: PgPool,
}

impl PgWalletStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct WalletRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    currency: String,
    balance: rust_decimal::Decimal,
    archived: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<WalletRow> for Wallet {
    type Error = WalletError;

    fn try_from(row: WalletRow) -> WalletResult<Self> {
        Ok(Wallet {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            currency: row.currency.parse()?,
            balance: row.balance,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl WalletStore for PgWalletStore {
    #[instrument(skip(self))]
    async fn create(&self, user_id: Uuid, name: &str, currency: Currency) -> WalletResult<Wallet> {
        let row = sqlx::query_as::<_, WalletRow>(
            r#"
            INSERT INTO wallets (id, user_id, name, currency, balance, archived, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 0, false, NOW(), NOW())
            RETURNING id, user_id, name, currency, balance, archived, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .bind(currency.code())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                WalletError::UserNotFound(user_id)
            }
            other => WalletError::Internal(anyhow::Error::new(other).context("failed to create wallet")),
        })?;

        row.try_into()
    }

    #[instrument(skip(self))]
    async fn get(&self, wallet_id: Uuid) -> WalletResult<Option<Wallet>> {
        let row = sqlx::query_as::<_, WalletRow>(
            r#"
            SELECT id, user_id, name, currency, balance, archived, created_at, updated_at
            FROM wallets WHERE id = $1 AND archived = false
            "#,
        )
        .bind(wallet_id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to read wallet")
        .map_err(WalletError::Internal)?;

        row.map(TryInto::try_into).transpose()
    }

    /// The name/currency patch and the balance rebase happen in the same
    /// row-locked transaction (§4.4.2), so a concurrent deposit/withdraw/
    /// transfer can never commit against a currency this update is in the
    /// middle of changing.
    #[instrument(skip(self, patch))]
    async fn update(&self, wallet_id: Uuid, patch: WalletPatch, rate: Decimal) -> WalletResult<Wallet> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")
            .map_err(WalletError::Internal)?;

        let locked = sqlx::query_as::<_, WalletRow>(
            "SELECT id, user_id, name, currency, balance, archived, created_at, updated_at \
             FROM wallets WHERE id = $1 AND archived = false FOR UPDATE",
        )
        .bind(wallet_id)
        .fetch_optional(&mut *tx)
        .await
        .context("failed to lock wallet row")
        .map_err(WalletError::Internal)?
        .ok_or(WalletError::WalletNotFound)?;
        let current: Wallet = locked.try_into()?;

        let name = patch.name.unwrap_or(current.name);
        let currency = match patch.currency {
            Some(code) => code.parse()?,
            None => current.currency,
        };
        let balance = if currency == current.currency {
            current.balance
        } else {
            current.balance * rate
        };

        let row = sqlx::query_as::<_, WalletRow>(
            r#"
            UPDATE wallets SET name = $2, currency = $3, balance = $4, updated_at = NOW()
            WHERE id = $1 AND archived = false
            RETURNING id, user_id, name, currency, balance, archived, created_at, updated_at
            "#,
        )
        .bind(wallet_id)
        .bind(name)
        .bind(currency.code())
        .bind(balance)
        .fetch_optional(&mut *tx)
        .await
        .context("failed to update wallet")
        .map_err(WalletError::Internal)?
        .ok_or(WalletError::WalletNotFound)?;

        tx.commit()
            .await
            .context("failed to commit wallet update")
            .map_err(WalletError::Internal)?;

        row.try_into()
    }

    #[instrument(skip(self))]
    async fn archive(&self, wallet_id: Uuid) -> WalletResult<()> {
        let result = sqlx::query(
            "UPDATE wallets SET archived = true, updated_at = NOW() WHERE id = $1 AND archived = false",
        )
        .bind(wallet_id)
        .execute(&self.pool)
        .await
        .context("failed to archive wallet")
        .map_err(WalletError::Internal)?;

        if result.rows_affected() == 0 {
            return Err(WalletError::WalletNotFound);
        }
        Ok(())
    }

    #[instrument(skip(self, query))]
    async fn list(&self, user_id: Uuid, query: &ListQuery) -> WalletResult<Vec<Wallet>> {
        let sort_column = SortKey::for_wallets(&query.sorting).column();

        let mut sql = String::from(
            "SELECT id, user_id, name, currency, balance, archived, created_at, updated_at \
             FROM wallets WHERE user_id = $1 AND archived = false",
        );
        let mut args_len = 1;
        push_list_clause(
            &mut sql,
            &mut args_len,
            "id, name, currency, balance, created_at, updated_at",
            query,
            sort_column,
        );

        let mut built = sqlx::query_as::<_, WalletRow>(&sql).bind(user_id);
        if !query.filter.is_empty() {
            built = built.bind(format!("%{}%", query.filter));
        }
        built = built.bind(query.normalized_limit());
        if query.offset > 0 {
            built = built.bind(query.offset);
        }

        let rows = built
            .fetch_all(&self.pool)
            .await
            .context("failed to list wallets")
            .map_err(WalletError::Internal)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    #[instrument(skip(self))]
    async fn get_currency(&self, wallet_id: Uuid) -> WalletResult<Currency> {
        self.get(wallet_id)
            .await?
            .map(|w| w.currency)
            .ok_or(WalletError::WalletNotFound)
    }
}
