//! C6's storage half: the three atomic procedures from §4.6, each one
//! `BEGIN ... FOR UPDATE ... COMMIT`. Grounded on
//! `examples/original_source/internal/database/transaction.go`
//! (`Deposit`/`WithdrawMoney`/`Transfer`/`getWalletTx`), translated from
//! pgx's row-locking idiom to sqlx's `Transaction<'_, Postgres>`.

use anyhow::Context;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction as SqlxTx};
use tracing::instrument;
use uuid::Uuid;

use wallet_core::domain::{Transaction, TransactionKind};
use wallet_core::error::{WalletError, WalletResult};
use wallet_core::money::Currency;
use wallet_core::repository::MovementStore;

#[derive(Clone)]
pub struct PgMovementStore {
    pool: PgPool,
}

impl PgMovementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct LockedWallet {
    currency: String,
    balance: Decimal,
}

/// §4.6.1 step 2: `SELECT ... FOR UPDATE` scoped to the wallet's id only —
/// unlike the original reference, which also scopes by `user_id`, ownership
/// here is already established by the HTTP handler resolving the wallet
/// through `WalletStore::get` before calling into the engine.
async fn lock_wallet(
    tx: &mut SqlxTx<'_, Postgres>,
    wallet_id: Uuid,
) -> WalletResult<LockedWallet> {
    sqlx::query_as::<_, LockedWallet>(
        "SELECT currency, balance FROM wallets WHERE id = $1 AND archived = false FOR UPDATE",
    )
    .bind(wallet_id)
    .fetch_optional(&mut **tx)
    .await
    .context("failed to lock wallet row")
    .map_err(WalletError::Internal)?
    .ok_or(WalletError::WalletNotFound)
}

async fn append_ledger_row(
    tx: &mut SqlxTx<'_, Postgres>,
    kind: TransactionKind,
    first_wallet_id: Uuid,
    second_wallet_id: Option<Uuid>,
    currency: Currency,
    money: Decimal,
) -> WalletResult<Transaction> {
    let kind_str = match kind {
        TransactionKind::Deposit => "deposit",
        TransactionKind::Withdraw => "withdraw",
        TransactionKind::Transfer => "transfer",
    };

    let row: (Uuid, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
        r#"
        INSERT INTO transactions (id, name, first_wallet, second_wallet, currency, money, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        RETURNING id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(kind_str)
    .bind(first_wallet_id)
    .bind(second_wallet_id)
    .bind(currency.code())
    .bind(money)
    .fetch_one(&mut **tx)
    .await
    .map_err(|err| match err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            WalletError::WalletNotFound
        }
        other => WalletError::Internal(anyhow::Error::new(other).context("failed to append ledger row")),
    })?;

    Ok(Transaction {
        id: row.0,
        kind,
        first_wallet_id,
        second_wallet_id,
        currency,
        money,
        created_at: row.1,
    })
}

#[async_trait]
impl MovementStore for PgMovementStore {
    #[instrument(skip(self))]
    async fn get_currency(&self, wallet_id: Uuid) -> WalletResult<Currency> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT currency FROM wallets WHERE id = $1 AND archived = false")
                .bind(wallet_id)
                .fetch_optional(&self.pool)
                .await
                .context("failed to read wallet currency")
                .map_err(WalletError::Internal)?;

        match row {
            Some((code,)) => code.parse(),
            None => Err(WalletError::WalletNotFound),
        }
    }

    /// §4.6.1.
    #[instrument(skip(self))]
    async fn deposit(
        &self,
        wallet_id: Uuid,
        currency: Currency,
        money: Decimal,
    ) -> WalletResult<Transaction> {
        let mut tx = self.pool.begin().await.context("failed to begin transaction").map_err(WalletError::Internal)?;

        let wallet = lock_wallet(&mut tx, wallet_id).await?;
        let wallet_currency: Currency = wallet.currency.parse()?;
        if wallet_currency != currency {
            return Err(WalletError::WrongCurrency(currency.to_string()));
        }

        let result = sqlx::query(
            "UPDATE wallets SET balance = balance + $2, updated_at = NOW() WHERE id = $1 AND archived = false",
        )
        .bind(wallet_id)
        .bind(money)
        .execute(&mut *tx)
        .await
        .context("failed to update balance")
        .map_err(WalletError::Internal)?;

        if result.rows_affected() == 0 {
            return Err(WalletError::WalletNotFound);
        }

        let ledger_tx = append_ledger_row(&mut tx, TransactionKind::Deposit, wallet_id, None, currency, money).await?;

        tx.commit().await.context("failed to commit deposit").map_err(WalletError::Internal)?;
        Ok(ledger_tx)
    }

    /// §4.6.2.
    #[instrument(skip(self))]
    async fn withdraw(
        &self,
        wallet_id: Uuid,
        currency: Currency,
        money: Decimal,
    ) -> WalletResult<Transaction> {
        let mut tx = self.pool.begin().await.context("failed to begin transaction").map_err(WalletError::Internal)?;

        let wallet = lock_wallet(&mut tx, wallet_id).await?;
        let wallet_currency: Currency = wallet.currency.parse()?;
        if wallet_currency != currency {
            return Err(WalletError::WrongCurrency(currency.to_string()));
        }
        if wallet.balance < money {
            return Err(WalletError::InsufficientFunds(currency));
        }

        let result = sqlx::query(
            "UPDATE wallets SET balance = balance - $2, updated_at = NOW() WHERE id = $1 AND archived = false",
        )
        .bind(wallet_id)
        .bind(money)
        .execute(&mut *tx)
        .await
        .context("failed to update balance")
        .map_err(WalletError::Internal)?;

        if result.rows_affected() == 0 {
            return Err(WalletError::WalletNotFound);
        }

        let ledger_tx = append_ledger_row(&mut tx, TransactionKind::Withdraw, wallet_id, None, currency, money).await?;

        tx.commit().await.context("failed to commit withdrawal").map_err(WalletError::Internal)?;
        Ok(ledger_tx)
    }

    /// §4.6.3. `destination_money` is the already rate-converted amount,
    /// computed by the engine before this transaction opened.
    #[instrument(skip(self))]
    async fn transfer(
        &self,
        source_wallet_id: Uuid,
        destination_wallet_id: Uuid,
        source_money: Decimal,
        destination_money: Decimal,
        currency: Currency,
    ) -> WalletResult<Transaction> {
        let mut tx = self.pool.begin().await.context("failed to begin transaction").map_err(WalletError::Internal)?;

        let source = lock_wallet(&mut tx, source_wallet_id).await?;
        let source_currency: Currency = source.currency.parse()?;
        if source_currency != currency {
            return Err(WalletError::WrongCurrency(currency.to_string()));
        }
        if source.balance < source_money {
            return Err(WalletError::InsufficientFunds(currency));
        }

        let source_result = sqlx::query(
            "UPDATE wallets SET balance = balance - $2, updated_at = NOW() WHERE id = $1 AND archived = false",
        )
        .bind(source_wallet_id)
        .bind(source_money)
        .execute(&mut *tx)
        .await
        .context("failed to debit source wallet")
        .map_err(WalletError::Internal)?;

        let destination_result = sqlx::query(
            "UPDATE wallets SET balance = balance + $2, updated_at = NOW() WHERE id = $1 AND archived = false",
        )
        .bind(destination_wallet_id)
        .bind(destination_money)
        .execute(&mut *tx)
        .await
        .context("failed to credit destination wallet")
        .map_err(WalletError::Internal)?;

        if source_result.rows_affected() == 0 || destination_result.rows_affected() == 0 {
            return Err(WalletError::WalletNotFound);
        }

        let ledger_tx = append_ledger_row(
            &mut tx,
            TransactionKind::Transfer,
            source_wallet_id,
            Some(destination_wallet_id),
            currency,
            source_money,
        )
        .await?;

        tx.commit().await.context("failed to commit transfer").map_err(WalletError::Internal)?;
        Ok(ledger_tx)
    }
}
