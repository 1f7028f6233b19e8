//! C5: read-only ledger listing, grounded on `GetTransactions`/`getTxQuery`
//! in `examples/original_source/internal/database/transaction.go`.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use wallet_core::domain::{ListQuery, SortKey, Transaction, TransactionKind};
use wallet_core::error::{WalletError, WalletResult};
use wallet_core::repository::LedgerStore;

use super::push_list_clause;

#[derive(Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TransactionRow {
    id: Uuid,
    kind: String,
    first_wallet: Uuid,
    second_wallet: Option<Uuid>,
    currency: String,
    money: rust_decimal::Decimal,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = WalletError;

    fn try_from(row: TransactionRow) -> WalletResult<Self> {
        let kind = match row.kind.as_str() {
            "deposit" => TransactionKind::Deposit,
            "withdraw" => TransactionKind::Withdraw,
            "transfer" => TransactionKind::Transfer,
            other => {
                return Err(WalletError::Internal(anyhow::anyhow!(
                    "unrecognized ledger kind: {other}"
                )))
            }
        };

        Ok(Transaction {
            id: row.id,
            kind,
            first_wallet_id: row.first_wallet,
            second_wallet_id: row.second_wallet,
            currency: row.currency.parse()?,
            money: row.money,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    /// Scoped to `first_wallet_id` only, per §9's resolution of the
    /// distilled spec's first open question: a wallet that is only ever a
    /// transfer *destination* does not show up here. See SPEC_FULL's design
    /// notes for why this wasn't widened.
    #[instrument(skip(self, query))]
    async fn list_tx(&self, wallet_id: Uuid, query: &ListQuery) -> WalletResult<Vec<Transaction>> {
        let sort_column = SortKey::for_ledger(&query.sorting).ledger_column();

        let mut sql = String::from(
            "SELECT id, name AS kind, first_wallet, second_wallet, currency, money, created_at \
             FROM transactions WHERE first_wallet = $1",
        );
        let mut args_len = 1;
        push_list_clause(
            &mut sql,
            &mut args_len,
            "id, name, currency, money, created_at",
            query,
            sort_column,
        );

        let mut built = sqlx::query_as::<_, TransactionRow>(&sql).bind(wallet_id);
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
            .context("failed to list transactions")
            .map_err(WalletError::Internal)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
