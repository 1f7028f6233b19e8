//! Storage traits. Concrete Postgres implementations live in
//! `wallet_service::repositories`; tests in this crate use in-memory fakes.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{ListQuery, Transaction, User, Wallet, WalletPatch};
use crate::error::WalletResult;
use crate::money::Currency;

/// C2: the local projection of upstream identity state.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Idempotent on `user_id` (distilled spec §4.2): inserts on first sight,
    /// otherwise updates `status`/`archived` and bumps `updated_at`.
    async fn upsert_user(&self, user_id: Uuid, status: &str, archived: bool) -> WalletResult<User>;

    async fn get_user(&self, user_id: Uuid) -> WalletResult<Option<User>>;
}

/// C4: wallet CRUD and listing.
#[async_trait]
pub trait WalletStore: Send + Sync {
    async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        currency: Currency,
    ) -> WalletResult<Wallet>;

    async fn get(&self, wallet_id: Uuid) -> WalletResult<Option<Wallet>>;

    /// Applies `patch` to the wallet. `rate` is the multiplier from the
    /// wallet's current currency to `patch.currency` (1 when the currency
    /// isn't changing), captured by the caller through the same
    /// `RateOracle` the movement engine uses (§4.4, §4.6) *before* this is
    /// called. The rebase `balance ← balance × rate` happens in the same
    /// row-locked transaction as the rest of the patch (§4.4.2).
    async fn update(&self, wallet_id: Uuid, patch: WalletPatch, rate: Decimal) -> WalletResult<Wallet>;

    /// Soft-archives the wallet (`archived = true`); never a hard delete
    /// (distilled spec §4.4, "Delete").
    async fn archive(&self, wallet_id: Uuid) -> WalletResult<()>;

    async fn list(&self, user_id: Uuid, query: &ListQuery) -> WalletResult<Vec<Wallet>>;

    async fn get_currency(&self, wallet_id: Uuid) -> WalletResult<Currency>;
}

/// C5: read-only ledger access. Rows are appended by `MovementStore`, not
/// through this trait, so the ledger stays append-only end to end.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn list_tx(&self, wallet_id: Uuid, query: &ListQuery) -> WalletResult<Vec<Transaction>>;
}

/// C6: the three atomic balance-changing procedures. Each method owns its
/// entire `BEGIN ... FOR UPDATE ... COMMIT` transaction (§4.6) so the engine
/// never has to thread a transaction handle across the trait boundary.
#[async_trait]
pub trait MovementStore: Send + Sync {
    async fn get_currency(&self, wallet_id: Uuid) -> WalletResult<Currency>;

    async fn deposit(
        &self,
        wallet_id: Uuid,
        currency: Currency,
        money: Decimal,
    ) -> WalletResult<Transaction>;

    async fn withdraw(
        &self,
        wallet_id: Uuid,
        currency: Currency,
        money: Decimal,
    ) -> WalletResult<Transaction>;

    /// `money` is always denominated in the source wallet's currency; if the
    /// destination wallet uses a different currency the caller has already
    /// converted it via the `RateOracle` before calling this (§4.6.3).
    async fn transfer(
        &self,
        source_wallet_id: Uuid,
        destination_wallet_id: Uuid,
        source_money: Decimal,
        destination_money: Decimal,
        currency: Currency,
    ) -> WalletResult<Transaction>;
}

/// C8: the inactive-wallet sweeper's storage needs.
#[async_trait]
pub trait SweepStore: Send + Sync {
    /// Every archived user whose wallets have not yet been archived.
    async fn archived_users(&self) -> WalletResult<Vec<Uuid>>;

    /// Wallets belonging to `user_id` untouched for at least `inactive_days`.
    async fn inactive_wallets(&self, user_id: Uuid, inactive_days: i64) -> WalletResult<Vec<Uuid>>;

    async fn archive_wallet(&self, wallet_id: Uuid) -> WalletResult<()>;
}
