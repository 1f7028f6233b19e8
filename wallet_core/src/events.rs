//! C7: publishing completed movements onto the `transaction_updates` topic.

use async_trait::async_trait;

use crate::domain::Transaction;
use crate::error::WalletResult;

/// Called once per completed movement, after the ledger row has committed
/// (distilled spec §4.6, §4.7). A publish failure is surfaced as a top-level
/// error even though the balance change itself is already durable — see
/// `engine::MovementEngine` for how callers are expected to handle that.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, tx: &Transaction) -> WalletResult<()>;
}
