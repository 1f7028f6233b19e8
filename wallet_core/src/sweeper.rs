//! C8: the inactive-wallet sweeper. `sweep_once` is the idempotent unit of
//! work the background task in `wallet_service` ticks every 24h (§4.8); it
//! takes no locks beyond whatever `SweepStore::archive_wallet` needs and is
//! safe to re-run if interrupted mid-batch.

use uuid::Uuid;

use crate::error::WalletResult;
use crate::repository::SweepStore;

/// §9 resolves the distilled spec's "typical threshold = 12 months" as a
/// flat day count rather than a calendar-month computation, to sidestep
/// month-length ambiguity; 365 approximates a year.
pub const DEFAULT_INACTIVE_DAYS: i64 = 365;

/// Archives every wallet owned by an archived user that has been idle for
/// at least `inactive_days`. Returns the wallet ids archived in this pass.
pub async fn sweep_once(store: &impl SweepStore, inactive_days: i64) -> WalletResult<Vec<Uuid>> {
    let mut archived = Vec::new();
    for user_id in store.archived_users().await? {
        for wallet_id in store.inactive_wallets(user_id, inactive_days).await? {
            store.archive_wallet(wallet_id).await?;
            archived.push(wallet_id);
        }
    }
    Ok(archived)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct FakeSweepStore {
        archived_users: Vec<Uuid>,
        inactive: std::collections::HashMap<Uuid, Vec<Uuid>>,
        archived_wallets: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl SweepStore for FakeSweepStore {
        async fn archived_users(&self) -> WalletResult<Vec<Uuid>> {
            Ok(self.archived_users.clone())
        }

        async fn inactive_wallets(&self, user_id: Uuid, _inactive_days: i64) -> WalletResult<Vec<Uuid>> {
            Ok(self.inactive.get(&user_id).cloned().unwrap_or_default())
        }

        async fn archive_wallet(&self, wallet_id: Uuid) -> WalletResult<()> {
            self.archived_wallets.lock().unwrap().push(wallet_id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn archives_every_inactive_wallet_of_every_archived_user() {
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();
        let wallet_a1 = Uuid::new_v4();
        let wallet_b1 = Uuid::new_v4();

        let mut inactive = std::collections::HashMap::new();
        inactive.insert(user_a, vec![wallet_a1]);
        inactive.insert(user_b, vec![wallet_b1]);

        let store = FakeSweepStore {
            archived_users: vec![user_a, user_b],
            inactive,
            archived_wallets: Mutex::new(Vec::new()),
        };

        let archived = sweep_once(&store, DEFAULT_INACTIVE_DAYS).await.unwrap();

        assert_eq!(archived.len(), 2);
        assert!(archived.contains(&wallet_a1));
        assert!(archived.contains(&wallet_b1));
    }

    #[tokio::test]
    async fn a_user_with_no_inactive_wallets_archives_nothing() {
        let user = Uuid::new_v4();
        let store = FakeSweepStore {
            archived_users: vec![user],
            inactive: std::collections::HashMap::new(),
            archived_wallets: Mutex::new(Vec::new()),
        };

        let archived = sweep_once(&store, DEFAULT_INACTIVE_DAYS).await.unwrap();

        assert!(archived.is_empty());
    }
}
