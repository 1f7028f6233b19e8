//! End-to-end repository tests against a live Postgres instance. Skipped
//! (not `#[ignore]`d) when `DATABASE_URL` is unset, following
//! `apps/backend/tests/test_utils.rs`'s `setup_test_db` pattern.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use uuid::Uuid;

use wallet_core::domain::{ListQuery, WalletPatch};
use wallet_core::money::Currency;
use wallet_core::repository::{LedgerStore, MovementStore, SweepStore, UserStore, WalletStore};

use wallet_service::repositories::{
    PgLedgerStore, PgMovementStore, PgSweepStore, PgUserStore, PgWalletStore,
};

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping repository integration tests");
        return None;
    };

    Some(
        PgPool::connect(&database_url)
            .await
            .expect("failed to connect to test database"),
    )
}

async fn seed_user(pool: &PgPool) -> Uuid {
    let store = PgUserStore::new(pool.clone());
    let user_id = Uuid::new_v4();
    store
        .upsert_user(user_id, "active", false)
        .await
        .expect("failed to seed user");
    user_id
}

#[tokio::test]
async fn wallet_crud_and_listing() {
    let Some(pool) = test_pool().await else { return };
    let wallets = PgWalletStore::new(pool.clone());
    let movements = PgMovementStore::new(pool.clone());
    let user_id = seed_user(&pool).await;

    let created = wallets
        .create(user_id, "Rainy day fund", Currency::Usd)
        .await
        .expect("create should succeed");
    assert_eq!(created.balance, Decimal::ZERO);
    assert!(!created.archived);

    movements
        .deposit(created.id, Currency::Usd, dec!(100))
        .await
        .expect("seed deposit should succeed");

    let fetched = wallets
        .get(created.id)
        .await
        .expect("get should succeed")
        .expect("wallet should exist");
    assert_eq!(fetched.name, "Rainy day fund");

    let patched = wallets
        .update(
            created.id,
            WalletPatch {
                name: Some("Renamed".to_string()),
                currency: None,
            },
            Decimal::ONE,
        )
        .await
        .expect("update should succeed");
    assert_eq!(patched.name, "Renamed");

    let rebased = wallets
        .update(
            created.id,
            WalletPatch {
                name: None,
                currency: Some("EUR".to_string()),
            },
            dec!(2),
        )
        .await
        .expect("currency rebase should succeed");
    assert_eq!(rebased.currency, Currency::Eur);
    assert_eq!(rebased.balance, dec!(200));

    let listed = wallets
        .list(user_id, &ListQuery::default())
        .await
        .expect("list should succeed");
    assert!(listed.iter().any(|w| w.id == created.id));

    wallets.archive(created.id).await.expect("archive should succeed");
    let archived = wallets
        .get(created.id)
        .await
        .expect("get should succeed")
        .expect("wallet should still exist after archiving");
    assert!(archived.archived);
}

#[tokio::test]
async fn deposit_withdraw_and_ledger_listing() {
    let Some(pool) = test_pool().await else { return };
    let wallets = PgWalletStore::new(pool.clone());
    let movements = PgMovementStore::new(pool.clone());
    let ledger = PgLedgerStore::new(pool.clone());
    let user_id = seed_user(&pool).await;

    let wallet = wallets
        .create(user_id, "Checking", Currency::Usd)
        .await
        .expect("create should succeed");

    movements
        .deposit(wallet.id, Currency::Usd, dec!(100.00))
        .await
        .expect("deposit should succeed");

    let after_deposit = wallets.get(wallet.id).await.unwrap().unwrap();
    assert_eq!(after_deposit.balance, dec!(100.00));

    movements
        .withdraw(wallet.id, Currency::Usd, dec!(40.00))
        .await
        .expect("withdraw should succeed");

    let after_withdraw = wallets.get(wallet.id).await.unwrap().unwrap();
    assert_eq!(after_withdraw.balance, dec!(60.00));

    let insufficient = movements.withdraw(wallet.id, Currency::Usd, dec!(1000.00)).await;
    assert!(insufficient.is_err());

    let rows = ledger
        .list_tx(wallet.id, &ListQuery::default())
        .await
        .expect("ledger listing should succeed");
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn transfer_moves_money_between_wallets() {
    let Some(pool) = test_pool().await else { return };
    let wallets = PgWalletStore::new(pool.clone());
    let movements = PgMovementStore::new(pool.clone());
    let user_id = seed_user(&pool).await;

    let source = wallets.create(user_id, "Source", Currency::Usd).await.unwrap();
    let destination = wallets.create(user_id, "Destination", Currency::Usd).await.unwrap();

    movements
        .deposit(source.id, Currency::Usd, dec!(200.00))
        .await
        .unwrap();

    movements
        .transfer(source.id, destination.id, dec!(50.00), dec!(50.00), Currency::Usd)
        .await
        .expect("transfer should succeed");

    let source_after = wallets.get(source.id).await.unwrap().unwrap();
    let destination_after = wallets.get(destination.id).await.unwrap().unwrap();
    assert_eq!(source_after.balance, dec!(150.00));
    assert_eq!(destination_after.balance, dec!(50.00));
}

#[tokio::test]
async fn sweeper_archives_wallets_of_archived_inactive_users() {
    let Some(pool) = test_pool().await else { return };
    let users = PgUserStore::new(pool.clone());
    let wallets = PgWalletStore::new(pool.clone());
    let sweep = PgSweepStore::new(pool.clone());

    let user_id = Uuid::new_v4();
    users.upsert_user(user_id, "deleted", true).await.unwrap();
    let wallet = wallets.create(user_id, "Stale", Currency::Eur).await.unwrap();

    sqlx::query("UPDATE wallets SET updated_at = NOW() - INTERVAL '2 days' WHERE id = $1")
        .bind(wallet.id)
        .execute(&pool)
        .await
        .unwrap();

    let archived_users = sweep.archived_users().await.unwrap();
    assert!(archived_users.contains(&user_id));

    let inactive = sweep.inactive_wallets(user_id, 1).await.unwrap();
    assert!(inactive.contains(&wallet.id));

    sweep.archive_wallet(wallet.id).await.unwrap();
    let after = wallets.get(wallet.id).await.unwrap().unwrap();
    assert!(after.archived);
}
