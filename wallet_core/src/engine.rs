//! C6: the movement engine. The three public operations each compose a
//! single `MovementStore` transaction, an optional `RateOracle` lookup, and
//! a post-commit `EventPublisher` emission (§4.6, §4.7).
//!
//! Generic over its three collaborators so it can run against in-memory
//! fakes in tests and against the Postgres/reqwest/Kafka implementations in
//! `wallet_service` without any code changing between the two.

use std::marker::PhantomData;

use rust_decimal::Decimal;

use crate::domain::{Movement, Transaction};
use crate::error::{WalletError, WalletResult};
use crate::events::EventPublisher;
use crate::money::valid_amount;
use crate::rate::RateOracle;
use crate::repository::MovementStore;

#[derive(Clone)]
pub struct MovementEngine<S, R, P>
where
    S: MovementStore,
    R: RateOracle,
    P: EventPublisher,
{
    store: S,
    rate: R,
    events: P,
    _marker: PhantomData<(S, R, P)>,
}

impl<S, R, P> MovementEngine<S, R, P>
where
    S: MovementStore,
    R: RateOracle,
    P: EventPublisher,
{
    pub fn new(store: S, rate: R, events: P) -> Self {
        Self {
            store,
            rate,
            events,
            _marker: PhantomData,
        }
    }

    /// §4.6.1. `valid_tx` (non-empty wallet id, positive amount) is checked
    /// here; everything past that happens inside `MovementStore::deposit`'s
    /// single `FOR UPDATE` transaction.
    pub async fn deposit(&self, movement: Movement) -> WalletResult<Transaction> {
        let (wallet_id, currency, money) = match movement {
            Movement::Deposit {
                wallet_id,
                currency,
                money,
            } => (wallet_id, currency, money),
            _ => return Err(WalletError::Internal(anyhow::anyhow!("not a deposit"))),
        };
        valid_amount(money)?;

        let tx = self.store.deposit(wallet_id, currency, money).await?;
        self.emit(&tx).await?;
        Ok(tx)
    }

    /// §4.6.2. Identical shape to deposit; `MovementStore::withdraw` is the
    /// one that enforces `balance >= money`.
    pub async fn withdraw(&self, movement: Movement) -> WalletResult<Transaction> {
        let (wallet_id, currency, money) = match movement {
            Movement::Withdraw {
                wallet_id,
                currency,
                money,
            } => (wallet_id, currency, money),
            _ => return Err(WalletError::Internal(anyhow::anyhow!("not a withdrawal"))),
        };
        valid_amount(money)?;

        let tx = self.store.withdraw(wallet_id, currency, money).await?;
        self.emit(&tx).await?;
        Ok(tx)
    }

    /// §4.6.3. Self-transfer is rejected before anything touches storage, as
    /// `InvalidTransfer` (§9 resolves the original spec's "undefined
    /// behavior" note in favor of a dedicated error rather than reusing
    /// `WalletNotFound`, which would be misleading when both wallets exist).
    ///
    /// The FX lookup happens before the storage transaction opens, per the
    /// "rate freshness" note in §4.6.3 — never hold a row lock across the
    /// external rate-oracle call.
    pub async fn transfer(&self, movement: Movement) -> WalletResult<Transaction> {
        let (source_wallet_id, destination_wallet_id, currency, money) = match movement {
            Movement::Transfer {
                source_wallet_id,
                destination_wallet_id,
                currency,
                money,
            } => (source_wallet_id, destination_wallet_id, currency, money),
            _ => return Err(WalletError::Internal(anyhow::anyhow!("not a transfer"))),
        };
        valid_amount(money)?;
        if source_wallet_id == destination_wallet_id {
            return Err(WalletError::InvalidTransfer);
        }

        let destination_currency = self.store.get_currency(destination_wallet_id).await?;
        let rate = if currency == destination_currency {
            Decimal::ONE
        } else {
            self.rate
                .get_rate(currency, destination_currency)
                .await
                .map_err(|_| WalletError::RateUnavailable)?
        };
        let destination_money = money * rate;

        let tx = self
            .store
            .transfer(
                source_wallet_id,
                destination_wallet_id,
                money,
                destination_money,
                currency,
            )
            .await?;
        self.emit(&tx).await?;
        Ok(tx)
    }

    /// §4.7: publish failure is a top-level error even though the balance
    /// change already committed. Callers see a successful balance mutation
    /// followed by a failed request; the ledger row is the source of truth.
    async fn emit(&self, tx: &Transaction) -> WalletResult<()> {
        self.events.publish(tx).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use super::*;
    use crate::money::Currency;

    struct FakeStore {
        wallets: Mutex<std::collections::HashMap<Uuid, (Currency, Decimal)>>,
    }

    impl FakeStore {
        fn new(wallets: Vec<(Uuid, Currency, Decimal)>) -> Self {
            Self {
                wallets: Mutex::new(
                    wallets
                        .into_iter()
                        .map(|(id, c, b)| (id, (c, b)))
                        .collect(),
                ),
            }
        }
    }

    #[async_trait]
    impl MovementStore for FakeStore {
        async fn get_currency(&self, wallet_id: Uuid) -> WalletResult<Currency> {
            self.wallets
                .lock()
                .unwrap()
                .get(&wallet_id)
                .map(|(c, _)| *c)
                .ok_or(WalletError::WalletNotFound)
        }

        async fn deposit(
            &self,
            wallet_id: Uuid,
            currency: Currency,
            money: Decimal,
        ) -> WalletResult<Transaction> {
            let mut wallets = self.wallets.lock().unwrap();
            let (wallet_currency, balance) =
                wallets.get_mut(&wallet_id).ok_or(WalletError::WalletNotFound)?;
            if *wallet_currency != currency {
                return Err(WalletError::WrongCurrency(currency.to_string()));
            }
            *balance += money;
            Ok(Transaction {
                id: Uuid::new_v4(),
                kind: crate::domain::TransactionKind::Deposit,
                first_wallet_id: wallet_id,
                second_wallet_id: None,
                currency,
                money,
                created_at: chrono::Utc::now(),
            })
        }

        async fn withdraw(
            &self,
            wallet_id: Uuid,
            currency: Currency,
            money: Decimal,
        ) -> WalletResult<Transaction> {
            let mut wallets = self.wallets.lock().unwrap();
            let (wallet_currency, balance) =
                wallets.get_mut(&wallet_id).ok_or(WalletError::WalletNotFound)?;
            if *wallet_currency != currency {
                return Err(WalletError::WrongCurrency(currency.to_string()));
            }
            if *balance < money {
                return Err(WalletError::InsufficientFunds(currency));
            }
            *balance -= money;
            Ok(Transaction {
                id: Uuid::new_v4(),
                kind: crate::domain::TransactionKind::Withdraw,
                first_wallet_id: wallet_id,
                second_wallet_id: None,
                currency,
                money,
                created_at: chrono::Utc::now(),
            })
        }

        async fn transfer(
            &self,
            source_wallet_id: Uuid,
            destination_wallet_id: Uuid,
            source_money: Decimal,
            destination_money: Decimal,
            currency: Currency,
        ) -> WalletResult<Transaction> {
            let mut wallets = self.wallets.lock().unwrap();
            {
                let (source_currency, source_balance) = wallets
                    .get(&source_wallet_id)
                    .copied()
                    .ok_or(WalletError::WalletNotFound)?;
                if source_currency != currency {
                    return Err(WalletError::WrongCurrency(currency.to_string()));
                }
                if source_balance < source_money {
                    return Err(WalletError::InsufficientFunds(currency));
                }
            }
            if !wallets.contains_key(&destination_wallet_id) {
                return Err(WalletError::WalletNotFound);
            }
            wallets.get_mut(&source_wallet_id).unwrap().1 -= source_money;
            wallets.get_mut(&destination_wallet_id).unwrap().1 += destination_money;
            Ok(Transaction {
                id: Uuid::new_v4(),
                kind: crate::domain::TransactionKind::Transfer,
                first_wallet_id: source_wallet_id,
                second_wallet_id: Some(destination_wallet_id),
                currency,
                money: source_money,
                created_at: chrono::Utc::now(),
            })
        }
    }

    struct FakeRate(Decimal);

    #[async_trait]
    impl RateOracle for FakeRate {
        async fn get_rate(&self, _from: Currency, _to: Currency) -> WalletResult<Decimal> {
            Ok(self.0)
        }
    }

    struct FakePublisher {
        published: Mutex<Vec<Transaction>>,
        fail: bool,
    }

    impl FakePublisher {
        fn new(fail: bool) -> Self {
            Self {
                published: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl EventPublisher for FakePublisher {
        async fn publish(&self, tx: &Transaction) -> WalletResult<()> {
            if self.fail {
                return Err(WalletError::Internal(anyhow::anyhow!("broker unreachable")));
            }
            self.published.lock().unwrap().push(tx.clone());
            Ok(())
        }
    }

    fn engine(
        wallets: Vec<(Uuid, Currency, Decimal)>,
        rate: Decimal,
        publish_fails: bool,
    ) -> MovementEngine<FakeStore, FakeRate, FakePublisher> {
        MovementEngine::new(
            FakeStore::new(wallets),
            FakeRate(rate),
            FakePublisher::new(publish_fails),
        )
    }

    #[tokio::test]
    async fn deposit_credits_the_wallet() {
        let wallet_id = Uuid::new_v4();
        let eng = engine(vec![(wallet_id, Currency::Usd, dec!(10))], dec!(1), false);

        let tx = eng
            .deposit(Movement::Deposit {
                wallet_id,
                currency: Currency::Usd,
                money: dec!(5),
            })
            .await
            .unwrap();

        assert_eq!(tx.money, dec!(5));
        assert_eq!(eng.store.get_currency(wallet_id).await.unwrap(), Currency::Usd);
    }

    #[tokio::test]
    async fn withdraw_rejects_insufficient_funds() {
        let wallet_id = Uuid::new_v4();
        let eng = engine(vec![(wallet_id, Currency::Usd, dec!(10))], dec!(1), false);

        let err = eng
            .withdraw(Movement::Withdraw {
                wallet_id,
                currency: Currency::Usd,
                money: dec!(20),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, WalletError::InsufficientFunds(Currency::Usd)));
    }

    #[tokio::test]
    async fn transfer_applies_the_captured_rate_to_the_destination_only() {
        let source = Uuid::new_v4();
        let destination = Uuid::new_v4();
        let eng = engine(
            vec![
                (source, Currency::Usd, dec!(100)),
                (destination, Currency::Eur, dec!(0)),
            ],
            dec!(2),
            false,
        );

        let tx = eng
            .transfer(Movement::Transfer {
                source_wallet_id: source,
                destination_wallet_id: destination,
                currency: Currency::Usd,
                money: dec!(10),
            })
            .await
            .unwrap();

        assert_eq!(tx.money, dec!(10));
        assert_eq!(tx.currency, Currency::Usd);
    }

    #[tokio::test]
    async fn self_transfer_is_rejected_before_any_storage_access() {
        let wallet_id = Uuid::new_v4();
        let eng = engine(vec![(wallet_id, Currency::Usd, dec!(10))], dec!(1), false);

        let err = eng
            .transfer(Movement::Transfer {
                source_wallet_id: wallet_id,
                destination_wallet_id: wallet_id,
                currency: Currency::Usd,
                money: dec!(1),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, WalletError::InvalidTransfer));
    }

    #[tokio::test]
    async fn transfer_to_missing_destination_fails_before_mutating_source() {
        let source = Uuid::new_v4();
        let eng = engine(vec![(source, Currency::Usd, dec!(10))], dec!(1), false);

        let err = eng
            .transfer(Movement::Transfer {
                source_wallet_id: source,
                destination_wallet_id: Uuid::new_v4(),
                currency: Currency::Usd,
                money: dec!(1),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, WalletError::WalletNotFound));
        assert_eq!(
            eng.store.wallets.lock().unwrap().get(&source).unwrap().1,
            dec!(10)
        );
    }

    #[tokio::test]
    async fn publish_failure_surfaces_after_the_balance_change_already_committed() {
        let wallet_id = Uuid::new_v4();
        let eng = engine(vec![(wallet_id, Currency::Usd, dec!(10))], dec!(1), true);

        let err = eng
            .deposit(Movement::Deposit {
                wallet_id,
                currency: Currency::Usd,
                money: dec!(5),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, WalletError::Internal(_)));
        assert_eq!(
            eng.store.wallets.lock().unwrap().get(&wallet_id).unwrap().1,
            dec!(15)
        );
    }
}
