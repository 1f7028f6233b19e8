//! C7: publishes completed movements to `transaction_updates`. The wallet
//! domain here is close enough to `apps/backend`'s general shape that the
//! crate reaches for `rdkafka` — the one real Kafka client in the Rust
//! ecosystem the rest of the pack never needed, since none of the five
//! example repos talk to Kafka (see DESIGN.md).

use async_trait::async_trait;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use tracing::instrument;

use wallet_core::domain::Transaction;
use wallet_core::error::{WalletError, WalletResult};
use wallet_core::events::EventPublisher;

use super::TRANSACTION_UPDATES_TOPIC;

#[derive(Clone)]
pub struct KafkaEventPublisher {
    producer: FutureProducer,
}

impl KafkaEventPublisher {
    pub fn new(brokers: &str) -> WalletResult<Self> {
        let producer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|err| WalletError::Internal(anyhow::Error::new(err).context("failed to create Kafka producer")))?;

        Ok(Self { producer })
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    /// §4.7: the wire payload is identical to the HTTP representation of a
    /// `Transaction`; `tx.id` is the idempotency key consumers must key on.
    #[instrument(skip(self, tx))]
    async fn publish(&self, tx: &Transaction) -> WalletResult<()> {
        let payload = serde_json::to_vec(tx)
            .map_err(|err| WalletError::Internal(anyhow::Error::new(err).context("failed to encode transaction event")))?;
        let key = tx.id.to_string();

        let record = FutureRecord::to(TRANSACTION_UPDATES_TOPIC)
            .key(&key)
            .payload(&payload);

        self.producer
            .send(record, std::time::Duration::from_secs(5))
            .await
            .map_err(|(err, _)| WalletError::Internal(anyhow::Error::new(err).context("failed to publish transaction event")))?;

        Ok(())
    }
}
