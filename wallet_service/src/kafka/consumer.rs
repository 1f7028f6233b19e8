//! C10: the user-stream consumer, grounded on
//! `examples/original_source/internal/consumer/consumer.go` — same shape
//! (consume from newest offset, decode, call the upsert), translated from
//! sarama's partition consumer to `rdkafka`'s `StreamConsumer`.

use rdkafka::config::RDKafkaLogLevel;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::{ClientConfig, Message};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use wallet_core::domain::UserProjection;
use wallet_core::repository::UserStore;

use super::USER_UPDATES_TOPIC;

/// Runs until `cancel` fires or a decode/upsert failure makes the stream
/// unrecoverable — fatal per §4.10 ("message decode failure or upsert
/// failure is fatal to the consumer; restart policy is the supervisor's
/// concern").
pub async fn run_user_stream_consumer(
    brokers: &str,
    store: &(impl UserStore + ?Sized),
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", brokers)
        .set("group.id", "wallet_service")
        .set("auto.offset.reset", "latest")
        .set("enable.auto.commit", "true")
        .set_log_level(RDKafkaLogLevel::Warning)
        .create()?;

    consumer.subscribe(&[USER_UPDATES_TOPIC])?;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("user stream consumer stopping on cancellation");
                return Ok(());
            }
            message = consumer.recv() => {
                let message = message?;
                let Some(payload) = message.payload() else {
                    warn!("user update message with no payload, skipping");
                    continue;
                };

                let projection: UserProjection = serde_json::from_slice(payload)
                    .map_err(|err| anyhow::anyhow!("failed to decode user projection: {err}"))?;

                store
                    .upsert_user(projection.user_id, &projection.status, projection.archived)
                    .await
                    .map_err(|err| anyhow::anyhow!("failed to upsert user {}: {err}", projection.user_id))?;
            }
        }
    }
}

