pub mod consumer;
pub mod producer;

pub use consumer::run_user_stream_consumer;
pub use producer::KafkaEventPublisher;

pub const USER_UPDATES_TOPIC: &str = "user_updates";
pub const TRANSACTION_UPDATES_TOPIC: &str = "transaction_updates";
