//! Storage- and transport-agnostic wallet domain logic.
//!
//! Concrete infrastructure (Postgres repositories, the HTTP surface, the
//! Kafka consumer/producer) lives in the `wallet_service` binary crate;
//! this crate only knows about the traits those pieces implement, so the
//! engine and sweeper can be unit tested against in-memory fakes.

pub mod domain;
pub mod engine;
pub mod error;
pub mod events;
pub mod money;
pub mod rate;
pub mod repository;
pub mod sweeper;

pub use error::{WalletError, WalletResult};
