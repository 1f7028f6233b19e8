use std::sync::Arc;

use wallet_core::engine::MovementEngine;

use crate::auth::AuthState;
use crate::kafka::KafkaEventPublisher;
use crate::rate_client::ReqwestRateOracle;
use crate::repositories::{PgLedgerStore, PgMovementStore, PgUserStore, PgWalletStore};

pub type Engine = MovementEngine<PgMovementStore, ReqwestRateOracle, KafkaEventPublisher>;

/// Everything the HTTP handlers need, shared behind `Arc` so `AppState`
/// stays cheap to clone into every `axum::Router::with_state` call.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub wallets: Arc<PgWalletStore>,
    pub ledger: Arc<PgLedgerStore>,
    pub users: Arc<PgUserStore>,
    pub engine: Arc<Engine>,
    /// Shared with the engine's own copy; the `PATCH` handler also needs a
    /// rate lookup for the currency-rebase case outside the movement engine.
    pub rate: Arc<ReqwestRateOracle>,
}
