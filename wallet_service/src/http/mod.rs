pub mod error;
pub mod transactions;
pub mod wallets;

use std::time::Duration;

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::state::AppState;

/// Builds the `/api/v1/wallets` router (§6) with the ambient middleware
/// stack grounded on `apps/backend/src/auth.rs`'s
/// `create_security_middleware`/`create_rate_limiter`: CORS, request
/// tracing, a timeout, a body-size cap, and a governor-based rate limit,
/// stacked outside the auth gate.
pub fn router(state: AppState) -> Router {
    let governor_conf = Box::new(
        GovernorConfigBuilder::default()
            .per_second(20)
            .burst_size(40)
            .finish()
            .expect("valid governor configuration"),
    );

    let wallets_router = Router::new()
        .route("/", post(wallets::create_wallet).get(wallets::list_wallets))
        .route(
            "/{id}",
            get(wallets::get_wallet)
                .patch(wallets::update_wallet)
                .delete(wallets::delete_wallet),
        )
        .route("/{id}/deposit", put(transactions::deposit))
        .route("/{id}/withdraw", put(transactions::withdraw))
        .route("/{id}/transfer", put(transactions::transfer))
        .route("/{id}/transactions", get(transactions::list_transactions))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/v1/wallets", wallets_router)
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                .layer(GovernorLayer::new(governor_conf)),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
