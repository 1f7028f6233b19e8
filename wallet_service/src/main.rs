use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use wallet_service::auth::AuthState;
use wallet_service::config::Config;
use wallet_service::kafka::{self, KafkaEventPublisher};
use wallet_service::rate_client::ReqwestRateOracle;
use wallet_service::repositories::{self, PgLedgerStore, PgMovementStore, PgUserStore, PgWalletStore};
use wallet_service::state::AppState;
use wallet_service::{db, http};
use wallet_core::engine::MovementEngine;

const GRACEFUL_SHUTDOWN: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("invalid configuration");

    let pool = db::init_pool(&config.postgres_dsn)
        .await
        .expect("failed to connect to Postgres");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run database migrations");

    let wallets = Arc::new(PgWalletStore::new(pool.clone()));
    let ledger = Arc::new(PgLedgerStore::new(pool.clone()));
    let users = Arc::new(PgUserStore::new(pool.clone()));
    let movements = PgMovementStore::new(pool.clone());

    let rate_oracle = ReqwestRateOracle::new(config.rate_oracle_url.clone());
    let events = KafkaEventPublisher::new(&config.kafka_brokers).expect("failed to create Kafka producer");
    let engine = Arc::new(MovementEngine::new(movements, rate_oracle.clone(), events));

    let app_state = AppState {
        auth: AuthState::new(&config.jwt_secret),
        wallets: wallets.clone(),
        ledger,
        users: users.clone(),
        engine,
        rate: Arc::new(rate_oracle),
    };

    let cancel = CancellationToken::new();

    let sweep_cancel = cancel.clone();
    let sweep_repo = repositories::PgSweepStore::new(pool.clone());
    let sweep_interval = Duration::from_secs(config.sweep_interval_hours * 3600);
    let sweep_inactive_days = config.sweep_inactive_days;
    let sweeper_handle = tokio::spawn(async move {
        wallet_service::sweeper_task::run_sweeper(&sweep_repo, sweep_interval, sweep_inactive_days, sweep_cancel)
            .await;
    });

    let consumer_cancel = cancel.clone();
    let consumer_brokers = config.kafka_brokers.clone();
    let consumer_users = users.clone();
    let consumer_handle = tokio::spawn(async move {
        if let Err(err) =
            kafka::run_user_stream_consumer(&consumer_brokers, consumer_users.as_ref(), consumer_cancel).await
        {
            error!(%err, "user stream consumer exited");
        }
    });

    let app = http::router(app_state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.app_port))
        .await
        .expect("failed to bind listener");
    info!(port = config.app_port, "wallet_service listening");

    let server_cancel = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            server_cancel.cancel();
        })
        .await
        .expect("server error");

    cancel.cancel();
    let _ = tokio::time::timeout(GRACEFUL_SHUTDOWN, async {
        let _ = sweeper_handle.await;
        let _ = consumer_handle.await;
    })
    .await;

    Ok(())
}

/// Mirrors the original `gracefulTimeout` shutdown window
/// (`examples/original_source/internal/server/server.go`): 10s to drain
/// in-flight work after SIGINT/SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
