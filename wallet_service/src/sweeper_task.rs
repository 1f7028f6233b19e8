//! C8's background task: ticks `wallet_core::sweeper::sweep_once` every
//! `interval`, grounded on
//! `examples/original_source/internal/wallet-cleanup/cleaner.go`'s
//! `time.NewTicker` loop.

use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use wallet_core::repository::SweepStore;
use wallet_core::sweeper::sweep_once;

pub async fn run_sweeper(
    store: &(impl SweepStore + ?Sized),
    interval: Duration,
    inactive_days: i64,
    cancel: CancellationToken,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("sweeper stopping on cancellation");
                return;
            }
            _ = ticker.tick() => {
                match sweep_once(store, inactive_days).await {
                    Ok(archived) if !archived.is_empty() => {
                        info!(count = archived.len(), "archived inactive wallets");
                    }
                    Ok(_) => {}
                    Err(err) => error!(%err, "sweep pass failed"),
                }
            }
        }
    }
}
