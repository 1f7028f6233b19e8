//! C3: the exchange-rate oracle the engine consults whenever a transfer or
//! currency change crosses currencies.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::WalletResult;
use crate::money::Currency;

/// Only ever called with `from != to` (distilled spec §4.6.3, "skip the rate
/// lookup when currencies match"); implementations are free to assume that.
#[async_trait]
pub trait RateOracle: Send + Sync {
    /// Returns the multiplier to apply to an amount in `from` to obtain the
    /// equivalent amount in `to`.
    async fn get_rate(&self, from: Currency, to: Currency) -> WalletResult<Decimal>;
}
