//! C3: an HTTP client for the external rate oracle, grounded on
//! `examples/original_source/internal/xr-client/client.go` (REST client
//! hitting the sibling `xr-service`).

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use wallet_core::error::{WalletError, WalletResult};
use wallet_core::money::Currency;
use wallet_core::rate::RateOracle;

#[derive(Deserialize)]
struct RateResponse {
    rate: Decimal,
}

#[derive(Clone)]
pub struct ReqwestRateOracle {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestRateOracle {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl RateOracle for ReqwestRateOracle {
    async fn get_rate(&self, from: Currency, to: Currency) -> WalletResult<Decimal> {
        let url = format!(
            "{}/xr?from={}&to={}",
            self.base_url,
            from.code(),
            to.code()
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|_| WalletError::RateUnavailable)?;

        if !response.status().is_success() {
            return Err(WalletError::RateUnavailable);
        }

        response
            .json::<RateResponse>()
            .await
            .map(|body| body.rate)
            .map_err(|_| WalletError::RateUnavailable)
    }
}
