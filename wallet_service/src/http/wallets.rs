//! `/api/v1/wallets` handlers (§6). Ownership is enforced implicitly: every
//! single-wallet lookup is scoped to the caller, so a wallet owned by
//! someone else reads back as 404, never 403 (§4.9, §7's privacy property).

use axum::extract::{Path, Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use wallet_core::domain::{ListQuery, Wallet, WalletPatch};
use wallet_core::error::WalletError;
use wallet_core::rate::RateOracle;
use wallet_core::repository::WalletStore;

use crate::auth::CallerId;
use crate::http::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct WalletDraftBody {
    pub user_id: Uuid,
    pub name: String,
    pub currency: String,
}

#[derive(Deserialize, Default)]
pub struct ListParams {
    #[serde(default)]
    pub sorting: String,
    #[serde(default)]
    pub descending: bool,
    #[serde(default)]
    pub filter: String,
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: i64,
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        ListQuery {
            sorting: params.sorting,
            descending: params.descending,
            filter: params.filter,
            limit: params.limit.unwrap_or(0),
            offset: params.offset,
        }
    }
}

/// `POST /api/v1/wallets` — §6, §4.9: the body's `user_id` must equal the
/// caller's verified identity.
pub async fn create_wallet(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Json(body): Json<WalletDraftBody>,
) -> Result<(axum::http::StatusCode, Json<Wallet>), ApiError> {
    if body.user_id != caller_id {
        return Err(ApiError(WalletError::WrongUserId));
    }

    let currency = wallet_core::money::valid_currency(&body.currency)?;
    wallet_core::money::valid_wallet_name(&body.name)?;

    let wallet = state.wallets.create(caller_id, &body.name, currency).await?;
    Ok((axum::http::StatusCode::CREATED, Json(wallet)))
}

/// `GET /api/v1/wallets/{id}` — owner-scoped.
pub async fn get_wallet(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Path(id): Path<Uuid>,
) -> Result<Json<Wallet>, ApiError> {
    let wallet = state.wallets.get(id).await?.ok_or(WalletError::WalletNotFound)?;
    if wallet.user_id != caller_id {
        return Err(ApiError(WalletError::WalletNotFound));
    }
    Ok(Json(wallet))
}

/// `PATCH /api/v1/wallets/{id}` — a currency change rebases `balance`
/// through the rate oracle (§4.4, §4.6's FX step) before the repository
/// update is applied.
pub async fn update_wallet(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Path(id): Path<Uuid>,
    Json(patch): Json<WalletPatch>,
) -> Result<Json<Wallet>, ApiError> {
    let existing = state.wallets.get(id).await?.ok_or(WalletError::WalletNotFound)?;
    if existing.user_id != caller_id {
        return Err(ApiError(WalletError::WalletNotFound));
    }

    let rate = match &patch.currency {
        Some(code) => {
            let new_currency = wallet_core::money::valid_currency(code)?;
            if new_currency == existing.currency {
                Decimal::ONE
            } else {
                state
                    .rate
                    .get_rate(existing.currency, new_currency)
                    .await
                    .map_err(|_| WalletError::RateUnavailable)?
            }
        }
        None => Decimal::ONE,
    };

    let updated = state.wallets.update(id, patch, rate).await?;
    Ok(Json(updated))
}

/// `DELETE /api/v1/wallets/{id}` — soft archive (§4.4, P8).
pub async fn delete_wallet(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Path(id): Path<Uuid>,
) -> Result<axum::http::StatusCode, ApiError> {
    let existing = state.wallets.get(id).await?.ok_or(WalletError::WalletNotFound)?;
    if existing.user_id != caller_id {
        return Err(ApiError(WalletError::WalletNotFound));
    }

    state.wallets.archive(id).await?;
    Ok(axum::http::StatusCode::OK)
}

/// `GET /api/v1/wallets` — owner-scoped listing (§4.4.1).
pub async fn list_wallets(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Wallet>>, ApiError> {
    let query: ListQuery = params.into();
    let wallets = state.wallets.list(caller_id, &query).await?;
    Ok(Json(wallets))
}
