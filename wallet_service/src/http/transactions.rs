//! The movement endpoints nested under `/api/v1/wallets/{id}` (§6): deposit,
//! withdraw, transfer, and the ledger listing.

use axum::extract::{Path, Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use wallet_core::domain::{ListQuery, Movement, Transaction};
use wallet_core::error::WalletError;
use wallet_core::repository::{LedgerStore, WalletStore};

use crate::auth::CallerId;
use crate::http::error::ApiError;
use crate::http::wallets::ListParams;
use crate::state::AppState;

/// The client-supplied half of a movement (§6, "Transaction draft JSON").
/// `id` and `createdAt` are always server-assigned; a client-supplied `id`
/// is simply never read.
#[derive(Deserialize)]
pub struct TransactionDraftBody {
    pub first_wallet: Uuid,
    pub second_wallet: Option<Uuid>,
    pub money: Decimal,
    pub currency: String,
}

/// Resolves the wallet owner-scoped, as every movement requires a wallet the
/// caller can already see (§4.9).
async fn owned_wallet_currency(
    state: &AppState,
    caller_id: Uuid,
    wallet_id: Uuid,
) -> Result<(), ApiError> {
    let wallet = state
        .wallets
        .get(wallet_id)
        .await?
        .ok_or(WalletError::WalletNotFound)?;
    if wallet.user_id != caller_id {
        return Err(ApiError(WalletError::WalletNotFound));
    }
    Ok(())
}

/// `PUT /api/v1/wallets/{id}/deposit`
pub async fn deposit(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Path(id): Path<Uuid>,
    Json(body): Json<TransactionDraftBody>,
) -> Result<Json<Transaction>, ApiError> {
    owned_wallet_currency(&state, caller_id, id).await?;
    let currency = wallet_core::money::valid_currency(&body.currency)?;

    let tx = state
        .engine
        .deposit(Movement::Deposit {
            wallet_id: id,
            currency,
            money: body.money,
        })
        .await?;
    Ok(Json(tx))
}

/// `PUT /api/v1/wallets/{id}/withdraw`
pub async fn withdraw(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Path(id): Path<Uuid>,
    Json(body): Json<TransactionDraftBody>,
) -> Result<Json<Transaction>, ApiError> {
    owned_wallet_currency(&state, caller_id, id).await?;
    let currency = wallet_core::money::valid_currency(&body.currency)?;

    let tx = state
        .engine
        .withdraw(Movement::Withdraw {
            wallet_id: id,
            currency,
            money: body.money,
        })
        .await?;
    Ok(Json(tx))
}

/// `PUT /api/v1/wallets/{id}/transfer`
pub async fn transfer(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Path(id): Path<Uuid>,
    Json(body): Json<TransactionDraftBody>,
) -> Result<Json<Transaction>, ApiError> {
    owned_wallet_currency(&state, caller_id, id).await?;
    let currency = wallet_core::money::valid_currency(&body.currency)?;
    let destination_wallet_id = body.second_wallet.ok_or(WalletError::InvalidTransfer)?;

    let tx = state
        .engine
        .transfer(Movement::Transfer {
            source_wallet_id: id,
            destination_wallet_id,
            currency,
            money: body.money,
        })
        .await?;
    Ok(Json(tx))
}

/// `GET /api/v1/wallets/{id}/transactions` — authorize via the owner-scoped
/// `Get` before listing (§4.9).
pub async fn list_transactions(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Path(id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    owned_wallet_currency(&state, caller_id, id).await?;

    let query: ListQuery = params.into();
    let rows = state.ledger.list_tx(id, &query).await?;
    Ok(Json(rows))
}
