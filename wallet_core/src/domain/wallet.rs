use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Currency;

/// A named balance in one currency, owned by one user (distilled spec §3,
/// invariants I1–I4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub currency: Currency,
    pub balance: Decimal,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A draft wallet as submitted on `POST /api/v1/wallets`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletDraft {
    pub user_id: Uuid,
    pub name: String,
    pub currency: String,
}

/// The optional name/currency patch accepted by `PATCH /{id}` (§4.4, op
/// `Update`). A currency change triggers the balance rebase described in
/// §4.4 and §4.6's FX notes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletPatch {
    pub name: Option<String>,
    pub currency: Option<String>,
}
