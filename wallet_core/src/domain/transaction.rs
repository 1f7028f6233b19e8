use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Currency;

/// The kind of a completed movement, recorded verbatim on the ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Transfer,
}

/// An immutable ledger row (distilled spec §3, invariants I5–I8). Appended
/// once by the movement engine; never updated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub first_wallet_id: Uuid,
    pub second_wallet_id: Option<Uuid>,
    pub currency: Currency,
    pub money: Decimal,
    pub created_at: DateTime<Utc>,
}

/// The client-supplied half of a transaction: everything the caller is
/// allowed to set. `id` and `created_at` are always server-assigned (§6);
/// any client-supplied values for them are ignored by the HTTP layer before
/// this type is even constructed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub first_wallet: Uuid,
    pub second_wallet: Option<Uuid>,
    pub money: Decimal,
    pub currency: String,
}

/// Internal sum-type encoding of a movement. The wire form is one struct
/// with an optional `secondWallet` field (§9, "optional secondary wallet");
/// this is the cleaner shape to pattern-match the three procedures in §4.6
/// against.
#[derive(Debug, Clone)]
pub enum Movement {
    Deposit {
        wallet_id: Uuid,
        currency: Currency,
        money: Decimal,
    },
    Withdraw {
        wallet_id: Uuid,
        currency: Currency,
        money: Decimal,
    },
    Transfer {
        source_wallet_id: Uuid,
        destination_wallet_id: Uuid,
        currency: Currency,
        money: Decimal,
    },
}
