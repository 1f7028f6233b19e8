//! Error kinds shared by every component of the financial-state subsystem.

use crate::money::Currency;
use uuid::Uuid;

/// All failures the core can produce. The HTTP boundary (`wallet_service`)
/// maps each variant to a status code; the core itself never talks HTTP.
#[derive(thiserror::Error, Debug)]
pub enum WalletError {
    #[error("id must not be empty")]
    EmptyId,

    #[error("name must not be empty")]
    EmptyName,

    #[error("unsupported or mismatched currency: {0}")]
    WrongCurrency(String),

    #[error("amount must be greater than zero")]
    WrongMoney,

    #[error("insufficient funds in {0}")]
    InsufficientFunds(Currency),

    #[error("wallet not found")]
    WalletNotFound,

    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    #[error("request user id does not match the authenticated caller")]
    WrongUserId,

    #[error("a transfer must address two distinct wallets")]
    InvalidTransfer,

    #[error("invalid token")]
    InvalidToken,

    #[error("invalid token signing method")]
    InvalidSigningMethod,

    #[error("exchange rate unavailable")]
    RateUnavailable,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type WalletResult<T> = Result<T, WalletError>;
