//! Maps `WalletError` onto the status codes in §7's table. Internal errors
//! are logged with full detail but return a generic body to the caller
//! (§7, "message redacted").

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use wallet_core::WalletError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiError(pub WalletError);

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            WalletError::EmptyId
            | WalletError::EmptyName
            | WalletError::WrongCurrency(_)
            | WalletError::WrongMoney
            | WalletError::InsufficientFunds(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),

            WalletError::WalletNotFound
            | WalletError::UserNotFound(_)
            | WalletError::WrongUserId => (StatusCode::NOT_FOUND, self.0.to_string()),

            WalletError::InvalidToken | WalletError::InvalidSigningMethod => {
                (StatusCode::UNAUTHORIZED, self.0.to_string())
            }

            WalletError::RateUnavailable => {
                error!(error = %self.0, "rate oracle unavailable");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }

            WalletError::InvalidTransfer => (StatusCode::BAD_REQUEST, self.0.to_string()),

            WalletError::Internal(err) => {
                error!(error = %err, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, axum::Json(ErrorBody { error: message })).into_response()
    }
}
