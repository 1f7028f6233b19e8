//! C9: the authorization gate. Verifies the bearer token and injects the
//! resulting `caller_id` into request extensions; ownership checks past
//! that point live in the handlers and repositories (§4.9).

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use axum::RequestPartsExt;
use axum_extra::headers::authorization::{Authorization, Bearer};
use axum_extra::TypedHeader;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wallet_core::WalletError;

use crate::http::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone)]
pub struct AuthState {
    pub decoding_key: DecodingKey,
}

impl AuthState {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
        }
    }
}

/// The verified caller identity, extractable from any handler. Only ever
/// constructed by `auth_middleware`, which runs ahead of every handler on
/// `/api/v1/wallets` (§6, "every route requires an Authorization header").
#[derive(Debug, Clone, Copy)]
pub struct CallerId(pub Uuid);

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerId>()
            .copied()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

pub async fn auth_middleware(
    axum::extract::State(auth): axum::extract::State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = req.into_parts();

    let auth_header: TypedHeader<Authorization<Bearer>> = parts
        .extract()
        .await
        .map_err(|_| ApiError(WalletError::InvalidToken))?;

    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(auth_header.token(), &auth.decoding_key, &validation)
        .map_err(|err| ApiError(classify_token_error(&err)))?;

    parts.extensions.insert(CallerId(token_data.claims.user_id));

    req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Translates a decode failure kind for callers that need the distinction
/// between "no token" and "the signing algorithm is wrong" (§7).
pub fn classify_token_error(err: &jsonwebtoken::errors::Error) -> WalletError {
    use jsonwebtoken::errors::ErrorKind;
    match err.kind() {
        ErrorKind::InvalidAlgorithm => WalletError::InvalidSigningMethod,
        _ => WalletError::InvalidToken,
    }
}
