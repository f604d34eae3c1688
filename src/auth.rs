use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::AppError, models::Address, AppState};

/// How long a wallet session stays valid
const SESSION_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Wallet address
    pub exp: usize,  // Expiration time
}

/// The wallet that signs the request
#[derive(Debug, Clone)]
pub struct AuthenticatedWallet {
    pub address: Address,
}

/// Extractor for wallet sessions from JWT tokens
impl<S> FromRequestParts<S> for AuthenticatedWallet
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let app_state = Arc::<AppState>::from_ref(state);

        // Try to extract token from Authorization header first
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(String::from)
            // If no Authorization header, try query parameter
            .or_else(|| {
                parts
                    .uri
                    .query()
                    .and_then(|q| {
                        serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok()
                    })
                    .and_then(|params| {
                        params
                            .iter()
                            .find(|(k, _)| k == "token")
                            .map(|(_, v)| v.clone())
                    })
            });

        async move {
            let token = token.ok_or(AppError::Unauthorized)?;
            let address = verify_token(&token, &app_state.config.security.jwt_secret)
                .ok_or(AppError::Unauthorized)?;
            Ok(AuthenticatedWallet { address })
        }
    }
}

/// Validate a session token and return the wallet it was issued for
pub fn verify_token(token: &str, jwt_secret: &str) -> Option<Address> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .ok()?;

    token_data.claims.sub.parse::<Address>().ok()
}

/// Generate a session token for a wallet
pub fn generate_token(
    address: &Address,
    jwt_secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = (chrono::Utc::now() + chrono::Duration::hours(SESSION_HOURS)).timestamp();

    let claims = Claims {
        sub: address.to_string(),
        exp: expiration as usize,
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(jwt_secret.as_ref()),
    )
}
