use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{self, AuthenticatedWallet},
    error::{AppError, Result},
    models::Address,
    AppState,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletResponse {
    pub address: Address,
    /// Session token; every transaction sent with it is signed by `address`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Create a fresh wallet and open a session for it
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<WalletResponse>)> {
    let address = Address::new_unique();
    let access_token = auth::generate_token(&address, &state.config.security.jwt_secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign session: {}", e)))?;

    tracing::info!(wallet = %address, "Created wallet");

    Ok((
        StatusCode::CREATED,
        Json(WalletResponse {
            address,
            access_token: Some(access_token),
        }),
    ))
}

pub async fn current_wallet(wallet: AuthenticatedWallet) -> Json<WalletResponse> {
    Json(WalletResponse {
        address: wallet.address,
        access_token: None,
    })
}
