use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthenticatedWallet,
    error::{AppError, Result},
    ledger::{SimulationResult, TransactionError, TransactionRecord},
    programs::Instruction,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SendTransactionRequest {
    pub instructions: Vec<Instruction>,
}

/// Execute a transaction signed by the authenticated wallet.
///
/// Returns 200 with the committed record, or 422 with the error and logs
/// when an instruction failed and nothing was committed.
pub async fn send_transaction(
    wallet: AuthenticatedWallet,
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SendTransactionRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;
    tracing::debug!(
        wallet = %wallet.address,
        instructions = payload.instructions.len(),
        "Received transaction"
    );

    match state
        .ledger
        .process_transaction(wallet.address, payload.instructions)
    {
        Ok(record) => Ok((StatusCode::OK, Json(record)).into_response()),
        Err(TransactionError::Failed(failed)) => {
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(failed)).into_response())
        }
        Err(e @ TransactionError::Empty) => Err(AppError::BadRequest(e.to_string())),
    }
}

/// Run a transaction without committing it
pub async fn simulate_transaction(
    wallet: AuthenticatedWallet,
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SendTransactionRequest>, JsonRejection>,
) -> Result<Json<SimulationResult>> {
    let Json(payload) = payload?;

    state
        .ledger
        .simulate_transaction(wallet.address, &payload.instructions)
        .map(Json)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(signature): Path<String>,
) -> Result<Json<TransactionRecord>> {
    let signature = Uuid::parse_str(&signature)
        .map_err(|_| AppError::BadRequest(format!("invalid signature: {}", signature)))?;

    state
        .ledger
        .transaction(&signature)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("transaction {}", signature)))
}
