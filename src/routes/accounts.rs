use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{
    error::{AppError, Result},
    models::{Account, Address, ProgramId},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub address: Address,
    #[serde(flatten)]
    pub account: Account,
}

#[derive(Debug, Serialize)]
pub struct ProgramInfo {
    pub name: &'static str,
    pub address: Address,
}

fn parse_address(raw: &str) -> Result<Address> {
    raw.parse()
        .map_err(|e| AppError::BadRequest(format!("invalid address {}: {}", raw, e)))
}

pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<AccountResponse>> {
    let address = parse_address(&address)?;
    let account = state
        .ledger
        .get_account(&address)
        .ok_or_else(|| AppError::NotFound(format!("account {}", address)))?;

    Ok(Json(AccountResponse { address, account }))
}

pub async fn get_program_accounts(
    State(state): State<Arc<AppState>>,
    Path(program): Path<String>,
) -> Result<Json<Vec<AccountResponse>>> {
    let program: ProgramId = program.parse().map_err(AppError::NotFound)?;

    let accounts = state
        .ledger
        .program_accounts(program)
        .into_iter()
        .map(|(address, account)| AccountResponse { address, account })
        .collect();

    Ok(Json(accounts))
}

pub async fn list_programs() -> Json<Vec<ProgramInfo>> {
    Json(
        ProgramId::ALL
            .iter()
            .map(|program| ProgramInfo {
                name: program.name(),
                address: program.address(),
            })
            .collect(),
    )
}
