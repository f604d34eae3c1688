//! Instruction failures and HTTP error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::{Address, ProgramId};

/// Error returned by an instruction. Any error aborts the whole transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    #[error("Account not found: {0}")]
    AccountNotFound(Address),

    #[error("Account already in use: {0}")]
    AccountAlreadyInUse(Address),

    #[error("Account {address} is not a {expected}")]
    AccountTypeMismatch {
        address: Address,
        expected: &'static str,
    },

    #[error("Account {address} is not owned by program {program}")]
    IllegalOwner { address: Address, program: ProgramId },

    #[error("Missing required authority: {0}")]
    Unauthorized(Address),

    #[error("Insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("Token account {0} belongs to a different mint")]
    AccountMintMismatch(Address),

    #[error("The Bitcorn token you are trying to send is not the same one from this faucet")]
    MintMismatch,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Please try again shortly")]
    FaucetCooldown,

    #[error("Players must be different")]
    DuplicatePlayers,

    #[error("This game is already finished")]
    GameFinished,

    #[error("Invalid Player")]
    InvalidPlayer,

    #[error("Invalid Player Turn")]
    InvalidPlayerTurn,

    #[error("Invalid Move")]
    InvalidMove,

    #[error("Move already played")]
    MoveAlreadyPlayed,

    #[error("Task must not be empty")]
    EmptyTask,

    #[error("Task exceeds {max} bytes")]
    TaskTooLong { max: usize },

    #[error("Todo limit reached")]
    TodoLimitReached,

    #[error("Task already done")]
    TaskAlreadyDone,
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let reason = match &rejection {
            JsonRejection::JsonDataError(_) => "Invalid JSON data",
            JsonRejection::JsonSyntaxError(_) => "Malformed JSON",
            JsonRejection::MissingJsonContentType(_) => {
                "Missing or invalid Content-Type header. Expected 'application/json'"
            }
            JsonRejection::BytesRejection(_) => "Failed to read request body",
            _ => "Invalid JSON request",
        };
        tracing::warn!(error = %rejection.body_text(), "Rejected request body");
        AppError::BadRequest(format!("{}: {}", reason, rejection.body_text()))
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
