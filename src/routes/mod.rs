pub mod accounts;
pub mod health;
pub mod transactions;
pub mod wallets;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{websocket, AppState};

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/wallets", post(wallets::create_wallet))
        .route("/wallets/me", get(wallets::current_wallet))
        .route("/transactions", post(transactions::send_transaction))
        .route("/transactions/simulate", post(transactions::simulate_transaction))
        .route("/transactions/{signature}", get(transactions::get_transaction))
        .route("/accounts/{address}", get(accounts::get_account))
        .route("/programs", get(accounts::list_programs))
        .route("/programs/{program}/accounts", get(accounts::get_program_accounts))
}

/// Build the complete application: API, WebSocket feed and middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket::handle_websocket))
        // API routes
        .merge(create_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
