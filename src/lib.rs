//! Playnet tutorials: a token faucet, tic-tac-toe and a todo list running as
//! programs on an in-memory ledger, served over HTTP and WebSocket.

pub mod auth;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod programs;
pub mod routes;
pub mod websocket;

use std::sync::Arc;

use config::Config;
use ledger::{Clock, Ledger, ProgramConfig};

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub ledger: Ledger,
}

impl AppState {
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Self {
        let ledger = Ledger::new(
            ProgramConfig::from(&config),
            clock,
            config.ledger.max_transaction_history,
        );
        Self { config, ledger }
    }
}
