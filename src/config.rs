use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub programs: ProgramsConfig,
    pub ledger: LedgerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramsConfig {
    pub faucet_drip_amount: u64,
    pub faucet_cooldown_secs: i64,
    pub todo_max_task_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    pub max_transaction_history: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
        };

        let security = SecurityConfig {
            jwt_secret: env::var("JWT_SECRET")
                .context("JWT_SECRET must be set")?,
        };

        let programs = ProgramsConfig {
            faucet_drip_amount: env::var("FAUCET_DRIP_AMOUNT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("FAUCET_DRIP_AMOUNT must be a number")?,
            faucet_cooldown_secs: env::var("FAUCET_COOLDOWN_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("FAUCET_COOLDOWN_SECS must be a number")?,
            todo_max_task_len: env::var("TODO_MAX_TASK_LEN")
                .unwrap_or_else(|_| "256".to_string())
                .parse()
                .unwrap_or(256),
        };

        let ledger = LedgerConfig {
            max_transaction_history: env::var("MAX_TRANSACTION_HISTORY")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
        };

        Ok(Config {
            server,
            security,
            programs,
            ledger,
        })
    }

    /// Configuration for tests, no environment needed
    pub fn test_default() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            security: SecurityConfig {
                jwt_secret: "test-secret-for-playnet".to_string(),
            },
            programs: ProgramsConfig {
                faucet_drip_amount: 10,
                faucet_cooldown_secs: 30,
                todo_max_task_len: 256,
            },
            ledger: LedgerConfig {
                max_transaction_history: 1000,
            },
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
