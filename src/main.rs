use std::sync::Arc;

use anyhow::Result;
use playnet_tutorials::{config::Config, ledger::SystemClock, models::ProgramId, routes, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playnet_tutorials=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting playnet...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let state = Arc::new(AppState::new(config.clone(), Arc::new(SystemClock)));
    for program in ProgramId::ALL {
        tracing::info!("Program {} deployed at {}", program, program.address());
    }

    let app = routes::create_app(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
