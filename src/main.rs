use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wallfeed::auth::session::spawn_sweeper;
use wallfeed::config::{Cli, Config};
use wallfeed::routes;
use wallfeed::seed::seed_users;
use wallfeed::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    if config.server.production {
        tracing::info!("Running in production mode");
    }

    let state = AppState::new(config.clone());

    let seeded = seed_users(&state, &config.users).await?;
    if seeded > 0 {
        tracing::info!("Seeded {} users", seeded);
    }
    tracing::info!("Registry holds {} users", state.users.count().await?);

    let _sweeper = spawn_sweeper(state.sessions.clone(), config.sweep_interval());

    let app = routes::build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
