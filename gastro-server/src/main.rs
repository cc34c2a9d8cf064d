//! gastro-server binary

use std::net::SocketAddr;

use clap::Parser;
use gastro_server::auth::rate_limit::spawn_cleanup;
use gastro_server::cli::{Cli, Command};
use gastro_server::config::Config;
use gastro_server::error::BoxError;
use gastro_server::state::AppState;
use gastro_server::{build_router, logging, setup};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    let _log_guard = logging::init(&config);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Setup(args) => setup::run(&config, &args).await,
    }
}

async fn serve(config: Config) -> Result<(), BoxError> {
    tracing::info!(environment = %config.environment, "Starting gastro-server");

    let state = AppState::new(&config).await?;
    spawn_cleanup(state.rate_limiter.clone());

    let app = build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("gastro-server listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
