use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use warden_config::{ConfigLoad, ConfigLoader};
use warden_server::{AppState, create_router, infra::telemetry::init_tracing};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "warden-server")]
#[command(about = "Account management server with role-based access control")]
struct Cli {
    /// TOML configuration file (overrides WARDEN_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Environment file to read before the process environment
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new().with_env_file(&cli.env_file);
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }

    init_tracing(&config.logging).context("failed to install tracing subscriber")?;

    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "loaded configuration file");
    }
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    let state = AppState::from_config(&config).context("failed to build application state")?;
    let router = create_router(state);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        %addr,
        id_header = %config.identity.id_header,
        role_header = %config.identity.role_header,
        anonymous_registration = config.registration.allow_anonymous,
        "Starting Warden server"
    );
    warn!(
        "caller identity is read from request headers without verification; run behind a trusted proxy"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
