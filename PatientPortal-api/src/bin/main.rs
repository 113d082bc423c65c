use std::net::SocketAddr;

use anyhow::Context;
use dotenv::dotenv;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use patient_portal_api::api::create_application;
use patient_portal_data::gateway::{GatewayConfig, GatewayError};

/// Errors that stop the server from starting
#[derive(Debug, Error)]
enum AppError {
    #[error("Invalid backend configuration: {0}")]
    Config(String),

    #[error("Backend client error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Port parsing error: {0}")]
    PortParse(#[from] std::num::ParseIntError),
}

fn listen_port() -> Result<u16, AppError> {
    Ok(std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()?)
}

/// Entry point of the patient portal API server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_ansi(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    info!("Starting patient portal API server");

    let config = GatewayConfig::from_env();
    if let Err(errors) = config.validate() {
        for message in &errors {
            error!("Backend configuration: {}", message);
        }
        return Err(AppError::Config(errors.join("; ")).into());
    }
    info!("Forwarding requests to {}", config.base_url);

    let app = create_application(config)
        .map_err(AppError::from)
        .context("Failed to build the application")?;

    let port = listen_port().context("PORT must be a number between 0 and 65535")?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on CTRL+C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
