// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use crate::cli::args::Args;
use anyhow::{Context, Result};
use application::FlashcardGenerator;
use infrastructure::{Config, OllamaCli};
use tokio::net::TcpListener;
use tracing::{debug, info};

pub async fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting cardsmith with arguments");

    let config = resolve_config(&args)?;
    debug!(?config, "Resolved configuration");

    if let Some(path) = &args.write_config {
        config.save(path)?;
        info!(?path, "Wrote configuration");
        return Ok(());
    }

    serve(config).await
}

/// Layer command-line and environment overrides on top of the config file.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = Config::discover(args.config.as_deref())?;

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(command) = &args.command {
        config.generator.command = command.clone();
    }
    if let Some(model) = &args.model {
        config.generator.model = model.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.generator.timeout_secs = Some(timeout_secs);
    }
    config.generator.strict |= args.strict;

    Ok(config)
}

/// Bind the configured address and serve until Ctrl-C or SIGTERM.
pub async fn serve(config: Config) -> Result<()> {
    // Initialize infrastructure
    let ollama = OllamaCli::from_config(&config.generator);

    // Initialize application
    let generator = FlashcardGenerator::new(ollama).with_strict(config.generator.strict);

    // Initialize presentation
    let app = ports::router(generator);

    let addr = (config.server.host.as_str(), config.server.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}:{}", addr.0, addr.1))?;

    info!(
        model = %config.generator.model,
        command = %config.generator.command,
        timeout = ?config.generator.timeout(),
        strict = config.generator.strict,
        "listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
