// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spoke Daemon (spoked)
//!
//! Workbench controller process: receives HID events over HTTP, talks to the
//! hub and drives the panel.

use std::path::PathBuf;

use spoke_core::SpokeConfig;
use spoke_daemon::{lifecycle, LifecycleError};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    // Load configuration
    let config = SpokeConfig::load(&config_path)?;

    // Set up logging
    let _log_guard = setup_logging(&config)?;

    info!("Starting spoked with config: {}", config_path.display());

    // Start daemon
    let daemon = match lifecycle::startup(&config).await {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            return Err(e.into());
        }
    };

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let shutdown = async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
            _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
        }
    };

    daemon.run(shutdown).await?;

    info!("Daemon stopped");
    Ok(())
}

/// Log to the configured file, or to stderr when none is set.
///
/// The returned guard flushes the file writer on drop and must live as long
/// as the process.
fn setup_logging(
    config: &SpokeConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(log_path) = &config.logging.path else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    // Create log directory if needed
    let dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let file_name = log_path
        .file_name()
        .ok_or_else(|| LifecycleError::Logging(log_path.clone()))?;
    let file_appender = tracing_appender::rolling::never(&dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(Some(guard))
}
