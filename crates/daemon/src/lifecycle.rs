// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use spoke_adapters::{ConsolePanel, HttpHubAdapter, HubAdapter, PanelAdapter, TracedHubAdapter};
use spoke_core::{ConfigError, SpokeConfig};
use spoke_engine::{Display, DisplaySettings, LiveData, Workbench, WorkbenchSettings};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::server::app;

/// How long shutdown waits for the render worker to blank the panel
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Workbench with concrete adapter types (hub calls wrapped with tracing)
pub type DaemonWorkbench = Workbench<TracedHubAdapter<HttpHubAdapter>, ConsolePanel>;

/// Daemon state during operation
pub struct DaemonState {
    pub config: SpokeConfig,
    pub workbench: Arc<DaemonWorkbench>,
    /// HTTP listener for HID events
    pub listener: TcpListener,
    /// When daemon started
    pub start_time: Instant,
}

impl DaemonState {
    /// Serve HID events until `shutdown` resolves, then blank the panel
    pub async fn run<F>(self, shutdown: F) -> Result<(), LifecycleError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let DaemonState {
            config,
            workbench,
            listener,
            start_time,
        } = self;

        info!("Daemon ready, listening on {}", config.endpoints.listen);
        axum::serve(listener, app(Arc::clone(&workbench)))
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Shutting down daemon...");
        shutdown_display(workbench.display()).await;
        info!(
            uptime_secs = start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind {0}: {1}")]
    BindFailed(String, std::io::Error),

    #[error("Could not set up logging at {0}")]
    Logging(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub async fn startup(config: &SpokeConfig) -> Result<DaemonState, LifecycleError> {
    // 1. Set up adapters (hub wrapped with tracing for observability)
    let hub = TracedHubAdapter::new(HttpHubAdapter::new(
        config.hub_url(),
        config.endpoints.hub_timeout,
    ));
    let panel = ConsolePanel::stdout();

    // 2. Build the workbench and reconcile with the hub
    let workbench = build_workbench(config, hub, panel).await;

    // 3. Bind (LAST - only after everything else is ready)
    let listen = &config.endpoints.listen;
    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| LifecycleError::BindFailed(listen.clone(), e))?;

    info!(
        workbench = config.general.workbench_number,
        hub = config.hub_url(),
        "Daemon started"
    );

    Ok(DaemonState {
        config: config.clone(),
        workbench: Arc::new(workbench),
        listener,
        start_time: Instant::now(),
    })
}

/// Assemble the workbench over the given adapters.
///
/// The panel is initialized here; if that fails the workbench runs headless.
/// The local session is then reconciled with the hub and the matching
/// screen shown.
pub async fn build_workbench<H, P>(config: &SpokeConfig, hub: H, panel: P) -> Workbench<H, P>
where
    H: HubAdapter,
    P: PanelAdapter,
{
    let live = LiveData::new(
        config.general.workbench_number,
        config.screen.rotate_output,
    );
    let display = Display::connect(
        panel,
        live,
        DisplaySettings::from(&config.screen),
        config.screen.enforce_headless,
    )
    .await;
    if display.is_headless() {
        warn!("Running without a display");
    }

    let workbench = Workbench::new(WorkbenchSettings::from(config), hub, display);

    match workbench.sync_login_status(true).await {
        Ok(state) => info!(%state, "Login status synced with hub"),
        Err(e) => warn!(error = %e, "Could not sync login status at startup"),
    }

    workbench
}

/// Blank the panel, waiting a bounded time for the render worker
pub async fn shutdown_display<P: PanelAdapter>(display: &Display<P>) {
    if !display.end_session(SHUTDOWN_GRACE).await {
        warn!("Display did not finish before shutdown");
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
