// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Display render queue
//!
//! Callers enqueue view kinds and return immediately. A single drain worker,
//! spawned lazily on the tokio runtime, pops views in FIFO order, composes
//! them against [`LiveData`] and paints the panel. The worker exits when the
//! queue is empty; the next enqueue spawns a fresh one.
//!
//! Enqueueing, deduplication and the decision to spawn happen under one
//! lock, so concurrent callers can never start two workers.

use crate::live::LiveData;
use spoke_adapters::{PanelAdapter, PanelError};
use spoke_core::config::ScreenConfig;
use spoke_core::{Hold, ViewKind};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Poll interval of [`Display::flush`]
const FLUSH_POLL: Duration = Duration::from_millis(5);

/// Timing of held views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    /// How long an alert stays on screen
    pub alert_duration: Duration,
    /// Redraw period of the ongoing operation timer
    pub timer_refresh: Duration,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::from(&ScreenConfig::default())
    }
}

impl From<&ScreenConfig> for DisplaySettings {
    fn from(screen: &ScreenConfig) -> Self {
        Self {
            alert_duration: screen.alert_duration,
            timer_refresh: screen.timer_refresh,
        }
    }
}

/// What happened to a render request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No panel; the request was dropped
    Headless,
    /// The same view is already last in the queue
    Coalesced,
    /// The view is on screen and nothing is pending
    AlreadyShown,
    /// Appended to the queue
    Queued,
}

#[derive(Default)]
struct Queue {
    pending: VecDeque<ViewKind>,
    /// Last view the worker picked up
    current: Option<ViewKind>,
    running: bool,
    /// Worker is parked on a live view with nothing else to do
    ticking: bool,
    worker: Option<JoinHandle<()>>,
    spawned: usize,
}

struct Shared<P> {
    /// `None` when running headless
    panel: Option<P>,
    live: LiveData,
    settings: DisplaySettings,
    queue: Mutex<Queue>,
    /// Signalled on every enqueue; cuts the live timer's wait short
    enqueued: Notify,
}

/// Handle to the render queue of the workbench panel
pub struct Display<P> {
    shared: Arc<Shared<P>>,
}

impl<P> Clone for Display<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P: PanelAdapter> Display<P> {
    /// Display over a panel that is already initialized
    pub fn new(panel: P, live: LiveData, settings: DisplaySettings) -> Self {
        Self::build(Some(panel), live, settings)
    }

    /// Display that drops every render request
    pub fn headless(live: LiveData, settings: DisplaySettings) -> Self {
        Self::build(None, live, settings)
    }

    /// Initialize `panel` and wrap it, falling back to headless if that fails
    pub async fn connect(
        panel: P,
        live: LiveData,
        settings: DisplaySettings,
        enforce_headless: bool,
    ) -> Self {
        if enforce_headless {
            tracing::info!("headless mode enforced by configuration");
            return Self::headless(live, settings);
        }

        match panel.init().await {
            Ok(()) => Self::new(panel, live, settings),
            Err(e) => {
                tracing::warn!(error = %e, "panel initialization failed, running headless");
                Self::headless(live, settings)
            }
        }
    }

    fn build(panel: Option<P>, live: LiveData, settings: DisplaySettings) -> Self {
        Self {
            shared: Arc::new(Shared {
                panel,
                live,
                settings,
                queue: Mutex::new(Queue::default()),
                enqueued: Notify::new(),
            }),
        }
    }

    pub fn is_headless(&self) -> bool {
        self.shared.panel.is_none()
    }

    pub fn live(&self) -> &LiveData {
        &self.shared.live
    }

    /// View most recently picked up by the worker
    pub fn current_view(&self) -> Option<ViewKind> {
        self.lock().current
    }

    /// Views waiting to be painted, head first
    pub fn pending(&self) -> Vec<ViewKind> {
        self.lock().pending.iter().copied().collect()
    }

    /// Number of drain workers started so far
    pub fn worker_spawns(&self) -> usize {
        self.lock().spawned
    }

    /// Request `kind` to be painted. Never waits for the paint.
    pub fn render_view(&self, kind: ViewKind) -> RenderOutcome {
        if self.is_headless() {
            tracing::trace!(view = %kind, "headless, render dropped");
            return RenderOutcome::Headless;
        }

        let mut queue = self.lock();
        if queue.pending.back() == Some(&kind) {
            tracing::debug!(view = %kind, "render coalesced with pending request");
            return RenderOutcome::Coalesced;
        }
        if queue.pending.is_empty() && queue.current == Some(kind) {
            tracing::debug!(view = %kind, "view already on screen");
            return RenderOutcome::AlreadyShown;
        }

        queue.pending.push_back(kind);
        tracing::debug!(view = %kind, pending = queue.pending.len(), "render queued");

        if !queue.running {
            self.spawn_worker(&mut queue);
        }
        self.shared.enqueued.notify_waiters();
        RenderOutcome::Queued
    }

    /// Wait until every pending view was painted.
    ///
    /// A worker parked on the live timer counts as settled. Returns false if
    /// `timeout` elapsed first.
    pub async fn flush(&self, timeout: Duration) -> bool {
        let settled = async {
            loop {
                {
                    let queue = self.lock();
                    if queue.pending.is_empty() && (!queue.running || queue.ticking) {
                        return;
                    }
                }
                tokio::time::sleep(FLUSH_POLL).await;
            }
        };
        tokio::time::timeout(timeout, settled).await.is_ok()
    }

    /// Blank the panel and wait, at most `timeout`, for the worker to exit
    pub async fn end_session(&self, timeout: Duration) -> bool {
        if self.is_headless() {
            return true;
        }

        self.render_view(ViewKind::Blank);
        let worker = self.lock().worker.take();
        let Some(worker) = worker else {
            return true;
        };

        match tokio::time::timeout(timeout, worker).await {
            Ok(Ok(())) => {
                tracing::info!("display session ended");
                true
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "render worker aborted");
                true
            }
            Err(_) => {
                tracing::warn!(?timeout, "render worker still busy at shutdown");
                false
            }
        }
    }

    fn spawn_worker(&self, queue: &mut Queue) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!(error = %e, "no runtime to run the render worker");
                return;
            }
        };

        queue.running = true;
        queue.spawned += 1;
        queue.worker = Some(runtime.spawn(self.clone().drain()));
        tracing::debug!(spawns = queue.spawned, "render worker started");
    }

    async fn drain(self) {
        loop {
            let kind = {
                let mut queue = self.lock();
                queue.ticking = false;
                match queue.pending.pop_front() {
                    Some(kind) => {
                        queue.current = Some(kind);
                        kind
                    }
                    None => {
                        queue.running = false;
                        tracing::debug!("render queue drained");
                        return;
                    }
                }
            };

            if let Err(e) = self.paint(kind).await {
                tracing::error!(view = %kind, error = %e, "panel failed, render worker stopped");
                let mut queue = self.lock();
                queue.running = false;
                queue.ticking = false;
                return;
            }
        }
    }

    async fn paint(&self, kind: ViewKind) -> Result<(), PanelError> {
        let Some(panel) = &self.shared.panel else {
            return Ok(());
        };
        let live = &self.shared.live;

        if kind == ViewKind::Blank {
            panel.clear().await?;
        } else {
            panel.draw(&kind.compose(&live.snapshot())).await?;
        }
        tracing::debug!(view = %kind, "painted");

        match kind.hold() {
            Hold::Static => {}
            Hold::Alert => tokio::time::sleep(self.shared.settings.alert_duration).await,
            Hold::Live => loop {
                // Taken before the pending check so a render in between still wakes us
                let enqueued = self.shared.enqueued.notified();
                self.set_ticking(true);
                if !self.has_pending() {
                    tokio::select! {
                        _ = tokio::time::sleep(self.shared.settings.timer_refresh) => {}
                        _ = enqueued => {}
                    }
                }
                if !live.operation_ongoing() || self.has_pending() {
                    break;
                }
                panel.refresh(&kind.compose(&live.snapshot())).await?;
            },
        }
        Ok(())
    }

    fn has_pending(&self) -> bool {
        !self.lock().pending.is_empty()
    }

    fn set_ticking(&self, ticking: bool) {
        self.lock().ticking = ticking;
    }

    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.shared.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
