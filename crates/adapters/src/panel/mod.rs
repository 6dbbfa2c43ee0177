// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output panel adapters
//!
//! A panel is the single physical output of the workbench. It receives
//! composed frames and is driven by exactly one render worker at a time.

mod console;

pub use console::{render_text, ConsolePanel};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePanel, PanelCall};

use async_trait::async_trait;
use spoke_core::Frame;
use thiserror::Error;

/// Errors from panel operations
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("panel initialization failed: {0}")]
    Init(String),
    #[error("panel write failed: {0}")]
    Write(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Adapter for the physical output
#[async_trait]
pub trait PanelAdapter: Clone + Send + Sync + 'static {
    /// Bring the device up; failure means the workbench runs headless
    async fn init(&self) -> Result<(), PanelError>;

    /// Full redraw
    async fn draw(&self, frame: &Frame) -> Result<(), PanelError>;

    /// Partial redraw of a frame already on screen
    async fn refresh(&self, frame: &Frame) -> Result<(), PanelError>;

    /// Wipe the panel
    async fn clear(&self) -> Result<(), PanelError>;
}
