// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake panel adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{PanelAdapter, PanelError};
use async_trait::async_trait;
use spoke_core::{Frame, ViewKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Recorded panel call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCall {
    Init,
    Draw(Frame),
    Refresh(Frame),
    Clear,
}

/// Fake panel recording everything it is asked to show
#[derive(Clone, Default)]
pub struct FakePanel {
    calls: Arc<Mutex<Vec<PanelCall>>>,
    fail_init: Arc<AtomicBool>,
    fail_draws: Arc<AtomicBool>,
}

impl FakePanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `init` fail, as a missing device would
    pub fn failing_init() -> Self {
        let panel = Self::default();
        panel.fail_init.store(true, Ordering::SeqCst);
        panel
    }

    /// Make every draw fail with an I/O error
    pub fn fail_draws(&self, fail: bool) {
        self.fail_draws.store(fail, Ordering::SeqCst);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<PanelCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Views fully painted, in order (clears count as blank)
    pub fn painted(&self) -> Vec<ViewKind> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PanelCall::Draw(frame) => Some(frame.view),
                PanelCall::Clear => Some(ViewKind::Blank),
                PanelCall::Init | PanelCall::Refresh(_) => None,
            })
            .collect()
    }

    /// Number of partial refreshes
    pub fn refreshes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, PanelCall::Refresh(_)))
            .count()
    }

    fn record(&self, call: PanelCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl PanelAdapter for FakePanel {
    async fn init(&self) -> Result<(), PanelError> {
        self.record(PanelCall::Init);
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(PanelError::Init("fake panel not connected".to_string()));
        }
        Ok(())
    }

    async fn draw(&self, frame: &Frame) -> Result<(), PanelError> {
        if self.fail_draws.load(Ordering::SeqCst) {
            return Err(PanelError::Write("fake panel write failed".to_string()));
        }
        self.record(PanelCall::Draw(frame.clone()));
        Ok(())
    }

    async fn refresh(&self, frame: &Frame) -> Result<(), PanelError> {
        if self.fail_draws.load(Ordering::SeqCst) {
            return Err(PanelError::Write("fake panel write failed".to_string()));
        }
        self.record(PanelCall::Refresh(frame.clone()));
        Ok(())
    }

    async fn clear(&self) -> Result<(), PanelError> {
        self.record(PanelCall::Clear);
        Ok(())
    }
}
