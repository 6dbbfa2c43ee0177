// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the workbench controller

use spoke_adapters::HubError;
use spoke_core::{Action, State};
use thiserror::Error;

/// Errors that can occur while handling an operator action
#[derive(Debug, Error)]
pub enum WorkbenchError {
    #[error("operation forbidden in state {state}: {action}: {reason}")]
    StateForbidden {
        state: State,
        action: Action,
        reason: &'static str,
    },
    #[error("backend unreachable: {0}")]
    BackendUnreachable(#[from] HubError),
    #[error("unknown hid sender: {0}")]
    UnknownSender(String),
}
