// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface: HID events in, JSON replies out.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use spoke_adapters::{HubAdapter, PanelAdapter};
use spoke_core::{HidBuffer, HidEvent, UnitId};
use spoke_engine::{Outcome, Workbench, WorkbenchError};
use tracing::{debug, warn};

/// Reply envelope of every endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub status: bool,
    pub comment: String,
}

impl Reply {
    fn new(status: bool, comment: impl Into<String>) -> Self {
        Self {
            status,
            comment: comment.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferReply {
    pub status: bool,
    pub comment: String,
    #[serde(flatten)]
    pub buffer: HidBuffer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeInfo {
    pub name: String,
    pub position: String,
}

/// Diagnostic view of the workbench
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReply {
    pub status: bool,
    pub comment: String,
    pub state: String,
    pub unit_in_flight: Option<UnitId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<EmployeeInfo>,
}

/// Router over a shared workbench
pub fn app<H, P>(workbench: Arc<Workbench<H, P>>) -> Router
where
    H: HubAdapter,
    P: PanelAdapter,
{
    Router::new()
        .route("/api/hid_event", post(hid_event::<H, P>))
        .route("/api/hid_buffer", get(hid_buffer::<H, P>))
        .route("/api/status", get(status::<H, P>))
        .with_state(workbench)
}

/// Handle a scan from a badge or barcode reader
pub async fn hid_event<H, P>(
    State(workbench): State<Arc<Workbench<H, P>>>,
    Json(event): Json<HidEvent>,
) -> (StatusCode, Json<Reply>)
where
    H: HubAdapter,
    P: PanelAdapter,
{
    debug!(sender = %event.name, "Received hid event");
    let (code, reply) = reply_for(workbench.handle_hid_event(event).await);
    (code, Json(reply))
}

/// Map an action result to an HTTP reply.
///
/// Only an unknown sender is a client error; everything else the workbench
/// decided is a normal answer.
pub fn reply_for(result: Result<Outcome, WorkbenchError>) -> (StatusCode, Reply) {
    match result {
        Ok(Outcome::Applied(state)) => (
            StatusCode::OK,
            Reply::new(true, format!("Hid event has been handled, state is {}", state)),
        ),
        Ok(Outcome::Rejected(reason)) => (StatusCode::OK, Reply::new(false, reason)),
        Err(e @ WorkbenchError::StateForbidden { .. }) => {
            (StatusCode::OK, Reply::new(false, e.to_string()))
        }
        Err(WorkbenchError::BackendUnreachable(_)) => {
            (StatusCode::OK, Reply::new(false, "Backend unreachable"))
        }
        Err(WorkbenchError::UnknownSender(sender)) => {
            warn!(%sender, "Rejected event from unknown sender");
            (
                StatusCode::BAD_REQUEST,
                Reply::new(false, format!("Unknown sender device: {}", sender)),
            )
        }
    }
}

/// Most recent raw HID payload
pub async fn hid_buffer<H, P>(State(workbench): State<Arc<Workbench<H, P>>>) -> Json<BufferReply>
where
    H: HubAdapter,
    P: PanelAdapter,
{
    Json(BufferReply {
        status: true,
        comment: "Hid buffer".to_string(),
        buffer: workbench.hid_buffer(),
    })
}

pub async fn status<H, P>(State(workbench): State<Arc<Workbench<H, P>>>) -> Json<StatusReply>
where
    H: HubAdapter,
    P: PanelAdapter,
{
    let state = workbench.state().await;
    let employee = workbench.employee();
    let employee = employee.is_authorized().then(|| EmployeeInfo {
        name: employee.full_name().to_string(),
        position: employee.position().to_string(),
    });

    Json(StatusReply {
        status: true,
        comment: "Workbench status".to_string(),
        state: state.to_string(),
        unit_in_flight: workbench.unit(),
        employee,
    })
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
