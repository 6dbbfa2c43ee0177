// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hub adapters
//!
//! The hub owns authorization and unit bookkeeping. It is reached through a
//! request/response contract; a `status: false` reply is a normal business
//! answer and never an error. [`HubError`] means no usable answer arrived.

mod http;

pub use http::HttpHubAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeHubAdapter, HubCall, HubEndpoint, Scripted};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use spoke_core::UnitId;
use thiserror::Error;

/// Free-form data attached to operation requests
pub type AdditionalInfo = serde_json::Map<String, serde_json::Value>;

/// Errors from hub calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    /// No reply: timeout, refused connection, DNS failure
    #[error("hub unreachable: {0}")]
    Unreachable(String),
    /// A reply arrived but is not the expected JSON
    #[error("malformed hub reply: {0}")]
    Malformed(String),
}

/// Generic reply envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubReply {
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl HubReply {
    pub fn accepted() -> Self {
        Self {
            status: true,
            comment: None,
        }
    }

    pub fn rejected(comment: impl Into<String>) -> Self {
        Self {
            status: false,
            comment: Some(comment.into()),
        }
    }

    /// Comment, or a placeholder when the hub gave none
    pub fn reason(&self) -> String {
        self.comment.clone().unwrap_or_else(|| "no comment".to_string())
    }
}

/// Operator identity as known to the hub
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub position: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginReply {
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
}

impl LoginReply {
    pub fn granted(identity: Identity) -> Self {
        Self {
            status: true,
            comment: None,
            identity: Some(identity),
        }
    }

    pub fn denied(comment: impl Into<String>) -> Self {
        Self {
            status: false,
            comment: Some(comment.into()),
            identity: None,
        }
    }
}

/// Hub view of this workbench
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbenchStatus {
    pub employee_logged_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<Identity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub workbench_number: u32,
    pub badge_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub workbench_number: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartOperationRequest {
    pub workbench_number: u32,
    pub production_stage_name: String,
    pub unit_id: UnitId,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOperationRequest {
    pub workbench_number: u32,
    pub unit_id: UnitId,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub workbench_number: u32,
    pub unit_id: UnitId,
}

/// Adapter for the hub service
#[async_trait]
pub trait HubAdapter: Clone + Send + Sync + 'static {
    /// Authorize an operator by badge
    async fn log_in(&self, request: LoginRequest) -> Result<LoginReply, HubError>;

    /// Close the operator's shift
    async fn log_out(&self, request: LogoutRequest) -> Result<HubReply, HubError>;

    /// Start an operation on a unit
    async fn start_operation(&self, request: StartOperationRequest)
        -> Result<HubReply, HubError>;

    /// End the operation on a unit
    async fn end_operation(&self, request: EndOperationRequest) -> Result<HubReply, HubError>;

    /// Ask the hub to publish the unit's data
    async fn upload(&self, request: UploadRequest) -> Result<HubReply, HubError>;

    /// Hub-side login status of a workbench
    async fn workbench_status(&self, workbench_number: u32) -> Result<WorkbenchStatus, HubError>;
}
