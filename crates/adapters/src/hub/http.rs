// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP hub adapter
//!
//! Blocking `ureq` calls moved off the async runtime with `spawn_blocking`.
//! Every request carries the same short global timeout; there are no retries.

use super::{
    EndOperationRequest, HubAdapter, HubError, HubReply, LoginReply, LoginRequest, LogoutRequest,
    StartOperationRequest, UploadRequest, WorkbenchStatus,
};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;
use spoke_core::UnitId;
use std::time::Duration;

/// Everything but unreserved characters; `.` is escaped so an id can never
/// form a dot segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

/// Hub adapter speaking JSON over HTTP
#[derive(Clone)]
pub struct HttpHubAdapter {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpHubAdapter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            // Error statuses still carry a JSON envelope worth reading
            .http_status_as_error(false)
            .build();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post_blocking<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, HubError> {
        let url = self.url(path);
        let payload =
            serde_json::to_string(body).map_err(|e| HubError::Malformed(e.to_string()))?;

        let mut response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send(payload.as_str())
            .map_err(|e| HubError::Unreachable(format!("POST {}: {}", url, e)))?;

        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| HubError::Unreachable(format!("failed to read reply: {}", e)))?;

        parse_reply(&text)
    }

    fn get_blocking<R: DeserializeOwned>(&self, path: &str) -> Result<R, HubError> {
        let url = self.url(path);

        let mut response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| HubError::Unreachable(format!("GET {}: {}", url, e)))?;

        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| HubError::Unreachable(format!("failed to read reply: {}", e)))?;

        parse_reply(&text)
    }

    async fn post<B, R>(&self, path: String, body: B) -> Result<R, HubError>
    where
        B: Serialize + Send + 'static,
        R: DeserializeOwned + Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.post_blocking(&path, &body))
            .await
            .map_err(|e| HubError::Unreachable(format!("request task failed: {}", e)))?
    }

    async fn get<R>(&self, path: String) -> Result<R, HubError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.get_blocking(&path))
            .await
            .map_err(|e| HubError::Unreachable(format!("request task failed: {}", e)))?
    }
}

/// Decode a reply body
pub(crate) fn parse_reply<R: DeserializeOwned>(text: &str) -> Result<R, HubError> {
    serde_json::from_str(text).map_err(|e| HubError::Malformed(format!("{}: {:?}", e, text)))
}

/// Path of a unit endpoint, the id escaped as a single segment
pub(crate) fn unit_path(unit: &UnitId, action: &str) -> String {
    format!(
        "/api/unit/{}/{}",
        utf8_percent_encode(unit.as_str(), PATH_SEGMENT),
        action
    )
}

/// A granted login must say who was granted
pub(crate) fn check_login(reply: LoginReply) -> Result<LoginReply, HubError> {
    if reply.status && reply.identity.is_none() {
        return Err(HubError::Malformed(
            "login granted without an identity".to_string(),
        ));
    }
    Ok(reply)
}

#[async_trait]
impl HubAdapter for HttpHubAdapter {
    async fn log_in(&self, request: LoginRequest) -> Result<LoginReply, HubError> {
        let reply = self.post("/api/employee/log-in".to_string(), request).await?;
        check_login(reply)
    }

    async fn log_out(&self, request: LogoutRequest) -> Result<HubReply, HubError> {
        self.post("/api/employee/log-out".to_string(), request).await
    }

    async fn start_operation(
        &self,
        request: StartOperationRequest,
    ) -> Result<HubReply, HubError> {
        let path = unit_path(&request.unit_id, "start");
        self.post(path, request).await
    }

    async fn end_operation(&self, request: EndOperationRequest) -> Result<HubReply, HubError> {
        let path = unit_path(&request.unit_id, "end");
        self.post(path, request).await
    }

    async fn upload(&self, request: UploadRequest) -> Result<HubReply, HubError> {
        let path = unit_path(&request.unit_id, "upload");
        self.post(path, request).await
    }

    async fn workbench_status(&self, workbench_number: u32) -> Result<WorkbenchStatus, HubError> {
        self.get(format!("/api/workbench/{}/status", workbench_number))
            .await
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
