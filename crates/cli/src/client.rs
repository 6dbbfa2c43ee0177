// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the workbench daemon

use std::time::Duration;

use serde_json::Value;
use spoke_core::HidEvent;
use thiserror::Error;

/// Daemon address when `--server` is not given
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

// Timeout configuration (env vars in milliseconds)

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for a single request to the daemon
pub fn timeout_request() -> Duration {
    parse_duration_ms("SPOKE_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Server {url} unreachable: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Unexpected reply from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

/// Talks to the daemon's `/api` endpoints
pub struct DaemonClient {
    base_url: String,
    agent: ureq::Agent,
}

impl DaemonClient {
    pub fn new(server: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            // 400 replies still carry the JSON envelope
            .http_status_as_error(false)
            .build();
        Self {
            base_url: api_base(server),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    pub fn hid_event_url(&self) -> String {
        format!("{}/hid_event", self.base_url)
    }

    pub fn hid_buffer_url(&self) -> String {
        format!("{}/hid_buffer", self.base_url)
    }

    /// Post a scan as if a reader had produced it
    pub fn send_event(&self, event: &HidEvent) -> Result<Value, ClientError> {
        let url = self.hid_event_url();
        let payload = serde_json::to_string(event).map_err(|e| ClientError::Malformed {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let mut response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send(payload.as_str())
            .map_err(|e| unreachable(&url, e))?;
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| unreachable(&url, e))?;

        parse_reply(&url, &text)
    }

    /// Fetch the last raw payload the daemon received
    pub fn hid_buffer(&self) -> Result<Value, ClientError> {
        let url = self.hid_buffer_url();
        let mut response = self.agent.get(&url).call().map_err(|e| unreachable(&url, e))?;
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| unreachable(&url, e))?;

        parse_reply(&url, &text)
    }
}

fn unreachable(url: &str, e: ureq::Error) -> ClientError {
    ClientError::Unreachable {
        url: url.to_string(),
        reason: e.to_string(),
    }
}

/// `http://host:port` (with or without a trailing slash or `/api`) to the API root
pub fn api_base(server: &str) -> String {
    let trimmed = server.trim_end_matches('/');
    if trimmed.ends_with("/api") {
        trimmed.to_string()
    } else {
        format!("{}/api", trimmed)
    }
}

pub fn parse_reply(url: &str, text: &str) -> Result<Value, ClientError> {
    serde_json::from_str(text).map_err(|e| ClientError::Malformed {
        url: url.to_string(),
        reason: format!("{}: {:?}", e, text),
    })
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
