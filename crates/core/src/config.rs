// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workbench configuration
//!
//! Loaded once at startup from a TOML file and immutable afterwards.
//!
//! ```toml
//! [general]
//! workbench_number = 1
//! production_stage_name = "assembly"
//! send_upload_request = true
//!
//! [endpoints]
//! hub_url = "http://127.0.0.1:5000"
//! hub_timeout = "1s"
//! listen = "0.0.0.0:8080"
//!
//! [hid_devices]
//! rfid_reader = "Sycreader RFID Technology Co., Ltd SYC ID&IC USB Reader"
//! barcode_reader = "HENEX 2D Barcode Scanner"
//!
//! [developer]
//! disable_id_validation = false
//! disable_barcode_validation = false
//!
//! [screen]
//! enforce_headless = false
//! rotate_output = false
//! alert_duration = "1s"
//! timer_refresh = "1s"
//!
//! [logging]
//! path = "spoke-daemon.log"
//! ```

use crate::hid::HidDevices;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokeConfig {
    pub general: GeneralConfig,
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub hid_devices: HidDevices,
    #[serde(default)]
    pub developer: DeveloperConfig,
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub workbench_number: u32,
    #[serde(default)]
    pub production_stage_name: String,
    /// Ask the hub to upload unit data after each finished operation
    #[serde(default)]
    pub send_upload_request: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    pub hub_url: String,
    #[serde(default = "default_hub_timeout", with = "humantime_serde")]
    pub hub_timeout: Duration,
    #[serde(default = "default_listen")]
    pub listen: String,
}

/// Development overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperConfig {
    #[serde(default)]
    pub disable_id_validation: bool,
    #[serde(default)]
    pub disable_barcode_validation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    #[serde(default)]
    pub enforce_headless: bool,
    #[serde(default)]
    pub rotate_output: bool,
    #[serde(default = "default_alert_duration", with = "humantime_serde")]
    pub alert_duration: Duration,
    #[serde(default = "default_timer_refresh", with = "humantime_serde")]
    pub timer_refresh: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log file; stderr when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_hub_timeout() -> Duration {
    Duration::from_secs(1)
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_alert_duration() -> Duration {
    Duration::from_secs(1)
}

fn default_timer_refresh() -> Duration {
    Duration::from_secs(1)
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            enforce_headless: false,
            rotate_output: false,
            alert_duration: default_alert_duration(),
            timer_refresh: default_timer_refresh(),
        }
    }
}

impl SpokeConfig {
    /// Minimal configuration for a workbench talking to `hub_url`
    pub fn new(workbench_number: u32, hub_url: impl Into<String>) -> Self {
        Self {
            general: GeneralConfig {
                workbench_number,
                production_stage_name: String::new(),
                send_upload_request: false,
            },
            endpoints: EndpointsConfig {
                hub_url: hub_url.into(),
                hub_timeout: default_hub_timeout(),
                listen: default_listen(),
            },
            hid_devices: HidDevices::default(),
            developer: DeveloperConfig::default(),
            screen: ScreenConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate config text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: SpokeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.workbench_number == 0 {
            return Err(ConfigError::Invalid {
                field: "general.workbench_number",
                message: "must be positive".to_string(),
            });
        }

        let url = &self.endpoints.hub_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "endpoints.hub_url",
                message: format!("expected an http(s) URL, got '{}'", url),
            });
        }

        if self.screen.timer_refresh.is_zero() {
            return Err(ConfigError::Invalid {
                field: "screen.timer_refresh",
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Hub base URL without a trailing slash
    pub fn hub_url(&self) -> &str {
        self.endpoints.hub_url.trim_end_matches('/')
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
