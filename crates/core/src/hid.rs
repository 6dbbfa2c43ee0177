// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HID events from badge and barcode readers

use serde::{Deserialize, Serialize};

/// A decoded scan as delivered by the HID daemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HidEvent {
    /// Name of the physical input device
    pub name: String,
    /// Raw decoded payload (badge id or barcode digits)
    pub string: String,
}

impl HidEvent {
    pub fn new(name: impl Into<String>, string: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            string: string.into(),
        }
    }
}

/// Most recent raw HID payload, actionable or not
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HidBuffer {
    pub buffer: String,
    /// Epoch seconds
    pub added_on: i64,
}

/// What a known input device is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceRole {
    RfidReader,
    BarcodeReader,
}

/// Device names filling each role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HidDevices {
    #[serde(default)]
    pub rfid_reader: Option<String>,
    #[serde(default)]
    pub barcode_reader: Option<String>,
}

impl HidDevices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: DeviceRole, device_name: impl Into<String>) -> Self {
        let slot = match role {
            DeviceRole::RfidReader => &mut self.rfid_reader,
            DeviceRole::BarcodeReader => &mut self.barcode_reader,
        };
        *slot = Some(device_name.into());
        self
    }

    /// Role of the sender device, if it is known
    pub fn identify(&self, sender: &str) -> Option<DeviceRole> {
        [DeviceRole::RfidReader, DeviceRole::BarcodeReader]
            .into_iter()
            .find(|role| self.device_name(*role) == Some(sender))
    }

    pub fn device_name(&self, role: DeviceRole) -> Option<&str> {
        match role {
            DeviceRole::RfidReader => self.rfid_reader.as_deref(),
            DeviceRole::BarcodeReader => self.barcode_reader.as_deref(),
        }
    }
}

#[cfg(test)]
#[path = "hid_tests.rs"]
mod tests;
