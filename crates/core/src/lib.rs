// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! spoke-core: data model of the workbench terminal
//!
//! This crate provides:
//! - The operator session ([`Employee`])
//! - The pure workbench state machine table ([`State`], [`Action`])
//! - The view catalogue and frame composition
//! - HID event types and configuration
//!
//! Nothing here performs I/O.

pub mod config;
pub mod hid;
pub mod session;
pub mod state;
pub mod unit;
pub mod view;

// Re-exports
pub use config::{ConfigError, SpokeConfig};
pub use hid::{DeviceRole, HidBuffer, HidDevices, HidEvent};
pub use session::Employee;
pub use state::{Action, Forbidden, State};
pub use unit::UnitId;
pub use view::{format_elapsed, Frame, Hold, Icon, ViewData, ViewKind};
