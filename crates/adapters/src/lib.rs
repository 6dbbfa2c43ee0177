// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the hub service and the output panel

pub mod hub;
pub mod panel;
pub mod traced;

pub use hub::{
    AdditionalInfo, EndOperationRequest, HttpHubAdapter, HubAdapter, HubError, HubReply, Identity,
    LoginReply, LoginRequest, LogoutRequest, StartOperationRequest, UploadRequest,
    WorkbenchStatus,
};
pub use panel::{ConsolePanel, PanelAdapter, PanelError};
pub use traced::TracedHubAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use hub::{FakeHubAdapter, HubCall, HubEndpoint, Scripted};
#[cfg(any(test, feature = "test-support"))]
pub use panel::{FakePanel, PanelCall};
