// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Spoke workbench engine: render queue and operator-action controller

mod display;
mod error;
mod live;
mod workbench;

pub use display::{Display, DisplaySettings, RenderOutcome};
pub use error::WorkbenchError;
pub use live::LiveData;
pub use workbench::{Outcome, Workbench, WorkbenchSettings};
