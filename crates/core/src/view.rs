// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! View catalogue
//!
//! A [`ViewKind`] is a stateless template. It is queued by kind only and
//! composed into a [`Frame`] at paint time against the latest [`ViewData`],
//! so a view queued before a login still shows the operator who logged in.
//! Pixel layout is the panel's business; a frame only says what goes where.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Every screen and alert the workbench can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    /// Cleans the panel
    Blank,
    LoginScreen,
    /// Barcode scan prompt shown while an operator idles
    ScanBarcode,
    /// Running timer for the operation in progress
    OngoingOperation,
    FailedAuthorization,
    SuccessfulAuthorization,
    SuccessfulLogOut,
    IdMismatch,
    UnitNotFound,
    OperationStarted,
    OperationEnded,
    AuthorizeFirst,
    BackendUnreachable,
    OperationForbidden,
}

/// How long a view keeps the render worker once painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    /// Painted once, worker moves on immediately
    Static,
    /// Held for the configured alert duration
    Alert,
    /// Redrawn on every refresh tick while the operation is ongoing
    Live,
}

/// Pictogram drawn next to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Icon {
    Tick,
    Cross,
    Warning,
    Rfid,
    Barcode,
}

/// Live data a view is composed against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewData {
    pub workbench_number: u32,
    pub position: String,
    pub short_name: String,
    /// Time since the ongoing operation started
    pub elapsed: Option<Duration>,
    pub rotate: bool,
}

/// Composed content of one screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub view: ViewKind,
    pub icon: Option<Icon>,
    pub heading: Option<String>,
    pub lines: Vec<String>,
    pub footer: Option<String>,
    /// Output is mounted upside down
    pub rotate: bool,
}

impl Frame {
    fn new(view: ViewKind, data: &ViewData) -> Self {
        Self {
            view,
            icon: None,
            heading: None,
            lines: Vec::new(),
            footer: None,
            rotate: data.rotate,
        }
    }

    fn alert(view: ViewKind, data: &ViewData, icon: Icon, message: &[&str]) -> Self {
        Self {
            icon: Some(icon),
            lines: message.iter().map(|line| line.to_string()).collect(),
            ..Self::new(view, data)
        }
    }
}

impl ViewKind {
    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::Blank => "BlankScreen",
            ViewKind::LoginScreen => "LoginScreen",
            ViewKind::ScanBarcode => "ScanBarcode",
            ViewKind::OngoingOperation => "OngoingOperationScreen",
            ViewKind::FailedAuthorization => "FailedAuthorizationAlert",
            ViewKind::SuccessfulAuthorization => "SuccessfulAuthorizationAlert",
            ViewKind::SuccessfulLogOut => "SuccessfulLogOutAlert",
            ViewKind::IdMismatch => "IdMismatchAlert",
            ViewKind::UnitNotFound => "UnitNotFoundAlert",
            ViewKind::OperationStarted => "OperationStartedAlert",
            ViewKind::OperationEnded => "OperationEndedAlert",
            ViewKind::AuthorizeFirst => "AuthorizeFirstAlert",
            ViewKind::BackendUnreachable => "BackendUnreachableAlert",
            ViewKind::OperationForbidden => "OperationForbiddenAlert",
        }
    }

    pub fn hold(&self) -> Hold {
        match self {
            ViewKind::Blank | ViewKind::LoginScreen | ViewKind::ScanBarcode => Hold::Static,
            ViewKind::OngoingOperation => Hold::Live,
            ViewKind::FailedAuthorization
            | ViewKind::SuccessfulAuthorization
            | ViewKind::SuccessfulLogOut
            | ViewKind::IdMismatch
            | ViewKind::UnitNotFound
            | ViewKind::OperationStarted
            | ViewKind::OperationEnded
            | ViewKind::AuthorizeFirst
            | ViewKind::BackendUnreachable
            | ViewKind::OperationForbidden => Hold::Alert,
        }
    }

    /// Compose the frame for this view against current data
    pub fn compose(&self, data: &ViewData) -> Frame {
        let view = *self;
        match view {
            ViewKind::Blank => Frame::new(view, data),

            ViewKind::LoginScreen => Frame {
                icon: Some(Icon::Rfid),
                heading: Some("Spoke Workbench".to_string()),
                lines: vec!["Apply your".into(), "badge to".into(), "the reader".into()],
                footer: Some(format!("spoke no.{}", data.workbench_number)),
                ..Frame::new(view, data)
            },

            ViewKind::ScanBarcode => Frame {
                footer: Some(format!("Authorized {}", data.short_name)),
                ..Frame::alert(view, data, Icon::Barcode, &["Scan the", "barcode"])
            },

            ViewKind::OngoingOperation => Frame {
                heading: Some("RECORDING".to_string()),
                lines: vec![format_elapsed(data.elapsed.unwrap_or_default())],
                footer: Some("Scan the barcode again to finish".to_string()),
                ..Frame::new(view, data)
            },

            ViewKind::SuccessfulAuthorization => {
                let message = ["Authorized", data.position.as_str(), data.short_name.as_str()];
                Frame::alert(view, data, Icon::Tick, &message)
            }

            ViewKind::FailedAuthorization => {
                Frame::alert(view, data, Icon::Cross, &["Authorization", "failed"])
            }
            ViewKind::SuccessfulLogOut => {
                Frame::alert(view, data, Icon::Tick, &["Session", "closed"])
            }
            ViewKind::IdMismatch => Frame::alert(
                view,
                data,
                Icon::Cross,
                &["Another", "employee is", "authorized"],
            ),
            ViewKind::UnitNotFound => Frame::alert(view, data, Icon::Cross, &["Unit", "not found"]),
            ViewKind::OperationStarted => {
                Frame::alert(view, data, Icon::Tick, &["Operation", "started"])
            }
            ViewKind::OperationEnded => {
                Frame::alert(view, data, Icon::Tick, &["Operation", "finished"])
            }
            ViewKind::AuthorizeFirst => {
                Frame::alert(view, data, Icon::Cross, &["Authorization", "required"])
            }
            ViewKind::BackendUnreachable => {
                Frame::alert(view, data, Icon::Warning, &["No connection", "to server"])
            }
            ViewKind::OperationForbidden => {
                Frame::alert(view, data, Icon::Warning, &["Operation", "not allowed"])
            }
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Timer text, `HH:MM:SS`. Hours keep counting past a day.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
