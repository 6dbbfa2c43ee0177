// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workbench state machine
//!
//! The transition table is pure: [`State::permit`] says where an action
//! leads or why it is forbidden. Talking to the hub and deciding whether the
//! transition actually happens is the engine's job.
//!
//! ```text
//! AwaitLogin --start_shift--> AuthorizedIdling --start_operation--> ProductionStageOngoing
//!     ^                             |    ^                                   |
//!     +---------end_shift-----------+    +-----------end_operation-----------+
//! ```

use crate::view::ViewKind;
use serde::{Deserialize, Serialize};

/// Workbench FSM node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    /// Nobody is logged in
    #[default]
    AwaitLogin,
    /// An operator is logged in, no unit is being worked on
    AuthorizedIdling,
    /// An operation on a unit is in progress
    ProductionStageOngoing,
}

/// Operator actions the state machine arbitrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    StartShift,
    EndShift,
    StartOperation,
    EndOperation,
}

/// An action the current state does not allow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forbidden {
    pub state: State,
    pub action: Action,
    pub reason: &'static str,
    /// Whether the operator should see an alert about it.
    ///
    /// Repeated scans while an operation runs are expected and stay quiet.
    pub alert: bool,
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::AwaitLogin => "AwaitLogin",
            State::AuthorizedIdling => "AuthorizedIdling",
            State::ProductionStageOngoing => "ProductionStageOngoing",
        }
    }

    /// Target state of `action`, or why it is forbidden here
    pub fn permit(&self, action: Action) -> Result<State, Forbidden> {
        let forbid = |reason, alert| {
            Err(Forbidden {
                state: *self,
                action,
                reason,
                alert,
            })
        };

        match (self, action) {
            (State::AwaitLogin, Action::StartShift) => Ok(State::AuthorizedIdling),
            (State::AwaitLogin, Action::EndShift) => {
                forbid("cannot log out: no one is logged in at the workbench", true)
            }
            (State::AwaitLogin, Action::StartOperation) => {
                forbid("cannot start operation: no one is logged in at the workbench", true)
            }
            (State::AwaitLogin, Action::EndOperation) => {
                forbid("cannot end operation: no one is logged in at the workbench", true)
            }

            (State::AuthorizedIdling, Action::StartShift) => forbid(
                "cannot log in: a worker is already logged in at the workbench",
                true,
            ),
            (State::AuthorizedIdling, Action::EndShift) => Ok(State::AwaitLogin),
            (State::AuthorizedIdling, Action::StartOperation) => Ok(State::ProductionStageOngoing),
            (State::AuthorizedIdling, Action::EndOperation) => forbid(
                "cannot end operation: there is no ongoing operation at the workbench",
                true,
            ),

            (State::ProductionStageOngoing, Action::StartShift) => forbid(
                "cannot log in: a worker is already logged in at the workbench",
                false,
            ),
            (State::ProductionStageOngoing, Action::EndShift) => forbid(
                "cannot log out: there is an ongoing operation at the workbench",
                false,
            ),
            (State::ProductionStageOngoing, Action::StartOperation) => forbid(
                "cannot start an operation: there is already an ongoing operation at the workbench",
                false,
            ),
            (State::ProductionStageOngoing, Action::EndOperation) => Ok(State::AuthorizedIdling),
        }
    }

    /// Views rendered when the state is entered
    pub fn entry_views(&self) -> &'static [ViewKind] {
        match self {
            State::AwaitLogin => &[ViewKind::LoginScreen],
            State::AuthorizedIdling => &[ViewKind::ScanBarcode],
            State::ProductionStageOngoing => {
                &[ViewKind::OperationStarted, ViewKind::OngoingOperation]
            }
        }
    }

    /// Whether an operator is logged in
    pub fn is_authorized(&self) -> bool {
        !matches!(self, State::AwaitLogin)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::StartShift => "start_shift",
            Action::EndShift => "end_shift",
            Action::StartOperation => "start_operation",
            Action::EndOperation => "end_operation",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
