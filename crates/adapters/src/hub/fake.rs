// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake hub adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{
    EndOperationRequest, HubAdapter, HubError, HubReply, Identity, LoginReply, LoginRequest,
    LogoutRequest, StartOperationRequest, UploadRequest, WorkbenchStatus,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Recorded hub call
#[derive(Debug, Clone, PartialEq)]
pub enum HubCall {
    LogIn(LoginRequest),
    LogOut(LogoutRequest),
    StartOperation(StartOperationRequest),
    EndOperation(EndOperationRequest),
    Upload(UploadRequest),
    Status { workbench_number: u32 },
}

impl HubCall {
    pub fn endpoint(&self) -> HubEndpoint {
        match self {
            HubCall::LogIn(_) => HubEndpoint::LogIn,
            HubCall::LogOut(_) => HubEndpoint::LogOut,
            HubCall::StartOperation(_) => HubEndpoint::StartOperation,
            HubCall::EndOperation(_) => HubEndpoint::EndOperation,
            HubCall::Upload(_) => HubEndpoint::Upload,
            HubCall::Status { .. } => HubEndpoint::Status,
        }
    }
}

/// Hub endpoint selector for scripting outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HubEndpoint {
    LogIn,
    LogOut,
    StartOperation,
    EndOperation,
    Upload,
    Status,
}

/// Scripted answer of an endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    /// `status: true`
    Accept,
    /// `status: false` with a comment
    Reject(String),
    /// The call fails without a reply
    Unreachable,
}

struct FakeHubState {
    calls: Vec<HubCall>,
    /// One-shot answers, consumed before the standing ones
    queued: HashMap<HubEndpoint, VecDeque<Scripted>>,
    standing: HashMap<HubEndpoint, Scripted>,
    identity: Identity,
    /// Who the hub believes is logged in
    logged_in: Option<Identity>,
}

/// Fake hub that grants everything unless scripted otherwise.
///
/// It keeps its own login bookkeeping so status queries agree with the
/// log-in/log-out calls it accepted.
#[derive(Clone)]
pub struct FakeHubAdapter {
    state: Arc<Mutex<FakeHubState>>,
}

impl Default for FakeHubAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHubAdapter {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeHubState {
                calls: Vec::new(),
                queued: HashMap::new(),
                standing: HashMap::new(),
                identity: Identity::new("A B C", "Engineer"),
                logged_in: None,
            })),
        }
    }

    /// Identity granted on successful logins
    pub fn with_identity(self, name: &str, position: &str) -> Self {
        self.lock().identity = Identity::new(name, position);
        self
    }

    /// Answer every future call to `endpoint` with `outcome`
    pub fn set(&self, endpoint: HubEndpoint, outcome: Scripted) {
        self.lock().standing.insert(endpoint, outcome);
    }

    /// Answer the next call to `endpoint` with `outcome`
    pub fn push(&self, endpoint: HubEndpoint, outcome: Scripted) {
        self.lock()
            .queued
            .entry(endpoint)
            .or_default()
            .push_back(outcome);
    }

    /// Pretend another client changed the hub-side login
    pub fn set_remote_login(&self, identity: Option<Identity>) {
        self.lock().logged_in = identity;
    }

    pub fn remote_login(&self) -> Option<Identity> {
        self.lock().logged_in.clone()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<HubCall> {
        self.lock().calls.clone()
    }

    /// Recorded calls to one endpoint
    pub fn calls_to(&self, endpoint: HubEndpoint) -> Vec<HubCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.endpoint() == endpoint)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeHubState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call and pick its scripted outcome
    fn answer(&self, call: HubCall) -> Scripted {
        let endpoint = call.endpoint();
        let mut state = self.lock();
        state.calls.push(call);

        if let Some(outcome) = state.queued.get_mut(&endpoint).and_then(VecDeque::pop_front) {
            return outcome;
        }
        state
            .standing
            .get(&endpoint)
            .cloned()
            .unwrap_or(Scripted::Accept)
    }

    fn reply(&self, call: HubCall) -> Result<HubReply, HubError> {
        match self.answer(call) {
            Scripted::Accept => Ok(HubReply::accepted()),
            Scripted::Reject(comment) => Ok(HubReply::rejected(comment)),
            Scripted::Unreachable => Err(unreachable()),
        }
    }
}

fn unreachable() -> HubError {
    HubError::Unreachable("fake hub is down".to_string())
}

#[async_trait]
impl HubAdapter for FakeHubAdapter {
    async fn log_in(&self, request: LoginRequest) -> Result<LoginReply, HubError> {
        match self.answer(HubCall::LogIn(request)) {
            Scripted::Accept => {
                let mut state = self.lock();
                let identity = state.identity.clone();
                state.logged_in = Some(identity.clone());
                Ok(LoginReply::granted(identity))
            }
            Scripted::Reject(comment) => Ok(LoginReply::denied(comment)),
            Scripted::Unreachable => Err(unreachable()),
        }
    }

    async fn log_out(&self, request: LogoutRequest) -> Result<HubReply, HubError> {
        let reply = self.reply(HubCall::LogOut(request))?;
        if reply.status {
            self.lock().logged_in = None;
        }
        Ok(reply)
    }

    async fn start_operation(
        &self,
        request: StartOperationRequest,
    ) -> Result<HubReply, HubError> {
        self.reply(HubCall::StartOperation(request))
    }

    async fn end_operation(&self, request: EndOperationRequest) -> Result<HubReply, HubError> {
        self.reply(HubCall::EndOperation(request))
    }

    async fn upload(&self, request: UploadRequest) -> Result<HubReply, HubError> {
        self.reply(HubCall::Upload(request))
    }

    async fn workbench_status(&self, workbench_number: u32) -> Result<WorkbenchStatus, HubError> {
        match self.answer(HubCall::Status { workbench_number }) {
            Scripted::Unreachable => Err(unreachable()),
            Scripted::Accept | Scripted::Reject(_) => {
                let employee = self.lock().logged_in.clone();
                Ok(WorkbenchStatus {
                    employee_logged_in: employee.is_some(),
                    employee,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
