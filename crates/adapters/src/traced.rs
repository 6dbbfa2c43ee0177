// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::hub::{
    EndOperationRequest, HubAdapter, HubError, HubReply, LoginReply, LoginRequest, LogoutRequest,
    StartOperationRequest, UploadRequest, WorkbenchStatus,
};
use async_trait::async_trait;
use std::future::Future;
use std::time::Instant;
use tracing::Instrument;

/// Wrapper that adds tracing to any HubAdapter
#[derive(Clone)]
pub struct TracedHubAdapter<H> {
    inner: H,
}

impl<H> TracedHubAdapter<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

/// Reply status worth logging, if the reply has one
trait ReplyStatus {
    fn status(&self) -> Option<bool>;
}

impl ReplyStatus for HubReply {
    fn status(&self) -> Option<bool> {
        Some(self.status)
    }
}

impl ReplyStatus for LoginReply {
    fn status(&self) -> Option<bool> {
        Some(self.status)
    }
}

impl ReplyStatus for WorkbenchStatus {
    fn status(&self) -> Option<bool> {
        None
    }
}

/// Run a hub call inside `span`, logging its outcome and latency
async fn traced<T, F>(span: tracing::Span, call: F) -> Result<T, HubError>
where
    T: ReplyStatus,
    F: Future<Output = Result<T, HubError>>,
{
    async move {
        tracing::debug!("sending");
        let start = Instant::now();
        let result = call.await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(reply) => match reply.status() {
                Some(true) | None => tracing::info!(elapsed_ms, "accepted"),
                Some(false) => tracing::warn!(elapsed_ms, "rejected by hub"),
            },
            Err(e) => tracing::error!(elapsed_ms, error = %e, "hub call failed"),
        }

        result
    }
    .instrument(span)
    .await
}

#[async_trait]
impl<H: HubAdapter> HubAdapter for TracedHubAdapter<H> {
    async fn log_in(&self, request: LoginRequest) -> Result<LoginReply, HubError> {
        let span = tracing::info_span!(
            "hub.log_in",
            workbench = request.workbench_number,
            badge = %request.badge_id
        );
        traced(span, self.inner.log_in(request)).await
    }

    async fn log_out(&self, request: LogoutRequest) -> Result<HubReply, HubError> {
        let span = tracing::info_span!("hub.log_out", workbench = request.workbench_number);
        traced(span, self.inner.log_out(request)).await
    }

    async fn start_operation(
        &self,
        request: StartOperationRequest,
    ) -> Result<HubReply, HubError> {
        let span = tracing::info_span!(
            "hub.start_operation",
            workbench = request.workbench_number,
            unit = %request.unit_id,
            stage = %request.production_stage_name
        );
        traced(span, self.inner.start_operation(request)).await
    }

    async fn end_operation(&self, request: EndOperationRequest) -> Result<HubReply, HubError> {
        let span = tracing::info_span!(
            "hub.end_operation",
            workbench = request.workbench_number,
            unit = %request.unit_id
        );
        traced(span, self.inner.end_operation(request)).await
    }

    async fn upload(&self, request: UploadRequest) -> Result<HubReply, HubError> {
        let span = tracing::info_span!(
            "hub.upload",
            workbench = request.workbench_number,
            unit = %request.unit_id
        );
        traced(span, self.inner.upload(request)).await
    }

    async fn workbench_status(&self, workbench_number: u32) -> Result<WorkbenchStatus, HubError> {
        let span = tracing::debug_span!("hub.workbench_status", workbench = workbench_number);
        traced(span, self.inner.workbench_status(workbench_number)).await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
