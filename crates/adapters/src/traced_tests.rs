// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::hub::{FakeHubAdapter, HubEndpoint, Scripted};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn login(badge: &str) -> LoginRequest {
    LoginRequest {
        workbench_number: 5,
        badge_id: badge.to_string(),
    }
}

#[test]
fn traced_login_logs_span_and_outcome() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedHubAdapter::new(FakeHubAdapter::new());
        traced.log_in(login("card-7")).await
    });

    assert!(result.unwrap().status);
    assert!(logs.contains("hub.log_in"), "Logs:\n{}", logs);
    assert!(logs.contains("card-7"), "Logs:\n{}", logs);
    assert!(logs.contains("accepted"), "Logs:\n{}", logs);
    assert!(logs.contains("elapsed_ms"), "Logs:\n{}", logs);
}

#[test]
fn traced_rejection_logs_warning() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeHubAdapter::new();
        fake.set(HubEndpoint::LogIn, Scripted::Reject("unknown".to_string()));
        TracedHubAdapter::new(fake).log_in(login("card-7")).await
    });

    assert!(!result.unwrap().status);
    assert!(logs.contains("WARN"), "Logs:\n{}", logs);
    assert!(logs.contains("rejected by hub"), "Logs:\n{}", logs);
}

#[test]
fn traced_failure_logs_error() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeHubAdapter::new();
        fake.set(HubEndpoint::LogOut, Scripted::Unreachable);
        TracedHubAdapter::new(fake)
            .log_out(LogoutRequest {
                workbench_number: 5,
            })
            .await
    });

    assert!(result.is_err());
    assert!(logs.contains("ERROR"), "Logs:\n{}", logs);
    assert!(logs.contains("fake hub is down"), "Logs:\n{}", logs);
}

#[tokio::test]
async fn traced_adapter_forwards_calls() {
    let fake = FakeHubAdapter::new();
    let traced = TracedHubAdapter::new(fake.clone());

    traced.workbench_status(5).await.unwrap();
    traced.log_in(login("card-1")).await.unwrap();

    assert_eq!(fake.calls().len(), 2);
    assert!(fake.remote_login().is_some());
}
