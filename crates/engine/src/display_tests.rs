// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use spoke_adapters::{FakePanel, PanelCall};
use spoke_core::UnitId;
use std::time::Instant;

const SETTLE: Duration = Duration::from_secs(2);

fn settings() -> DisplaySettings {
    DisplaySettings {
        alert_duration: Duration::from_millis(20),
        timer_refresh: Duration::from_millis(10),
    }
}

fn setup() -> (Display<FakePanel>, FakePanel) {
    let panel = FakePanel::new();
    let display = Display::new(panel.clone(), LiveData::new(7, false), settings());
    (display, panel)
}

// =============================================================================
// Deduplication
// =============================================================================

#[tokio::test]
async fn same_pending_view_twice_paints_once() {
    let (display, panel) = setup();

    assert_eq!(display.render_view(ViewKind::ScanBarcode), RenderOutcome::Queued);
    assert_eq!(display.render_view(ViewKind::ScanBarcode), RenderOutcome::Coalesced);

    assert!(display.flush(SETTLE).await);
    assert_eq!(panel.painted(), vec![ViewKind::ScanBarcode]);
}

#[tokio::test]
async fn view_already_on_screen_is_not_repainted() {
    let (display, panel) = setup();

    display.render_view(ViewKind::LoginScreen);
    assert!(display.flush(SETTLE).await);

    assert_eq!(display.render_view(ViewKind::LoginScreen), RenderOutcome::AlreadyShown);
    assert!(display.flush(SETTLE).await);

    assert_eq!(panel.painted(), vec![ViewKind::LoginScreen]);
    assert_eq!(display.worker_spawns(), 1);
}

#[tokio::test]
async fn non_adjacent_duplicates_are_kept() {
    let (display, panel) = setup();

    display.render_view(ViewKind::LoginScreen);
    display.render_view(ViewKind::FailedAuthorization);
    display.render_view(ViewKind::LoginScreen);

    assert!(display.flush(SETTLE).await);
    assert_eq!(
        panel.painted(),
        vec![
            ViewKind::LoginScreen,
            ViewKind::FailedAuthorization,
            ViewKind::LoginScreen
        ]
    );
}

#[tokio::test]
async fn current_view_only_dedups_when_queue_is_empty() {
    let (display, panel) = setup();

    display.render_view(ViewKind::ScanBarcode);
    assert!(display.flush(SETTLE).await);

    // The queue is not empty, so the on-screen view is queued again
    display.render_view(ViewKind::IdMismatch);
    assert_eq!(display.render_view(ViewKind::ScanBarcode), RenderOutcome::Queued);

    assert!(display.flush(SETTLE).await);
    assert_eq!(
        panel.painted(),
        vec![ViewKind::ScanBarcode, ViewKind::IdMismatch, ViewKind::ScanBarcode]
    );
}

// =============================================================================
// Headless mode
// =============================================================================

#[tokio::test]
async fn enforced_headless_never_paints_or_spawns() {
    let panel = FakePanel::new();
    let display = Display::connect(panel.clone(), LiveData::new(1, false), settings(), true).await;

    assert!(display.is_headless());
    for _ in 0..50 {
        assert_eq!(display.render_view(ViewKind::LoginScreen), RenderOutcome::Headless);
        assert_eq!(display.render_view(ViewKind::BackendUnreachable), RenderOutcome::Headless);
    }

    assert!(display.flush(SETTLE).await);
    assert!(display.end_session(SETTLE).await);
    assert!(panel.calls().is_empty());
    assert_eq!(display.worker_spawns(), 0);
    assert_eq!(display.current_view(), None);
}

#[tokio::test]
async fn failed_panel_init_falls_back_to_headless() {
    let panel = FakePanel::failing_init();
    let display = Display::connect(panel.clone(), LiveData::new(1, false), settings(), false).await;

    assert!(display.is_headless());
    display.render_view(ViewKind::LoginScreen);
    assert_eq!(panel.calls(), vec![PanelCall::Init]);
    assert_eq!(display.worker_spawns(), 0);
}

#[tokio::test]
async fn connect_initializes_panel() {
    let panel = FakePanel::new();
    let display = Display::connect(panel.clone(), LiveData::new(1, false), settings(), false).await;

    assert!(!display.is_headless());
    assert_eq!(panel.calls(), vec![PanelCall::Init]);
}

// =============================================================================
// Worker lifecycle
// =============================================================================

#[tokio::test]
async fn one_worker_drains_a_burst_in_order() {
    let (display, panel) = setup();
    let burst = [
        ViewKind::SuccessfulAuthorization,
        ViewKind::ScanBarcode,
        ViewKind::OperationStarted,
        ViewKind::UnitNotFound,
        ViewKind::ScanBarcode,
    ];

    for kind in burst {
        display.render_view(kind);
    }

    assert!(display.flush(SETTLE).await);
    assert_eq!(panel.painted(), burst.to_vec());
    assert_eq!(display.worker_spawns(), 1);
    assert_eq!(display.current_view(), Some(ViewKind::ScanBarcode));
}

#[tokio::test]
async fn worker_picks_up_views_added_while_running() {
    let (display, panel) = setup();

    display.render_view(ViewKind::OperationEnded);
    tokio::time::sleep(Duration::from_millis(5)).await;
    display.render_view(ViewKind::ScanBarcode);

    assert!(display.flush(SETTLE).await);
    assert_eq!(
        panel.painted(),
        vec![ViewKind::OperationEnded, ViewKind::ScanBarcode]
    );
    assert_eq!(display.worker_spawns(), 1);
}

#[tokio::test]
async fn idle_queue_spawns_a_fresh_worker() {
    let (display, _panel) = setup();

    display.render_view(ViewKind::LoginScreen);
    assert!(display.flush(SETTLE).await);
    display.render_view(ViewKind::ScanBarcode);
    assert!(display.flush(SETTLE).await);

    assert_eq!(display.worker_spawns(), 2);
}

#[tokio::test]
async fn alerts_hold_the_worker() {
    let (display, _panel) = setup();
    let started = Instant::now();

    display.render_view(ViewKind::SuccessfulLogOut);
    display.render_view(ViewKind::UnitNotFound);
    assert!(display.flush(SETTLE).await);

    assert!(started.elapsed() >= settings().alert_duration * 2);
}

#[tokio::test]
async fn views_are_composed_at_paint_time() {
    let (display, panel) = setup();

    display.render_view(ViewKind::SuccessfulAuthorization);
    // The worker has not run yet on this single-threaded runtime
    display
        .live()
        .update_employee(|e| e.log_in("Engineer", "A B C", "card-1"));

    assert!(display.flush(SETTLE).await);
    let Some(PanelCall::Draw(frame)) = panel.calls().into_iter().next() else {
        panic!("expected a draw");
    };
    assert_eq!(frame.lines, vec!["Authorized", "Engineer", "A B. C."]);
}

#[tokio::test]
async fn paint_failure_stops_worker_without_restart() {
    let (display, panel) = setup();
    panel.fail_draws(true);

    display.render_view(ViewKind::LoginScreen);
    display.render_view(ViewKind::FailedAuthorization);
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert!(panel.painted().is_empty());
    assert_eq!(display.worker_spawns(), 1);
    assert_eq!(display.pending(), vec![ViewKind::FailedAuthorization]);

    // The next request starts a new worker that drains what was left
    panel.fail_draws(false);
    display.render_view(ViewKind::ScanBarcode);
    assert!(display.flush(SETTLE).await);

    assert_eq!(display.worker_spawns(), 2);
    assert_eq!(
        panel.painted(),
        vec![ViewKind::FailedAuthorization, ViewKind::ScanBarcode]
    );
}

// =============================================================================
// Live timer
// =============================================================================

#[tokio::test]
async fn timer_refreshes_until_operation_ends() {
    let (display, panel) = setup();
    display.live().set_unit(Some(UnitId::from("4006381333931")));

    display.render_view(ViewKind::OngoingOperation);
    assert!(display.flush(SETTLE).await);
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(panel.refreshes() >= 2, "refreshes: {}", panel.refreshes());

    display.live().set_unit(None);
    tokio::time::sleep(Duration::from_millis(40)).await;
    let refreshes = panel.refreshes();
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(panel.refreshes(), refreshes);

    // Worker is gone, the next render needs a new one
    display.render_view(ViewKind::ScanBarcode);
    assert!(display.flush(SETTLE).await);
    assert_eq!(display.worker_spawns(), 2);
}

#[tokio::test]
async fn timer_yields_to_newer_views_and_resumes() {
    let (display, panel) = setup();
    display.live().set_unit(Some(UnitId::from("4006381333931")));

    display.render_view(ViewKind::OngoingOperation);
    assert!(display.flush(SETTLE).await);

    display.render_view(ViewKind::BackendUnreachable);
    display.render_view(ViewKind::OngoingOperation);
    assert!(display.flush(SETTLE).await);

    assert_eq!(
        panel.painted(),
        vec![
            ViewKind::OngoingOperation,
            ViewKind::BackendUnreachable,
            ViewKind::OngoingOperation
        ]
    );
    assert_eq!(display.worker_spawns(), 1);
}

#[tokio::test]
async fn timer_rerender_keeps_operation_start() {
    let (display, panel) = setup();
    display.live().set_unit(Some(UnitId::from("42")));
    tokio::time::sleep(Duration::from_millis(1100)).await;

    display.render_view(ViewKind::OngoingOperation);
    assert!(display.flush(SETTLE).await);

    let Some(PanelCall::Draw(frame)) = panel.calls().into_iter().next() else {
        panic!("expected a draw");
    };
    assert_eq!(frame.lines, vec!["00:00:01"]);
}

// =============================================================================
// Shutdown
// =============================================================================

#[tokio::test]
async fn end_session_blanks_panel_and_joins_worker() {
    let (display, panel) = setup();

    display.render_view(ViewKind::ScanBarcode);
    assert!(display.end_session(SETTLE).await);

    assert_eq!(panel.painted(), vec![ViewKind::ScanBarcode, ViewKind::Blank]);
    assert_eq!(panel.calls().last(), Some(&PanelCall::Clear));
}

#[tokio::test]
async fn end_session_interrupts_running_timer() {
    let (display, panel) = setup();
    display.live().set_unit(Some(UnitId::from("42")));

    display.render_view(ViewKind::OngoingOperation);
    assert!(display.flush(SETTLE).await);

    assert!(display.end_session(SETTLE).await);
    assert_eq!(panel.painted().last(), Some(&ViewKind::Blank));
}

#[tokio::test]
async fn end_session_does_not_wait_for_timer_refresh() {
    let panel = FakePanel::new();
    let slow_timer = DisplaySettings {
        alert_duration: Duration::from_millis(5),
        timer_refresh: Duration::from_secs(30),
    };
    let display = Display::new(panel.clone(), LiveData::new(1, false), slow_timer);
    display.live().set_unit(Some(UnitId::from("42")));

    display.render_view(ViewKind::OngoingOperation);
    assert!(display.flush(SETTLE).await);

    assert!(display.end_session(Duration::from_millis(500)).await);
    assert_eq!(
        panel.painted(),
        vec![ViewKind::OngoingOperation, ViewKind::Blank]
    );
    assert_eq!(panel.refreshes(), 0);
}

#[tokio::test]
async fn end_session_gives_up_after_timeout() {
    let panel = FakePanel::new();
    let slow = DisplaySettings {
        alert_duration: Duration::from_secs(5),
        timer_refresh: Duration::from_millis(10),
    };
    let display = Display::new(panel, LiveData::new(1, false), slow);

    display.render_view(ViewKind::BackendUnreachable);
    assert!(!display.end_session(Duration::from_millis(50)).await);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_renders_never_paint_adjacent_duplicates() {
    let (display, panel) = setup();
    let kinds = [
        ViewKind::LoginScreen,
        ViewKind::ScanBarcode,
        ViewKind::IdMismatch,
    ];

    let mut tasks = Vec::new();
    for i in 0..8 {
        let display = display.clone();
        tasks.push(tokio::spawn(async move {
            for j in 0..20 {
                display.render_view(kinds[(i + j) % kinds.len()]);
                tokio::task::yield_now().await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert!(display.flush(Duration::from_secs(30)).await);
    let painted = panel.painted();
    assert!(!painted.is_empty());
    assert!(painted.windows(2).all(|pair| pair[0] != pair[1]), "{:?}", painted);
}
