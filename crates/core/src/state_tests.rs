// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn initial_state_is_await_login() {
    assert_eq!(State::default(), State::AwaitLogin);
    assert!(!State::default().is_authorized());
}

#[parameterized(
    login = { State::AwaitLogin, Action::StartShift, State::AuthorizedIdling },
    logout = { State::AuthorizedIdling, Action::EndShift, State::AwaitLogin },
    start = { State::AuthorizedIdling, Action::StartOperation, State::ProductionStageOngoing },
    end = { State::ProductionStageOngoing, Action::EndOperation, State::AuthorizedIdling },
)]
fn permitted_transitions(from: State, action: Action, to: State) {
    assert_eq!(from.permit(action), Ok(to));
}

#[parameterized(
    logout_nobody = { State::AwaitLogin, Action::EndShift, true },
    start_nobody = { State::AwaitLogin, Action::StartOperation, true },
    end_nobody = { State::AwaitLogin, Action::EndOperation, true },
    double_login = { State::AuthorizedIdling, Action::StartShift, true },
    end_without_start = { State::AuthorizedIdling, Action::EndOperation, true },
    login_while_ongoing = { State::ProductionStageOngoing, Action::StartShift, false },
    logout_while_ongoing = { State::ProductionStageOngoing, Action::EndShift, false },
    double_start = { State::ProductionStageOngoing, Action::StartOperation, false },
)]
fn forbidden_transitions(from: State, action: Action, alert: bool) {
    let forbidden = from.permit(action).unwrap_err();
    assert_eq!(forbidden.state, from);
    assert_eq!(forbidden.action, action);
    assert_eq!(forbidden.alert, alert);
    assert!(!forbidden.reason.is_empty());
}

#[test]
fn entry_views_follow_state() {
    assert_eq!(State::AwaitLogin.entry_views(), &[ViewKind::LoginScreen]);
    assert_eq!(State::AuthorizedIdling.entry_views(), &[ViewKind::ScanBarcode]);
    assert_eq!(
        State::ProductionStageOngoing.entry_views(),
        &[ViewKind::OperationStarted, ViewKind::OngoingOperation]
    );
}

#[test]
fn every_state_permits_exactly_its_row() {
    let actions = [
        Action::StartShift,
        Action::EndShift,
        Action::StartOperation,
        Action::EndOperation,
    ];
    for state in [
        State::AwaitLogin,
        State::AuthorizedIdling,
        State::ProductionStageOngoing,
    ] {
        let permitted = actions.iter().filter(|a| state.permit(**a).is_ok()).count();
        let expected = if state == State::AuthorizedIdling { 2 } else { 1 };
        assert_eq!(permitted, expected, "{}", state);
    }
}
