// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn new_session_is_unauthorized_and_empty() {
    let employee = Employee::new();
    assert!(!employee.is_authorized());
    assert_eq!(employee.full_name(), "");
    assert_eq!(employee.position(), "");
    assert_eq!(employee.badge_id(), "");
}

#[test]
fn log_in_stores_identity() {
    let mut employee = Employee::new();
    employee.log_in("Engineer", "Ivanov Ivan Ivanovich", "card-1");

    assert!(employee.is_authorized());
    assert_eq!(employee.position(), "Engineer");
    assert_eq!(employee.full_name(), "Ivanov Ivan Ivanovich");
    assert_eq!(employee.badge_id(), "card-1");
}

#[test]
fn log_out_clears_identity() {
    let mut employee = Employee::new();
    employee.log_in("Engineer", "A B C", "card-1");
    employee.log_out();

    assert_eq!(employee, Employee::new());
}

#[test]
fn session_is_reusable_across_shifts() {
    let mut employee = Employee::new();
    employee.log_in("Engineer", "A B C", "card-1");
    employee.log_out();
    employee.log_in("Fitter", "D E", "card-2");

    assert_eq!(employee.badge_id(), "card-2");
    assert_eq!(employee.short_name(), "D E.");
}

#[parameterized(
    full = { "Ivanov Ivan Ivanovich", "Ivanov I. I." },
    two_words = { "A B", "A B." },
    single_word = { "Ivanov", "Ivanov" },
    extra_spaces = { "  Petrov   Petr ", "Petrov P." },
    empty = { "", "" },
    cyrillic = { "Иванов Иван Иванович", "Иванов И. И." },
)]
fn short_name(full_name: &str, expected: &str) {
    let mut employee = Employee::new();
    employee.log_in("Engineer", full_name, "card");
    assert_eq!(employee.short_name(), expected);
}

#[parameterized(
    same_badge = { "card-1", "card-1", false, true },
    other_badge = { "card-1", "card-2", false, false },
    synced_session = { "", "card-2", false, true },
    validation_disabled = { "card-1", "card-2", true, true },
)]
fn badge_ownership(stored: &str, offered: &str, skip_validation: bool, owns: bool) {
    let mut employee = Employee::new();
    employee.log_in("Engineer", "A B C", stored);
    assert_eq!(employee.owns_badge(offered, skip_validation), owns);
}
