// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    valid = { "4006381333931", true },
    bad_check_digit = { "4006381333932", false },
    too_short = { "400638133393", false },
    letters = { "40063813339a1", false },
    empty = { "", false },
)]
fn ean13(input: &str, expected: bool) {
    assert_eq!(is_ean13(input), expected);
    assert_eq!(UnitId::from(input).is_ean13(), expected);
}

#[parameterized(
    digits = { "123", true },
    long = { "11111111111111111111111", true },
    mixed = { "12a", false },
    empty = { "", false },
)]
fn barcode(input: &str, expected: bool) {
    assert_eq!(is_barcode(input), expected);
}

#[test]
fn unit_id_serializes_as_plain_string() {
    let id = UnitId::from("4006381333931");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"4006381333931\"");
    assert_eq!(id.to_string(), "4006381333931");
}

use proptest::prelude::*;

proptest! {
    #[test]
    fn exactly_one_check_digit_completes_an_ean13(body in "[0-9]{12}") {
        let valid = (0..10)
            .filter(|d| is_ean13(&format!("{}{}", body, d)))
            .count();
        prop_assert_eq!(valid, 1);
    }
}
