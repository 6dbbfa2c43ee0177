// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unit identifiers

use serde::{Deserialize, Serialize};

/// Identifier of a physical unit: an internal id or an EAN-13 barcode
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is a well-formed EAN-13 barcode (digits and check digit)
    pub fn is_ean13(&self) -> bool {
        is_ean13(&self.0)
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UnitId {
    fn from(s: String) -> Self {
        UnitId(s)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        UnitId(s.to_string())
    }
}

/// Whether the scanner input consists of digits only
pub fn is_barcode(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit())
}

/// Whether the scanner input is a valid EAN-13 code
pub fn is_ean13(input: &str) -> bool {
    if input.len() != 13 || !is_barcode(input) {
        return false;
    }

    let digits: Vec<u32> = input.bytes().map(|b| u32::from(b - b'0')).collect();
    let sum: u32 = digits[..12]
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
        .sum();
    (10 - sum % 10) % 10 == digits[12]
}

#[cfg(test)]
#[path = "unit_tests.rs"]
mod tests;
