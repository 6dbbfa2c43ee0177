// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator session
//!
//! Holds the identity of the operator authorized at the workbench. One
//! instance lives for the whole process and is reused across shifts: it is
//! only ever changed through [`Employee::log_in`] and [`Employee::log_out`].
//!
//! An unauthorized session never carries identity data.

use serde::{Deserialize, Serialize};

/// The operator currently authorized at the workbench, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    authorized: bool,
    full_name: String,
    position: String,
    badge_id: String,
}

impl Employee {
    /// Create an unauthorized session
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a shift for the given operator.
    ///
    /// `badge_id` may be empty when the identity was adopted from the hub
    /// rather than scanned locally.
    pub fn log_in(
        &mut self,
        position: impl Into<String>,
        full_name: impl Into<String>,
        badge_id: impl Into<String>,
    ) {
        self.position = position.into();
        self.full_name = full_name.into();
        self.badge_id = badge_id.into();
        self.authorized = true;
    }

    /// End the shift and forget the identity
    pub fn log_out(&mut self) {
        self.authorized = false;
        self.full_name.clear();
        self.position.clear();
        self.badge_id.clear();
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn badge_id(&self) -> &str {
        &self.badge_id
    }

    /// Whether `badge_id` may close the current shift.
    ///
    /// A session adopted from the hub has no badge on record, so any badge
    /// closes it. `skip_validation` mirrors the developer override.
    pub fn owns_badge(&self, badge_id: &str, skip_validation: bool) -> bool {
        self.badge_id == badge_id || self.badge_id.is_empty() || skip_validation
    }

    /// Shortened name for small screens: `Ivanov Ivan Ivanovich` -> `Ivanov I. I.`
    pub fn short_name(&self) -> String {
        let mut parts = self.full_name.split_whitespace();
        let Some(surname) = parts.next() else {
            return String::new();
        };

        let mut short = surname.to_string();
        for part in parts {
            if let Some(initial) = part.chars().next() {
                short.push(' ');
                short.push(initial);
                short.push('.');
            }
        }
        short
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
