// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data views are composed against
//!
//! Shared by the controller, which writes it, and the render worker, which
//! reads a snapshot at paint time.

use spoke_core::{Employee, UnitId, ViewData};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

struct LiveState {
    employee: Employee,
    unit: Option<UnitId>,
    operation_started: Option<Instant>,
    workbench_number: u32,
    rotate: bool,
}

/// Session and unit data, shared between controller and render worker
#[derive(Clone)]
pub struct LiveData {
    inner: Arc<RwLock<LiveState>>,
}

impl LiveData {
    pub fn new(workbench_number: u32, rotate: bool) -> Self {
        Self {
            inner: Arc::new(RwLock::new(LiveState {
                employee: Employee::new(),
                unit: None,
                operation_started: None,
                workbench_number,
                rotate,
            })),
        }
    }

    pub fn employee(&self) -> Employee {
        self.read().employee.clone()
    }

    /// Mutate the session in place
    pub fn update_employee<R>(&self, f: impl FnOnce(&mut Employee) -> R) -> R {
        f(&mut self.write().employee)
    }

    pub fn unit(&self) -> Option<UnitId> {
        self.read().unit.clone()
    }

    /// Set or clear the unit in flight. Setting a unit restarts the timer.
    pub fn set_unit(&self, unit: Option<UnitId>) {
        let mut state = self.write();
        state.operation_started = unit.as_ref().map(|_| Instant::now());
        state.unit = unit;
    }

    /// Whether a unit is in flight; polled by the timer view
    pub fn operation_ongoing(&self) -> bool {
        self.read().unit.is_some()
    }

    pub fn snapshot(&self) -> ViewData {
        let state = self.read();
        ViewData {
            workbench_number: state.workbench_number,
            position: state.employee.position().to_string(),
            short_name: state.employee.short_name(),
            elapsed: state.operation_started.map(|started| started.elapsed()),
            rotate: state.rotate,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, LiveState> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, LiveState> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "live_tests.rs"]
mod tests;
