// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workbench controller
//!
//! Owns the FSM state and orchestrates every operator action: check the
//! transition table, call the hub, mutate the session and the unit in
//! flight, then queue operator feedback on the display.
//!
//! The state lock is held across hub calls, so overlapping HID events are
//! handled one at a time. A connectivity failure never changes the state.

use crate::display::Display;
use crate::error::WorkbenchError;
use crate::live::LiveData;
use spoke_adapters::{
    AdditionalInfo, EndOperationRequest, HubAdapter, HubError, Identity, LoginRequest,
    LogoutRequest, PanelAdapter, StartOperationRequest, UploadRequest, WorkbenchStatus,
};
use spoke_core::{
    Action, DeviceRole, Employee, Forbidden, HidBuffer, HidDevices, HidEvent, SpokeConfig, State,
    UnitId, ViewKind,
};
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

/// Identity granted when badge validation is disabled
const DEVELOPMENT_NAME: &str = "Ivanov Ivan Ivanovich";
const DEVELOPMENT_POSITION: &str = "Junior engineer";

/// Configuration the controller acts on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbenchSettings {
    pub workbench_number: u32,
    pub production_stage_name: String,
    pub send_upload_request: bool,
    pub disable_id_validation: bool,
    pub disable_barcode_validation: bool,
    pub hid_devices: HidDevices,
}

impl From<&SpokeConfig> for WorkbenchSettings {
    fn from(config: &SpokeConfig) -> Self {
        Self {
            workbench_number: config.general.workbench_number,
            production_stage_name: config.general.production_stage_name.clone(),
            send_upload_request: config.general.send_upload_request,
            disable_id_validation: config.developer.disable_id_validation,
            disable_barcode_validation: config.developer.disable_barcode_validation,
            hid_devices: config.hid_devices.clone(),
        }
    }
}

/// Result of an action the state allowed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The transition happened; the new state
    Applied(State),
    /// The hub or the badge check refused it; the state is unchanged
    Rejected(String),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

/// The workbench aggregate: session, FSM state, hub and display
pub struct Workbench<H, P> {
    settings: WorkbenchSettings,
    hub: H,
    display: Display<P>,
    state: tokio::sync::Mutex<State>,
    hid_buffer: Mutex<HidBuffer>,
}

impl<H, P> Workbench<H, P>
where
    H: HubAdapter,
    P: PanelAdapter,
{
    /// Create a workbench waiting for a login
    pub fn new(settings: WorkbenchSettings, hub: H, display: Display<P>) -> Self {
        Self {
            settings,
            hub,
            display,
            state: tokio::sync::Mutex::new(State::default()),
            hid_buffer: Mutex::new(HidBuffer::default()),
        }
    }

    pub fn settings(&self) -> &WorkbenchSettings {
        &self.settings
    }

    pub fn display(&self) -> &Display<P> {
        &self.display
    }

    /// Current FSM state; waits for an action in progress to finish
    pub async fn state(&self) -> State {
        *self.state.lock().await
    }

    pub fn employee(&self) -> Employee {
        self.live().employee()
    }

    /// Unit under operation, if any
    pub fn unit(&self) -> Option<UnitId> {
        self.live().unit()
    }

    pub fn hid_buffer(&self) -> HidBuffer {
        self.buffer().clone()
    }

    // -------------------------------------------------------------------------
    // Operator actions
    // -------------------------------------------------------------------------

    /// Authorize the operator holding `badge_id`
    pub async fn start_shift(&self, badge_id: &str) -> Result<Outcome, WorkbenchError> {
        let mut state = self.state.lock().await;
        self.start_shift_locked(&mut state, badge_id).await
    }

    /// Close the shift of the operator holding `badge_id`
    pub async fn end_shift(&self, badge_id: &str) -> Result<Outcome, WorkbenchError> {
        let mut state = self.state.lock().await;
        self.end_shift_locked(&mut state, badge_id).await
    }

    /// Start an operation on `unit`
    pub async fn start_operation(
        &self,
        unit: UnitId,
        additional_info: AdditionalInfo,
    ) -> Result<Outcome, WorkbenchError> {
        let mut state = self.state.lock().await;
        self.start_operation_locked(&mut state, unit, additional_info)
            .await
    }

    /// End the ongoing operation on `unit`
    pub async fn end_operation(
        &self,
        unit: UnitId,
        additional_info: AdditionalInfo,
    ) -> Result<Outcome, WorkbenchError> {
        let mut state = self.state.lock().await;
        self.end_operation_locked(&mut state, unit, additional_info)
            .await
    }

    /// Reconcile the local session with the hub's view of this workbench.
    ///
    /// With `feedback`, the matching screen is shown afterwards even if the
    /// hub could not be reached.
    pub async fn sync_login_status(&self, feedback: bool) -> Result<State, WorkbenchError> {
        let mut state = self.state.lock().await;
        let status = self.hub.workbench_status(self.settings.workbench_number).await;

        match &status {
            Ok(status) => self.reconcile(&mut state, status),
            Err(e) => tracing::error!(error = %e, "login sync failed"),
        }
        if feedback {
            self.login_feedback();
        }

        status.map(|_| *state).map_err(WorkbenchError::from)
    }

    // -------------------------------------------------------------------------
    // HID dispatch
    // -------------------------------------------------------------------------

    /// Route a scan to the action its device and the current state call for
    pub async fn handle_hid_event(&self, event: HidEvent) -> Result<Outcome, WorkbenchError> {
        self.record_hid(&event.string);

        let Some(role) = self.settings.hid_devices.identify(&event.name) else {
            tracing::warn!(sender = %event.name, "event from unknown device ignored");
            return Err(WorkbenchError::UnknownSender(event.name));
        };
        tracing::info!(sender = %event.name, ?role, payload = %event.string, "hid event");

        match role {
            DeviceRole::RfidReader => self.handle_rfid(&event.string).await,
            DeviceRole::BarcodeReader => self.handle_barcode(&event.string).await,
        }
    }

    /// Badge scan: log in when nobody is, log out otherwise
    pub async fn handle_rfid(&self, badge_id: &str) -> Result<Outcome, WorkbenchError> {
        let mut state = self.state.lock().await;

        if !self.settings.disable_id_validation {
            match self.hub.workbench_status(self.settings.workbench_number).await {
                Ok(status) => {
                    if status.employee_logged_in != self.employee().is_authorized() {
                        self.reconcile(&mut state, &status);
                        self.login_feedback();
                    }
                }
                Err(e) => tracing::error!(error = %e, "could not check hub login status"),
            }
        }

        let current = *state;
        match current {
            State::AwaitLogin => self.start_shift_locked(&mut state, badge_id).await,
            State::AuthorizedIdling | State::ProductionStageOngoing => {
                self.end_shift_locked(&mut state, badge_id).await
            }
        }
    }

    /// Barcode scan: start or end the operation on the scanned unit
    pub async fn handle_barcode(&self, code: &str) -> Result<Outcome, WorkbenchError> {
        let mut state = self.state.lock().await;
        let unit = UnitId::from(code);
        tracing::debug!(unit = %unit, ean13 = unit.is_ean13(), "barcode scanned");

        let current = *state;
        match current {
            State::AuthorizedIdling => {
                self.start_operation_locked(&mut state, unit, AdditionalInfo::new())
                    .await
            }
            State::ProductionStageOngoing => {
                self.end_operation_locked(&mut state, unit, AdditionalInfo::new())
                    .await
            }
            State::AwaitLogin => {
                tracing::error!(unit = %unit, "nobody is authorized, barcode ignored");
                self.render(&[ViewKind::AuthorizeFirst, ViewKind::LoginScreen]);
                Ok(Outcome::Rejected("authorization required".to_string()))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    async fn start_shift_locked(
        &self,
        state: &mut State,
        badge_id: &str,
    ) -> Result<Outcome, WorkbenchError> {
        let target = state
            .permit(Action::StartShift)
            .map_err(|f| self.forbidden(f))?;
        tracing::info!(badge = badge_id, "login request");

        let identity = if self.settings.disable_id_validation {
            tracing::info!("employee authorized regardless of the badge: id validation is off");
            Identity::new(DEVELOPMENT_NAME, DEVELOPMENT_POSITION)
        } else {
            let request = LoginRequest {
                workbench_number: self.settings.workbench_number,
                badge_id: badge_id.to_string(),
            };
            let reply = match self.guarded(self.hub.log_in(request)).await {
                Ok(reply) => reply,
                Err(e) => {
                    self.render(&[ViewKind::FailedAuthorization, ViewKind::LoginScreen]);
                    return Err(e);
                }
            };
            match reply.identity {
                Some(identity) if reply.status => identity,
                _ => {
                    let reason = reply.comment.unwrap_or_else(|| "no comment".to_string());
                    tracing::error!(badge = badge_id, %reason, "employee could not be authorized");
                    self.render(&[ViewKind::FailedAuthorization, ViewKind::LoginScreen]);
                    return Ok(Outcome::Rejected(reason));
                }
            }
        };

        self.live()
            .update_employee(|e| e.log_in(&identity.position, &identity.name, badge_id));
        tracing::info!(name = %identity.name, position = %identity.position, "employee logged in");

        self.render(&[ViewKind::SuccessfulAuthorization]);
        Ok(self.apply(state, target))
    }

    async fn end_shift_locked(
        &self,
        state: &mut State,
        badge_id: &str,
    ) -> Result<Outcome, WorkbenchError> {
        let target = state.permit(Action::EndShift).map_err(|f| self.forbidden(f))?;
        tracing::info!(badge = badge_id, "logout request");

        let skip_validation = self.settings.disable_id_validation;
        if !self.employee().owns_badge(badge_id, skip_validation) {
            tracing::warn!(badge = badge_id, "badge does not belong to the logged in employee");
            self.render(&[ViewKind::IdMismatch, ViewKind::ScanBarcode]);
            return Ok(Outcome::Rejected("id mismatch".to_string()));
        }

        if !skip_validation {
            let request = LogoutRequest {
                workbench_number: self.settings.workbench_number,
            };
            let reply = self.guarded(self.hub.log_out(request)).await?;
            if !reply.status {
                tracing::warn!(reason = %reply.reason(), "hub refused logout, logging out locally");
            }
        }

        self.log_out_locally();
        self.render(&[ViewKind::SuccessfulLogOut]);
        Ok(self.apply(state, target))
    }

    async fn start_operation_locked(
        &self,
        state: &mut State,
        unit: UnitId,
        additional_info: AdditionalInfo,
    ) -> Result<Outcome, WorkbenchError> {
        let target = state
            .permit(Action::StartOperation)
            .map_err(|f| self.forbidden(f))?;
        tracing::info!(unit = %unit, "starting operation");

        // In flight before the hub confirms; rolled back on any failure
        self.live().set_unit(Some(unit.clone()));

        if !self.settings.disable_barcode_validation {
            let request = StartOperationRequest {
                workbench_number: self.settings.workbench_number,
                production_stage_name: self.settings.production_stage_name.clone(),
                unit_id: unit.clone(),
                additional_info,
            };
            let reply = match self.guarded(self.hub.start_operation(request)).await {
                Ok(reply) => reply,
                Err(e) => {
                    self.live().set_unit(None);
                    return Err(e);
                }
            };

            if !reply.status {
                let reason = reply.reason();
                tracing::error!(unit = %unit, %reason, "hub refused to start the operation");
                self.live().set_unit(None);
                self.render(&[ViewKind::UnitNotFound, ViewKind::ScanBarcode]);
                return Ok(Outcome::Rejected(reason));
            }
        }

        Ok(self.apply(state, target))
    }

    async fn end_operation_locked(
        &self,
        state: &mut State,
        unit: UnitId,
        additional_info: AdditionalInfo,
    ) -> Result<Outcome, WorkbenchError> {
        let target = state
            .permit(Action::EndOperation)
            .map_err(|f| self.forbidden(f))?;
        tracing::info!(unit = %unit, "ending operation");

        if self.unit().as_ref() != Some(&unit) {
            tracing::warn!(unit = %unit, in_flight = ?self.unit(), "ending a unit other than the one in flight");
        }

        if !self.settings.disable_barcode_validation {
            let request = EndOperationRequest {
                workbench_number: self.settings.workbench_number,
                unit_id: unit.clone(),
                additional_info,
            };
            let reply = self.guarded(self.hub.end_operation(request)).await?;

            if !reply.status {
                let reason = reply.reason();
                tracing::error!(unit = %unit, %reason, "hub refused to end the operation");
                self.render(&[ViewKind::UnitNotFound, ViewKind::OngoingOperation]);
                return Ok(Outcome::Rejected(reason));
            }

            if self.settings.send_upload_request {
                self.upload(&unit).await;
            }
        }

        self.live().set_unit(None);
        self.render(&[ViewKind::OperationEnded]);
        Ok(self.apply(state, target))
    }

    /// Best effort; the operation is over whatever the hub says
    async fn upload(&self, unit: &UnitId) {
        let request = UploadRequest {
            workbench_number: self.settings.workbench_number,
            unit_id: unit.clone(),
        };
        match self.hub.upload(request).await {
            Ok(reply) if reply.status => tracing::info!(unit = %unit, "unit data uploaded"),
            Ok(reply) => tracing::warn!(unit = %unit, reason = %reply.reason(), "hub refused upload"),
            Err(e) => tracing::error!(unit = %unit, error = %e, "upload request failed"),
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn live(&self) -> &LiveData {
        self.display.live()
    }

    /// Replace the state and show its entry views
    fn apply(&self, state: &mut State, next: State) -> Outcome {
        tracing::info!(from = %state, to = %next, "workbench state changed");
        *state = next;
        self.render(next.entry_views());
        Outcome::Applied(next)
    }

    fn render(&self, views: &[ViewKind]) {
        for view in views {
            self.display.render_view(*view);
        }
    }

    fn forbidden(&self, forbidden: Forbidden) -> WorkbenchError {
        tracing::warn!(
            state = %forbidden.state,
            action = %forbidden.action,
            reason = forbidden.reason,
            "operation forbidden by the state"
        );
        if forbidden.alert {
            self.render(&[ViewKind::OperationForbidden]);
        }
        WorkbenchError::StateForbidden {
            state: forbidden.state,
            action: forbidden.action,
            reason: forbidden.reason,
        }
    }

    /// Await a hub call; on connectivity failure flash the unreachable alert
    /// and put back whatever was on screen
    async fn guarded<T>(
        &self,
        call: impl Future<Output = Result<T, HubError>>,
    ) -> Result<T, WorkbenchError> {
        match call.await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                tracing::error!(error = %e, "backend unreachable");
                let previous = self.display.current_view();
                self.render(&[ViewKind::BackendUnreachable]);
                if let Some(previous) = previous {
                    self.render(&[previous]);
                }
                Err(WorkbenchError::BackendUnreachable(e))
            }
        }
    }

    /// Apply the hub's login status locally, without calling the hub back
    fn reconcile(&self, state: &mut State, status: &WorkbenchStatus) {
        let authorized = self.employee().is_authorized();

        match (status.employee_logged_in, authorized) {
            (true, false) => {
                let identity = status.employee.clone().unwrap_or_default();
                tracing::info!(name = %identity.name, "employee is logged in on the hub, logging in locally");
                self.live()
                    .update_employee(|e| e.log_in(&identity.position, &identity.name, ""));
                *state = State::AuthorizedIdling;
            }
            (false, true) if *state == State::AuthorizedIdling => {
                tracing::info!("employee is logged out on the hub, logging out locally");
                self.log_out_locally();
                *state = State::AwaitLogin;
            }
            (false, true) => {
                tracing::warn!(state = %state, "hub reports no login during an operation, keeping local session");
            }
            _ => tracing::debug!("local and hub login statuses match"),
        }
    }

    fn login_feedback(&self) {
        if self.employee().is_authorized() {
            self.render(&[ViewKind::SuccessfulAuthorization, ViewKind::ScanBarcode]);
        } else {
            self.render(&[ViewKind::LoginScreen]);
        }
    }

    fn log_out_locally(&self) {
        self.live().update_employee(Employee::log_out);
        self.live().set_unit(None);
        tracing::info!("employee logged out");
    }

    fn record_hid(&self, payload: &str) {
        let added_on = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or_default();
        *self.buffer() = HidBuffer {
            buffer: payload.to_string(),
            added_on,
        };
    }

    fn buffer(&self) -> MutexGuard<'_, HidBuffer> {
        self.hid_buffer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "workbench_tests.rs"]
mod tests;
