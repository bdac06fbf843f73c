//! Command handlers - business logic for processing UI events

use crate::app::form::Form;
use crate::app::state::{Alert, AppState};
use crate::error::LedgerError;
use crate::messages::ui_events::{ModalKind, Panel, QUICK_ACTIONS};
use crate::messages::{ContractCommand, ContractResponse};
use crate::models::{mock_parcels, Certificate, LandParcel, OwnershipTransfer};

/// A validated form, ready to become a contract call
enum Submission {
    Register(LandParcel),
    Certificate(String, Certificate),
    Transfer(String, OwnershipTransfer),
}

impl AppState {
    // ========================
    // Wallet
    // ========================

    pub fn connect_wallet(&mut self) {
        if self.is_connected() {
            return;
        }
        let address = self.config.wallet_address.clone();
        tracing::info!(%address, "Wallet connected");

        if self.config.seed_mock_data {
            self.ledger.load(mock_parcels());
        }
        self.wallet_address = Some(address);
        self.active_panel = Panel::QuickActions;
        self.selected_action = 0;
        self.selected_row = 0;
    }

    /// Drops the session; returns cancellations for calls still in flight
    pub fn disconnect_wallet(&mut self) -> Vec<ContractCommand> {
        if !self.is_connected() {
            return Vec::new();
        }
        tracing::info!("Wallet disconnected");

        let mut cancels: Vec<ContractCommand> =
            self.verifying.drain().map(|(id, _)| ContractCommand::Cancel(id)).collect();
        if let Some(cmd) = self.close_modal() {
            cancels.push(cmd);
        }

        self.wallet_address = None;
        self.ledger.clear();
        self.selected_row = 0;
        cancels
    }

    // ========================
    // Dashboard navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
    }

    pub fn move_up(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let index = self.list_index_mut();
        *index = index.checked_sub(1).unwrap_or(len - 1);
    }

    pub fn move_down(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let index = self.list_index_mut();
        *index = (*index + 1) % len;
    }

    /// Length of whichever list the arrows currently move through
    fn list_len(&self) -> usize {
        if self.modal.is_open() {
            return self.ledger.len();
        }
        match self.active_panel {
            Panel::QuickActions => QUICK_ACTIONS.len(),
            Panel::Parcels => self.ledger.len(),
        }
    }

    fn list_index_mut(&mut self) -> &mut usize {
        if self.modal.is_open() {
            return &mut self.picker_index;
        }
        match self.active_panel {
            Panel::QuickActions => &mut self.selected_action,
            Panel::Parcels => &mut self.selected_row,
        }
    }

    /// Enter on the quick actions sidebar
    pub fn activate(&mut self) {
        if self.active_panel == Panel::QuickActions {
            if let Some(kind) = QUICK_ACTIONS.get(self.selected_action).copied() {
                self.open_modal(kind);
            }
        }
    }

    // ========================
    // Modals
    // ========================

    pub fn open_modal(&mut self, kind: ModalKind) {
        if !self.is_connected() || self.pending_submission.is_some() {
            return;
        }
        if kind == ModalKind::None {
            self.close_modal();
            return;
        }
        tracing::info!(?kind, "Opening modal");

        self.modal.open(kind);
        self.picker_index = 0;
        self.show_raw_record = false;
        self.form = match kind {
            ModalKind::Register => Some(Form::register()),
            _ => None,
        };
    }

    /// Closes the modal, cancelling a submission still in flight
    pub fn close_modal(&mut self) -> Option<ContractCommand> {
        self.modal.clear();
        self.form = None;
        self.show_raw_record = false;

        let id = self.pending_submission.take()?;
        tracing::info!(id, "Cancelling submission on close");
        Some(ContractCommand::Cancel(id))
    }

    /// Picks the highlighted parcel; the modal stays open on its next step
    pub fn select_parcel(&mut self) {
        if self.modal.selected().is_some() {
            return;
        }
        let Some(parcel_id) = self.ledger.get_index(self.picker_index).map(|p| p.id.clone()) else {
            return;
        };
        if !self.modal.select(parcel_id.clone()) {
            return;
        }
        tracing::info!(%parcel_id, kind = ?self.modal.kind(), "Parcel selected");

        self.form = match self.modal.kind() {
            ModalKind::Certificate => Some(Form::certificate()),
            ModalKind::Transfer => Some(Form::transfer()),
            _ => None,
        };
    }

    /// Back from a form or detail view to the parcel picker
    pub fn back_to_picker(&mut self) {
        if self.pending_submission.is_some() || !self.modal.kind().needs_parcel() {
            return;
        }
        self.modal.deselect();
        self.form = None;
        self.show_raw_record = false;
    }

    pub fn toggle_raw_record(&mut self) {
        if self.modal.selected().is_some() {
            self.show_raw_record = !self.show_raw_record;
        }
    }

    // ========================
    // Form editing
    // ========================

    /// Form accepting edits, i.e. one that is not submitting
    fn editable_form(&mut self) -> Option<&mut Form> {
        self.form.as_mut().filter(|f| !f.loading)
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(form) = self.editable_form() {
            form.enter_char(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(form) = self.editable_form() {
            form.delete_char();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(form) = self.editable_form() {
            form.cursor_left();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(form) = self.editable_form() {
            form.cursor_right();
        }
    }

    pub fn next_field(&mut self) {
        if let Some(form) = self.editable_form() {
            form.next_field();
        }
    }

    pub fn prev_field(&mut self) {
        if let Some(form) = self.editable_form() {
            form.prev_field();
        }
    }

    // ========================
    // Contract calls
    // ========================

    fn prepare_submission(&self) -> Option<Result<Submission, LedgerError>> {
        let form = self.form.as_ref().filter(|f| !f.loading)?;
        let result = match (self.modal.kind(), self.modal.selected()) {
            (ModalKind::Register, _) => form.to_parcel().and_then(|parcel| {
                self.ledger.check_new_id(&parcel.id)?;
                Ok(Submission::Register(parcel))
            }),
            (ModalKind::Certificate, Some(parcel_id)) => form.to_certificate().and_then(|cert| {
                self.ledger.check_exists(parcel_id)?;
                Ok(Submission::Certificate(parcel_id.to_string(), cert))
            }),
            (ModalKind::Transfer, Some(parcel_id)) => form.to_transfer().and_then(|transfer| {
                self.ledger.check_exists(parcel_id)?;
                Ok(Submission::Transfer(parcel_id.to_string(), transfer))
            }),
            _ => return None,
        };
        Some(result)
    }

    /// Validate the open form and turn it into a contract call
    pub fn submit(&mut self) -> Option<ContractCommand> {
        let submission = match self.prepare_submission()? {
            Ok(submission) => submission,
            Err(err) => {
                tracing::warn!(%err, "Submission rejected");
                self.alert = Some(Alert::error(err.to_string()));
                return None;
            }
        };

        let id = self.next_id();
        self.pending_submission = Some(id);
        if let Some(form) = self.form.as_mut() {
            form.loading = true;
        }

        let cmd = match submission {
            Submission::Register(parcel) => ContractCommand::RegisterParcel { id, parcel },
            Submission::Certificate(parcel_id, certificate) => ContractCommand::IssueCertificate {
                id,
                parcel_id,
                certificate,
            },
            Submission::Transfer(parcel_id, transfer) => ContractCommand::TransferOwnership {
                id,
                parcel_id,
                transfer,
            },
        };
        tracing::info!(id, ?cmd, "Submitting");
        Some(cmd)
    }

    /// Starts verification of the highlighted parcel
    pub fn verify_parcel(&mut self) -> Option<ContractCommand> {
        if self.modal.is_open() {
            return None;
        }
        let parcel_id = self.ledger.get_index(self.selected_row)?.id.clone();
        if self.is_verifying(&parcel_id) {
            return None;
        }
        if let Err(err) = self.ledger.check_verifiable(&parcel_id) {
            tracing::debug!(%err, "Verification skipped");
            return None;
        }

        let id = self.next_id();
        self.verifying.insert(id, parcel_id.clone());
        tracing::info!(id, %parcel_id, "Verifying parcel");
        Some(ContractCommand::VerifyParcel { id, parcel_id })
    }

    /// Ctrl+X: cancel the open form's call, or every pending verification
    pub fn cancel_submission(&mut self) -> Vec<ContractCommand> {
        if let Some(id) = self.pending_submission {
            return vec![ContractCommand::Cancel(id)];
        }
        self.verifying
            .keys()
            .map(|id| ContractCommand::Cancel(*id))
            .collect()
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: ContractResponse) {
        let id = response.id();
        let for_form = self.pending_submission == Some(id);
        let verified_parcel = self.verifying.remove(&id);

        if !for_form && verified_parcel.is_none() {
            tracing::debug!(id, "Ignoring response for a call no longer pending");
            return;
        }

        match response {
            ContractResponse::Registered { parcel, message, .. } => {
                let parcel_id = parcel.id.clone();
                let result = self.ledger.register(parcel);
                self.finish_submission(Some(parcel_id), result, message);
            }
            ContractResponse::CertificateIssued {
                parcel_id,
                certificate,
                message,
                ..
            } => {
                let result = self.ledger.issue_certificate(&parcel_id, &certificate);
                self.finish_submission(Some(parcel_id), result, message);
            }
            ContractResponse::OwnershipTransferred {
                parcel_id,
                transfer,
                message,
                ..
            } => {
                let result = self.ledger.transfer(&parcel_id, &transfer);
                self.finish_submission(Some(parcel_id), result, message);
            }
            ContractResponse::Verified {
                parcel_id, message, ..
            } => match self.ledger.verify(&parcel_id) {
                Ok(()) => {
                    self.ledger.record(Some(parcel_id), message.clone());
                    self.alert = Some(Alert::success(message));
                }
                Err(err) => self.alert = Some(Alert::error(err.to_string())),
            },
            ContractResponse::Failed { message, .. } => {
                tracing::warn!(id, %message, "Contract call failed");
                if for_form {
                    self.release_form();
                }
                self.alert = Some(Alert::error(message));
            }
            ContractResponse::Cancelled { .. } => {
                tracing::info!(id, "Contract call cancelled");
                if for_form {
                    self.release_form();
                    self.alert = Some(Alert::info("Submission cancelled"));
                }
            }
        }
    }

    /// Form call is over but the form stays open for another attempt
    fn release_form(&mut self) {
        self.pending_submission = None;
        if let Some(form) = self.form.as_mut() {
            form.loading = false;
        }
    }

    fn finish_submission(
        &mut self,
        parcel_id: Option<String>,
        result: Result<(), LedgerError>,
        message: String,
    ) {
        match result {
            Ok(()) => {
                self.ledger.record(parcel_id, message.clone());
                self.pending_submission = None;
                self.close_modal();
                self.alert = Some(Alert::success(message));
            }
            Err(err) => {
                tracing::warn!(%err, "Contract result could not be applied");
                self.release_form();
                self.alert = Some(Alert::error(err.to_string()));
            }
        }
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::AlertKind;
    use crate::config::Config;
    use crate::messages::ui_events::KeyContext;

    fn connected() -> AppState {
        let mut state = AppState::default();
        state.connect_wallet();
        state
    }

    fn fill(state: &mut AppState, values: &[&str]) {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                state.next_field();
            }
            for c in value.chars() {
                state.enter_char(c);
            }
        }
    }

    #[test]
    fn test_connect_loads_mock_parcels() {
        let state = connected();
        assert_eq!(
            state.wallet_address.as_deref(),
            Some(crate::constants::DEFAULT_WALLET_ADDRESS)
        );
        assert_eq!(state.ledger.len(), 3);
        assert_eq!(state.to_render_state().stats.area_m2, 2450);
    }

    #[test]
    fn test_modals_need_a_connection() {
        let mut state = AppState::default();
        state.open_modal(ModalKind::Register);
        assert!(!state.modal.is_open());
        assert!(state.form.is_none());
    }

    #[test]
    fn test_register_round_trip_appends_parcel() {
        let mut state = connected();
        state.open_modal(ModalKind::Register);
        fill(&mut state, &["TNH-004", "Dewi Lestari", "640 m²", "Jl. Braga 5"]);

        let cmd = state.submit().expect("register command");
        let ContractCommand::RegisterParcel { id, parcel } = cmd else {
            panic!("expected register command");
        };
        assert!(state.form.as_ref().unwrap().loading);
        assert!(state.submit().is_none(), "double submit is ignored");

        state.handle_response(ContractResponse::Registered {
            id,
            parcel,
            message: "Parcel registered: TNH-004".into(),
        });

        assert!(!state.modal.is_open());
        assert!(state.form.is_none());
        assert_eq!(state.pending_submission, None);
        assert_eq!(state.ledger.len(), 4);
        assert_eq!(state.alert.as_ref().unwrap().kind, AlertKind::Success);
        assert_eq!(state.ledger.history_for("TNH-004").count(), 1);
    }

    #[test]
    fn test_register_duplicate_is_rejected_locally() {
        let mut state = connected();
        state.open_modal(ModalKind::Register);
        fill(&mut state, &["TNH-001", "Someone", "1 m²", "Somewhere"]);

        assert!(state.submit().is_none());
        assert_eq!(state.pending_submission, None);
        assert!(state.modal.is_open());
        assert_eq!(
            state.alert,
            Some(Alert::error("Parcel TNH-001 is already registered"))
        );
    }

    #[test]
    fn test_missing_field_alert() {
        let mut state = connected();
        state.open_modal(ModalKind::Register);
        fill(&mut state, &["TNH-009"]);
        assert!(state.submit().is_none());
        assert_eq!(state.alert, Some(Alert::error("Owner Name is required")));
    }

    #[test]
    fn test_picker_selection_keeps_modal_open() {
        let mut state = connected();
        state.open_modal(ModalKind::Transfer);
        assert_eq!(state.key_context(), KeyContext::Picker);

        state.move_down();
        state.select_parcel();
        assert!(state.modal.is_open());
        assert_eq!(state.modal.selected(), Some("TNH-002"));
        assert_eq!(state.key_context(), KeyContext::Form);

        state.back_to_picker();
        assert_eq!(state.modal.selected(), None);
        assert!(state.form.is_none());
        assert_eq!(state.key_context(), KeyContext::Picker);
    }

    #[test]
    fn test_transfer_updates_owner() {
        let mut state = connected();
        state.open_modal(ModalKind::Transfer);
        state.select_parcel();
        fill(&mut state, &["Rina Kartika", "Jl. Asia Afrika 1", "", "Sale"]);

        let Some(ContractCommand::TransferOwnership { id, parcel_id, transfer }) = state.submit()
        else {
            panic!("expected transfer command");
        };
        assert_eq!(parcel_id, "TNH-001");

        state.handle_response(ContractResponse::OwnershipTransferred {
            id,
            parcel_id,
            transfer,
            message: "Ownership transferred to: Rina Kartika".into(),
        });
        assert_eq!(state.ledger.get("TNH-001").unwrap().owner, "Rina Kartika");
        assert_eq!(state.modal.selected(), None);
    }

    #[test]
    fn test_transfer_needs_a_reason() {
        let mut state = connected();
        state.open_modal(ModalKind::Transfer);
        state.select_parcel();
        fill(&mut state, &["Rina Kartika", "Jl. Asia Afrika 1"]);

        assert!(state.submit().is_none());
        assert_eq!(state.pending_submission, None);
        assert_eq!(state.alert, Some(Alert::error("Reason is required")));
        assert!(!state.form.as_ref().unwrap().loading);
    }

    #[test]
    fn test_certificate_sets_number() {
        let mut state = connected();
        state.open_modal(ModalKind::Certificate);
        state.move_down();
        state.select_parcel();
        fill(&mut state, &["SHM-555", "", "30 years"]);

        let Some(ContractCommand::IssueCertificate { id, parcel_id, certificate }) = state.submit()
        else {
            panic!("expected certificate command");
        };
        state.handle_response(ContractResponse::CertificateIssued {
            id,
            parcel_id,
            certificate,
            message: "Certificate issued: SHM-555".into(),
        });
        assert_eq!(
            state.ledger.get("TNH-002").unwrap().certificate_number.as_deref(),
            Some("SHM-555")
        );
    }

    #[test]
    fn test_closing_while_submitting_cancels_and_ignores_late_result() {
        let mut state = connected();
        state.open_modal(ModalKind::Register);
        fill(&mut state, &["TNH-004", "Dewi", "10 m²", "Bogor"]);
        let Some(ContractCommand::RegisterParcel { id, parcel }) = state.submit() else {
            panic!("expected register command");
        };

        let cancel = state.close_modal();
        assert!(matches!(cancel, Some(ContractCommand::Cancel(c)) if c == id));
        assert_eq!(state.modal.selected(), None);

        state.handle_response(ContractResponse::Registered {
            id,
            parcel,
            message: "late".into(),
        });
        assert_eq!(state.ledger.len(), 3);
        assert!(state.alert.is_none());
    }

    #[test]
    fn test_cancel_pending_form_releases_it() {
        let mut state = connected();
        state.open_modal(ModalKind::Register);
        fill(&mut state, &["TNH-004", "Dewi", "10 m²", "Bogor"]);
        let Some(ContractCommand::RegisterParcel { id, .. }) = state.submit() else {
            panic!("expected register command");
        };

        let cancels = state.cancel_submission();
        assert_eq!(cancels.len(), 1);
        assert!(matches!(cancels[0], ContractCommand::Cancel(c) if c == id));

        state.handle_response(ContractResponse::Cancelled { id });
        assert_eq!(state.modal.kind(), ModalKind::Register);
        assert!(!state.form.as_ref().unwrap().loading);
        assert_eq!(state.pending_submission, None);
        assert_eq!(state.alert, Some(Alert::info("Submission cancelled")));
        assert_eq!(state.ledger.len(), 3);
    }

    #[test]
    fn test_cancel_stops_every_verification() {
        let mut state = connected();
        state
            .ledger
            .register(LandParcel::new("TNH-004", "Dewi", "10 m²", "Bogor"))
            .unwrap();
        state.next_panel();
        state.move_down();
        let first = state.verify_parcel().expect("verify TNH-002");
        state.move_down();
        state.move_down();
        let second = state.verify_parcel().expect("verify TNH-004");

        let mut ids = Vec::new();
        for cmd in [first, second] {
            let ContractCommand::VerifyParcel { id, .. } = cmd else {
                panic!("expected verify command");
            };
            ids.push(id);
        }

        let mut cancelled: Vec<u64> = state
            .cancel_submission()
            .into_iter()
            .map(|cmd| match cmd {
                ContractCommand::Cancel(id) => id,
                _ => panic!("expected cancel command"),
            })
            .collect();
        cancelled.sort();
        assert_eq!(cancelled, ids);

        for id in ids {
            state.handle_response(ContractResponse::Cancelled { id });
        }
        let render = state.to_render_state();
        assert!(!render.is_verifying("TNH-002"));
        assert!(!render.is_verifying("TNH-004"));
        assert!(state.verifying.is_empty());
        assert!(state.alert.is_none());
        assert!(!state.ledger.get("TNH-002").unwrap().verified);
    }

    #[test]
    fn test_connect_without_seed_data_is_empty() {
        let mut state = AppState::new(Config {
            seed_mock_data: false,
            ..Config::default()
        });
        state.connect_wallet();
        assert!(state.is_connected());
        assert!(state.ledger.is_empty());
        assert_eq!(state.to_render_state().stats.total, 0);

        state.open_modal(ModalKind::Info);
        state.move_down();
        assert_eq!(state.picker_index, 0);
        state.select_parcel();
        assert_eq!(state.modal.selected(), None);
        assert_eq!(state.key_context(), KeyContext::Picker);
        assert!(state.verify_parcel().is_none());
    }

    #[test]
    fn test_failed_call_keeps_form_open() {
        let mut state = connected();
        state.open_modal(ModalKind::Register);
        fill(&mut state, &["TNH-004", "Dewi", "10 m²", "Bogor"]);
        let id = state.submit().map(|_| state.pending_submission.unwrap()).unwrap();

        state.handle_response(ContractResponse::Failed {
            id,
            message: "invalid argument: owner".into(),
        });
        assert!(state.modal.is_open());
        assert!(!state.form.as_ref().unwrap().loading);
        assert_eq!(state.alert.as_ref().unwrap().kind, AlertKind::Error);
    }

    #[test]
    fn test_verify_pending_parcel_once() {
        let mut state = connected();
        state.next_panel();
        assert!(state.verify_parcel().is_none(), "TNH-001 is already verified");

        state.move_down();
        let Some(ContractCommand::VerifyParcel { id, parcel_id }) = state.verify_parcel() else {
            panic!("expected verify command");
        };
        assert!(state.verify_parcel().is_none(), "already verifying");
        assert!(state.to_render_state().is_verifying("TNH-002"));

        state.handle_response(ContractResponse::Verified {
            id,
            parcel_id,
            message: "Parcel TNH-002 verified".into(),
        });
        assert!(state.ledger.get("TNH-002").unwrap().verified);
        assert!(state.verifying.is_empty());
        assert_eq!(state.ledger.stats().pending, 0);
    }

    #[test]
    fn test_disconnect_resets_session() {
        let mut state = connected();
        state.next_panel();
        state.move_down();
        let verify = state.verify_parcel().unwrap();
        let ContractCommand::VerifyParcel { id, .. } = verify else {
            panic!("expected verify command");
        };
        state.open_modal(ModalKind::Info);
        state.select_parcel();

        let cancels = state.disconnect_wallet();
        assert!(cancels
            .iter()
            .any(|c| matches!(c, ContractCommand::Cancel(c_id) if *c_id == id)));
        assert!(!state.is_connected());
        assert!(state.ledger.is_empty());
        assert!(!state.modal.is_open());
        assert_eq!(state.modal.selected(), None);
        assert_eq!(state.key_context(), KeyContext::Landing);
    }

    #[test]
    fn test_quick_action_opens_selected_modal() {
        let mut state = connected();
        state.move_down();
        state.move_down();
        state.activate();
        assert_eq!(state.modal.kind(), ModalKind::Transfer);
        assert_eq!(state.modal.selected(), None);
    }

    #[test]
    fn test_raw_record_is_json() {
        let mut state = connected();
        state.open_modal(ModalKind::Info);
        state.select_parcel();
        state.toggle_raw_record();
        let raw = state.to_render_state().raw_record.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["id"], "TNH-001");
        assert_eq!(value["verified"], true);
    }
}
