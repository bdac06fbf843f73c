//! App state - pure data structure with no I/O logic

use std::collections::HashMap;

use crate::app::form::Form;
use crate::config::Config;
use crate::ledger::Ledger;
use crate::messages::ui_events::{KeyContext, ModalKind, Panel};
use crate::messages::RenderState;
use crate::models::LandParcel;

/// Which task modal is open and which parcel it works on.
///
/// Fields are private so the pairing rules hold: a closed modal never keeps
/// a parcel, opening a modal always starts without one, and only modes that
/// operate on an existing parcel can hold one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModalSelection {
    kind: ModalKind,
    selected: Option<String>,
}

impl ModalSelection {
    pub fn kind(&self) -> ModalKind {
        self.kind
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.kind != ModalKind::None
    }

    pub fn open(&mut self, kind: ModalKind) {
        self.kind = kind;
        self.selected = None;
    }

    pub fn clear(&mut self) {
        self.open(ModalKind::None);
    }

    /// Returns false when the current mode cannot hold a parcel
    pub fn select(&mut self, parcel_id: impl Into<String>) -> bool {
        if !self.kind.needs_parcel() {
            return false;
        }
        self.selected = Some(parcel_id.into());
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }
}

/// Tone of an alert popup
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AlertKind {
    Success,
    Error,
    Info,
}

/// Blocking notification, dismissed by any key
#[derive(Clone, Debug, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Alert {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Alert {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Alert {
            kind: AlertKind::Info,
            message: message.into(),
        }
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub config: Config,

    // Connection
    pub wallet_address: Option<String>,

    // Parcels and activity
    pub ledger: Ledger,

    // Dashboard focus
    pub active_panel: Panel,
    pub selected_action: usize,
    pub selected_row: usize,

    // Modal
    pub modal: ModalSelection,
    pub picker_index: usize,
    pub form: Option<Form>,
    pub show_raw_record: bool,

    // Contract calls
    pub next_call_id: u64,
    pub pending_submission: Option<u64>,
    /// Verification calls in flight, by call id
    pub verifying: HashMap<u64, String>,

    // Popups
    pub alert: Option<Alert>,
    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            wallet_address: None,
            ledger: Ledger::new(),
            active_panel: Panel::QuickActions,
            selected_action: 0,
            selected_row: 0,
            modal: ModalSelection::default(),
            picker_index: 0,
            form: None,
            show_raw_record: false,
            next_call_id: 1,
            pending_submission: None,
            verifying: HashMap::new(),
            alert: None,
            show_help: false,
        }
    }

    /// Generate a unique contract call ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_call_id;
        self.next_call_id += 1;
        id
    }

    pub fn is_connected(&self) -> bool {
        self.wallet_address.is_some()
    }

    /// Parcel chosen in the open modal
    pub fn selected_parcel(&self) -> Option<&LandParcel> {
        self.modal.selected().and_then(|id| self.ledger.get(id))
    }

    pub fn is_verifying(&self, parcel_id: &str) -> bool {
        self.verifying.values().any(|id| id == parcel_id)
    }

    /// What the key mapper should assume is on screen
    pub fn key_context(&self) -> KeyContext {
        if self.show_help {
            return KeyContext::Help;
        }
        if self.alert.is_some() {
            return KeyContext::Alert;
        }
        if !self.is_connected() {
            return KeyContext::Landing;
        }
        match self.modal.kind() {
            ModalKind::None => KeyContext::Dashboard(self.active_panel),
            ModalKind::Register => KeyContext::Form,
            kind => match (self.modal.selected(), kind) {
                (None, _) => KeyContext::Picker,
                (Some(_), ModalKind::Info) => KeyContext::Details,
                (Some(_), _) => KeyContext::Form,
            },
        }
    }

    fn raw_record(&self) -> Option<String> {
        if !self.show_raw_record {
            return None;
        }
        let parcel = self.selected_parcel()?;
        Some(serde_json::to_string_pretty(parcel).unwrap_or_else(|_| format!("{:#?}", parcel)))
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let selected_parcel = self.selected_parcel().cloned();
        let history = selected_parcel
            .as_ref()
            .map(|p| self.ledger.history_for(&p.id).cloned().collect())
            .unwrap_or_default();

        RenderState {
            context: self.key_context(),
            wallet_address: self.wallet_address.clone(),
            parcels: self.ledger.parcels().to_vec(),
            verifying: self.verifying.values().cloned().collect(),
            stats: self.ledger.stats(),
            latest_activity: self.ledger.activity().next().cloned(),
            active_panel: self.active_panel,
            selected_action: self.selected_action,
            selected_row: self.selected_row,
            modal_kind: self.modal.kind(),
            selected_parcel,
            picker_index: self.picker_index,
            form: self.form.clone(),
            submitting: self.pending_submission.is_some(),
            raw_record: self.raw_record(),
            history,
            alert: self.alert.clone(),
            show_help: self.show_help,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing_clears_selection() {
        let mut modal = ModalSelection::default();
        modal.open(ModalKind::Transfer);
        assert!(modal.select("TNH-001"));
        assert_eq!(modal.selected(), Some("TNH-001"));

        modal.clear();
        assert!(!modal.is_open());
        assert_eq!(modal.selected(), None);
    }

    #[test]
    fn test_opening_starts_without_selection() {
        let mut modal = ModalSelection::default();
        modal.open(ModalKind::Info);
        modal.select("TNH-002");
        modal.open(ModalKind::Certificate);
        assert_eq!(modal.kind(), ModalKind::Certificate);
        assert_eq!(modal.selected(), None);
    }

    #[test]
    fn test_register_and_closed_modes_refuse_selection() {
        let mut modal = ModalSelection::default();
        assert!(!modal.select("TNH-001"));
        modal.open(ModalKind::Register);
        assert!(!modal.select("TNH-001"));
        assert_eq!(modal.selected(), None);
    }

    #[test]
    fn test_key_context_follows_modal() {
        let mut state = AppState::default();
        assert_eq!(state.key_context(), KeyContext::Landing);

        state.wallet_address = Some("addr".into());
        assert_eq!(state.key_context(), KeyContext::Dashboard(Panel::QuickActions));

        state.modal.open(ModalKind::Info);
        assert_eq!(state.key_context(), KeyContext::Picker);
        state.modal.select("TNH-001");
        assert_eq!(state.key_context(), KeyContext::Details);

        state.alert = Some(Alert::info("hello"));
        assert_eq!(state.key_context(), KeyContext::Alert);
        state.show_help = true;
        assert_eq!(state.key_context(), KeyContext::Help);
    }
}
