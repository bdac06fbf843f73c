//! Render state - data structure sent from App layer to UI for rendering

use crate::app::form::Form;
use crate::app::state::Alert;
use crate::messages::ui_events::{KeyContext, ModalKind, Panel};
use crate::models::{ActivityEntry, LandParcel, Stats};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    /// Drives both key mapping and which overlays are drawn
    pub context: KeyContext,

    // Connection
    pub wallet_address: Option<String>,

    // Dashboard
    pub parcels: Vec<LandParcel>,
    /// Parcel ids with a verification in flight
    pub verifying: Vec<String>,
    pub stats: Stats,
    pub latest_activity: Option<ActivityEntry>,
    pub active_panel: Panel,
    pub selected_action: usize,
    pub selected_row: usize,

    // Modal
    pub modal_kind: ModalKind,
    pub selected_parcel: Option<LandParcel>,
    pub picker_index: usize,
    pub form: Option<Form>,
    pub submitting: bool,
    pub raw_record: Option<String>,
    pub history: Vec<ActivityEntry>,

    // Popups
    pub alert: Option<Alert>,
    pub show_help: bool,
}

impl RenderState {
    pub fn is_verifying(&self, parcel_id: &str) -> bool {
        self.verifying.iter().any(|id| id == parcel_id)
    }
}
