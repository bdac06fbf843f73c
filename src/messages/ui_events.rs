//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which task modal is open
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ModalKind {
    #[default]
    None,
    Register,
    Certificate,
    Transfer,
    Info,
}

impl ModalKind {
    /// Modes that pick a parcel before showing their form or view
    pub fn needs_parcel(&self) -> bool {
        matches!(self, ModalKind::Certificate | ModalKind::Transfer | ModalKind::Info)
    }

    pub fn title(&self) -> &'static str {
        match self {
            ModalKind::None => "",
            ModalKind::Register => " Register New Parcel ",
            ModalKind::Certificate => " Issue Digital Certificate ",
            ModalKind::Transfer => " Transfer Ownership ",
            ModalKind::Info => " Parcel Details ",
        }
    }

    /// Title of the parcel picker shown before the form
    pub fn picker_title(&self) -> &'static str {
        match self {
            ModalKind::Certificate => " Choose a Parcel to Certify ",
            ModalKind::Transfer => " Choose a Parcel to Transfer ",
            ModalKind::Info => " Choose a Parcel to Inspect ",
            ModalKind::None | ModalKind::Register => "",
        }
    }

    /// Completes "Choose the parcel to be ..."
    pub fn action_label(&self) -> &'static str {
        match self {
            ModalKind::Certificate => "certified",
            ModalKind::Transfer => "transferred",
            ModalKind::Info => "inspected",
            ModalKind::None | ModalKind::Register => "",
        }
    }
}

/// Dashboard panel with keyboard focus
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Panel {
    #[default]
    QuickActions,
    Parcels,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::QuickActions => Panel::Parcels,
            Panel::Parcels => Panel::QuickActions,
        }
    }

    pub fn prev(&self) -> Panel {
        self.next()
    }
}

/// Entries of the quick actions sidebar, in display order
pub const QUICK_ACTIONS: [ModalKind; 4] = [
    ModalKind::Register,
    ModalKind::Certificate,
    ModalKind::Transfer,
    ModalKind::Info,
];

/// What is on screen, as far as key mapping cares
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum KeyContext {
    /// No wallet connected, hero screen only
    #[default]
    Landing,
    Dashboard(Panel),
    /// Register, certificate or transfer form
    Form,
    Picker,
    Details,
    Alert,
    Help,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Wallet
    ConnectWallet,
    DisconnectWallet,

    // Dashboard navigation
    NextPanel,
    PrevPanel,
    Up,
    Down,
    Activate,
    VerifyParcel,

    // Modals
    OpenModal(ModalKind),
    CloseModal,
    SelectParcel,
    BackToPicker,
    ToggleRawRecord,

    // Form editing
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    NextField,
    PrevField,
    Submit,
    CancelSubmission,

    // Popups
    ToggleHelp,
    CloseHelp,
    DismissAlert,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, context: KeyContext) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('x') => return Some(UiEvent::CancelSubmission),
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            _ => {}
        }
    }

    let event = match context {
        KeyContext::Help => Some(UiEvent::CloseHelp),
        KeyContext::Alert => Some(UiEvent::DismissAlert),
        KeyContext::Landing => handle_landing_keys(key),
        KeyContext::Dashboard(panel) => handle_dashboard_keys(key, panel),
        KeyContext::Form => handle_form_keys(key),
        KeyContext::Picker => handle_picker_keys(key),
        KeyContext::Details => handle_details_keys(key),
    };
    tracing::debug!(?context, code = ?key.code, ?event, "Mapped key");
    event
}

fn handle_landing_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('c') | KeyCode::Enter => Some(UiEvent::ConnectWallet),
        _ => None,
    }
}

fn handle_dashboard_keys(key: KeyEvent, panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('d') => Some(UiEvent::DisconnectWallet),
        KeyCode::Tab => Some(UiEvent::NextPanel),
        KeyCode::BackTab => Some(UiEvent::PrevPanel),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::Down),
        KeyCode::Char('r') => Some(UiEvent::OpenModal(ModalKind::Register)),
        KeyCode::Char('c') => Some(UiEvent::OpenModal(ModalKind::Certificate)),
        KeyCode::Char('t') => Some(UiEvent::OpenModal(ModalKind::Transfer)),
        KeyCode::Char('i') => Some(UiEvent::OpenModal(ModalKind::Info)),
        KeyCode::Char('v') if panel == Panel::Parcels => Some(UiEvent::VerifyParcel),
        KeyCode::Enter => match panel {
            Panel::QuickActions => Some(UiEvent::Activate),
            Panel::Parcels => Some(UiEvent::VerifyParcel),
        },
        _ => None,
    }
}

fn handle_form_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::CloseModal),
        KeyCode::Enter => Some(UiEvent::Submit),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(UiEvent::CharInput(c))
        }
        _ => None,
    }
}

fn handle_picker_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(UiEvent::CloseModal),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::Down),
        KeyCode::Enter => Some(UiEvent::SelectParcel),
        _ => None,
    }
}

fn handle_details_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(UiEvent::CloseModal),
        KeyCode::Backspace | KeyCode::Char('b') => Some(UiEvent::BackToPicker),
        KeyCode::Char('r') => Some(UiEvent::ToggleRawRecord),
        _ => None,
    }
}
