//! App actor - message loop processing UI events and contract responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::config::Config;
use crate::messages::{ContractCommand, ContractResponse, RenderState, UiEvent};

/// App actor that processes UI events and contract responses
pub struct AppActor {
    state: AppState,
    contract_tx: mpsc::UnboundedSender<ContractCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        config: Config,
        contract_tx: mpsc::UnboundedSender<ContractCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(config),
            contract_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut contract_rx: mpsc::UnboundedReceiver<ContractResponse>,
    ) {
        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.contract_tx.send(ContractCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = contract_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: Option<ContractCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.contract_tx.send(cmd);
        }
    }

    fn send_all(&self, cmds: Vec<ContractCommand>) {
        for cmd in cmds {
            let _ = self.contract_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Wallet
            UiEvent::ConnectWallet => self.state.connect_wallet(),
            UiEvent::DisconnectWallet => {
                let cmds = self.state.disconnect_wallet();
                self.send_all(cmds);
            }

            // Dashboard navigation
            UiEvent::NextPanel => self.state.next_panel(),
            UiEvent::PrevPanel => self.state.prev_panel(),
            UiEvent::Up => self.state.move_up(),
            UiEvent::Down => self.state.move_down(),
            UiEvent::Activate => self.state.activate(),
            UiEvent::VerifyParcel => {
                let cmd = self.state.verify_parcel();
                self.send(cmd);
            }

            // Modals
            UiEvent::OpenModal(kind) => self.state.open_modal(kind),
            UiEvent::CloseModal => {
                let cmd = self.state.close_modal();
                self.send(cmd);
            }
            UiEvent::SelectParcel => self.state.select_parcel(),
            UiEvent::BackToPicker => self.state.back_to_picker(),
            UiEvent::ToggleRawRecord => self.state.toggle_raw_record(),

            // Form editing
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),
            UiEvent::Submit => {
                let cmd = self.state.submit();
                self.send(cmd);
            }
            UiEvent::CancelSubmission => {
                let cmds = self.state.cancel_submission();
                self.send_all(cmds);
            }

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),
            UiEvent::DismissAlert => self.state.dismiss_alert(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
