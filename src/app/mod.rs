//! App layer - central state management and command processing
//!
//! The App actor receives UI events and contract responses,
//! updates state, and emits contract commands and render state.

pub mod state;
pub mod actor;
pub mod commands;
pub mod form;

pub use state::{AppState, ModalSelection};
pub use actor::AppActor;
