//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI, App, and Contract layers.

pub mod ui_events;
pub mod contract;
pub mod render;

pub use ui_events::UiEvent;
pub use contract::{ContractCommand, ContractResponse};
pub use render::RenderState;
