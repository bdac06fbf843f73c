//! # LandChain TUI
//!
//! A terminal front end for a land-title registration demo.
//!
//! ## Features
//! - Demo wallet connect / disconnect
//! - Parcel registration
//! - Digital certificates (SHM, SHGB, SHP, SHU)
//! - Ownership transfer
//! - Parcel verification
//! - Parcel details with session history
//!
//! Everything lives in memory; the contract is a stub with simulated latency.
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Contract Layer (Tokio runtime)

pub mod constants;
pub mod models;
pub mod error;
pub mod config;
pub mod ledger;
pub mod ui;
pub mod messages;
pub mod app;
pub mod contract;

// Re-export commonly used types
pub use models::{LandParcel, Certificate, CertificateKind, OwnershipTransfer, Stats};
pub use error::{ContractError, LedgerError};
pub use config::Config;
pub use ledger::Ledger;
pub use messages::{UiEvent, ContractCommand, ContractResponse, RenderState};
pub use app::{AppState, AppActor, ModalSelection};
pub use contract::{ContractActor, LandContract};
