//! Contract layer - simulated land-title contract calls
//!
//! The Contract actor receives commands, runs them against the stub with
//! its configured delays, and sends back responses.

pub mod actor;
pub mod client;

pub use actor::ContractActor;
pub use client::LandContract;
