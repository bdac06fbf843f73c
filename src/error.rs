//! Domain errors for the ledger and the contract stub

use thiserror::Error;

/// Rejections raised by the in-memory ledger before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Parcel {0} is already registered")]
    DuplicateId(String),
    #[error("Parcel {0} was not found")]
    UnknownParcel(String),
    #[error("Parcel {0} is already verified")]
    AlreadyVerified(String),
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Failures reported by the contract stub
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("call cancelled")]
    Cancelled,
}
