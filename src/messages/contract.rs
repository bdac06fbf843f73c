//! Contract messages - communication between App and Contract layers

use crate::models::{Certificate, LandParcel, OwnershipTransfer};

/// Commands sent from App layer to Contract layer
#[derive(Debug, Clone)]
pub enum ContractCommand {
    /// Register a new parcel
    RegisterParcel { id: u64, parcel: LandParcel },
    /// Issue a certificate for an existing parcel
    IssueCertificate {
        id: u64,
        parcel_id: String,
        certificate: Certificate,
    },
    /// Hand a parcel over to a new owner
    TransferOwnership {
        id: u64,
        parcel_id: String,
        transfer: OwnershipTransfer,
    },
    /// Mark a parcel as verified
    VerifyParcel { id: u64, parcel_id: String },
    /// Cancel a pending call
    Cancel(u64),
    /// Shutdown the contract actor
    Shutdown,
}

/// Responses sent from Contract layer to App layer
#[derive(Debug, Clone)]
pub enum ContractResponse {
    Registered {
        id: u64,
        parcel: LandParcel,
        message: String,
    },
    CertificateIssued {
        id: u64,
        parcel_id: String,
        certificate: Certificate,
        message: String,
    },
    OwnershipTransferred {
        id: u64,
        parcel_id: String,
        transfer: OwnershipTransfer,
        message: String,
    },
    Verified {
        id: u64,
        parcel_id: String,
        message: String,
    },
    /// The stub rejected the call
    Failed { id: u64, message: String },
    /// Call was cancelled before it finished
    Cancelled { id: u64 },
}

impl ContractResponse {
    /// Get the call ID from the response
    pub fn id(&self) -> u64 {
        match self {
            ContractResponse::Registered { id, .. }
            | ContractResponse::CertificateIssued { id, .. }
            | ContractResponse::OwnershipTransferred { id, .. }
            | ContractResponse::Verified { id, .. }
            | ContractResponse::Failed { id, .. }
            | ContractResponse::Cancelled { id } => *id,
        }
    }
}
