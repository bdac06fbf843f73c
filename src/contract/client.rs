//! Contract stub - sleeps for the configured latency and returns canned receipts

use tokio::sync::{mpsc, oneshot};

use crate::config::Delays;
use crate::error::ContractError;
use crate::messages::{ContractCommand, ContractResponse};
use crate::models::{Certificate, LandParcel, OwnershipTransfer};

/// Stand-in for the on-chain land registry contract
#[derive(Clone, Debug)]
pub struct LandContract {
    delays: Delays,
}

fn require(value: &str, name: &'static str) -> Result<(), ContractError> {
    if value.trim().is_empty() {
        Err(ContractError::InvalidArgument(name))
    } else {
        Ok(())
    }
}

impl LandContract {
    pub fn new(delays: Delays) -> Self {
        LandContract { delays }
    }

    pub async fn register_parcel(&self, parcel: &LandParcel) -> Result<String, ContractError> {
        require(&parcel.id, "parcel id")?;
        require(&parcel.owner, "owner")?;
        require(&parcel.area, "area")?;
        require(&parcel.location, "location")?;
        tokio::time::sleep(self.delays.register()).await;
        Ok(format!("Parcel registered: {}", parcel.id))
    }

    pub async fn issue_certificate(
        &self,
        parcel_id: &str,
        certificate: &Certificate,
    ) -> Result<String, ContractError> {
        require(parcel_id, "parcel id")?;
        require(&certificate.number, "certificate number")?;
        tokio::time::sleep(self.delays.certificate()).await;
        Ok(format!(
            "Certificate {} ({}) issued for: {}",
            certificate.number,
            certificate.kind.as_str(),
            parcel_id
        ))
    }

    pub async fn transfer_ownership(
        &self,
        parcel_id: &str,
        transfer: &OwnershipTransfer,
    ) -> Result<String, ContractError> {
        require(parcel_id, "parcel id")?;
        require(&transfer.new_owner, "new owner")?;
        tokio::time::sleep(self.delays.transfer()).await;
        Ok(format!(
            "Ownership of {} transferred to: {}",
            parcel_id, transfer.new_owner
        ))
    }

    pub async fn verify_parcel(&self, parcel_id: &str) -> Result<String, ContractError> {
        require(parcel_id, "parcel id")?;
        tokio::time::sleep(self.delays.verify()).await;
        Ok(format!("Parcel {} verified", parcel_id))
    }
}

/// Run one command against the contract and build its response.
///
/// Returns `None` for control commands (`Cancel`, `Shutdown`), which the
/// actor handles itself.
pub async fn execute_call(contract: &LandContract, cmd: ContractCommand) -> Option<ContractResponse> {
    let response = match cmd {
        ContractCommand::RegisterParcel { id, parcel } => {
            match contract.register_parcel(&parcel).await {
                Ok(message) => ContractResponse::Registered { id, parcel, message },
                Err(e) => failed(id, e),
            }
        }
        ContractCommand::IssueCertificate {
            id,
            parcel_id,
            certificate,
        } => match contract.issue_certificate(&parcel_id, &certificate).await {
            Ok(message) => ContractResponse::CertificateIssued {
                id,
                parcel_id,
                certificate,
                message,
            },
            Err(e) => failed(id, e),
        },
        ContractCommand::TransferOwnership {
            id,
            parcel_id,
            transfer,
        } => match contract.transfer_ownership(&parcel_id, &transfer).await {
            Ok(message) => ContractResponse::OwnershipTransferred {
                id,
                parcel_id,
                transfer,
                message,
            },
            Err(e) => failed(id, e),
        },
        ContractCommand::VerifyParcel { id, parcel_id } => {
            match contract.verify_parcel(&parcel_id).await {
                Ok(message) => ContractResponse::Verified {
                    id,
                    parcel_id,
                    message,
                },
                Err(e) => failed(id, e),
            }
        }
        ContractCommand::Cancel(_) | ContractCommand::Shutdown => return None,
    };
    Some(response)
}

fn failed(id: u64, error: ContractError) -> ContractResponse {
    ContractResponse::Failed {
        id,
        message: format!("Contract call failed: {}", error),
    }
}

/// Like [`execute_call`], but gives up silently when `cancel_rx` fires
pub async fn execute_cancellable(
    contract: LandContract,
    cmd: ContractCommand,
    response_tx: mpsc::UnboundedSender<ContractResponse>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    tokio::select! {
        biased;

        _ = &mut cancel_rx => {
            // Cancelled; the actor reports it
        }
        response = execute_call(&contract, cmd) => {
            if let Some(response) = response {
                let _ = response_tx.send(response);
            }
        }
    }
}
