//! Contract actor - runs simulated contract calls in the Tokio runtime

use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

use crate::contract::client::{execute_cancellable, LandContract};
use crate::messages::{ContractCommand, ContractResponse};

/// Tracks an in-flight call for cancellation
struct ActiveCall {
    cancel_tx: oneshot::Sender<()>,
}

/// Contract actor that executes commands against the stub
pub struct ContractActor {
    contract: LandContract,
    response_tx: mpsc::UnboundedSender<ContractResponse>,
    active_calls: JoinSet<u64>,
    cancel_handles: HashMap<u64, ActiveCall>,
}

impl ContractActor {
    pub fn new(contract: LandContract, response_tx: mpsc::UnboundedSender<ContractResponse>) -> Self {
        ContractActor {
            contract,
            response_tx,
            active_calls: JoinSet::new(),
            cancel_handles: HashMap::new(),
        }
    }

    fn spawn_call(&mut self, id: u64, cmd: ContractCommand) {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.cancel_handles.insert(id, ActiveCall { cancel_tx });

        let contract = self.contract.clone();
        let response_tx = self.response_tx.clone();
        self.active_calls.spawn(async move {
            tracing::info!(id, ?cmd, "Executing contract call");
            execute_cancellable(contract, cmd, response_tx, cancel_rx).await;
            id
        });
    }

    /// Run the contract actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<ContractCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(ContractCommand::Cancel(id)) => {
                            if let Some(active) = self.cancel_handles.remove(&id) {
                                tracing::info!(id, "Cancelling contract call");
                                let _ = active.cancel_tx.send(());
                                let _ = self.response_tx.send(ContractResponse::Cancelled { id });
                            }
                        }

                        Some(ContractCommand::Shutdown) => {
                            for (_, active) in self.cancel_handles.drain() {
                                let _ = active.cancel_tx.send(());
                            }
                            break;
                        }

                        Some(cmd @ ContractCommand::RegisterParcel { id, .. })
                        | Some(cmd @ ContractCommand::IssueCertificate { id, .. })
                        | Some(cmd @ ContractCommand::TransferOwnership { id, .. })
                        | Some(cmd @ ContractCommand::VerifyParcel { id, .. }) => {
                            self.spawn_call(id, cmd);
                        }

                        None => break,
                    }
                }

                // Forget cancel handles of finished calls
                Some(result) = self.active_calls.join_next() => {
                    match result {
                        Ok(id) => {
                            self.cancel_handles.remove(&id);
                            tracing::info!(id, "Contract call completed");
                        }
                        Err(e) => tracing::warn!(error = %e, "Contract call task failed"),
                    }
                }
            }
        }
    }
}
