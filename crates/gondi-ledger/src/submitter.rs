//! Operation submitter

use crate::call::CallDescriptor;
use crate::client::LedgerClient;
use crate::inclusion::TransactionMetadata;
use crate::pending::{Confirm, Confirmed, PendingOperation};
use gondi_types::{Result, B256};
use std::sync::Arc;
use tracing::{error, info};

/// Submits calls through a [`LedgerClient`] and hands back pending operations
#[derive(Clone)]
pub struct OperationSubmitter {
    ledger: Arc<dyn LedgerClient>,
}

impl OperationSubmitter {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerClient> {
        &self.ledger
    }

    /// Submit `call`; `confirm` is kept for the deferred confirmation.
    pub async fn submit<C: Confirm>(&self, call: CallDescriptor, confirm: C) -> Result<PendingOperation<C>> {
        let submission_id = self.ledger.submit_call(&call).await.map_err(|e| {
            error!(contract = %call.contract, function = %call.function, error = %e, "submission rejected");
            e
        })?;
        info!(
            tx = %submission_id,
            contract = %call.contract,
            function = %call.function,
            "call submitted"
        );
        Ok(PendingOperation {
            submission_id,
            call,
            confirm,
        })
    }

    /// Wait for and confirm a pending operation
    pub async fn wait<C: Confirm>(&self, pending: &PendingOperation<C>) -> Result<Confirmed<C::Output>> {
        pending.wait_for_confirmation(self.ledger.as_ref()).await
    }

    /// Transaction lookup, for diagnostics
    pub async fn transaction(&self, submission_id: B256) -> Result<TransactionMetadata> {
        self.ledger.get_transaction(submission_id).await
    }
}

impl std::fmt::Debug for OperationSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationSubmitter")
            .field("chain_id", &self.ledger.chain_id())
            .finish()
    }
}
