//! Pending operations
//!
//! A [`PendingOperation`] is plain data: the submission id, the call that was
//! submitted and the parameters needed to confirm it later. Waiting does not
//! consume it, so a wait can be repeated.

use crate::call::CallDescriptor;
use crate::client::LedgerClient;
use crate::inclusion::{InclusionMetadata, InclusionRecord};
use gondi_types::{Address, GondiError, Result, B256};
use serde::Serialize;
use tracing::{info, warn};

/// Turns an inclusion record into an action result
pub trait Confirm: Send + Sync {
    type Output: Send;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output>;
}

/// An action result with the inclusion it was confirmed by
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmed<T> {
    pub result: T,
    pub inclusion: InclusionMetadata,
}

/// One submitted, not yet confirmed, call
#[derive(Debug, Clone)]
pub struct PendingOperation<C> {
    /// Transaction hash returned by the ledger
    pub submission_id: B256,
    pub call: CallDescriptor,
    pub confirm: C,
}

impl<C: Confirm> PendingOperation<C> {
    pub fn contract(&self) -> Address {
        self.call.contract
    }

    /// Wait for inclusion. A reverted call is a `Submission` error carrying
    /// the ledger diagnostics.
    pub async fn wait_for_inclusion(&self, ledger: &dyn LedgerClient) -> Result<InclusionRecord> {
        let record = ledger.await_inclusion(self.submission_id).await?;
        if !record.is_success() {
            warn!(
                tx = %self.submission_id,
                function = %self.call.function,
                block = record.block_number,
                "call reverted"
            );
            return Err(GondiError::Submission {
                tx_hash: Some(self.submission_id),
                reason: format!("{} reverted", self.call.function),
                diagnostics: record.diagnostics,
            });
        }
        info!(
            tx = %self.submission_id,
            function = %self.call.function,
            block = record.block_number,
            logs = record.logs.len(),
            "call included"
        );
        Ok(record)
    }

    /// Wait for inclusion, then correlate its events into the action result
    pub async fn wait_for_confirmation(&self, ledger: &dyn LedgerClient) -> Result<Confirmed<C::Output>> {
        let record = self.wait_for_inclusion(ledger).await?;
        let result = self.confirm.confirm(&record)?;
        Ok(Confirmed {
            result,
            inclusion: record.metadata(),
        })
    }
}
