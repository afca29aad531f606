//! Ledger client seam

use crate::call::CallDescriptor;
use crate::inclusion::{InclusionRecord, TransactionMetadata};
use async_trait::async_trait;
use gondi_types::{Result, B256};

/// Submits calls and waits for their inclusion.
///
/// Implementations sign and broadcast with their own account. A reverted
/// call is still an inclusion: it is returned with
/// [`InclusionStatus::Reverted`](crate::InclusionStatus::Reverted) rather
/// than as an error.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Chain the client is connected to
    fn chain_id(&self) -> u64;

    /// Broadcast a state-changing call. Returns the transaction hash.
    async fn submit_call(&self, call: &CallDescriptor) -> Result<B256>;

    /// Block until the transaction is durably included. Never retries.
    async fn await_inclusion(&self, tx_hash: B256) -> Result<InclusionRecord>;

    /// Look a transaction up, for diagnostics
    async fn get_transaction(&self, tx_hash: B256) -> Result<TransactionMetadata>;

    /// Execute a read-only call and return its decoded result
    async fn read_call(&self, call: &CallDescriptor) -> Result<serde_json::Value>;
}
