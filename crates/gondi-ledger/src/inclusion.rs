//! Inclusion records and transaction metadata

use gondi_types::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Execution outcome of an included call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InclusionStatus {
    Success,
    Reverted,
}

/// One decoded log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLog {
    /// Emitting contract
    pub address: Address,
    /// Event name from the contract ABI
    pub event: String,
    #[serde(default)]
    pub topics: Vec<B256>,
    /// Named arguments decoded to JSON
    pub args: serde_json::Value,
    #[serde(default)]
    pub log_index: u64,
}

impl EventLog {
    pub fn new(address: Address, event: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            address,
            event: event.into(),
            topics: vec![],
            args,
            log_index: 0,
        }
    }
}

/// Ledger metadata of an inclusion, without the logs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionMetadata {
    pub transaction_hash: B256,
    pub block_hash: B256,
    pub block_number: u64,
    pub transaction_index: u64,
    pub status: InclusionStatus,
}

/// Durable inclusion of a submitted call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionRecord {
    pub transaction_hash: B256,
    pub block_hash: B256,
    pub block_number: u64,
    pub transaction_index: u64,
    pub status: InclusionStatus,
    pub from: Address,
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default)]
    pub gas_used: U256,
    /// Emitted events in log order
    pub logs: Vec<EventLog>,
    /// Ledger-specific detail (revert reason, trace), passed through untouched
    #[serde(default)]
    pub diagnostics: Option<serde_json::Value>,
}

impl InclusionRecord {
    pub fn is_success(&self) -> bool {
        self.status == InclusionStatus::Success
    }

    pub fn metadata(&self) -> InclusionMetadata {
        InclusionMetadata {
            transaction_hash: self.transaction_hash,
            block_hash: self.block_hash,
            block_number: self.block_number,
            transaction_index: self.transaction_index,
            status: self.status,
        }
    }
}

/// Transaction as known to the ledger; diagnostics only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMetadata {
    pub hash: B256,
    pub from: Address,
    #[serde(default)]
    pub to: Option<Address>,
    pub nonce: u64,
    #[serde(default)]
    pub input: Bytes,
    #[serde(default)]
    pub value: U256,
    /// `None` while pending
    #[serde(default)]
    pub block_number: Option<u64>,
}
