//! In-memory ledger for tests and local tooling
//!
//! [`ScriptedLedger`] records every submitted call and answers with
//! pre-scripted outcomes, in submission order. A call with no script left is
//! included successfully with no logs.

use crate::call::CallDescriptor;
use crate::client::LedgerClient;
use crate::inclusion::{EventLog, InclusionRecord, InclusionStatus, TransactionMetadata};
use async_trait::async_trait;
use gondi_types::{Address, GondiError, Result, B256, U256};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Outcome of the next submitted call
#[derive(Debug, Clone)]
pub enum Script {
    /// Included successfully with these logs
    Include(Vec<EventLog>),
    /// Included but reverted, with diagnostics
    Revert(serde_json::Value),
    /// Rejected at submission
    Reject(String),
}

#[derive(Debug, Default)]
struct State {
    scripts: VecDeque<Script>,
    submitted: Vec<CallDescriptor>,
    transactions: HashMap<B256, (TransactionMetadata, InclusionRecord)>,
    reads: HashMap<String, serde_json::Value>,
    nonce: u64,
}

/// Scripted, in-memory [`LedgerClient`]
#[derive(Debug, Clone)]
pub struct ScriptedLedger {
    chain_id: u64,
    account: Address,
    state: Arc<RwLock<State>>,
}

impl ScriptedLedger {
    pub fn new(chain_id: u64, account: Address) -> Self {
        Self {
            chain_id,
            account,
            state: Arc::new(RwLock::new(State::default())),
        }
    }

    /// Queue the outcome of the next unscripted submission
    pub async fn push(&self, script: Script) {
        self.state.write().await.scripts.push_back(script);
    }

    pub async fn push_logs(&self, logs: Vec<EventLog>) {
        self.push(Script::Include(logs)).await;
    }

    pub async fn push_revert(&self, diagnostics: serde_json::Value) {
        self.push(Script::Revert(diagnostics)).await;
    }

    pub async fn push_rejection(&self, reason: impl Into<String>) {
        self.push(Script::Reject(reason.into())).await;
    }

    /// Result for read-only calls to `function`
    pub async fn set_read(&self, function: impl Into<String>, value: serde_json::Value) {
        self.state.write().await.reads.insert(function.into(), value);
    }

    /// Every call submitted so far, in order
    pub async fn submitted(&self) -> Vec<CallDescriptor> {
        self.state.read().await.submitted.clone()
    }

    pub async fn last_submitted(&self) -> Option<CallDescriptor> {
        self.state.read().await.submitted.last().cloned()
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn submit_call(&self, call: &CallDescriptor) -> Result<B256> {
        let mut state = self.state.write().await;
        let script = state
            .scripts
            .pop_front()
            .unwrap_or_else(|| Script::Include(vec![]));

        let (status, logs, diagnostics) = match script {
            Script::Reject(reason) => return Err(GondiError::submission(reason)),
            Script::Include(logs) => (InclusionStatus::Success, logs, None),
            Script::Revert(diagnostics) => (InclusionStatus::Reverted, vec![], Some(diagnostics)),
        };

        state.nonce += 1;
        let nonce = state.nonce;
        let tx_hash = B256::left_padding_from(&nonce.to_be_bytes());
        let logs = logs
            .into_iter()
            .enumerate()
            .map(|(i, mut log)| {
                log.log_index = i as u64;
                log
            })
            .collect();

        let record = InclusionRecord {
            transaction_hash: tx_hash,
            block_hash: B256::left_padding_from(&(nonce + 1_000).to_be_bytes()),
            block_number: nonce,
            transaction_index: 0,
            status,
            from: self.account,
            to: Some(call.contract),
            gas_used: U256::from(21_000u64),
            logs,
            diagnostics,
        };
        let metadata = TransactionMetadata {
            hash: tx_hash,
            from: self.account,
            to: Some(call.contract),
            nonce: nonce - 1,
            input: serde_json::to_vec(call)?.into(),
            value: call.value,
            block_number: Some(nonce),
        };

        state.submitted.push(call.clone());
        state.transactions.insert(tx_hash, (metadata, record));
        Ok(tx_hash)
    }

    async fn await_inclusion(&self, tx_hash: B256) -> Result<InclusionRecord> {
        self.state
            .read()
            .await
            .transactions
            .get(&tx_hash)
            .map(|(_, record)| record.clone())
            .ok_or_else(|| GondiError::Submission {
                tx_hash: Some(tx_hash),
                reason: "transaction dropped".to_string(),
                diagnostics: None,
            })
    }

    async fn get_transaction(&self, tx_hash: B256) -> Result<TransactionMetadata> {
        self.state
            .read()
            .await
            .transactions
            .get(&tx_hash)
            .map(|(tx, _)| tx.clone())
            .ok_or_else(|| GondiError::Submission {
                tx_hash: Some(tx_hash),
                reason: "unknown transaction".to_string(),
                diagnostics: None,
            })
    }

    async fn read_call(&self, call: &CallDescriptor) -> Result<serde_json::Value> {
        self.state
            .read()
            .await
            .reads
            .get(&call.function)
            .cloned()
            .ok_or_else(|| GondiError::submission(format!("no result scripted for {}", call.function)))
    }
}
