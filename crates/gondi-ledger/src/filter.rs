//! Event filters

use crate::inclusion::{EventLog, InclusionRecord};
use gondi_types::{Address, ContractEvent};
use serde::{Deserialize, Serialize};

/// Matches logs by event name and emitting contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    pub address: Address,
    pub event: String,
}

impl EventFilter {
    pub fn new(address: Address, event: impl Into<String>) -> Self {
        Self {
            address,
            event: event.into(),
        }
    }

    /// Filter for a typed event emitted by `address`
    pub fn of<E: ContractEvent>(address: Address) -> Self {
        Self::new(address, E::NAME)
    }

    pub fn matches(&self, log: &EventLog) -> bool {
        log.event == self.event && log.address == self.address
    }

    /// Matching logs in log order
    pub fn apply<'a>(&'a self, record: &'a InclusionRecord) -> impl Iterator<Item = &'a EventLog> + 'a {
        record.logs.iter().filter(move |log| self.matches(log))
    }
}
