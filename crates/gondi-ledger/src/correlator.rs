//! Event correlation
//!
//! An included call only counts as done once the events proving its effect
//! are found in the inclusion record. Three policies cover every action:
//!
//! - [`EventCorrelator::first`]: at least one match, the first wins
//! - [`EventCorrelator::exactly`]: the match count must equal the batch size
//! - [`EventCorrelator::either`]: one of two events, the first kind preferred

use crate::filter::EventFilter;
use crate::inclusion::{EventLog, InclusionRecord};
use gondi_types::{Address, ContractEvent, GondiError, Result};
use tracing::{debug, warn};

/// Result of an either-of-two correlation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOf<A, B> {
    First(A),
    Second(B),
}

/// Correlates inclusion records with events from one contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCorrelator {
    contract: Address,
}

impl EventCorrelator {
    pub fn new(contract: Address) -> Self {
        Self { contract }
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn filter<E: ContractEvent>(&self) -> EventFilter {
        EventFilter::of::<E>(self.contract)
    }

    /// Every `E` in log order, decoded
    pub fn extract<E: ContractEvent>(&self, record: &InclusionRecord) -> Result<Vec<E>> {
        let filter = self.filter::<E>();
        let events = filter
            .apply(record)
            .map(decode::<E>)
            .collect::<Result<Vec<_>>>()?;
        debug!(
            tx = %record.transaction_hash,
            event = E::NAME,
            matches = events.len(),
            "extracted events"
        );
        Ok(events)
    }

    /// The first `E`; none is a confirmation mismatch carrying `message`
    pub fn first<E: ContractEvent>(&self, record: &InclusionRecord, message: &str) -> Result<E> {
        let mut events = self.extract::<E>(record)?;
        if events.is_empty() {
            return Err(mismatch(record, message, E::NAME, 0));
        }
        Ok(events.swap_remove(0))
    }

    /// Exactly `expected` occurrences of `E`, in log order
    pub fn exactly<E: ContractEvent>(
        &self,
        record: &InclusionRecord,
        expected: usize,
        message: &str,
    ) -> Result<Vec<E>> {
        let events = self.extract::<E>(record)?;
        if events.len() != expected {
            return Err(mismatch(
                record,
                message,
                &format!("{expected} x {}", E::NAME),
                events.len(),
            ));
        }
        Ok(events)
    }

    /// `A` if present, otherwise `B`; neither is a mismatch
    pub fn either<A: ContractEvent, B: ContractEvent>(
        &self,
        record: &InclusionRecord,
        message: &str,
    ) -> Result<OneOf<A, B>> {
        if let Some(a) = self.extract::<A>(record)?.into_iter().next() {
            return Ok(OneOf::First(a));
        }
        if let Some(b) = self.extract::<B>(record)?.into_iter().next() {
            return Ok(OneOf::Second(b));
        }
        Err(mismatch(record, message, &format!("{} or {}", A::NAME, B::NAME), 0))
    }

    /// Logs matching any of `filters`, in log order
    pub fn interleaved<'a>(
        &self,
        record: &'a InclusionRecord,
        filters: &[EventFilter],
    ) -> Vec<&'a EventLog> {
        record
            .logs
            .iter()
            .filter(|log| filters.iter().any(|f| f.matches(log)))
            .collect()
    }
}

/// Decode a log's arguments as `E`
pub fn decode<E: ContractEvent>(log: &EventLog) -> Result<E> {
    serde_json::from_value(log.args.clone()).map_err(|e| GondiError::EventDecode {
        event: E::NAME.to_string(),
        reason: e.to_string(),
    })
}

fn mismatch(record: &InclusionRecord, message: &str, expected: &str, found: usize) -> GondiError {
    warn!(
        tx = %record.transaction_hash,
        expected,
        found,
        "{message}"
    );
    GondiError::ConfirmationMismatch {
        tx_hash: record.transaction_hash,
        message: message.to_string(),
        expected: expected.to_string(),
        found,
    }
}
