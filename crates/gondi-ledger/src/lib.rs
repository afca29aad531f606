//! Gondi Ledger - submission and confirmation of protocol calls
//!
//! The flow for every state-changing action:
//!
//! ```text
//! CallDescriptor → submit → PendingOperation → await inclusion → correlate events → result
//! ```
//!
//! The [`LedgerClient`] trait is the seam to a real chain. [`ScriptedLedger`]
//! is an in-memory implementation for tests.

pub mod call;
pub mod client;
pub mod correlator;
pub mod filter;
pub mod inclusion;
pub mod memory;
pub mod pending;
pub mod submitter;

pub use call::CallDescriptor;
pub use client::LedgerClient;
pub use correlator::{decode, EventCorrelator, OneOf};
pub use filter::EventFilter;
pub use inclusion::*;
pub use memory::{Script, ScriptedLedger};
pub use pending::{Confirm, Confirmed, PendingOperation};
pub use submitter::OperationSubmitter;
