//! Gondi Types - Canonical domain types for the Gondi lending client
//!
//! This crate contains the foundational types shared by every other gondi
//! crate, with zero dependencies on them. It defines:
//!
//! - Composite identifiers for offers, loans and renegotiations
//! - Offer, loan and renegotiation records (drafts, catalog-hydrated, signed)
//! - Decoded contract event arguments
//! - Deployment address tables and protocol versions
//! - The error taxonomy used across the workspace
//!
//! # Lifecycle of a signable offer
//!
//! ```text
//! draft → hydrated (catalog) → signed → persisted → consumed on-chain | cancelled
//! ```

pub mod id;
pub mod model;
pub mod events;
pub mod deployment;
pub mod error;
pub mod serde_helpers;

pub use id::*;
pub use model::*;
pub use events::*;
pub use deployment::*;
pub use error::*;

pub use alloy_primitives::{Address, Bytes, B256, U256};

/// Render an address as lower-cased, `0x`-prefixed hex.
pub fn lower_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}
