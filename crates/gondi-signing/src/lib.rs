//! Gondi Signing - EIP-712 typed messages for Gondi offers
//!
//! Builds the exact `(domain, types, primaryType, message)` payload a signer
//! is asked to sign for:
//!
//! - single-NFT loan offers
//! - collection loan offers
//! - renegotiation (refinance) offers
//!
//! Schemas are versioned per MultiSourceLoan generation. The signing digest
//! can be computed locally with [`TypedData::signing_hash`].

pub mod builder;
pub mod domain;
pub mod schema;
pub mod signer;
pub mod typed_data;

pub use builder::*;
pub use domain::*;
pub use signer::Signer;
pub use typed_data::*;
