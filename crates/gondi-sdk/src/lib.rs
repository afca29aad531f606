//! Gondi SDK - client for the Gondi NFT lending protocol
//!
//! The SDK turns lending actions into signed offers and confirmed contract
//! calls against a MultiSourceLoan deployment.
//!
//! # Quick Start
//!
//! ```ignore
//! use gondi_sdk::{Gondi, GondiConfig, SingleNftOfferInput};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = GondiConfig::load(None)?;
//!     let gondi = Gondi::from_config(&config, ledger, signer)?;
//!
//!     // Sign and publish an offer
//!     let offer = gondi.make_single_nft_offer(input).await?;
//!
//!     // Borrow against it and wait for the loan
//!     let pending = gondi.emit_loan(&emit).await?;
//!     let confirmed = gondi.wait(&pending).await?;
//!     println!("loan {}", confirmed.result.loan.id);
//!
//!     Ok(())
//! }
//! ```
//!
//! Ledger access and signing are capabilities supplied by the caller through
//! [`LedgerClient`] and [`Signer`]; offers are hashed and stored by a
//! [`RemoteCatalog`].

pub mod actions;
pub mod config;
pub mod gondi;
pub mod lockup;
pub mod protocol;

pub use actions::*;
pub use config::GondiConfig;
pub use gondi::{Gondi, GondiBuilder};
pub use protocol::{MslV4, MslV5, MultiSourceLoan};

pub use gondi_catalog::{CatalogConfig, GraphqlCatalog, RemoteCatalog};
pub use gondi_ledger::{
    CallDescriptor, Confirm, Confirmed, EventLog, InclusionMetadata, InclusionRecord, LedgerClient,
    PendingOperation, ScriptedLedger, TransactionMetadata,
};
pub use gondi_signing::{Signer, TypedData};
pub use gondi_types::*;
