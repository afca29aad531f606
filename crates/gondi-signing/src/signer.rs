//! Signer capability
//!
//! Key material never enters this workspace. Wallets, hardware devices and
//! remote signers implement [`Signer`]; the facade only asks for an address
//! and a signature.

use crate::typed_data::TypedData;
use async_trait::async_trait;
use gondi_types::{Address, Bytes, Result};

/// Produces signatures over EIP-712 typed data
#[async_trait]
pub trait Signer: Send + Sync {
    /// Account the signer signs for; used as lender and signer of drafts
    fn address(&self) -> Address;

    /// Sign `data`. Failures must be reported as `GondiError::Signing`.
    async fn sign_typed_data(&self, data: &TypedData) -> Result<Bytes>;
}
