//! Signing domain for MultiSourceLoan verifiers

use crate::typed_data::Eip712Domain;
use gondi_types::{Address, Deployments};

pub const DOMAIN_NAME: &str = "GONDI_MULTI_SOURCE_LOAN";

/// Domain version for a verifying contract: `"1"` for the legacy deployment,
/// `"2"` for everything else.
pub fn domain_version(verifying_contract: &Address, legacy: &Address) -> &'static str {
    if verifying_contract == legacy {
        "1"
    } else {
        "2"
    }
}

/// Domain for `verifying_contract` on `chain_id`
pub fn domain_for(chain_id: u64, verifying_contract: Address, deployments: &Deployments) -> Eip712Domain {
    Eip712Domain {
        name: DOMAIN_NAME.to_string(),
        version: domain_version(&verifying_contract, &deployments.legacy_multi_source_loan())
            .to_string(),
        chain_id,
        verifying_contract,
    }
}
