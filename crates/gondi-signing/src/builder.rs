//! Typed-message builders for the three signable kinds
//!
//! Builders combine a caller draft with the fields the catalog computed for
//! it and project the result onto the schema of the active protocol version.
//! Every check happens here, before a signer is ever involved.

use crate::domain::domain_for;
use crate::schema::{
    loan_offer_fields, loan_offer_types, renegotiation_fields, renegotiation_types,
    LOAN_OFFER_TYPE, RENEGOTIATION_OFFER_TYPE,
};
use crate::typed_data::{Eip712Domain, TypedData, TypedField};
use gondi_types::serde_helpers::{u256_dec, u256_dec_vec};
use gondi_types::{
    Address, CollateralKind, Deployments, GondiError, HydratedOffer, HydratedRenegotiation, Offer, OfferDraft,
    OfferValidator, ProtocolVersion, RenegotiationDraft, RenegotiationOffer, Result, U256,
};
use serde::Serialize;
use tracing::debug;

/// The `LoanOffer` struct as the verifier sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanOfferMessage {
    #[serde(with = "u256_dec")]
    pub offer_id: U256,
    pub lender: Address,
    #[serde(with = "u256_dec")]
    pub fee: U256,
    pub borrower: Address,
    #[serde(with = "u256_dec")]
    pub capacity: U256,
    pub signer: Address,
    pub requires_liquidation: bool,
    pub nft_collateral_address: Address,
    #[serde(with = "u256_dec")]
    pub nft_collateral_token_id: U256,
    pub principal_address: Address,
    #[serde(with = "u256_dec")]
    pub principal_amount: U256,
    #[serde(with = "u256_dec")]
    pub apr_bps: U256,
    #[serde(with = "u256_dec")]
    pub expiration_time: U256,
    #[serde(with = "u256_dec")]
    pub duration: U256,
    pub validators: Vec<OfferValidator>,
}

impl LoanOfferMessage {
    /// Merge a draft with its catalog response.
    ///
    /// Catalog-resolved parties win over the draft's. Fails when the catalog
    /// could not resolve the collateral contract (or, for single-NFT offers,
    /// the token id).
    pub fn from_catalog(
        draft: &OfferDraft,
        hydrated: &HydratedOffer,
        kind: CollateralKind,
    ) -> Result<Self> {
        let nft_collateral_address =
            hydrated
                .collateral_address
                .ok_or_else(|| GondiError::UnresolvedCollateral {
                    subject: kind.to_string(),
                })?;
        let nft_collateral_token_id = match kind {
            CollateralKind::Nft => hydrated.collateral_token_id.ok_or_else(|| {
                GondiError::UnresolvedCollateral {
                    subject: kind.to_string(),
                }
            })?,
            CollateralKind::Collection => U256::ZERO,
        };

        let terms = &draft.terms;
        Ok(Self {
            offer_id: hydrated.offer_id,
            lender: hydrated.lender_address.unwrap_or(draft.lender_address),
            fee: terms.fee,
            borrower: hydrated.borrower_address.unwrap_or(draft.borrower_address),
            capacity: terms.capacity,
            signer: hydrated.signer_address.unwrap_or(draft.signer_address),
            requires_liquidation: terms.requires_liquidation,
            nft_collateral_address,
            nft_collateral_token_id,
            principal_address: terms.principal_address,
            principal_amount: terms.principal_amount,
            apr_bps: terms.apr_bps,
            expiration_time: terms.expiration_time,
            duration: terms.duration,
            validators: hydrated.validators.clone(),
        })
    }

    /// The struct of an already signed offer, as handed to `emitLoan`
    pub fn from_offer(offer: &Offer) -> Self {
        let terms = &offer.terms;
        Self {
            offer_id: offer.offer_id,
            lender: offer.lender_address,
            fee: terms.fee,
            borrower: offer.borrower_address,
            capacity: terms.capacity,
            signer: offer.signer_address,
            requires_liquidation: terms.requires_liquidation,
            nft_collateral_address: offer.nft_collateral_address,
            nft_collateral_token_id: offer.nft_collateral_token_id,
            principal_address: terms.principal_address,
            principal_amount: terms.principal_amount,
            apr_bps: terms.apr_bps,
            expiration_time: terms.expiration_time,
            duration: terms.duration,
            validators: offer.offer_validators.clone(),
        }
    }
}

/// The `RenegotiationOffer` struct as the verifier sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenegotiationMessage {
    #[serde(with = "u256_dec")]
    pub renegotiation_id: U256,
    #[serde(with = "u256_dec")]
    pub loan_id: U256,
    pub lender: Address,
    #[serde(with = "u256_dec")]
    pub fee: U256,
    pub signer: Address,
    #[serde(with = "u256_dec_vec")]
    pub target_principal: Vec<U256>,
    #[serde(with = "u256_dec")]
    pub principal_amount: U256,
    #[serde(with = "u256_dec")]
    pub apr_bps: U256,
    #[serde(with = "u256_dec")]
    pub expiration_time: U256,
    #[serde(with = "u256_dec")]
    pub duration: U256,
    pub strict_improvement: bool,
}

impl RenegotiationMessage {
    /// Merge a renegotiation draft with its catalog response.
    /// `targetPrincipal` holds the principal amount as its only element.
    pub fn from_catalog(draft: &RenegotiationDraft, hydrated: &HydratedRenegotiation) -> Self {
        let input = &draft.input;
        Self {
            renegotiation_id: hydrated.renegotiation_id,
            loan_id: hydrated.loan_id,
            lender: hydrated.lender_address.unwrap_or(draft.lender_address),
            fee: input.fee_amount,
            signer: hydrated.signer_address.unwrap_or(draft.signer_address),
            target_principal: vec![input.principal_amount],
            principal_amount: input.principal_amount,
            apr_bps: input.apr_bps,
            expiration_time: input.expiration_time,
            duration: input.duration,
            strict_improvement: input.strict_improvement,
        }
    }

    /// Message for an already assembled renegotiation offer
    pub fn from_offer(offer: &RenegotiationOffer) -> Self {
        Self {
            renegotiation_id: offer.renegotiation_id,
            loan_id: offer.loan_id,
            lender: offer.lender_address,
            fee: offer.fee_amount,
            signer: offer.signer_address,
            target_principal: offer.target_principal.clone(),
            principal_amount: offer.principal_amount,
            apr_bps: offer.apr_bps,
            expiration_time: offer.expiration_time,
            duration: offer.duration,
            strict_improvement: offer.strict_improvement,
        }
    }
}

/// Assembles [`TypedData`] for one verifying contract
#[derive(Debug, Clone)]
pub struct TypedMessageBuilder {
    domain: Eip712Domain,
    version: ProtocolVersion,
}

impl TypedMessageBuilder {
    /// Builder for `verifying_contract`, whose protocol version is looked up
    /// in `deployments`.
    pub fn new(chain_id: u64, verifying_contract: Address, deployments: &Deployments) -> Result<Self> {
        let version = deployments.version_of(&verifying_contract)?;
        Ok(Self {
            domain: domain_for(chain_id, verifying_contract, deployments),
            version,
        })
    }

    /// Builder with an explicit domain and schema version
    pub fn with_domain(domain: Eip712Domain, version: ProtocolVersion) -> Self {
        Self { domain, version }
    }

    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Typed data for a loan offer (single NFT or collection)
    pub fn loan_offer(&self, message: &LoanOfferMessage) -> Result<TypedData> {
        let fields = loan_offer_fields(self.version);
        let message = project(serde_json::to_value(message)?, &fields)?;
        debug!(version = %self.version, verifier = %self.domain.verifying_contract, "built LoanOffer message");
        Ok(TypedData {
            domain: self.domain.clone(),
            primary_type: LOAN_OFFER_TYPE.to_string(),
            types: loan_offer_types(self.version),
            message,
        })
    }

    /// Typed data for a renegotiation offer
    pub fn renegotiation(&self, message: &RenegotiationMessage) -> Result<TypedData> {
        let fields = renegotiation_fields(self.version);
        let message = project(serde_json::to_value(message)?, &fields)?;
        debug!(version = %self.version, verifier = %self.domain.verifying_contract, "built RenegotiationOffer message");
        Ok(TypedData {
            domain: self.domain.clone(),
            primary_type: RENEGOTIATION_OFFER_TYPE.to_string(),
            types: renegotiation_types(self.version),
            message,
        })
    }
}

/// Keep only the schema's members; a missing member is an error
fn project(value: serde_json::Value, fields: &[TypedField]) -> Result<serde_json::Value> {
    let mut source = match value {
        serde_json::Value::Object(map) => map,
        _ => return Err(GondiError::invalid_input("message", "expected an object")),
    };
    let mut out = serde_json::Map::with_capacity(fields.len());
    for field in fields {
        let member = source.remove(&field.name).ok_or_else(|| {
            GondiError::invalid_input(field.name.clone(), "missing from typed message")
        })?;
        out.insert(field.name.clone(), member);
    }
    Ok(serde_json::Value::Object(out))
}
