//! Offer, loan and renegotiation records
//!
//! Field names follow the catalog and contract vocabulary (camelCase on the
//! wire). `uint256` values travel as decimal strings.

use crate::serde_helpers::{u256_dec, u256_dec_vec};
use crate::{Address, Bytes, CompositeId, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in a day, for duration arithmetic
pub const SECONDS_IN_DAY: u64 = 60 * 60 * 24;

// ============================================================================
// Offers
// ============================================================================

/// On-chain validator attached to an offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferValidator {
    pub validator: Address,
    pub arguments: Bytes,
}

impl OfferValidator {
    /// Zero validator the catalog mutation requires for collection offers
    pub fn placeholder() -> Self {
        Self {
            validator: Address::ZERO,
            arguments: Bytes::new(),
        }
    }
}

/// What an offer is collateralised by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollateralKind {
    /// One specific token
    Nft,
    /// Any token of a collection
    Collection,
}

impl fmt::Display for CollateralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nft => f.write_str("nft"),
            Self::Collection => f.write_str("collection"),
        }
    }
}

/// Lending terms shared by every loan offer kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferTerms {
    /// ERC-20 the principal is denominated in
    pub principal_address: Address,
    #[serde(with = "u256_dec")]
    pub principal_amount: U256,
    /// Maximum principal the offer may lend across loans (0 = single use)
    #[serde(with = "u256_dec")]
    pub capacity: U256,
    #[serde(with = "u256_dec")]
    pub fee: U256,
    #[serde(with = "u256_dec")]
    pub apr_bps: U256,
    /// Unix seconds
    #[serde(with = "u256_dec")]
    pub expiration_time: U256,
    /// Seconds
    #[serde(with = "u256_dec")]
    pub duration: U256,
    #[serde(default)]
    pub requires_liquidation: bool,
}

/// Caller input for an offer on one NFT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleNftOfferInput {
    /// Catalog id of the NFT
    pub nft_id: i64,
    #[serde(default)]
    pub borrower_address: Option<Address>,
    #[serde(flatten)]
    pub terms: OfferTerms,
}

/// Caller input for an offer on any NFT of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionOfferInput {
    /// Catalog id of the collection
    pub collection_id: i64,
    #[serde(default)]
    pub borrower_address: Option<Address>,
    #[serde(flatten)]
    pub terms: OfferTerms,
}

/// Offer draft sent to the catalog to obtain `offerId` and `offerHash`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferDraft {
    pub lender_address: Address,
    pub signer_address: Address,
    pub borrower_address: Address,
    pub contract_address: Address,
    pub offer_validators: Vec<OfferValidator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nft_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<i64>,
    #[serde(flatten)]
    pub terms: OfferTerms,
}

/// Protocol-computed fields returned by the catalog for an offer draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HydratedOffer {
    #[serde(with = "u256_dec")]
    pub offer_id: U256,
    #[serde(default)]
    pub offer_hash: Option<B256>,
    #[serde(default)]
    pub lender_address: Option<Address>,
    #[serde(default)]
    pub signer_address: Option<Address>,
    #[serde(default)]
    pub borrower_address: Option<Address>,
    #[serde(default)]
    pub validators: Vec<OfferValidator>,
    /// Resolved NFT or collection contract
    #[serde(default)]
    pub collateral_address: Option<Address>,
    /// Resolved token id; absent for collection offers
    #[serde(default, with = "crate::serde_helpers::u256_dec_opt")]
    pub collateral_token_id: Option<U256>,
}

/// A signed loan offer, as persisted by the catalog and consumed on-chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Composite id, assigned once persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CompositeId>,
    #[serde(with = "u256_dec")]
    pub offer_id: U256,
    pub offer_hash: B256,
    pub signature: Bytes,
    pub lender_address: Address,
    pub signer_address: Address,
    pub borrower_address: Address,
    pub contract_address: Address,
    pub nft_collateral_address: Address,
    #[serde(with = "u256_dec")]
    pub nft_collateral_token_id: U256,
    pub offer_validators: Vec<OfferValidator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nft_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<i64>,
    #[serde(flatten)]
    pub terms: OfferTerms,
}

impl Offer {
    /// Composite id derived from contract, lender and offer id
    pub fn composite_id(&self) -> CompositeId {
        self.id.clone().unwrap_or_else(|| {
            CompositeId::offer(&self.contract_address, &self.lender_address, self.offer_id)
        })
    }
}

/// Offer status as tracked by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Active,
    Cancelled,
    Executed,
    Expired,
    Inactive,
    Outdated,
}

/// Sort field for offer listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OffersSortField {
    CreatedDate,
    Duration,
    PrincipalAmount,
    Apr,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ordering {
    Asc,
    Desc,
}

/// Filters and paging for offer listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOffersQuery {
    pub limit: u32,
    #[serde(default)]
    pub cursor: Option<String>,
    pub sort_field: OffersSortField,
    pub sort_order: Ordering,
    #[serde(default)]
    pub statuses: Vec<OfferStatus>,
    #[serde(default)]
    pub lender_address: Option<Address>,
    #[serde(default)]
    pub collection_ids: Vec<i64>,
}

impl Default for ListOffersQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            cursor: None,
            sort_field: OffersSortField::CreatedDate,
            sort_order: Ordering::Desc,
            statuses: vec![],
            lender_address: None,
            collection_ids: vec![],
        }
    }
}

/// One page of offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPage {
    pub offers: Vec<Offer>,
    pub cursor: Option<String>,
    pub has_next_page: bool,
}

// ============================================================================
// Loans
// ============================================================================

/// One lender tranche of a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSource {
    #[serde(with = "u256_dec")]
    pub loan_id: U256,
    pub lender: Address,
    #[serde(with = "u256_dec")]
    pub principal_amount: U256,
    #[serde(with = "u256_dec")]
    pub accrued_interest: U256,
    #[serde(with = "u256_dec")]
    pub start_time: U256,
    #[serde(with = "u256_dec")]
    pub apr_bps: U256,
}

/// On-chain loan struct as emitted by the protocol.
///
/// Fields this client does not model are kept in `extra` so the struct can be
/// handed back to the contract unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub borrower: Address,
    #[serde(with = "u256_dec")]
    pub nft_collateral_token_id: U256,
    pub nft_collateral_address: Address,
    pub principal_address: Address,
    #[serde(with = "u256_dec")]
    pub principal_amount: U256,
    #[serde(with = "u256_dec")]
    pub start_time: U256,
    #[serde(with = "u256_dec")]
    pub duration: U256,
    pub source: Vec<LoanSource>,
    #[serde(flatten, default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Loan {
    /// Newest tranche; sources are ordered newest first
    pub fn newest_source(&self) -> Option<&LoanSource> {
        self.source.first()
    }

    /// Unix second the loan ends at
    pub fn end_time(&self) -> U256 {
        self.start_time.saturating_add(self.duration)
    }
}

// ============================================================================
// Renegotiations
// ============================================================================

/// Caller input for a refinance (renegotiation) offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenegotiationInput {
    /// Composite id of the loan being refinanced
    pub loan_id: String,
    #[serde(with = "u256_dec")]
    pub principal_amount: U256,
    #[serde(with = "u256_dec")]
    pub apr_bps: U256,
    #[serde(with = "u256_dec")]
    pub fee_amount: U256,
    #[serde(with = "u256_dec")]
    pub expiration_time: U256,
    #[serde(with = "u256_dec")]
    pub duration: U256,
    #[serde(default)]
    pub strict_improvement: bool,
}

/// Renegotiation draft sent to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenegotiationDraft {
    pub lender_address: Address,
    pub signer_address: Address,
    #[serde(flatten)]
    pub input: RenegotiationInput,
}

/// Protocol-computed fields returned by the catalog for a renegotiation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HydratedRenegotiation {
    #[serde(with = "u256_dec")]
    pub renegotiation_id: U256,
    /// On-chain local id of the loan
    #[serde(with = "u256_dec")]
    pub loan_id: U256,
    #[serde(default)]
    pub offer_hash: Option<B256>,
    #[serde(default)]
    pub lender_address: Option<Address>,
    #[serde(default)]
    pub signer_address: Option<Address>,
}

/// A renegotiation offer, signed unless created with signing skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenegotiationOffer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CompositeId>,
    #[serde(with = "u256_dec")]
    pub renegotiation_id: U256,
    #[serde(with = "u256_dec")]
    pub loan_id: U256,
    pub lender_address: Address,
    pub signer_address: Address,
    #[serde(with = "u256_dec")]
    pub fee_amount: U256,
    #[serde(with = "u256_dec")]
    pub principal_amount: U256,
    #[serde(with = "u256_dec_vec")]
    pub target_principal: Vec<U256>,
    #[serde(with = "u256_dec")]
    pub apr_bps: U256,
    #[serde(with = "u256_dec")]
    pub expiration_time: U256,
    #[serde(with = "u256_dec")]
    pub duration: U256,
    #[serde(default)]
    pub strict_improvement: bool,
    pub offer_hash: B256,
    #[serde(default)]
    pub signature: Option<Bytes>,
}

// ============================================================================
// Action inputs
// ============================================================================

/// Inputs for originating a loan from a signed offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmitLoanInput {
    pub offer: Offer,
    #[serde(with = "u256_dec")]
    pub token_id: U256,
    /// Principal to draw from the offer
    #[serde(with = "u256_dec")]
    pub amount: U256,
    /// Unix second after which the execution data is void
    #[serde(with = "u256_dec")]
    pub expiration_time: U256,
}

/// Delegation of the collateral's rights to another wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationInput {
    #[serde(with = "u256_dec")]
    pub loan_id: U256,
    pub loan: Loan,
    pub to: Address,
    /// Delegate.xyz rights; zero means all rights
    #[serde(default)]
    pub rights: B256,
    pub enable: bool,
}
