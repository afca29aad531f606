//! Action confirmations and results
//!
//! Every state-changing action pairs a [`CallDescriptor`](gondi_ledger::CallDescriptor)
//! with one of the [`Confirm`] implementations below. The confirmation holds
//! what is needed to correlate the inclusion record later: the emitting
//! contract, the involved party and, for batches, the expected count.

use gondi_ledger::{decode, Confirm, EventCorrelator, EventFilter, InclusionRecord, OneOf};
use gondi_types::{
    Address, AllOffersCancelled, AllRenegotiationOffersCancelled, Approval, ApprovalForAll,
    CompositeId, ContractEvent, Delegated, GondiError, Loan, LoanEmitted, LoanExtended,
    LoanForeclosed, LoanRefinanced, LoanRepaid, LoanSentToLiquidator, OfferCancelled,
    RenegotiationOfferCancelled, Result, RevokeDelegate, B256, U256,
};
use gondi_types::serde_helpers::u256_dec;
use serde::Serialize;
use tracing::warn;

pub const OFFER_NOT_CANCELLED: &str = "Offer not cancelled";
pub const OFFERS_NOT_CANCELLED: &str = "Offers not cancelled";
pub const RENEGOTIATION_NOT_CANCELLED: &str = "Renegotiation offer not cancelled";
pub const RENEGOTIATIONS_NOT_CANCELLED: &str = "Renegotiation offers not cancelled";
pub const LOAN_NOT_EMITTED: &str = "Loan not emitted";
pub const REVOKE_DELEGATIONS_FAILED: &str = "Revoke delegations failed";
pub const LOAN_NOT_REPAID: &str = "Loan not repaid";
pub const LOAN_NOT_REFINANCED: &str = "Loan not refinanced";
pub const LOAN_NOT_EXTENDED: &str = "Loan not extended";
pub const DELEGATE_MULTICALL_FAILED: &str = "Delegate multicall failed";
pub const TOKEN_NOT_DELEGATED: &str = "Token not delegated";
pub const DELEGATION_NOT_REVOKED: &str = "Token delegation not revoked";
pub const LOAN_NOT_LIQUIDATED: &str = "Loan not liquidated";
pub const NFT_APPROVAL_NOT_SET: &str = "ERC721 approval for all not set";
pub const TOKEN_APPROVAL_NOT_SET: &str = "ERC20 approval not set";
pub const NO_DELEGATIONS: &str = "At least one delegation must be revoked";

// ============================================================================
// Results
// ============================================================================

/// A loan as emitted by a contract, keyed by `contract.loanId`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    pub id: CompositeId,
    pub contract_address: Address,
    #[serde(with = "u256_dec")]
    pub loan_id: U256,
    #[serde(flatten)]
    pub loan: Loan,
}

impl LoanRecord {
    pub fn new(contract: Address, loan_id: U256, loan: Loan) -> Self {
        Self {
            id: CompositeId::loan(&contract, loan_id),
            contract_address: contract,
            loan_id,
            loan,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferCancellation {
    pub id: CompositeId,
    pub lender: Address,
    #[serde(with = "u256_dec")]
    pub offer_id: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenegotiationCancellation {
    pub id: CompositeId,
    pub lender: Address,
    #[serde(with = "u256_dec")]
    pub renegotiation_id: U256,
}

/// Result of `emitLoan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmittedLoan {
    /// Offers consumed by the loan, as `contract.lender.offerId`
    pub offer_ids: Vec<CompositeId>,
    #[serde(with = "u256_dec")]
    pub fee: U256,
    pub loan: LoanRecord,
}

/// One event of a revoke-then-emit batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "args")]
pub enum BatchEvent {
    RevokeDelegate(RevokeDelegate),
    LoanEmitted(LoanEmitted),
}

/// Result of a revoke-delegations-then-emit multicall
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeAndEmit {
    /// Every revocation and the emission, in log order
    pub results: Vec<BatchEvent>,
    pub loan: LoanRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Repayment {
    pub loan_id: CompositeId,
    #[serde(with = "u256_dec")]
    pub total_repayment: U256,
    #[serde(with = "u256_dec")]
    pub fee: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Refinancing {
    /// `contract.lender.renegotiationId`
    pub renegotiation_id: CompositeId,
    pub old_loan_id: CompositeId,
    #[serde(with = "u256_dec")]
    pub fee: U256,
    pub loan: LoanRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub old_loan_id: CompositeId,
    pub loan: LoanRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationOutcome {
    pub loan_id: CompositeId,
    pub delegate: Address,
    pub rights: B256,
    /// `true` when the delegation was enabled
    pub value: bool,
}

impl DelegationOutcome {
    fn new(contract: Address, event: Delegated) -> Self {
        Self {
            loan_id: CompositeId::loan(&contract, event.loan_id),
            delegate: event.delegate,
            rights: event.rights,
            value: event.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Liquidation {
    /// Collateral went straight to the lender
    Foreclosed { loan_id: CompositeId },
    /// Collateral was handed to the auction liquidator
    SentToLiquidator {
        loan_id: CompositeId,
        liquidator: Address,
    },
}

impl Liquidation {
    pub fn loan_id(&self) -> &CompositeId {
        match self {
            Self::Foreclosed { loan_id } | Self::SentToLiquidator { loan_id, .. } => loan_id,
        }
    }
}

// ============================================================================
// Confirmations
// ============================================================================

/// Confirms a single cancelled offer
#[derive(Debug, Clone)]
pub struct CancelOfferConfirm {
    pub correlator: EventCorrelator,
}

impl Confirm for CancelOfferConfirm {
    type Output = OfferCancellation;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        let event: OfferCancelled = self.correlator.first(record, OFFER_NOT_CANCELLED)?;
        Ok(OfferCancellation {
            id: CompositeId::offer(&self.correlator.contract(), &event.lender, event.offer_id),
            lender: event.lender,
            offer_id: event.offer_id,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CancelAllOffersConfirm {
    pub correlator: EventCorrelator,
}

impl Confirm for CancelAllOffersConfirm {
    type Output = AllOffersCancelled;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        self.correlator.first(record, OFFERS_NOT_CANCELLED)
    }
}

#[derive(Debug, Clone)]
pub struct CancelRenegotiationConfirm {
    pub correlator: EventCorrelator,
}

impl Confirm for CancelRenegotiationConfirm {
    type Output = RenegotiationCancellation;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        let event: RenegotiationOfferCancelled =
            self.correlator.first(record, RENEGOTIATION_NOT_CANCELLED)?;
        Ok(RenegotiationCancellation {
            id: CompositeId::offer(&self.correlator.contract(), &event.lender, event.renegotiation_id),
            lender: event.lender,
            renegotiation_id: event.renegotiation_id,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CancelAllRenegotiationsConfirm {
    pub correlator: EventCorrelator,
}

impl Confirm for CancelAllRenegotiationsConfirm {
    type Output = AllRenegotiationOffersCancelled;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        self.correlator.first(record, RENEGOTIATIONS_NOT_CANCELLED)
    }
}

/// Confirms a loan emission; offer ids are keyed by the offer's lender
#[derive(Debug, Clone)]
pub struct EmitLoanConfirm {
    pub correlator: EventCorrelator,
    pub lender: Address,
}

impl EmitLoanConfirm {
    fn result(&self, event: LoanEmitted) -> EmittedLoan {
        let contract = self.correlator.contract();
        EmittedLoan {
            offer_ids: event
                .offer_id
                .iter()
                .map(|id| CompositeId::offer(&contract, &self.lender, *id))
                .collect(),
            fee: event.fee,
            loan: LoanRecord::new(contract, event.loan_id, event.loan),
        }
    }
}

impl Confirm for EmitLoanConfirm {
    type Output = EmittedLoan;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        let event: LoanEmitted = self.correlator.first(record, LOAN_NOT_EMITTED)?;
        Ok(self.result(event))
    }
}

/// Confirms `revocations` RevokeDelegate events followed by a LoanEmitted
#[derive(Debug, Clone)]
pub struct RevokeAndEmitConfirm {
    pub correlator: EventCorrelator,
    pub revocations: usize,
}

impl Confirm for RevokeAndEmitConfirm {
    type Output = RevokeAndEmit;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        self.correlator
            .exactly::<RevokeDelegate>(record, self.revocations, REVOKE_DELEGATIONS_FAILED)?;
        let emitted: LoanEmitted = self.correlator.first(record, LOAN_NOT_EMITTED)?;

        let filters: [EventFilter; 2] = [
            self.correlator.filter::<RevokeDelegate>(),
            self.correlator.filter::<LoanEmitted>(),
        ];
        let results = self
            .correlator
            .interleaved(record, &filters)
            .into_iter()
            .map(|log| {
                if log.event == RevokeDelegate::NAME {
                    decode::<RevokeDelegate>(log).map(BatchEvent::RevokeDelegate)
                } else {
                    decode::<LoanEmitted>(log).map(BatchEvent::LoanEmitted)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RevokeAndEmit {
            results,
            loan: LoanRecord::new(self.correlator.contract(), emitted.loan_id, emitted.loan),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RepayLoanConfirm {
    pub correlator: EventCorrelator,
}

impl Confirm for RepayLoanConfirm {
    type Output = Repayment;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        let event: LoanRepaid = self.correlator.first(record, LOAN_NOT_REPAID)?;
        Ok(Repayment {
            loan_id: CompositeId::loan(&self.correlator.contract(), event.loan_id),
            total_repayment: event.total_repayment,
            fee: event.fee,
        })
    }
}

/// Confirms a full or partial refinance by `lender`
#[derive(Debug, Clone)]
pub struct RefinanceConfirm {
    pub correlator: EventCorrelator,
    pub lender: Address,
}

impl Confirm for RefinanceConfirm {
    type Output = Refinancing;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        let event: LoanRefinanced = self.correlator.first(record, LOAN_NOT_REFINANCED)?;
        let contract = self.correlator.contract();
        Ok(Refinancing {
            renegotiation_id: CompositeId::offer(&contract, &self.lender, event.renegotiation_id),
            old_loan_id: CompositeId::loan(&contract, event.old_loan_id),
            fee: event.fee,
            loan: LoanRecord::new(contract, event.new_loan_id, event.loan),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExtendLoanConfirm {
    pub correlator: EventCorrelator,
}

impl Confirm for ExtendLoanConfirm {
    type Output = Extension;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        let event: LoanExtended = self.correlator.first(record, LOAN_NOT_EXTENDED)?;
        let contract = self.correlator.contract();
        Ok(Extension {
            old_loan_id: CompositeId::loan(&contract, event.old_loan_id),
            loan: LoanRecord::new(contract, event.new_loan_id, event.loan),
        })
    }
}

#[derive(Debug, Clone)]
pub struct DelegateConfirm {
    pub correlator: EventCorrelator,
}

impl Confirm for DelegateConfirm {
    type Output = DelegationOutcome;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        let event: Delegated = self.correlator.first(record, TOKEN_NOT_DELEGATED)?;
        Ok(DelegationOutcome::new(self.correlator.contract(), event))
    }
}

/// Confirms one Delegated event per batched delegation, in request order
#[derive(Debug, Clone)]
pub struct DelegateBatchConfirm {
    pub correlator: EventCorrelator,
    pub loan_ids: Vec<U256>,
}

impl Confirm for DelegateBatchConfirm {
    type Output = Vec<DelegationOutcome>;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        let events: Vec<Delegated> =
            self.correlator
                .exactly(record, self.loan_ids.len(), DELEGATE_MULTICALL_FAILED)?;
        let matching = self
            .loan_ids
            .iter()
            .zip(&events)
            .take_while(|(requested, event)| **requested == event.loan_id)
            .count();
        if matching != self.loan_ids.len() {
            let requested = self.loan_ids[matching];
            let logged = events[matching].loan_id;
            warn!(tx = %record.transaction_hash, %requested, %logged, "{DELEGATE_MULTICALL_FAILED}");
            return Err(GondiError::ConfirmationMismatch {
                tx_hash: record.transaction_hash,
                message: DELEGATE_MULTICALL_FAILED.to_string(),
                expected: format!("{} for loan {requested}", Delegated::NAME),
                found: matching,
            });
        }
        let contract = self.correlator.contract();
        Ok(events
            .into_iter()
            .map(|event| DelegationOutcome::new(contract, event))
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct RevokeDelegateConfirm {
    pub correlator: EventCorrelator,
}

impl Confirm for RevokeDelegateConfirm {
    type Output = RevokeDelegate;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        self.correlator.first(record, DELEGATION_NOT_REVOKED)
    }
}

/// Foreclosure wins when both outcomes are logged
#[derive(Debug, Clone)]
pub struct LiquidateConfirm {
    pub correlator: EventCorrelator,
}

impl Confirm for LiquidateConfirm {
    type Output = Liquidation;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        let contract = self.correlator.contract();
        let outcome = self
            .correlator
            .either::<LoanForeclosed, LoanSentToLiquidator>(record, LOAN_NOT_LIQUIDATED)?;
        Ok(match outcome {
            OneOf::First(event) => Liquidation::Foreclosed {
                loan_id: CompositeId::loan(&contract, event.loan_id),
            },
            OneOf::Second(event) => Liquidation::SentToLiquidator {
                loan_id: CompositeId::loan(&contract, event.loan_id),
                liquidator: event.liquidator,
            },
        })
    }
}

/// Confirms `setApprovalForAll`; the collection contract emits the event
#[derive(Debug, Clone)]
pub struct NftApprovalConfirm {
    pub correlator: EventCorrelator,
}

impl Confirm for NftApprovalConfirm {
    type Output = ApprovalForAll;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        self.correlator.first(record, NFT_APPROVAL_NOT_SET)
    }
}

/// Confirms an ERC-20 `approve`; the token contract emits the event
#[derive(Debug, Clone)]
pub struct TokenApprovalConfirm {
    pub correlator: EventCorrelator,
}

impl Confirm for TokenApprovalConfirm {
    type Output = Approval;

    fn confirm(&self, record: &InclusionRecord) -> Result<Self::Output> {
        self.correlator.first(record, TOKEN_APPROVAL_NOT_SET)
    }
}

/// Reject an empty batch before anything is submitted
pub fn require_batch<T>(items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(GondiError::EmptyBatch {
            reason: NO_DELEGATIONS.to_string(),
        });
    }
    Ok(())
}
