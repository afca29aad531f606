//! MultiSourceLoan protocol variants
//!
//! Each deployed generation of the lending contract signs and accepts
//! slightly different structs. A [`MultiSourceLoan`] hides those differences:
//! it builds the typed messages a lender signs, maps each action to a
//! [`CallDescriptor`] in the contract's parameter order, and correlates the
//! events the contract emits.
//!
//! | Variant | Deployments | Notes |
//! |---------|-------------|-------|
//! | [`MslV4`] | V4 | sender passed explicitly; no delegation, extension or partial refinance |
//! | [`MslV5`] | V5, V5.1 | execution-data structs, multicall |

use async_trait::async_trait;
use gondi_ledger::{CallDescriptor, EventCorrelator, LedgerClient};
use gondi_signing::{LoanOfferMessage, RenegotiationMessage, TypedData, TypedMessageBuilder};
use gondi_types::serde_helpers::parse_u256;
use gondi_types::{
    Address, DelegationInput, Deployments, EmitLoanInput, GondiError, Loan, ProtocolVersion,
    RenegotiationOffer, Result, U256,
};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Zero-filled `bytes` argument
const EMPTY_BYTES: &str = "0x";

/// One MultiSourceLoan deployment
#[async_trait]
pub trait MultiSourceLoan: Send + Sync + fmt::Debug {
    fn version(&self) -> ProtocolVersion;

    /// Verifying contract address
    fn address(&self) -> Address;

    fn messages(&self) -> &TypedMessageBuilder;

    fn correlator(&self) -> EventCorrelator {
        EventCorrelator::new(self.address())
    }

    fn offer_message(&self, message: &LoanOfferMessage) -> Result<TypedData> {
        self.messages().loan_offer(message)
    }

    fn renegotiation_message(&self, message: &RenegotiationMessage) -> Result<TypedData> {
        self.messages().renegotiation(message)
    }

    fn cancel_offer(&self, sender: Address, offer_id: U256) -> CallDescriptor;

    fn cancel_all_offers(&self, sender: Address, min_offer_id: U256) -> CallDescriptor;

    fn cancel_renegotiation_offer(&self, sender: Address, renegotiation_id: U256) -> CallDescriptor;

    fn cancel_all_renegotiation_offers(&self, sender: Address, min_renegotiation_id: U256) -> CallDescriptor;

    fn emit_loan(&self, sender: Address, input: &EmitLoanInput) -> Result<CallDescriptor>;

    fn repay_loan(&self, receiver: Address, loan_id: U256, loan: &Loan) -> Result<CallDescriptor>;

    fn refinance_full(&self, offer: &RenegotiationOffer, loan: &Loan) -> Result<CallDescriptor>;

    fn refinance_partial(&self, _offer: &RenegotiationOffer, _loan: &Loan) -> Result<CallDescriptor> {
        Err(GondiError::unsupported("refinancePartial", self.version()))
    }

    fn extend_loan(&self, _loan_id: U256, _loan: &Loan, _new_duration: U256) -> Result<CallDescriptor> {
        Err(GondiError::unsupported("extendLoan", self.version()))
    }

    fn delegate(&self, _input: &DelegationInput) -> Result<CallDescriptor> {
        Err(GondiError::unsupported("delegate", self.version()))
    }

    fn revoke_delegate(&self, _to: Address, _collection: Address, _token_id: U256) -> Result<CallDescriptor> {
        Err(GondiError::unsupported("revokeDelegate", self.version()))
    }

    fn liquidate_loan(&self, _loan_id: U256, _loan: &Loan) -> Result<CallDescriptor> {
        Err(GondiError::unsupported("liquidateLoan", self.version()))
    }

    fn multicall(&self, _calls: Vec<CallDescriptor>) -> Result<CallDescriptor> {
        Err(GondiError::unsupported("multicall", self.version()))
    }

    /// `getMinLockPeriod()` in basis points
    async fn min_lock_period_bps(&self, _ledger: &dyn LedgerClient) -> Result<U256> {
        Err(GondiError::unsupported("getMinLockPeriod", self.version()))
    }
}

/// Variant for the MultiSourceLoan deployed at `address`
pub fn for_address(
    chain_id: u64,
    address: Address,
    deployments: &Deployments,
) -> Result<Arc<dyn MultiSourceLoan>> {
    let messages = TypedMessageBuilder::new(chain_id, address, deployments)?;
    let protocol: Arc<dyn MultiSourceLoan> = match messages.version() {
        ProtocolVersion::V4 => Arc::new(MslV4::new(address, messages)),
        ProtocolVersion::V5 | ProtocolVersion::V5_1 => Arc::new(MslV5::new(address, messages)),
    };
    Ok(protocol)
}

fn offer_struct(protocol: &dyn MultiSourceLoan, input: &EmitLoanInput) -> Result<Value> {
    let message = LoanOfferMessage::from_offer(&input.offer);
    Ok(protocol.offer_message(&message)?.message)
}

fn loan_struct(loan: &Loan) -> Result<Value> {
    Ok(serde_json::to_value(loan)?)
}

fn required_signature(offer: &RenegotiationOffer) -> Result<String> {
    offer
        .signature
        .as_ref()
        .map(ToString::to_string)
        .ok_or_else(|| GondiError::invalid_input("signature", "renegotiation offer is not signed"))
}

// ============================================================================
// V4
// ============================================================================

/// First-generation MultiSourceLoan
#[derive(Debug, Clone)]
pub struct MslV4 {
    address: Address,
    messages: TypedMessageBuilder,
}

impl MslV4 {
    pub fn new(address: Address, messages: TypedMessageBuilder) -> Self {
        Self { address, messages }
    }

    fn call(&self, function: &str, args: Vec<Value>) -> CallDescriptor {
        CallDescriptor::new(self.address, function, args)
    }
}

#[async_trait]
impl MultiSourceLoan for MslV4 {
    fn version(&self) -> ProtocolVersion {
        ProtocolVersion::V4
    }

    fn address(&self) -> Address {
        self.address
    }

    fn messages(&self) -> &TypedMessageBuilder {
        &self.messages
    }

    fn cancel_offer(&self, sender: Address, offer_id: U256) -> CallDescriptor {
        self.call("cancelOffer", vec![json!(sender), json!(offer_id.to_string())])
    }

    fn cancel_all_offers(&self, sender: Address, min_offer_id: U256) -> CallDescriptor {
        self.call("cancelAllOffers", vec![json!(sender), json!(min_offer_id.to_string())])
    }

    fn cancel_renegotiation_offer(&self, sender: Address, renegotiation_id: U256) -> CallDescriptor {
        self.call(
            "cancelRenegotiationOffer",
            vec![json!(sender), json!(renegotiation_id.to_string())],
        )
    }

    fn cancel_all_renegotiation_offers(&self, sender: Address, min_renegotiation_id: U256) -> CallDescriptor {
        self.call(
            "cancelAllRenegotiationOffer",
            vec![json!(sender), json!(min_renegotiation_id.to_string())],
        )
    }

    fn emit_loan(&self, _sender: Address, input: &EmitLoanInput) -> Result<CallDescriptor> {
        Ok(self.call(
            "emitLoan",
            vec![
                offer_struct(self, input)?,
                json!(input.token_id.to_string()),
                json!(input.offer.signature.to_string()),
                json!(false),
            ],
        ))
    }

    /// The loan is addressed by its newest tranche
    fn repay_loan(&self, receiver: Address, _loan_id: U256, loan: &Loan) -> Result<CallDescriptor> {
        let newest = loan
            .newest_source()
            .ok_or_else(|| GondiError::invalid_input("loan.source", "loan has no sources"))?;
        Ok(self.call(
            "repayLoan",
            vec![
                json!(receiver),
                json!(newest.loan_id.to_string()),
                loan_struct(loan)?,
                json!(false),
            ],
        ))
    }

    /// V4 full refinances carry a zero loan id in the offer struct
    fn refinance_full(&self, offer: &RenegotiationOffer, loan: &Loan) -> Result<CallDescriptor> {
        let mut message = RenegotiationMessage::from_offer(offer);
        message.loan_id = U256::ZERO;
        let offer_struct = self.renegotiation_message(&message)?.message;
        Ok(self.call(
            "refinanceFull",
            vec![offer_struct, loan_struct(loan)?, json!(required_signature(offer)?)],
        ))
    }
}

// ============================================================================
// V5 / V5.1
// ============================================================================

/// MultiSourceLoan V5 and V5.1; both accept the same calls
#[derive(Debug, Clone)]
pub struct MslV5 {
    address: Address,
    messages: TypedMessageBuilder,
}

impl MslV5 {
    pub fn new(address: Address, messages: TypedMessageBuilder) -> Self {
        Self { address, messages }
    }

    fn call(&self, function: &str, args: Vec<Value>) -> CallDescriptor {
        CallDescriptor::new(self.address, function, args)
    }
}

#[async_trait]
impl MultiSourceLoan for MslV5 {
    fn version(&self) -> ProtocolVersion {
        self.messages.version()
    }

    fn address(&self) -> Address {
        self.address
    }

    fn messages(&self) -> &TypedMessageBuilder {
        &self.messages
    }

    fn cancel_offer(&self, _sender: Address, offer_id: U256) -> CallDescriptor {
        self.call("cancelOffer", vec![json!(offer_id.to_string())])
    }

    fn cancel_all_offers(&self, _sender: Address, min_offer_id: U256) -> CallDescriptor {
        self.call("cancelAllOffers", vec![json!(min_offer_id.to_string())])
    }

    fn cancel_renegotiation_offer(&self, _sender: Address, renegotiation_id: U256) -> CallDescriptor {
        self.call("cancelRenegotiationOffer", vec![json!(renegotiation_id.to_string())])
    }

    fn cancel_all_renegotiation_offers(&self, _sender: Address, min_renegotiation_id: U256) -> CallDescriptor {
        self.call(
            "cancelAllRenegotiationOffers",
            vec![json!(min_renegotiation_id.to_string())],
        )
    }

    /// Callback data and the borrower signature are zero-filled; both only
    /// matter for leveraged originations.
    fn emit_loan(&self, sender: Address, input: &EmitLoanInput) -> Result<CallDescriptor> {
        let execution = json!({
            "executionData": {
                "offer": offer_struct(self, input)?,
                "tokenId": input.token_id.to_string(),
                "amount": input.amount.to_string(),
                "expirationTime": input.expiration_time.to_string(),
                "callbackData": EMPTY_BYTES,
            },
            "lender": input.offer.lender_address,
            "borrower": sender,
            "lenderOfferSignature": input.offer.signature.to_string(),
            "borrowerOfferSignature": EMPTY_BYTES,
        });
        Ok(self.call("emitLoan", vec![execution]))
    }

    fn repay_loan(&self, _receiver: Address, loan_id: U256, loan: &Loan) -> Result<CallDescriptor> {
        let repayment = json!({
            "data": {
                "loanId": loan_id.to_string(),
                "callbackData": EMPTY_BYTES,
                "shouldDelegate": false,
            },
            "loan": loan_struct(loan)?,
            "borrowerSignature": EMPTY_BYTES,
        });
        Ok(self.call("repayLoan", vec![repayment]))
    }

    fn refinance_full(&self, offer: &RenegotiationOffer, loan: &Loan) -> Result<CallDescriptor> {
        let offer_struct = self
            .renegotiation_message(&RenegotiationMessage::from_offer(offer))?
            .message;
        Ok(self.call(
            "refinanceFull",
            vec![offer_struct, loan_struct(loan)?, json!(required_signature(offer)?)],
        ))
    }

    /// Partial refinances are sent by the new lender and need no signature
    fn refinance_partial(&self, offer: &RenegotiationOffer, loan: &Loan) -> Result<CallDescriptor> {
        let offer_struct = self
            .renegotiation_message(&RenegotiationMessage::from_offer(offer))?
            .message;
        Ok(self.call("refinancePartial", vec![offer_struct, loan_struct(loan)?]))
    }

    fn extend_loan(&self, loan_id: U256, loan: &Loan, new_duration: U256) -> Result<CallDescriptor> {
        let extension = new_duration.checked_sub(loan.duration).ok_or_else(|| {
            GondiError::invalid_input(
                "newDuration",
                format!("{new_duration} is shorter than the current duration {}", loan.duration),
            )
        })?;
        Ok(self.call(
            "extendLoan",
            vec![
                json!(loan_id.to_string()),
                loan_struct(loan)?,
                json!(extension.to_string()),
            ],
        ))
    }

    fn delegate(&self, input: &DelegationInput) -> Result<CallDescriptor> {
        Ok(self.call(
            "delegate",
            vec![
                json!(input.loan_id.to_string()),
                loan_struct(&input.loan)?,
                json!(input.to),
                json!(input.rights),
                json!(input.enable),
            ],
        ))
    }

    fn revoke_delegate(&self, to: Address, collection: Address, token_id: U256) -> Result<CallDescriptor> {
        Ok(self.call(
            "revokeDelegate",
            vec![json!(to), json!(collection), json!(token_id.to_string())],
        ))
    }

    fn liquidate_loan(&self, loan_id: U256, loan: &Loan) -> Result<CallDescriptor> {
        Ok(self.call(
            "liquidateLoan",
            vec![json!(loan_id.to_string()), loan_struct(loan)?],
        ))
    }

    fn multicall(&self, calls: Vec<CallDescriptor>) -> Result<CallDescriptor> {
        CallDescriptor::multicall(self.address, calls)
    }

    async fn min_lock_period_bps(&self, ledger: &dyn LedgerClient) -> Result<U256> {
        let raw = ledger
            .read_call(&self.call("getMinLockPeriod", vec![]))
            .await?;
        match &raw {
            Value::String(s) => parse_u256(s).map_err(|reason| GondiError::EventDecode {
                event: "getMinLockPeriod".to_string(),
                reason,
            }),
            Value::Number(n) => n.as_u64().map(U256::from).ok_or_else(|| GondiError::EventDecode {
                event: "getMinLockPeriod".to_string(),
                reason: format!("invalid uint256 {n}"),
            }),
            other => Err(GondiError::EventDecode {
                event: "getMinLockPeriod".to_string(),
                reason: format!("expected uint256, got {other}"),
            }),
        }
    }
}
