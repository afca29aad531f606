//! Decoded protocol events
//!
//! The ledger hands back each log with its event name and JSON-decoded
//! arguments. These structs give the arguments a typed shape; fields the
//! client never reads are defaulted so minor ABI drift does not break
//! decoding.

use crate::model::Loan;
use crate::serde_helpers::{parse_u256, u256_dec};
use crate::{Address, B256, U256};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

/// A contract event with a fixed name
pub trait ContractEvent: DeserializeOwned + Send {
    /// Event name as declared in the contract ABI
    const NAME: &'static str;
}

macro_rules! contract_event {
    ($ty:ident) => {
        impl ContractEvent for $ty {
            const NAME: &'static str = stringify!($ty);
        }
    };
}

// ============================================================================
// Offer cancellation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferCancelled {
    pub lender: Address,
    #[serde(with = "u256_dec")]
    pub offer_id: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllOffersCancelled {
    pub lender: Address,
    #[serde(with = "u256_dec")]
    pub min_offer_id: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenegotiationOfferCancelled {
    pub lender: Address,
    #[serde(with = "u256_dec")]
    pub renegotiation_id: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllRenegotiationOffersCancelled {
    pub lender: Address,
    #[serde(with = "u256_dec")]
    pub min_renegotiation_id: U256,
}

// ============================================================================
// Loan lifecycle
// ============================================================================

/// A loan was originated. V4 emits one offer id, later versions a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanEmitted {
    #[serde(with = "u256_dec")]
    pub loan_id: U256,
    #[serde(default, deserialize_with = "one_or_many")]
    pub offer_id: Vec<U256>,
    pub loan: Loan,
    #[serde(default, with = "u256_dec")]
    pub fee: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRepaid {
    #[serde(with = "u256_dec")]
    pub loan_id: U256,
    #[serde(default, with = "u256_dec")]
    pub total_repayment: U256,
    #[serde(default, with = "u256_dec")]
    pub fee: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRefinanced {
    #[serde(with = "u256_dec")]
    pub renegotiation_id: U256,
    #[serde(with = "u256_dec")]
    pub old_loan_id: U256,
    #[serde(with = "u256_dec")]
    pub new_loan_id: U256,
    pub loan: Loan,
    #[serde(default, with = "u256_dec")]
    pub fee: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanExtended {
    #[serde(with = "u256_dec")]
    pub old_loan_id: U256,
    #[serde(with = "u256_dec")]
    pub new_loan_id: U256,
    pub loan: Loan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanForeclosed {
    #[serde(with = "u256_dec")]
    pub loan_id: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSentToLiquidator {
    #[serde(with = "u256_dec")]
    pub loan_id: U256,
    #[serde(default)]
    pub liquidator: Address,
}

// ============================================================================
// Delegation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delegated {
    #[serde(with = "u256_dec")]
    pub loan_id: U256,
    pub delegate: Address,
    #[serde(default)]
    pub rights: B256,
    #[serde(default)]
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeDelegate {
    pub delegate: Address,
    pub collection: Address,
    #[serde(with = "u256_dec")]
    pub token_id: U256,
}

// ============================================================================
// Token approvals
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalForAll {
    pub owner: Address,
    pub operator: Address,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub owner: Address,
    pub spender: Address,
    #[serde(with = "u256_dec")]
    pub value: U256,
}

contract_event!(OfferCancelled);
contract_event!(AllOffersCancelled);
contract_event!(RenegotiationOfferCancelled);
contract_event!(AllRenegotiationOffersCancelled);
contract_event!(LoanEmitted);
contract_event!(LoanRepaid);
contract_event!(LoanRefinanced);
contract_event!(LoanExtended);
contract_event!(LoanForeclosed);
contract_event!(LoanSentToLiquidator);
contract_event!(Delegated);
contract_event!(RevokeDelegate);
contract_event!(ApprovalForAll);
contract_event!(Approval);

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<U256>, D::Error> {
    use serde::de::Error;

    fn one(value: &serde_json::Value) -> Result<U256, String> {
        match value {
            serde_json::Value::String(s) => parse_u256(s),
            serde_json::Value::Number(n) => n
                .as_u64()
                .map(U256::from)
                .ok_or_else(|| format!("invalid uint256 {n}")),
            other => Err(format!("expected uint256, got {other}")),
        }
    }

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items
            .iter()
            .map(one)
            .collect::<Result<_, _>>()
            .map_err(D::Error::custom),
        serde_json::Value::Null => Ok(vec![]),
        single => one(&single).map(|v| vec![v]).map_err(D::Error::custom),
    }
}
