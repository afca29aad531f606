//! Composite identifiers
//!
//! Offers, loans and renegotiations only receive a local sequence number
//! on-chain. Off-chain they are referenced by a composite key:
//!
//! ```text
//! <contract>.<party>.<localId>   offers, renegotiations
//! <contract>.<localId>           loans
//! ```
//!
//! Addresses are lower-cased hex and `localId` is decimal text.

use crate::{lower_hex, Address, GondiError, Result, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SEPARATOR: char = '.';

/// A `contract[.party].localId` key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompositeId {
    text: String,
    contract: Address,
    party: Option<Address>,
    local_id: U256,
}

impl CompositeId {
    /// Build a composite id. The party segment is omitted when `None`.
    pub fn new(contract: &Address, party: Option<&Address>, local_id: U256) -> Self {
        let text = match party {
            Some(party) => format!(
                "{}{SEPARATOR}{}{SEPARATOR}{}",
                lower_hex(contract),
                lower_hex(party),
                local_id
            ),
            None => format!("{}{SEPARATOR}{}", lower_hex(contract), local_id),
        };
        Self {
            text,
            contract: *contract,
            party: party.copied(),
            local_id,
        }
    }

    /// Id of a loan: `contract.loanId`
    pub fn loan(contract: &Address, loan_id: U256) -> Self {
        Self::new(contract, None, loan_id)
    }

    /// Id of an offer or renegotiation: `contract.lender.localId`
    pub fn offer(contract: &Address, lender: &Address, local_id: U256) -> Self {
        Self::new(contract, Some(lender), local_id)
    }

    /// Parse a fully qualified composite id (two or three segments).
    ///
    /// Address segments may be in any case; the stored form is lower-cased.
    pub fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<&str> = raw.split(SEPARATOR).collect();
        let (contract, party, local) = match segments.as_slice() {
            [contract, local] => (*contract, None, *local),
            [contract, party, local] => (*contract, Some(*party), *local),
            _ => {
                return Err(GondiError::invalid_id(
                    raw,
                    "expected contract[.party].localId",
                ))
            }
        };

        let contract = parse_address(raw, contract)?;
        let party = party.map(|p| parse_address(raw, p)).transpose()?;
        let local_id = parse_local_id(raw, local)?;

        Ok(Self::new(&contract, party.as_ref(), local_id))
    }

    /// The verifying-contract segment
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// The party segment, if present
    pub fn party(&self) -> Option<Address> {
        self.party
    }

    /// The on-chain local id
    pub fn local_id(&self) -> U256 {
        self.local_id
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for CompositeId {
    type Err = GondiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CompositeId {
    type Error = GondiError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CompositeId> for String {
    fn from(id: CompositeId) -> Self {
        id.text
    }
}

impl AsRef<str> for CompositeId {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Encode `(contract, party?, localId)` into a composite id string.
pub fn encode(contract: &Address, party: Option<&Address>, local_id: U256) -> CompositeId {
    CompositeId::new(contract, party, local_id)
}

/// Extract the local id from a composite id or a bare local id.
///
/// Takes the text after the last `.`; without a separator the whole input is
/// the local id. Anything that is not a non-negative decimal integer is
/// rejected, there is no fallback to `0`.
pub fn decode_local_id(raw: &str) -> Result<U256> {
    let local = raw.rsplit(SEPARATOR).next().unwrap_or(raw);
    parse_local_id(raw, local)
}

fn parse_local_id(raw: &str, local: &str) -> Result<U256> {
    if local.is_empty() {
        return Err(GondiError::invalid_id(raw, "missing local id"));
    }
    if !local.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GondiError::invalid_id(
            raw,
            format!("local id {local:?} is not a decimal integer"),
        ));
    }
    U256::from_str_radix(local, 10)
        .map_err(|e| GondiError::invalid_id(raw, format!("local id out of range: {e}")))
}

fn parse_address(raw: &str, segment: &str) -> Result<Address> {
    segment
        .parse::<Address>()
        .map_err(|_| GondiError::invalid_id(raw, format!("{segment:?} is not an address")))
}
