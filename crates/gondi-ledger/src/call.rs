//! Call descriptors
//!
//! A call names a contract method and its positional arguments, already in
//! the verifier's parameter order. ABI encoding belongs to the ledger client.

use gondi_types::{Address, GondiError, Result, U256};
use serde::{Deserialize, Serialize};

pub const MULTICALL: &str = "multicall";

/// One state-changing (or read-only) contract call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallDescriptor {
    pub contract: Address,
    pub function: String,
    pub args: Vec<serde_json::Value>,
    /// Native value attached to the call
    #[serde(default)]
    pub value: U256,
}

impl CallDescriptor {
    pub fn new(contract: Address, function: impl Into<String>, args: Vec<serde_json::Value>) -> Self {
        Self {
            contract,
            function: function.into(),
            args,
            value: U256::ZERO,
        }
    }

    /// A `multicall` whose only argument is the ordered list of sub-calls.
    ///
    /// Sub-calls must target `contract`.
    pub fn multicall(contract: Address, calls: Vec<CallDescriptor>) -> Result<Self> {
        if let Some(other) = calls.iter().find(|c| c.contract != contract) {
            return Err(GondiError::invalid_input(
                "calls",
                format!("sub-call {} targets {} instead of {contract}", other.function, other.contract),
            ));
        }
        let encoded = serde_json::to_value(&calls)?;
        Ok(Self::new(contract, MULTICALL, vec![encoded]))
    }

    pub fn is_multicall(&self) -> bool {
        self.function == MULTICALL
    }

    /// Sub-calls of a multicall, in order. Empty for plain calls.
    pub fn sub_calls(&self) -> Result<Vec<CallDescriptor>> {
        match (self.is_multicall(), self.args.first()) {
            (true, Some(list)) => Ok(serde_json::from_value(list.clone())?),
            _ => Ok(vec![]),
        }
    }
}
