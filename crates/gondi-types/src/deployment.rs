//! Deployment addresses and protocol versions
//!
//! Deployments are plain values handed to the facade at construction time.
//! There is no global registry; callers pick a table with
//! [`Deployments::for_chain`] or build one by hand.

use crate::{Address, GondiError, Result};
use alloy_primitives::address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local anvil/hardhat chain id
pub const ANVIL_CHAIN_ID: u64 = 31337;

/// Ethereum mainnet chain id
pub const MAINNET_CHAIN_ID: u64 = 1;

/// MultiSourceLoan protocol generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolVersion {
    V4,
    V5,
    #[serde(rename = "V5_1")]
    V5_1,
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::V4 => "V4",
            Self::V5 => "V5",
            Self::V5_1 => "V5.1",
        };
        f.write_str(label)
    }
}

/// Contract addresses for one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployments {
    pub multi_source_loan_v4: Address,
    pub multi_source_loan_v5: Address,
    pub multi_source_loan_v5_1: Address,
    pub auction_loan_liquidator_v4: Address,
    pub auction_loan_liquidator_v5: Address,
    pub leverage_v1: Address,
    pub leverage_v1_1: Address,
    pub seaport: Address,
    pub crypto_punks: Address,
}

impl Deployments {
    /// Mainnet deployments
    pub fn mainnet() -> Self {
        Self {
            multi_source_loan_v4: address!("Ca5a494Ca20483e21ec1E41FE1D9461Da77595Bd"),
            multi_source_loan_v5: address!("478f6F994C6fb3cf3e444a489b3AD9edB8cCaE16"),
            multi_source_loan_v5_1: address!("52cdce4ebd1c6045765e4399ed2e4fffb9bf7e54"),
            auction_loan_liquidator_v4: address!("237e4421C742d843Fdd96D22294D338507e17091"),
            auction_loan_liquidator_v5: address!("97d34635b605c2f1630d6b4c6c5d222b8a2ca47d"),
            leverage_v1: address!("87Ce6e8124fFd68fa721FcC7f35fdA14A11E233e"),
            leverage_v1_1: address!("13df570de8465f5319b6a2c60de21716400074e7"),
            seaport: address!("00000000000000ADc04C56Bf30aC9d3c0aAF14dC"),
            crypto_punks: address!("b47e3cd837ddf8e4c57f05d70ab865de6e193bbb"),
        }
    }

    /// Deterministic local-node deployments, before environment overrides
    pub fn anvil_defaults() -> Self {
        Self {
            multi_source_loan_v4: address!("5FC8d32690cc91D4c39d9d3abcBD16989F875707"),
            multi_source_loan_v5: address!("68B1D87F95878fE05B998F19b66F4baba5De1aed"),
            multi_source_loan_v5_1: address!("610178dA211FEF7D417bC0e6FeD39F05609AD788"),
            auction_loan_liquidator_v4: address!("Dc64a140Aa3E981100a9becA4E685f962f0cF6C9"),
            auction_loan_liquidator_v5: address!("9A9f2CCfdE556A7E9Ff0848998Aa4a0CFD8863AE"),
            leverage_v1: address!("Be6Eb4ACB499f992ba2DaC7CAD59d56DA9e0D823"),
            leverage_v1_1: address!("A51c1fc2f0D1a1b8494Ed1FE312d7C3a78Ed91C0"),
            seaport: address!("00000000000000ADc04C56Bf30aC9d3c0aAF14dC"),
            crypto_punks: address!("b47e3cd837ddf8e4c57f05d70ab865de6e193bbb"),
        }
    }

    /// Local-node deployments with `GONDI_*` environment overrides applied.
    ///
    /// Overrides that are not valid addresses are ignored.
    pub fn anvil() -> Self {
        Self::anvil_defaults().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply address overrides from a key lookup (environment by default).
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, current: Address| -> Address {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<Address>().ok())
                .unwrap_or(current)
        };
        self.multi_source_loan_v4 = read("GONDI_MULTI_SOURCE_LOAN_V4", self.multi_source_loan_v4);
        self.multi_source_loan_v5 = read("GONDI_MULTI_SOURCE_LOAN_V5", self.multi_source_loan_v5);
        self.multi_source_loan_v5_1 =
            read("GONDI_MULTI_SOURCE_LOAN_V5_1", self.multi_source_loan_v5_1);
        self.auction_loan_liquidator_v4 =
            read("GONDI_AUCTION_LOAN_LIQUIDATOR_V4", self.auction_loan_liquidator_v4);
        self.auction_loan_liquidator_v5 =
            read("GONDI_AUCTION_LOAN_LIQUIDATOR_V5", self.auction_loan_liquidator_v5);
        self.leverage_v1 = read("GONDI_LEVERAGE", self.leverage_v1);
        self.leverage_v1_1 = read("GONDI_LEVERAGE_V1_1", self.leverage_v1_1);
        self.seaport = read("SEAPORT", self.seaport);
        self.crypto_punks = read("CRYPTO_PUNKS", self.crypto_punks);
        self
    }

    /// Deployment table for a chain id. Unknown chains use mainnet addresses.
    pub fn for_chain(chain_id: u64) -> Self {
        match chain_id {
            ANVIL_CHAIN_ID => Self::anvil(),
            _ => Self::mainnet(),
        }
    }

    /// The legacy verifier whose typed-data domain uses version `"1"`
    pub fn legacy_multi_source_loan(&self) -> Address {
        self.multi_source_loan_v4
    }

    /// Address of a MultiSourceLoan generation
    pub fn multi_source_loan(&self, version: ProtocolVersion) -> Address {
        match version {
            ProtocolVersion::V4 => self.multi_source_loan_v4,
            ProtocolVersion::V5 => self.multi_source_loan_v5,
            ProtocolVersion::V5_1 => self.multi_source_loan_v5_1,
        }
    }

    /// Protocol generation deployed at `address` (address bytes compare, so
    /// the textual case of the original input never matters)
    pub fn version_of(&self, address: &Address) -> Result<ProtocolVersion> {
        [ProtocolVersion::V4, ProtocolVersion::V5, ProtocolVersion::V5_1]
            .into_iter()
            .find(|v| &self.multi_source_loan(*v) == address)
            .ok_or_else(|| {
                GondiError::Config(format!(
                    "{address} is not a known MultiSourceLoan deployment"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_lookup_by_address() {
        let d = Deployments::mainnet();
        assert_eq!(d.version_of(&d.multi_source_loan_v4).unwrap(), ProtocolVersion::V4);
        assert_eq!(d.version_of(&d.multi_source_loan_v5_1).unwrap(), ProtocolVersion::V5_1);
        assert!(d.version_of(&d.seaport).is_err());
    }

    #[test]
    fn overrides_ignore_invalid_addresses() {
        let d = Deployments::anvil_defaults().with_overrides(|key| match key {
            "GONDI_MULTI_SOURCE_LOAN_V5" => Some("0x1111111111111111111111111111111111111111".into()),
            "GONDI_MULTI_SOURCE_LOAN_V4" => Some("not-an-address".into()),
            _ => None,
        });
        assert_eq!(d.multi_source_loan_v5, Address::repeat_byte(0x11));
        assert_eq!(
            d.multi_source_loan_v4,
            Deployments::anvil_defaults().multi_source_loan_v4
        );
    }

    #[test]
    fn unknown_chain_falls_back_to_mainnet() {
        assert_eq!(Deployments::for_chain(137), Deployments::mainnet());
    }
}
