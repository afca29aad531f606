//! Serde helpers for big integers on the wire.
//!
//! The catalog and typed-data payloads carry `uint256` values as decimal
//! strings. Decoded event arguments may arrive as decimal strings, `0x` hex
//! strings or plain JSON numbers, so deserialization accepts all three.

use alloy_primitives::U256;
use serde::de::{self, Deserializer, Visitor};
use serde::Serializer;
use std::fmt;

/// Parse a `uint256` from decimal text or `0x`-prefixed hex.
pub fn parse_u256(raw: &str) -> Result<U256, String> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(raw, 10),
    };
    parsed.map_err(|e| format!("invalid uint256 {raw:?}: {e}"))
}

struct U256Visitor;

impl<'de> Visitor<'de> for U256Visitor {
    type Value = U256;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a uint256 as decimal string, 0x-hex string or unsigned number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<U256, E> {
        Ok(U256::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<U256, E> {
        u64::try_from(v)
            .map(U256::from)
            .map_err(|_| E::custom(format!("negative value {v} for uint256")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<U256, E> {
        parse_u256(v).map_err(E::custom)
    }
}

/// `#[serde(with = "u256_dec")]` for `U256` fields.
pub mod u256_dec {
    use super::*;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        deserializer.deserialize_any(U256Visitor)
    }
}

/// `#[serde(with = "u256_dec_vec")]` for `Vec<U256>` fields.
pub mod u256_dec_vec {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Wrapped(#[serde(with = "u256_dec")] U256);

    pub fn serialize<S: Serializer>(values: &[U256], serializer: S) -> Result<S::Ok, S::Error> {
        let wrapped: Vec<Wrapped> = values.iter().copied().map(Wrapped).collect();
        wrapped.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<U256>, D::Error> {
        let wrapped = Vec::<Wrapped>::deserialize(deserializer)?;
        Ok(wrapped.into_iter().map(|w| w.0).collect())
    }
}

/// `#[serde(with = "u256_dec_opt")]` for `Option<U256>` fields.
pub mod u256_dec_opt {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Wrapped(#[serde(with = "u256_dec")] U256);

    pub fn serialize<S: Serializer>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error> {
        value.map(Wrapped).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<U256>, D::Error> {
        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|w| w.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Amounts {
        #[serde(with = "u256_dec")]
        principal: U256,
        #[serde(with = "u256_dec_vec")]
        targets: Vec<U256>,
        #[serde(with = "u256_dec_opt", default)]
        cap: Option<U256>,
    }

    #[test]
    fn serializes_as_decimal_strings() {
        let value = Amounts {
            principal: U256::from(1_000u64),
            targets: vec![U256::from(7u64)],
            cap: None,
        };
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["principal"], "1000");
        assert_eq!(json["targets"][0], "7");
        assert!(json["cap"].is_null());
    }

    #[test]
    fn accepts_hex_decimal_and_numbers() {
        let parsed: Amounts = serde_json::from_str(
            r#"{"principal":"0x3e8","targets":[7,"8"],"cap":"12"}"#,
        )
        .unwrap();
        assert_eq!(parsed.principal, U256::from(1_000u64));
        assert_eq!(parsed.targets, vec![U256::from(7u64), U256::from(8u64)]);
        assert_eq!(parsed.cap, Some(U256::from(12u64)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_u256("twelve").is_err());
        assert!(serde_json::from_str::<Amounts>(r#"{"principal":-1,"targets":[]}"#).is_err());
    }
}
