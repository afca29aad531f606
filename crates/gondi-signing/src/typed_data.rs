//! EIP-712 typed data
//!
//! [`TypedData`] mirrors the `eth_signTypedData_v4` JSON payload. The
//! `EIP712Domain` entry is implied by [`Eip712Domain`] and never listed in
//! `types`.

use gondi_types::serde_helpers::parse_u256;
use gondi_types::{Address, GondiError, Result, B256, U256};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::collections::{BTreeMap, BTreeSet};

const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Keccak-256 digest
pub fn keccak256(data: impl AsRef<[u8]>) -> B256 {
    let out: [u8; 32] = Keccak256::digest(data.as_ref()).into();
    B256::from(out)
}

/// One member of a struct type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl TypedField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Signing domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl Eip712Domain {
    /// `hashStruct(domain)`
    pub fn separator(&self) -> B256 {
        let mut buf = Vec::with_capacity(32 * 5);
        buf.extend_from_slice(keccak256(DOMAIN_TYPE).as_slice());
        buf.extend_from_slice(keccak256(&self.name).as_slice());
        buf.extend_from_slice(keccak256(&self.version).as_slice());
        buf.extend_from_slice(&U256::from(self.chain_id).to_be_bytes::<32>());
        buf.extend_from_slice(&left_pad(self.verifying_contract.as_slice()));
        keccak256(buf)
    }
}

/// A complete (domain, types, primaryType, message) payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    pub domain: Eip712Domain,
    pub primary_type: String,
    pub types: BTreeMap<String, Vec<TypedField>>,
    pub message: serde_json::Value,
}

impl TypedData {
    /// Field list of the primary type
    pub fn primary_fields(&self) -> &[TypedField] {
        self.types
            .get(&self.primary_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `encodeType` of the primary type
    pub fn encode_type(&self) -> Result<String> {
        encode_type(&self.types, &self.primary_type)
    }

    /// `hashStruct(message)`
    pub fn hash_struct(&self) -> Result<B256> {
        hash_struct(&self.types, &self.primary_type, &self.message)
    }

    /// Digest a signer is asked to sign:
    /// `keccak256(0x1901 ‖ domainSeparator ‖ hashStruct(message))`
    pub fn signing_hash(&self) -> Result<B256> {
        let mut buf = Vec::with_capacity(66);
        buf.extend_from_slice(&[0x19, 0x01]);
        buf.extend_from_slice(self.domain.separator().as_slice());
        buf.extend_from_slice(self.hash_struct()?.as_slice());
        Ok(keccak256(buf))
    }
}

/// `encodeType`: the primary type followed by its referenced struct types in
/// alphabetical order.
pub fn encode_type(types: &BTreeMap<String, Vec<TypedField>>, primary: &str) -> Result<String> {
    let fields = types
        .get(primary)
        .ok_or_else(|| encoding_error(format!("unknown type {primary}")))?;

    let mut deps = BTreeSet::new();
    collect_dependencies(types, primary, &mut deps);
    deps.remove(primary);

    let mut out = render_type(primary, fields);
    for dep in deps {
        // collect_dependencies only inserts names present in `types`
        if let Some(dep_fields) = types.get(&dep) {
            out.push_str(&render_type(&dep, dep_fields));
        }
    }
    Ok(out)
}

/// `hashStruct(value)` for a struct type declared in `types`
pub fn hash_struct(
    types: &BTreeMap<String, Vec<TypedField>>,
    ty: &str,
    value: &serde_json::Value,
) -> Result<B256> {
    let fields = types
        .get(ty)
        .ok_or_else(|| encoding_error(format!("unknown type {ty}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| encoding_error(format!("{ty} value must be an object")))?;

    let mut buf = Vec::with_capacity(32 * (fields.len() + 1));
    buf.extend_from_slice(keccak256(encode_type(types, ty)?).as_slice());
    for field in fields {
        let member = object.get(&field.name).ok_or_else(|| {
            encoding_error(format!("{ty}.{} is missing from the message", field.name))
        })?;
        buf.extend_from_slice(&encode_value(types, &field.ty, member)?);
    }
    Ok(keccak256(buf))
}

fn render_type(name: &str, fields: &[TypedField]) -> String {
    let members: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.ty, f.name))
        .collect();
    format!("{name}({})", members.join(","))
}

fn base_type(ty: &str) -> &str {
    ty.split('[').next().unwrap_or(ty)
}

fn collect_dependencies(
    types: &BTreeMap<String, Vec<TypedField>>,
    ty: &str,
    found: &mut BTreeSet<String>,
) {
    let ty = base_type(ty);
    if found.contains(ty) {
        return;
    }
    let Some(fields) = types.get(ty) else {
        return;
    };
    found.insert(ty.to_string());
    for field in fields {
        collect_dependencies(types, &field.ty, found);
    }
}

fn encode_value(
    types: &BTreeMap<String, Vec<TypedField>>,
    ty: &str,
    value: &serde_json::Value,
) -> Result<[u8; 32]> {
    if let Some(element) = ty.strip_suffix(']').and_then(|t| t.rsplit_once('[')).map(|(e, _)| e) {
        let items = value
            .as_array()
            .ok_or_else(|| encoding_error(format!("{ty} value must be an array")))?;
        let mut buf = Vec::with_capacity(32 * items.len());
        for item in items {
            buf.extend_from_slice(&encode_value(types, element, item)?);
        }
        return Ok(keccak256(buf).0);
    }

    if types.contains_key(ty) {
        return Ok(hash_struct(types, ty, value)?.0);
    }

    match ty {
        "string" => {
            let s = value
                .as_str()
                .ok_or_else(|| encoding_error("string value expected"))?;
            Ok(keccak256(s).0)
        }
        "bytes" => Ok(keccak256(hex_bytes(value)?).0),
        "bool" => {
            let b = value
                .as_bool()
                .ok_or_else(|| encoding_error("bool value expected"))?;
            Ok(U256::from(b as u8).to_be_bytes::<32>())
        }
        "address" => {
            let raw = value
                .as_str()
                .ok_or_else(|| encoding_error("address value expected"))?;
            let address: Address = raw
                .parse()
                .map_err(|_| encoding_error(format!("{raw:?} is not an address")))?;
            Ok(left_pad(address.as_slice()))
        }
        _ if ty.starts_with("uint") => Ok(integer(value, false)?.to_be_bytes::<32>()),
        _ if ty.starts_with("int") => Ok(integer(value, true)?.to_be_bytes::<32>()),
        _ if ty.starts_with("bytes") => {
            let bytes = hex_bytes(value)?;
            if bytes.len() > 32 {
                return Err(encoding_error(format!("{ty} value longer than 32 bytes")));
            }
            let mut word = [0u8; 32];
            word[..bytes.len()].copy_from_slice(&bytes);
            Ok(word)
        }
        _ => Err(encoding_error(format!("unsupported type {ty}"))),
    }
}

fn integer(value: &serde_json::Value, signed: bool) -> Result<U256> {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Ok(U256::from(v))
            } else if let (true, Some(v)) = (signed, n.as_i64()) {
                Ok(U256::ZERO.wrapping_sub(U256::from(v.unsigned_abs())))
            } else {
                Err(encoding_error(format!("{n} is not an integer")))
            }
        }
        serde_json::Value::String(s) => match s.trim().strip_prefix('-') {
            Some(abs) if signed => Ok(U256::ZERO.wrapping_sub(parse_u256(abs).map_err(encoding_error)?)),
            Some(_) => Err(encoding_error(format!("negative value {s} for unsigned type"))),
            None => parse_u256(s).map_err(encoding_error),
        },
        other => Err(encoding_error(format!("{other} is not an integer"))),
    }
}

fn hex_bytes(value: &serde_json::Value) -> Result<Vec<u8>> {
    let raw = value
        .as_str()
        .ok_or_else(|| encoding_error("hex bytes expected"))?;
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits).map_err(|e| encoding_error(format!("invalid hex {raw:?}: {e}")))
}

fn left_pad(bytes: &[u8]) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(bytes);
    word
}

fn encoding_error(reason: impl Into<String>) -> GondiError {
    GondiError::invalid_input("typedData", reason)
}
