//! Versioned field schemas
//!
//! Field order and types must match the verifying contract exactly. A
//! reordered or renamed field changes the type hash and every signature made
//! against it is rejected on-chain.

use crate::typed_data::TypedField;
use gondi_types::ProtocolVersion;
use std::collections::BTreeMap;

pub const LOAN_OFFER_TYPE: &str = "LoanOffer";
pub const RENEGOTIATION_OFFER_TYPE: &str = "RenegotiationOffer";
pub const OFFER_VALIDATOR_TYPE: &str = "OfferValidator";

const V4_LOAN_OFFER: &[(&str, &str)] = &[
    ("offerId", "uint256"),
    ("lender", "address"),
    ("fee", "uint256"),
    ("borrower", "address"),
    ("capacity", "uint256"),
    ("signer", "address"),
    ("requiresLiquidation", "bool"),
    ("nftCollateralAddress", "address"),
    ("nftCollateralTokenId", "uint256"),
    ("principalAddress", "address"),
    ("principalAmount", "uint256"),
    ("aprBps", "uint256"),
    ("expirationTime", "uint256"),
    ("duration", "uint256"),
    ("validators", "OfferValidator[]"),
];

const V5_LOAN_OFFER: &[(&str, &str)] = &[
    ("offerId", "uint256"),
    ("lender", "address"),
    ("fee", "uint256"),
    ("borrower", "address"),
    ("capacity", "uint256"),
    ("nftCollateralAddress", "address"),
    ("nftCollateralTokenId", "uint256"),
    ("principalAddress", "address"),
    ("principalAmount", "uint256"),
    ("aprBps", "uint256"),
    ("expirationTime", "uint256"),
    ("duration", "uint256"),
    ("validators", "OfferValidator[]"),
];

const V4_RENEGOTIATION: &[(&str, &str)] = &[
    ("renegotiationId", "uint256"),
    ("loanId", "uint256"),
    ("lender", "address"),
    ("fee", "uint256"),
    ("signer", "address"),
    ("targetPrincipal", "uint256[]"),
    ("principalAmount", "uint256"),
    ("aprBps", "uint256"),
    ("expirationTime", "uint256"),
    ("duration", "uint256"),
    ("strictImprovement", "bool"),
];

const V5_RENEGOTIATION: &[(&str, &str)] = &[
    ("renegotiationId", "uint256"),
    ("loanId", "uint256"),
    ("lender", "address"),
    ("fee", "uint256"),
    ("targetPrincipal", "uint256[]"),
    ("principalAmount", "uint256"),
    ("aprBps", "uint256"),
    ("expirationTime", "uint256"),
    ("duration", "uint256"),
];

const OFFER_VALIDATOR: &[(&str, &str)] = &[("validator", "address"), ("arguments", "bytes")];

fn fields(table: &[(&str, &str)]) -> Vec<TypedField> {
    table.iter().map(|(name, ty)| TypedField::new(*name, *ty)).collect()
}

/// `LoanOffer` members for a protocol version
pub fn loan_offer_fields(version: ProtocolVersion) -> Vec<TypedField> {
    match version {
        ProtocolVersion::V4 => fields(V4_LOAN_OFFER),
        ProtocolVersion::V5 | ProtocolVersion::V5_1 => fields(V5_LOAN_OFFER),
    }
}

/// `RenegotiationOffer` members for a protocol version
pub fn renegotiation_fields(version: ProtocolVersion) -> Vec<TypedField> {
    match version {
        ProtocolVersion::V4 => fields(V4_RENEGOTIATION),
        ProtocolVersion::V5 | ProtocolVersion::V5_1 => fields(V5_RENEGOTIATION),
    }
}

/// `OfferValidator` members
pub fn offer_validator_fields() -> Vec<TypedField> {
    fields(OFFER_VALIDATOR)
}

/// Type table for a loan offer (`LoanOffer` + `OfferValidator`)
pub fn loan_offer_types(version: ProtocolVersion) -> BTreeMap<String, Vec<TypedField>> {
    BTreeMap::from([
        (LOAN_OFFER_TYPE.to_string(), loan_offer_fields(version)),
        (OFFER_VALIDATOR_TYPE.to_string(), offer_validator_fields()),
    ])
}

/// Type table for a renegotiation offer
pub fn renegotiation_types(version: ProtocolVersion) -> BTreeMap<String, Vec<TypedField>> {
    BTreeMap::from([(
        RENEGOTIATION_OFFER_TYPE.to_string(),
        renegotiation_fields(version),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed_data::encode_type;

    #[test]
    fn v4_loan_offer_has_fourteen_primitives_and_validators() {
        let fields = loan_offer_fields(ProtocolVersion::V4);
        assert_eq!(fields.len(), 15);
        let primitives = fields.iter().filter(|f| f.ty != "OfferValidator[]").count();
        assert_eq!(primitives, 14);
        assert_eq!(fields.last().unwrap().name, "validators");
    }

    #[test]
    fn v5_drops_signer_and_liquidation_flag() {
        let names: Vec<String> = loan_offer_fields(ProtocolVersion::V5_1)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names.len(), 13);
        assert!(!names.contains(&"signer".to_string()));
        assert!(!names.contains(&"requiresLiquidation".to_string()));
    }

    #[test]
    fn renegotiation_type_strings() {
        let v4 = encode_type(&renegotiation_types(ProtocolVersion::V4), RENEGOTIATION_OFFER_TYPE)
            .unwrap();
        assert_eq!(
            v4,
            "RenegotiationOffer(uint256 renegotiationId,uint256 loanId,address lender,uint256 fee,\
             address signer,uint256[] targetPrincipal,uint256 principalAmount,uint256 aprBps,\
             uint256 expirationTime,uint256 duration,bool strictImprovement)"
        );
        assert_eq!(renegotiation_fields(ProtocolVersion::V5).len(), 9);
    }

    #[test]
    fn loan_offer_type_string_appends_validator() {
        let encoded =
            encode_type(&loan_offer_types(ProtocolVersion::V5), LOAN_OFFER_TYPE).unwrap();
        assert!(encoded.ends_with(")OfferValidator(address validator,bytes arguments)"));
        assert!(encoded.starts_with("LoanOffer(uint256 offerId,address lender,uint256 fee,"));
    }
}
