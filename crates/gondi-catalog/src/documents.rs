//! GraphQL documents sent to the catalog

macro_rules! offer_fields {
    () => {
        r#"
fragment OfferFields on Offer {
  id
  offerId
  offerHash
  signature
  lenderAddress
  signerAddress
  borrowerAddress
  contractAddress
  principalAddress
  principalAmount
  aprBps
  fee
  capacity
  expirationTime
  duration
  requiresLiquidation
  offerValidators {
    validator
    arguments
  }
  nftCollateralAddress: collateralAddress
  nftCollateralTokenId: collateralTokenId
}
"#
    };
}

/// A named operation; the name is also sent as the `operation` query param
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document {
    pub name: &'static str,
    pub text: &'static str,
}

pub const GENERATE_SINGLE_NFT_OFFER_HASH: Document = Document {
    name: "generateSingleNftOfferHash",
    text: r#"
mutation generateSingleNftOfferHash($offerInput: SingleNftOfferInput!) {
  offer: generateSingleNftOfferHash(offerInput: $offerInput) {
    offerId
    offerHash
    lenderAddress
    signerAddress
    borrowerAddress
    validators {
      validator
      arguments
    }
    nft {
      tokenId
      collection {
        contractData {
          contractAddress
        }
      }
    }
  }
}
"#,
};

pub const GENERATE_COLLECTION_OFFER_HASH: Document = Document {
    name: "generateCollectionOfferHash",
    text: r#"
mutation generateCollectionOfferHash($offerInput: CollectionOfferInput!) {
  offer: generateCollectionOfferHash(offerInput: $offerInput) {
    offerId
    offerHash
    lenderAddress
    signerAddress
    borrowerAddress
    validators {
      validator
      arguments
    }
    collection {
      contractData {
        contractAddress
      }
    }
  }
}
"#,
};

pub const GENERATE_RENEGOTIATION_OFFER_HASH: Document = Document {
    name: "generateRenegotiationOfferHash",
    text: r#"
mutation generateRenegotiationOfferHash($renegotiationInput: RenegotiationInput!) {
  offer: generateRenegotiationOfferHash(renegotiationInput: $renegotiationInput) {
    renegotiationId
    offerHash
    loanId
    lenderAddress
    signerAddress
  }
}
"#,
};

pub const SAVE_SINGLE_NFT_OFFER: Document = Document {
    name: "saveSingleNftOffer",
    text: concat!(
        r#"
mutation saveSingleNftOffer($offerInput: SignedSingleNftOfferInput!) {
  offer: saveSignedSingleNftOffer(offerInput: $offerInput) {
    ...OfferFields
  }
}
"#,
        offer_fields!()
    ),
};

pub const SAVE_COLLECTION_OFFER: Document = Document {
    name: "saveCollectionOffer",
    text: concat!(
        r#"
mutation saveCollectionOffer($offerInput: SignedCollectionOfferInput!) {
  offer: saveSignedCollectionOffer(offerInput: $offerInput) {
    ...OfferFields
  }
}
"#,
        offer_fields!()
    ),
};

pub const SAVE_RENEGOTIATION_OFFER: Document = Document {
    name: "saveRefinanceOffer",
    text: r#"
mutation saveRefinanceOffer($offer: SignedRenegotiationInput!) {
  saveSignedRenegotiationOffer(offerInput: $offer) {
    id
  }
}
"#,
};

pub const HIDE_OFFER: Document = Document {
    name: "hideOffer",
    text: r#"
mutation hideOffer($contract: Address!, $id: String!) {
  hideOffer(contractAddress: $contract, offerId: $id) {
    id
  }
}
"#,
};

pub const HIDE_RENEGOTIATION_OFFER: Document = Document {
    name: "hideRenegotiationOffer",
    text: r#"
mutation hideRenegotiationOffer($id: String!) {
  hideRenegotiation(renegotiationId: $id) {
    id
  }
}
"#,
};

pub const LIST_OFFERS: Document = Document {
    name: "listOffers",
    text: concat!(
        r#"
query listOffers(
  $first: Int!
  $after: String
  $statuses: [OfferStatus!]
  $lenderAddress: Address
  $collectionIds: [Int!]
  $orderBy: OffersSortInput
) {
  result: listOffers(
    first: $first
    after: $after
    filterBy: { statuses: $statuses, lenderAddress: $lenderAddress, collections: $collectionIds }
    orderBy: $orderBy
  ) {
    pageInfo {
      endCursor
      hasNextPage
    }
    edges {
      node {
        ...OfferFields
      }
    }
  }
}
"#,
        offer_fields!()
    ),
};
