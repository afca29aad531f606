//! Remote catalog seam

use async_trait::async_trait;
use gondi_types::{
    Address, CollateralKind, CompositeId, HydratedOffer, HydratedRenegotiation, ListOffersQuery,
    Offer, OfferDraft, OfferPage, RenegotiationDraft, RenegotiationOffer, Result, U256,
};

/// Off-chain store of signed offers.
///
/// The catalog computes the fields a signature depends on (offer id, offer
/// hash, resolved collateral) and keeps copies of signed offers so that
/// borrowers can find them.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Offer id, hash and resolved collateral for a loan offer draft
    async fn resolve_offer_hash(&self, kind: CollateralKind, draft: &OfferDraft) -> Result<HydratedOffer>;

    /// Persist a signed loan offer; returns the stored record
    async fn persist_signed_offer(&self, kind: CollateralKind, offer: &Offer) -> Result<Offer>;

    /// Renegotiation id, hash and on-chain loan id for a renegotiation draft
    async fn resolve_renegotiation_hash(&self, draft: &RenegotiationDraft) -> Result<HydratedRenegotiation>;

    /// Persist a signed renegotiation offer
    async fn persist_renegotiation_offer(&self, offer: &RenegotiationOffer) -> Result<()>;

    /// Hide an offer from listings. The on-chain offer stays valid.
    async fn hide_offer(&self, contract: Address, offer_id: U256) -> Result<()>;

    /// Hide a renegotiation offer from listings
    async fn hide_renegotiation_offer(&self, id: &CompositeId) -> Result<()>;

    async fn list_offers(&self, query: &ListOffersQuery) -> Result<OfferPage>;
}
