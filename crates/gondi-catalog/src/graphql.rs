//! GraphQL catalog client over HTTP

use crate::catalog::RemoteCatalog;
use crate::config::CatalogConfig;
use crate::documents::{self, Document};
use async_trait::async_trait;
use gondi_types::serde_helpers::u256_dec;
use gondi_types::{
    Address, CollateralKind, CompositeId, GondiError, HydratedOffer, HydratedRenegotiation,
    ListOffersQuery, Offer, OfferDraft, OfferPage, OfferValidator, RenegotiationDraft,
    RenegotiationOffer, Result, B256, U256,
};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlRequest<'a, V> {
    query: &'a str,
    variables: V,
    operation_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

impl<T> GraphqlResponse<T> {
    fn into_result(self, operation: &str) -> Result<T> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(GondiError::catalog(
                Some(200),
                format!("{operation}: {}", messages.join("; ")),
            ));
        }
        self.data
            .ok_or_else(|| GondiError::catalog(Some(200), format!("{operation}: empty response")))
    }
}

#[derive(Debug, Deserialize)]
struct OfferEnvelope<T> {
    offer: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContractData {
    contract_address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionRef {
    contract_data: Option<ContractData>,
}

impl CollectionRef {
    fn contract_address(&self) -> Option<Address> {
        self.contract_data.as_ref().and_then(|d| d.contract_address)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NftRef {
    #[serde(default, with = "gondi_types::serde_helpers::u256_dec_opt")]
    token_id: Option<U256>,
    collection: Option<CollectionRef>,
}

/// `generate*OfferHash` payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HashedOffer {
    #[serde(with = "u256_dec")]
    offer_id: U256,
    offer_hash: Option<B256>,
    lender_address: Option<Address>,
    signer_address: Option<Address>,
    borrower_address: Option<Address>,
    #[serde(default)]
    validators: Vec<OfferValidator>,
    nft: Option<NftRef>,
    collection: Option<CollectionRef>,
}

impl HashedOffer {
    fn into_hydrated(self) -> HydratedOffer {
        let (collateral_address, collateral_token_id) = match (&self.nft, &self.collection) {
            (Some(nft), _) => (
                nft.collection.as_ref().and_then(CollectionRef::contract_address),
                nft.token_id,
            ),
            (None, Some(collection)) => (collection.contract_address(), None),
            (None, None) => (None, None),
        };
        HydratedOffer {
            offer_id: self.offer_id,
            offer_hash: self.offer_hash,
            lender_address: self.lender_address,
            signer_address: self.signer_address,
            borrower_address: self.borrower_address,
            validators: self.validators,
            collateral_address,
            collateral_token_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
struct Edge {
    node: Offer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferConnection {
    page_info: PageInfo,
    edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct ListOffersData {
    result: OfferConnection,
}

impl From<OfferConnection> for OfferPage {
    fn from(connection: OfferConnection) -> Self {
        OfferPage {
            offers: connection.edges.into_iter().map(|e| e.node).collect(),
            cursor: connection.page_info.end_cursor,
            has_next_page: connection.page_info.has_next_page,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// [`RemoteCatalog`] backed by the Gondi GraphQL API
#[derive(Debug, Clone)]
pub struct GraphqlCatalog {
    config: Arc<CatalogConfig>,
    client: Client,
}

impl GraphqlCatalog {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        Url::parse(&config.endpoint)
            .map_err(|e| GondiError::Config(format!("catalog endpoint {:?}: {e}", config.endpoint)))?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GondiError::Config(e.to_string()))?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// `<endpoint>?operation=<name>`
    pub fn operation_url(&self, operation: &str) -> Result<Url> {
        operation_url(&self.config.endpoint, operation)
    }

    async fn execute<V, T>(&self, document: Document, variables: V) -> Result<T>
    where
        V: Serialize + Send,
        T: DeserializeOwned + Send,
    {
        let url = self.operation_url(document.name)?;
        let body = GraphqlRequest {
            query: document.text,
            variables,
            operation_name: document.name,
        };

        let mut request = self.client.post(url).json(&body);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        debug!(operation = document.name, "catalog request");
        let resp = request.send().await.map_err(transport_error)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            warn!(operation = document.name, status, "catalog request failed");
            return Err(GondiError::catalog(Some(status), message));
        }

        let envelope: GraphqlResponse<T> = resp.json().await.map_err(transport_error)?;
        envelope.into_result(document.name)
    }
}

#[async_trait]
impl RemoteCatalog for GraphqlCatalog {
    async fn resolve_offer_hash(&self, kind: CollateralKind, draft: &OfferDraft) -> Result<HydratedOffer> {
        let document = match kind {
            CollateralKind::Nft => documents::GENERATE_SINGLE_NFT_OFFER_HASH,
            CollateralKind::Collection => documents::GENERATE_COLLECTION_OFFER_HASH,
        };
        let data: OfferEnvelope<HashedOffer> =
            self.execute(document, json!({ "offerInput": draft })).await?;
        Ok(data.offer.into_hydrated())
    }

    async fn persist_signed_offer(&self, kind: CollateralKind, offer: &Offer) -> Result<Offer> {
        let document = match kind {
            CollateralKind::Nft => documents::SAVE_SINGLE_NFT_OFFER,
            CollateralKind::Collection => documents::SAVE_COLLECTION_OFFER,
        };
        let data: OfferEnvelope<Offer> = self.execute(document, json!({ "offerInput": offer })).await?;
        Ok(data.offer)
    }

    async fn resolve_renegotiation_hash(&self, draft: &RenegotiationDraft) -> Result<HydratedRenegotiation> {
        let data: OfferEnvelope<HydratedRenegotiation> = self
            .execute(
                documents::GENERATE_RENEGOTIATION_OFFER_HASH,
                json!({ "renegotiationInput": draft }),
            )
            .await?;
        Ok(data.offer)
    }

    async fn persist_renegotiation_offer(&self, offer: &RenegotiationOffer) -> Result<()> {
        let _: serde_json::Value = self
            .execute(documents::SAVE_RENEGOTIATION_OFFER, json!({ "offer": offer }))
            .await?;
        Ok(())
    }

    async fn hide_offer(&self, contract: Address, offer_id: U256) -> Result<()> {
        let _: serde_json::Value = self
            .execute(
                documents::HIDE_OFFER,
                json!({ "contract": contract, "id": offer_id.to_string() }),
            )
            .await?;
        Ok(())
    }

    async fn hide_renegotiation_offer(&self, id: &CompositeId) -> Result<()> {
        let _: serde_json::Value = self
            .execute(documents::HIDE_RENEGOTIATION_OFFER, json!({ "id": id }))
            .await?;
        Ok(())
    }

    async fn list_offers(&self, query: &ListOffersQuery) -> Result<OfferPage> {
        let data: ListOffersData = self
            .execute(documents::LIST_OFFERS, list_offers_variables(query))
            .await?;
        Ok(data.result.into())
    }
}

fn operation_url(endpoint: &str, operation: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| GondiError::Config(format!("catalog endpoint {endpoint:?}: {e}")))?;
    url.query_pairs_mut().append_pair("operation", operation);
    Ok(url)
}

fn list_offers_variables(query: &ListOffersQuery) -> serde_json::Value {
    let statuses = (!query.statuses.is_empty()).then_some(&query.statuses);
    let collection_ids = (!query.collection_ids.is_empty()).then_some(&query.collection_ids);
    json!({
        "first": query.limit,
        "after": query.cursor,
        "statuses": statuses,
        "lenderAddress": query.lender_address,
        "collectionIds": collection_ids,
        "orderBy": { "field": query.sort_field, "order": query.sort_order },
    })
}

fn transport_error(err: reqwest::Error) -> GondiError {
    GondiError::catalog(err.status().map(|s| s.as_u16()), err.to_string())
}
