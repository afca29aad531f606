//! Test doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use gondi_sdk::{
    Address, Bytes, CollateralKind, CompositeId, Deployments, Gondi, GondiError, HydratedOffer,
    HydratedRenegotiation, ListOffersQuery, Loan, LoanSource, Offer, OfferDraft, OfferPage,
    ProtocolVersion, RemoteCatalog, RenegotiationDraft, RenegotiationOffer, Result,
    ScriptedLedger, Signer, TypedData, B256, U256,
};
use std::sync::{Arc, Mutex};

pub const CHAIN_ID: u64 = 1;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn wallet() -> Address {
    Address::repeat_byte(0x1e)
}

pub fn collection() -> Address {
    Address::repeat_byte(0xc0)
}

pub fn msl(version: ProtocolVersion) -> Address {
    Deployments::mainnet().multi_source_loan(version)
}

// ============================================================================
// Signer
// ============================================================================

/// Signs with a fixed signature and keeps every request
#[derive(Default)]
pub struct RecordingSigner {
    pub requests: Mutex<Vec<TypedData>>,
    refusal: Mutex<Option<String>>,
}

impl RecordingSigner {
    pub fn requests(&self) -> Vec<TypedData> {
        self.requests.lock().unwrap().clone()
    }

    /// Refuse every following request with `reason`
    pub fn refuse(&self, reason: &str) {
        *self.refusal.lock().unwrap() = Some(reason.to_string());
    }
}

#[async_trait]
impl Signer for RecordingSigner {
    fn address(&self) -> Address {
        wallet()
    }

    async fn sign_typed_data(&self, data: &TypedData) -> Result<Bytes> {
        self.requests.lock().unwrap().push(data.clone());
        if let Some(reason) = self.refusal.lock().unwrap().clone() {
            return Err(GondiError::signing(reason));
        }
        Ok(Bytes::from(vec![0x5a; 65]))
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Catalog answering with a preset hydration and storing what it is sent
pub struct MemoryCatalog {
    pub hydrated: Mutex<HydratedOffer>,
    pub drafts: Mutex<Vec<OfferDraft>>,
    pub offers: Mutex<Vec<Offer>>,
    pub renegotiations: Mutex<Vec<RenegotiationOffer>>,
    pub hidden: Mutex<Vec<String>>,
}

impl MemoryCatalog {
    pub fn new(hydrated: HydratedOffer) -> Self {
        Self {
            hydrated: Mutex::new(hydrated),
            drafts: Mutex::new(vec![]),
            offers: Mutex::new(vec![]),
            renegotiations: Mutex::new(vec![]),
            hidden: Mutex::new(vec![]),
        }
    }
}

/// Single NFT hydration: offer 42, hash 0xdead.., token 7 of `collection()`
pub fn hydrated_nft_offer() -> HydratedOffer {
    let mut hash = [0u8; 32];
    hash[0] = 0xde;
    hash[1] = 0xad;
    HydratedOffer {
        offer_id: U256::from(42u64),
        offer_hash: Some(B256::from(hash)),
        lender_address: Some(wallet()),
        signer_address: Some(wallet()),
        borrower_address: None,
        validators: vec![],
        collateral_address: Some(collection()),
        collateral_token_id: Some(U256::from(7u64)),
    }
}

#[async_trait]
impl RemoteCatalog for MemoryCatalog {
    async fn resolve_offer_hash(&self, _kind: CollateralKind, draft: &OfferDraft) -> Result<HydratedOffer> {
        self.drafts.lock().unwrap().push(draft.clone());
        Ok(self.hydrated.lock().unwrap().clone())
    }

    async fn persist_signed_offer(&self, _kind: CollateralKind, offer: &Offer) -> Result<Offer> {
        let mut stored = offer.clone();
        stored.id = Some(offer.composite_id());
        self.offers.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn resolve_renegotiation_hash(&self, _draft: &RenegotiationDraft) -> Result<HydratedRenegotiation> {
        Ok(HydratedRenegotiation {
            renegotiation_id: U256::from(3u64),
            loan_id: U256::from(11u64),
            offer_hash: Some(B256::repeat_byte(0xbe)),
            lender_address: Some(wallet()),
            signer_address: Some(wallet()),
        })
    }

    async fn persist_renegotiation_offer(&self, offer: &RenegotiationOffer) -> Result<()> {
        self.renegotiations.lock().unwrap().push(offer.clone());
        Ok(())
    }

    async fn hide_offer(&self, contract: Address, offer_id: U256) -> Result<()> {
        self.hidden
            .lock()
            .unwrap()
            .push(format!("{}.{offer_id}", gondi_sdk::lower_hex(&contract)));
        Ok(())
    }

    async fn hide_renegotiation_offer(&self, id: &CompositeId) -> Result<()> {
        self.hidden.lock().unwrap().push(id.to_string());
        Ok(())
    }

    async fn list_offers(&self, _query: &ListOffersQuery) -> Result<OfferPage> {
        Err(GondiError::Catalog {
            status: Some(503),
            message: "listing unavailable".to_string(),
        })
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub struct Harness {
    pub gondi: Gondi,
    pub ledger: Arc<ScriptedLedger>,
    pub signer: Arc<RecordingSigner>,
    pub catalog: Arc<MemoryCatalog>,
}

pub fn harness(version: ProtocolVersion) -> Harness {
    harness_with(version, hydrated_nft_offer())
}

pub fn harness_with(version: ProtocolVersion, hydrated: HydratedOffer) -> Harness {
    init_tracing();
    let ledger = Arc::new(ScriptedLedger::new(CHAIN_ID, wallet()));
    let signer = Arc::new(RecordingSigner::default());
    let catalog = Arc::new(MemoryCatalog::new(hydrated));
    let gondi = Gondi::builder()
        .ledger(ledger.clone())
        .signer(signer.clone())
        .catalog(catalog.clone())
        .deployments(Deployments::mainnet())
        .multi_source_loan(msl(version))
        .build()
        .unwrap();
    Harness {
        gondi,
        ledger,
        signer,
        catalog,
    }
}

pub fn loan(start_time: u64) -> Loan {
    Loan {
        borrower: wallet(),
        nft_collateral_token_id: U256::from(7u64),
        nft_collateral_address: collection(),
        principal_address: Address::repeat_byte(0xee),
        principal_amount: U256::from(1_000u64),
        start_time: U256::from(start_time),
        duration: U256::from(30 * gondi_sdk::SECONDS_IN_DAY),
        source: vec![LoanSource {
            loan_id: U256::from(5u64),
            lender: Address::repeat_byte(0x11),
            principal_amount: U256::from(1_000u64),
            accrued_interest: U256::ZERO,
            start_time: U256::from(start_time),
            apr_bps: U256::from(1_500u64),
        }],
        extra: Default::default(),
    }
}

/// A signed renegotiation of loan 11 by `lender`
pub fn renegotiation(lender: Address) -> RenegotiationOffer {
    RenegotiationOffer {
        id: None,
        renegotiation_id: U256::from(3u64),
        loan_id: U256::from(11u64),
        lender_address: lender,
        signer_address: lender,
        fee_amount: U256::ZERO,
        principal_amount: U256::from(1_000u64),
        target_principal: vec![U256::from(1_000u64)],
        apr_bps: U256::from(1_200u64),
        expiration_time: U256::from(1_900_000_000u64),
        duration: U256::from(60 * gondi_sdk::SECONDS_IN_DAY),
        strict_improvement: false,
        offer_hash: B256::repeat_byte(0xbe),
        signature: Some(Bytes::from(vec![0x5a; 65])),
    }
}

pub fn loan_json() -> serde_json::Value {
    serde_json::to_value(loan(1_700_000_000)).unwrap()
}

