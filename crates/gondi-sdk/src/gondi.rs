//! The Gondi facade
//!
//! [`Gondi`] composes the typed-message builder, the remote catalog, the
//! signer and the operation submitter into one method per protocol action.
//! Offer creation resolves and signs locally, then persists through the
//! catalog. On-chain actions return a [`PendingOperation`] as soon as the
//! call is accepted; confirm it with [`Gondi::wait`].

use crate::actions::*;
use crate::config::GondiConfig;
use crate::lockup;
use crate::protocol::{self, MultiSourceLoan};
use gondi_catalog::{GraphqlCatalog, RemoteCatalog};
use gondi_ledger::{
    CallDescriptor, Confirm, Confirmed, EventCorrelator, LedgerClient, OperationSubmitter,
    PendingOperation, TransactionMetadata,
};
use gondi_signing::{LoanOfferMessage, RenegotiationMessage, Signer};
use gondi_types::{
    decode_local_id, Address, CollateralKind, CollectionOfferInput, CompositeId, DelegationInput,
    Deployments, EmitLoanInput, GondiError, ListOffersQuery, Loan, Offer, OfferDraft, OfferPage,
    OfferValidator, RenegotiationDraft, RenegotiationInput, RenegotiationOffer, Result,
    SingleNftOfferInput, B256, U256,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Client for the Gondi lending protocol
#[derive(Clone)]
pub struct Gondi {
    chain_id: u64,
    deployments: Deployments,
    protocol: Arc<dyn MultiSourceLoan>,
    signer: Arc<dyn Signer>,
    catalog: Arc<dyn RemoteCatalog>,
    submitter: OperationSubmitter,
}

/// Builder for [`Gondi`]
#[derive(Default)]
pub struct GondiBuilder {
    ledger: Option<Arc<dyn LedgerClient>>,
    signer: Option<Arc<dyn Signer>>,
    catalog: Option<Arc<dyn RemoteCatalog>>,
    deployments: Option<Deployments>,
    multi_source_loan: Option<Address>,
}

impl GondiBuilder {
    pub fn ledger(mut self, ledger: Arc<dyn LedgerClient>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn catalog(mut self, catalog: Arc<dyn RemoteCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Deployment table; derived from the ledger's chain id when unset
    pub fn deployments(mut self, deployments: Deployments) -> Self {
        self.deployments = Some(deployments);
        self
    }

    /// MultiSourceLoan to act on; the newest deployment when unset
    pub fn multi_source_loan(mut self, address: Address) -> Self {
        self.multi_source_loan = Some(address);
        self
    }

    pub fn build(self) -> Result<Gondi> {
        let ledger = self
            .ledger
            .ok_or_else(|| GondiError::Config("a ledger client is required".to_string()))?;
        let signer = self
            .signer
            .ok_or_else(|| GondiError::Config("a signer is required".to_string()))?;
        let catalog = self
            .catalog
            .ok_or_else(|| GondiError::Config("a remote catalog is required".to_string()))?;

        let chain_id = ledger.chain_id();
        let deployments = self
            .deployments
            .unwrap_or_else(|| Deployments::for_chain(chain_id));
        let address = self
            .multi_source_loan
            .unwrap_or_else(|| deployments.multi_source_loan(gondi_types::ProtocolVersion::V5_1));
        let protocol = protocol::for_address(chain_id, address, &deployments)?;

        info!(
            chain_id,
            contract = %address,
            version = %protocol.version(),
            "gondi client ready"
        );

        Ok(Gondi {
            chain_id,
            deployments,
            protocol,
            signer,
            catalog,
            submitter: OperationSubmitter::new(ledger),
        })
    }
}

impl Gondi {
    pub fn builder() -> GondiBuilder {
        GondiBuilder::default()
    }

    /// Client backed by the GraphQL catalog described in `config`
    pub fn from_config(
        config: &GondiConfig,
        ledger: Arc<dyn LedgerClient>,
        signer: Arc<dyn Signer>,
    ) -> Result<Self> {
        if ledger.chain_id() != config.chain_id {
            return Err(GondiError::Config(format!(
                "ledger is on chain {} but chain {} is configured",
                ledger.chain_id(),
                config.chain_id
            )));
        }
        let catalog = GraphqlCatalog::new(config.catalog.clone())?;
        Self::builder()
            .ledger(ledger)
            .signer(signer)
            .catalog(Arc::new(catalog))
            .deployments(config.deployments())
            .multi_source_loan(config.verifying_contract())
            .build()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn deployments(&self) -> &Deployments {
        &self.deployments
    }

    pub fn protocol(&self) -> &Arc<dyn MultiSourceLoan> {
        &self.protocol
    }

    /// Address of the connected wallet
    pub fn wallet(&self) -> Address {
        self.signer.address()
    }

    /// Variant for `contract`, or the configured one
    fn protocol_at(&self, contract: Option<Address>) -> Result<Arc<dyn MultiSourceLoan>> {
        match contract {
            Some(contract) if contract != self.protocol.address() => {
                protocol::for_address(self.chain_id, contract, &self.deployments)
            }
            _ => Ok(self.protocol.clone()),
        }
    }

    async fn submit<C: Confirm>(&self, call: CallDescriptor, confirm: C) -> Result<PendingOperation<C>> {
        self.submitter.submit(call, confirm).await
    }

    // ========================================================================
    // Offers
    // ========================================================================

    /// Sign and publish an offer on one NFT
    pub async fn make_single_nft_offer(&self, input: SingleNftOfferInput) -> Result<Offer> {
        let wallet = self.wallet();
        let draft = OfferDraft {
            lender_address: wallet,
            signer_address: wallet,
            borrower_address: input.borrower_address.unwrap_or(Address::ZERO),
            contract_address: self.protocol.address(),
            offer_validators: vec![],
            nft_id: Some(input.nft_id),
            collection_id: None,
            terms: input.terms,
        };
        self.make_offer(CollateralKind::Nft, draft).await
    }

    /// Sign and publish an offer on any NFT of a collection
    pub async fn make_collection_offer(&self, input: CollectionOfferInput) -> Result<Offer> {
        let wallet = self.wallet();
        let draft = OfferDraft {
            lender_address: wallet,
            signer_address: wallet,
            borrower_address: input.borrower_address.unwrap_or(Address::ZERO),
            contract_address: self.protocol.address(),
            offer_validators: vec![OfferValidator::placeholder()],
            nft_id: None,
            collection_id: Some(input.collection_id),
            terms: input.terms,
        };
        self.make_offer(CollateralKind::Collection, draft).await
    }

    async fn make_offer(&self, kind: CollateralKind, draft: OfferDraft) -> Result<Offer> {
        let hydrated = self.catalog.resolve_offer_hash(kind, &draft).await?;
        let message = LoanOfferMessage::from_catalog(&draft, &hydrated, kind)?;
        let typed_data = self.protocol.offer_message(&message)?;
        let signature = self.signer.sign_typed_data(&typed_data).await?;
        debug!(kind = %kind, offer_id = %hydrated.offer_id, "offer signed");

        let signed = Offer {
            id: None,
            offer_id: hydrated.offer_id,
            offer_hash: hydrated.offer_hash.unwrap_or_default(),
            signature,
            lender_address: message.lender,
            signer_address: message.signer,
            borrower_address: message.borrower,
            contract_address: draft.contract_address,
            nft_collateral_address: message.nft_collateral_address,
            nft_collateral_token_id: message.nft_collateral_token_id,
            offer_validators: hydrated.validators,
            nft_id: draft.nft_id,
            collection_id: draft.collection_id,
            terms: draft.terms,
        };
        let persisted = self.catalog.persist_signed_offer(kind, &signed).await?;
        info!(kind = %kind, id = %persisted.composite_id(), "offer published");
        Ok(persisted)
    }

    /// Create a refinance offer on an existing loan.
    ///
    /// With `skip_signature` the hashed offer is returned unsigned and is not
    /// persisted.
    pub async fn make_refinance_offer(
        &self,
        input: RenegotiationInput,
        skip_signature: bool,
    ) -> Result<RenegotiationOffer> {
        CompositeId::parse(&input.loan_id)?;

        let wallet = self.wallet();
        let draft = RenegotiationDraft {
            lender_address: wallet,
            signer_address: wallet,
            input,
        };
        let hydrated = self.catalog.resolve_renegotiation_hash(&draft).await?;
        let terms = &draft.input;
        let mut offer = RenegotiationOffer {
            id: None,
            renegotiation_id: hydrated.renegotiation_id,
            loan_id: hydrated.loan_id,
            lender_address: draft.lender_address,
            signer_address: draft.signer_address,
            fee_amount: terms.fee_amount,
            principal_amount: terms.principal_amount,
            target_principal: vec![terms.principal_amount],
            apr_bps: terms.apr_bps,
            expiration_time: terms.expiration_time,
            duration: terms.duration,
            strict_improvement: terms.strict_improvement,
            offer_hash: hydrated.offer_hash.unwrap_or_default(),
            signature: None,
        };
        if skip_signature {
            return Ok(offer);
        }

        let message = RenegotiationMessage::from_catalog(&draft, &hydrated);
        let typed_data = self.protocol.renegotiation_message(&message)?;
        offer.signature = Some(self.signer.sign_typed_data(&typed_data).await?);
        self.catalog.persist_renegotiation_offer(&offer).await?;
        info!(renegotiation_id = %offer.renegotiation_id, "refinance offer published");
        Ok(offer)
    }

    /// Cancel one offer. `id` is a composite id or a bare offer id.
    pub async fn cancel_offer(&self, id: &str) -> Result<PendingOperation<CancelOfferConfirm>> {
        let (contract, offer_id) = target(id)?;
        let protocol = self.protocol_at(contract)?;
        let call = protocol.cancel_offer(self.wallet(), offer_id);
        self.submit(call, CancelOfferConfirm { correlator: protocol.correlator() })
            .await
    }

    /// Cancel every offer with an id below `min_id`
    pub async fn cancel_all_offers(&self, min_id: U256) -> Result<PendingOperation<CancelAllOffersConfirm>> {
        let call = self.protocol.cancel_all_offers(self.wallet(), min_id);
        self.submit(call, CancelAllOffersConfirm { correlator: self.protocol.correlator() })
            .await
    }

    pub async fn cancel_refinance_offer(&self, id: &str) -> Result<PendingOperation<CancelRenegotiationConfirm>> {
        let (contract, renegotiation_id) = target(id)?;
        let protocol = self.protocol_at(contract)?;
        let call = protocol.cancel_renegotiation_offer(self.wallet(), renegotiation_id);
        self.submit(call, CancelRenegotiationConfirm { correlator: protocol.correlator() })
            .await
    }

    pub async fn cancel_all_renegotiations(
        &self,
        min_id: U256,
    ) -> Result<PendingOperation<CancelAllRenegotiationsConfirm>> {
        let call = self.protocol.cancel_all_renegotiation_offers(self.wallet(), min_id);
        self.submit(call, CancelAllRenegotiationsConfirm { correlator: self.protocol.correlator() })
            .await
    }

    /// Hide an offer from catalog listings; nothing is sent on-chain
    pub async fn hide_offer(&self, id: &str) -> Result<()> {
        let id = CompositeId::parse(id)?;
        self.catalog.hide_offer(id.contract(), id.local_id()).await
    }

    pub async fn hide_renegotiation_offer(&self, id: &str) -> Result<()> {
        let id = CompositeId::parse(id)?;
        self.catalog.hide_renegotiation_offer(&id).await
    }

    pub async fn list_offers(&self, query: &ListOffersQuery) -> Result<OfferPage> {
        self.catalog.list_offers(query).await
    }

    // ========================================================================
    // Loans
    // ========================================================================

    /// Borrow against a signed offer
    pub async fn emit_loan(&self, input: &EmitLoanInput) -> Result<PendingOperation<EmitLoanConfirm>> {
        let protocol = self.protocol_at(Some(input.offer.contract_address))?;
        let call = protocol.emit_loan(self.wallet(), input)?;
        let confirm = EmitLoanConfirm {
            correlator: protocol.correlator(),
            lender: input.offer.lender_address,
        };
        self.submit(call, confirm).await
    }

    /// Revoke delegations on the collateral, then borrow against it, in one
    /// multicall
    pub async fn revoke_delegations_and_emit_loan(
        &self,
        delegations: &[Address],
        input: &EmitLoanInput,
    ) -> Result<PendingOperation<RevokeAndEmitConfirm>> {
        require_batch(delegations)?;
        let protocol = self.protocol_at(Some(input.offer.contract_address))?;

        let mut calls = delegations
            .iter()
            .map(|delegate| {
                protocol.revoke_delegate(*delegate, input.offer.nft_collateral_address, input.token_id)
            })
            .collect::<Result<Vec<_>>>()?;
        calls.push(protocol.emit_loan(self.wallet(), input)?);

        let call = protocol.multicall(calls)?;
        let confirm = RevokeAndEmitConfirm {
            correlator: protocol.correlator(),
            revocations: delegations.len(),
        };
        self.submit(call, confirm).await
    }

    /// Repay a loan; the collateral goes to `receiver`, or the wallet
    pub async fn repay_loan(
        &self,
        loan_id: U256,
        loan: &Loan,
        receiver: Option<Address>,
    ) -> Result<PendingOperation<RepayLoanConfirm>> {
        let receiver = receiver.unwrap_or_else(|| self.wallet());
        let call = self.protocol.repay_loan(receiver, loan_id, loan)?;
        self.submit(call, RepayLoanConfirm { correlator: self.protocol.correlator() })
            .await
    }

    /// Refinance a whole loan with a signed renegotiation offer
    pub async fn refinance_full_loan(
        &self,
        offer: &RenegotiationOffer,
        loan: &Loan,
    ) -> Result<PendingOperation<RefinanceConfirm>> {
        let call = self.protocol.refinance_full(offer, loan)?;
        let confirm = RefinanceConfirm {
            correlator: self.protocol.correlator(),
            lender: offer.lender_address,
        };
        self.submit(call, confirm).await
    }

    /// Refinance part of a loan as the new lender
    pub async fn refinance_partial_loan(
        &self,
        offer: &RenegotiationOffer,
        loan: &Loan,
    ) -> Result<PendingOperation<RefinanceConfirm>> {
        let call = self.protocol.refinance_partial(offer, loan)?;
        let confirm = RefinanceConfirm {
            correlator: self.protocol.correlator(),
            lender: offer.lender_address,
        };
        self.submit(call, confirm).await
    }

    /// Extend a loan to `new_duration` seconds
    pub async fn extend_loan(
        &self,
        loan_id: U256,
        loan: &Loan,
        new_duration: U256,
    ) -> Result<PendingOperation<ExtendLoanConfirm>> {
        let call = self.protocol.extend_loan(loan_id, loan, new_duration)?;
        self.submit(call, ExtendLoanConfirm { correlator: self.protocol.correlator() })
            .await
    }

    pub async fn liquidate_loan(&self, loan_id: U256, loan: &Loan) -> Result<PendingOperation<LiquidateConfirm>> {
        let call = self.protocol.liquidate_loan(loan_id, loan)?;
        self.submit(call, LiquidateConfirm { correlator: self.protocol.correlator() })
            .await
    }

    /// Seconds until the newest tranche of `loan` can be refinanced
    pub async fn remaining_lockup_seconds(&self, loan: &Loan) -> Result<u64> {
        let bps = self
            .protocol
            .min_lock_period_bps(self.submitter.ledger().as_ref())
            .await?;
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
        lockup::remaining_lockup_seconds(loan, bps, now)
    }

    // ========================================================================
    // Delegation
    // ========================================================================

    pub async fn delegate(&self, input: &DelegationInput) -> Result<PendingOperation<DelegateConfirm>> {
        let call = self.protocol.delegate(input)?;
        self.submit(call, DelegateConfirm { correlator: self.protocol.correlator() })
            .await
    }

    /// Several delegations in one multicall
    pub async fn delegate_multicall(
        &self,
        inputs: &[DelegationInput],
    ) -> Result<PendingOperation<DelegateBatchConfirm>> {
        require_batch(inputs)?;
        let calls = inputs
            .iter()
            .map(|input| self.protocol.delegate(input))
            .collect::<Result<Vec<_>>>()?;
        let call = self.protocol.multicall(calls)?;
        let confirm = DelegateBatchConfirm {
            correlator: self.protocol.correlator(),
            loan_ids: inputs.iter().map(|input| input.loan_id).collect(),
        };
        self.submit(call, confirm).await
    }

    pub async fn revoke_delegate(
        &self,
        to: Address,
        collection: Address,
        token_id: U256,
    ) -> Result<PendingOperation<RevokeDelegateConfirm>> {
        let call = self.protocol.revoke_delegate(to, collection, token_id)?;
        self.submit(call, RevokeDelegateConfirm { correlator: self.protocol.correlator() })
            .await
    }

    // ========================================================================
    // Approvals
    // ========================================================================

    /// Let the MultiSourceLoan move every NFT of `collection`
    pub async fn approve_nft_for_all(&self, collection: Address) -> Result<PendingOperation<NftApprovalConfirm>> {
        let call = CallDescriptor::new(
            collection,
            "setApprovalForAll",
            vec![json!(self.protocol.address()), json!(true)],
        );
        self.submit(call, NftApprovalConfirm { correlator: EventCorrelator::new(collection) })
            .await
    }

    /// Let the MultiSourceLoan spend `amount` of `token`, unlimited by default
    pub async fn approve_token(
        &self,
        token: Address,
        amount: Option<U256>,
    ) -> Result<PendingOperation<TokenApprovalConfirm>> {
        let amount = amount.unwrap_or(U256::MAX);
        let call = CallDescriptor::new(
            token,
            "approve",
            vec![json!(self.protocol.address()), json!(amount.to_string())],
        );
        self.submit(call, TokenApprovalConfirm { correlator: EventCorrelator::new(token) })
            .await
    }

    // ========================================================================
    // Pending operations
    // ========================================================================

    /// Wait for inclusion and correlate the action's events
    pub async fn wait<C: Confirm>(&self, pending: &PendingOperation<C>) -> Result<Confirmed<C::Output>> {
        self.submitter.wait(pending).await
    }

    pub async fn transaction(&self, submission_id: B256) -> Result<TransactionMetadata> {
        self.submitter.transaction(submission_id).await
    }
}

impl std::fmt::Debug for Gondi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gondi")
            .field("chain_id", &self.chain_id)
            .field("protocol", &self.protocol)
            .field("wallet", &self.signer.address())
            .finish()
    }
}

/// Contract (when qualified) and local id of an offer reference
fn target(id: &str) -> Result<(Option<Address>, U256)> {
    if id.contains('.') {
        let id = CompositeId::parse(id)?;
        return Ok((Some(id.contract()), id.local_id()));
    }
    Ok((None, decode_local_id(id)?))
}
