//! On-chain actions: submit, wait, correlate

mod common;

use common::*;
use gondi_sdk::{
    BatchEvent, DelegationInput, EmitLoanInput, EventLog, GondiError, Liquidation, Offer,
    OfferTerms, ProtocolVersion, B256, U256,
};
use serde_json::json;

fn signed_offer(version: ProtocolVersion) -> Offer {
    Offer {
        id: None,
        offer_id: U256::from(42u64),
        offer_hash: B256::repeat_byte(0xde),
        signature: vec![0x5a; 65].into(),
        lender_address: gondi_sdk::Address::repeat_byte(0x11),
        signer_address: gondi_sdk::Address::repeat_byte(0x11),
        borrower_address: gondi_sdk::Address::ZERO,
        contract_address: msl(version),
        nft_collateral_address: collection(),
        nft_collateral_token_id: U256::from(7u64),
        offer_validators: vec![],
        nft_id: Some(1234),
        collection_id: None,
        terms: OfferTerms {
            principal_address: gondi_sdk::Address::repeat_byte(0xee),
            principal_amount: U256::from(1_000u64),
            capacity: U256::ZERO,
            fee: U256::ZERO,
            apr_bps: U256::from(1_500u64),
            expiration_time: U256::from(1_900_000_000u64),
            duration: U256::from(30 * gondi_sdk::SECONDS_IN_DAY),
            requires_liquidation: false,
        },
    }
}

fn emit_input(version: ProtocolVersion) -> EmitLoanInput {
    EmitLoanInput {
        offer: signed_offer(version),
        token_id: U256::from(7u64),
        amount: U256::from(1_000u64),
        expiration_time: U256::from(1_900_000_000u64),
    }
}

fn revoked(contract: gondi_sdk::Address, delegate: u8) -> EventLog {
    EventLog::new(
        contract,
        "RevokeDelegate",
        json!({
            "delegate": gondi_sdk::Address::repeat_byte(delegate),
            "collection": collection(),
            "tokenId": "7",
        }),
    )
}

fn emitted(contract: gondi_sdk::Address, loan_id: u64) -> EventLog {
    EventLog::new(
        contract,
        "LoanEmitted",
        json!({ "loanId": loan_id.to_string(), "offerId": ["42"], "loan": loan_json(), "fee": "0" }),
    )
}

#[tokio::test]
async fn revoke_two_delegations_and_emit_one_loan() {
    let h = harness(ProtocolVersion::V5_1);
    let contract = msl(ProtocolVersion::V5_1);
    h.ledger
        .push_logs(vec![revoked(contract, 0xd1), revoked(contract, 0xd2), emitted(contract, 77)])
        .await;

    let delegates = [
        gondi_sdk::Address::repeat_byte(0xd1),
        gondi_sdk::Address::repeat_byte(0xd2),
    ];
    let pending = h
        .gondi
        .revoke_delegations_and_emit_loan(&delegates, &emit_input(ProtocolVersion::V5_1))
        .await
        .unwrap();

    // One multicall with the revocations first
    let subs = pending.call.sub_calls().unwrap();
    let functions: Vec<&str> = subs.iter().map(|c| c.function.as_str()).collect();
    assert_eq!(functions, ["revokeDelegate", "revokeDelegate", "emitLoan"]);

    let confirmed = h.gondi.wait(&pending).await.unwrap();
    let results = &confirmed.result.results;
    assert_eq!(results.len(), 3);
    assert!(matches!(&results[0], BatchEvent::RevokeDelegate(e) if e.delegate == delegates[0]));
    assert!(matches!(&results[1], BatchEvent::RevokeDelegate(e) if e.delegate == delegates[1]));
    assert!(matches!(&results[2], BatchEvent::LoanEmitted(e) if e.loan_id == U256::from(77u64)));

    let loan = &confirmed.result.loan;
    assert_eq!(loan.id.as_str(), format!("{}.77", gondi_sdk::lower_hex(&contract)));
    assert_eq!(confirmed.inclusion.transaction_hash, pending.submission_id);
}

#[tokio::test]
async fn missing_revocation_fails_the_batch() {
    let h = harness(ProtocolVersion::V5_1);
    let contract = msl(ProtocolVersion::V5_1);
    h.ledger
        .push_logs(vec![revoked(contract, 0xd1), emitted(contract, 77)])
        .await;

    let delegates = [
        gondi_sdk::Address::repeat_byte(0xd1),
        gondi_sdk::Address::repeat_byte(0xd2),
    ];
    let pending = h
        .gondi
        .revoke_delegations_and_emit_loan(&delegates, &emit_input(ProtocolVersion::V5_1))
        .await
        .unwrap();
    let err = h.gondi.wait(&pending).await.unwrap_err();
    assert_eq!(err.to_string(), "Revoke delegations failed");
    assert!(matches!(err, GondiError::ConfirmationMismatch { found: 1, .. }));
}

#[tokio::test]
async fn empty_delegation_batch_is_rejected_before_submission() {
    let h = harness(ProtocolVersion::V5_1);
    let err = h
        .gondi
        .revoke_delegations_and_emit_loan(&[], &emit_input(ProtocolVersion::V5_1))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "At least one delegation must be revoked");

    let err = h.gondi.delegate_multicall(&[]).await.unwrap_err();
    assert_eq!(err.error_code(), "EMPTY_BATCH");
    assert!(h.ledger.submitted().await.is_empty());
}

#[tokio::test]
async fn malformed_id_never_reaches_the_ledger() {
    let h = harness(ProtocolVersion::V5_1);
    for bad in ["", "abc", "0xabc.1", "0x1111111111111111111111111111111111111111.-1"] {
        let err = h.gondi.cancel_offer(bad).await.unwrap_err();
        assert!(
            matches!(err, GondiError::InvalidCompositeId { .. }),
            "{bad}: {err}"
        );
    }
    assert!(h.ledger.submitted().await.is_empty());
}

#[tokio::test]
async fn cancel_offer_on_another_deployment_uses_its_call_shape() {
    let h = harness(ProtocolVersion::V5_1);
    let v4 = msl(ProtocolVersion::V4);
    h.ledger
        .push_logs(vec![EventLog::new(
            v4,
            "OfferCancelled",
            json!({ "lender": wallet(), "offerId": "42" }),
        )])
        .await;

    let id = format!(
        "{}.{}.42",
        gondi_sdk::lower_hex(&v4),
        gondi_sdk::lower_hex(&wallet())
    );
    let pending = h.gondi.cancel_offer(&id).await.unwrap();
    assert_eq!(pending.contract(), v4);
    assert_eq!(pending.call.args, vec![json!(wallet()), json!("42")]);

    let confirmed = h.gondi.wait(&pending).await.unwrap();
    assert_eq!(confirmed.result.id.as_str(), id);
}

#[tokio::test]
async fn liquidation_accepts_either_outcome() {
    let h = harness(ProtocolVersion::V5_1);
    let contract = msl(ProtocolVersion::V5_1);
    let liquidator = gondi_sdk::Address::repeat_byte(0x99);
    h.ledger
        .push_logs(vec![EventLog::new(
            contract,
            "LoanSentToLiquidator",
            json!({ "loanId": "5", "liquidator": liquidator }),
        )])
        .await;
    h.ledger.push_logs(vec![]).await;

    let pending = h.gondi.liquidate_loan(U256::from(5u64), &loan(0)).await.unwrap();
    let confirmed = h.gondi.wait(&pending).await.unwrap();
    assert_eq!(
        confirmed.result,
        Liquidation::SentToLiquidator {
            loan_id: gondi_sdk::CompositeId::loan(&contract, U256::from(5u64)),
            liquidator,
        }
    );

    let pending = h.gondi.liquidate_loan(U256::from(5u64), &loan(0)).await.unwrap();
    let err = h.gondi.wait(&pending).await.unwrap_err();
    assert_eq!(err.to_string(), "Loan not liquidated");
}

#[tokio::test]
async fn reverted_call_carries_ledger_diagnostics() {
    let h = harness(ProtocolVersion::V5_1);
    h.ledger
        .push_revert(json!({ "error": "InvalidSignatureError()" }))
        .await;

    let pending = h.gondi.emit_loan(&emit_input(ProtocolVersion::V5_1)).await.unwrap();
    let err = h.gondi.wait(&pending).await.unwrap_err();
    match err {
        GondiError::Submission { diagnostics, tx_hash, .. } => {
            assert_eq!(diagnostics, Some(json!({ "error": "InvalidSignatureError()" })));
            assert_eq!(tx_hash, Some(pending.submission_id));
        }
        other => panic!("unexpected error: {other}"),
    }

    // Diagnostics lookup still works for the reverted submission
    let tx = h.gondi.transaction(pending.submission_id).await.unwrap();
    assert_eq!(tx.from, wallet());
}

#[tokio::test]
async fn emitted_loan_is_keyed_by_contract_and_lender() {
    let h = harness(ProtocolVersion::V4);
    let contract = msl(ProtocolVersion::V4);
    h.ledger.push_logs(vec![emitted(contract, 3)]).await;

    let pending = h.gondi.emit_loan(&emit_input(ProtocolVersion::V4)).await.unwrap();
    assert_eq!(pending.call.args.len(), 4);

    let confirmed = h.gondi.wait(&pending).await.unwrap();
    let lender = gondi_sdk::Address::repeat_byte(0x11);
    assert_eq!(
        confirmed.result.offer_ids,
        vec![gondi_sdk::CompositeId::offer(&contract, &lender, U256::from(42u64))]
    );
    assert_eq!(confirmed.result.loan.loan_id, U256::from(3u64));

    // Waiting again yields the same result
    let again = h.gondi.wait(&pending).await.unwrap();
    assert_eq!(again, confirmed);
}

#[tokio::test]
async fn delegation_batch_requires_every_event() {
    let h = harness(ProtocolVersion::V5);
    let contract = msl(ProtocolVersion::V5);
    let delegated = |loan_id: &str| {
        EventLog::new(
            contract,
            "Delegated",
            json!({ "loanId": loan_id, "delegate": wallet(), "value": true }),
        )
    };
    let input = |loan_id: u64| DelegationInput {
        loan_id: U256::from(loan_id),
        loan: loan(0),
        to: wallet(),
        rights: B256::ZERO,
        enable: true,
    };

    h.ledger.push_logs(vec![delegated("1"), delegated("2")]).await;
    h.ledger.push_logs(vec![delegated("1")]).await;

    let batch = [input(1), input(2)];
    let pending = h.gondi.delegate_multicall(&batch).await.unwrap();
    let confirmed = h.gondi.wait(&pending).await.unwrap();
    assert_eq!(confirmed.result.len(), 2);
    assert!(confirmed.result.iter().all(|d| d.value));

    let pending = h.gondi.delegate_multicall(&batch).await.unwrap();
    let err = h.gondi.wait(&pending).await.unwrap_err();
    assert_eq!(err.to_string(), "Delegate multicall failed");
}

#[tokio::test]
async fn v4_reports_missing_actions() {
    let h = harness(ProtocolVersion::V4);
    let err = h
        .gondi
        .extend_loan(U256::from(1u64), &loan(0), U256::from(60 * gondi_sdk::SECONDS_IN_DAY))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "UNSUPPORTED_ACTION");
    assert!(h.gondi.remaining_lockup_seconds(&loan(0)).await.is_err());
    assert!(h.ledger.submitted().await.is_empty());
}

#[tokio::test]
async fn token_approval_defaults_to_unlimited() {
    let h = harness(ProtocolVersion::V5_1);
    let token = gondi_sdk::Address::repeat_byte(0xee);
    h.ledger
        .push_logs(vec![EventLog::new(
            token,
            "Approval",
            json!({ "owner": wallet(), "spender": msl(ProtocolVersion::V5_1), "value": U256::MAX.to_string() }),
        )])
        .await;

    let pending = h.gondi.approve_token(token, None).await.unwrap();
    assert_eq!(pending.contract(), token);
    assert_eq!(pending.call.args[1], json!(U256::MAX.to_string()));

    let confirmed = h.gondi.wait(&pending).await.unwrap();
    assert_eq!(confirmed.result.value, U256::MAX);
}

#[tokio::test]
async fn nft_approval_is_confirmed_on_the_collection() {
    let h = harness(ProtocolVersion::V5_1);
    // Approval logged by the MultiSourceLoan instead of the collection
    h.ledger
        .push_logs(vec![EventLog::new(
            msl(ProtocolVersion::V5_1),
            "ApprovalForAll",
            json!({ "owner": wallet(), "operator": msl(ProtocolVersion::V5_1), "approved": true }),
        )])
        .await;

    let pending = h.gondi.approve_nft_for_all(collection()).await.unwrap();
    let err = h.gondi.wait(&pending).await.unwrap_err();
    assert_eq!(err.to_string(), "ERC721 approval for all not set");
}

#[tokio::test]
async fn lockup_uses_the_contract_minimum() {
    let h = harness(ProtocolVersion::V5_1);
    h.ledger.set_read("getMinLockPeriod", json!("1500")).await;

    // Loan started long ago, lockup is over
    assert_eq!(h.gondi.remaining_lockup_seconds(&loan(1_000)).await.unwrap(), 0);

    // Loan starting far in the future is fully locked
    let start = 4_000_000_000u64;
    let left = h.gondi.remaining_lockup_seconds(&loan(start)).await.unwrap();
    let term = 30 * gondi_sdk::SECONDS_IN_DAY;
    assert_eq!(left, (term * 1_500).div_ceil(10_000));
}

fn refinanced(contract: gondi_sdk::Address) -> EventLog {
    EventLog::new(
        contract,
        "LoanRefinanced",
        json!({
            "renegotiationId": "3",
            "oldLoanId": "11",
            "newLoanId": "12",
            "loan": loan_json(),
            "fee": "4",
        }),
    )
}

#[tokio::test]
async fn v4_full_refinance_zeroes_the_offer_loan_id() {
    let h = harness(ProtocolVersion::V4);
    let contract = msl(ProtocolVersion::V4);
    let lender = gondi_sdk::Address::repeat_byte(0x22);
    h.ledger.push_logs(vec![refinanced(contract)]).await;
    h.ledger.push_logs(vec![]).await;

    let offer = renegotiation(lender);
    let pending = h.gondi.refinance_full_loan(&offer, &loan(0)).await.unwrap();
    assert_eq!(pending.call.function, "refinanceFull");
    assert_eq!(pending.call.args.len(), 3);
    assert_eq!(pending.call.args[0]["loanId"], json!("0"));
    assert_eq!(pending.call.args[0]["renegotiationId"], json!("3"));

    let confirmed = h.gondi.wait(&pending).await.unwrap();
    let result = &confirmed.result;
    assert_eq!(
        result.renegotiation_id,
        gondi_sdk::CompositeId::offer(&contract, &lender, U256::from(3u64))
    );
    assert_eq!(result.old_loan_id, gondi_sdk::CompositeId::loan(&contract, U256::from(11u64)));
    assert_eq!(result.loan.loan_id, U256::from(12u64));
    assert_eq!(result.fee, U256::from(4u64));

    let pending = h.gondi.refinance_full_loan(&offer, &loan(0)).await.unwrap();
    let err = h.gondi.wait(&pending).await.unwrap_err();
    assert_eq!(err.to_string(), "Loan not refinanced");
    assert!(matches!(err, GondiError::ConfirmationMismatch { found: 0, .. }));
}

#[tokio::test]
async fn unsigned_full_refinance_is_rejected_before_submission() {
    let h = harness(ProtocolVersion::V5_1);
    let mut offer = renegotiation(wallet());
    offer.signature = None;

    let err = h.gondi.refinance_full_loan(&offer, &loan(0)).await.unwrap_err();
    assert!(matches!(err, GondiError::InvalidInput { ref field, .. } if field == "signature"));
    assert!(h.ledger.submitted().await.is_empty());
}

#[tokio::test]
async fn partial_refinance_keeps_the_loan_id_and_needs_no_signature() {
    let h = harness(ProtocolVersion::V5_1);
    let contract = msl(ProtocolVersion::V5_1);
    h.ledger.push_logs(vec![refinanced(contract)]).await;

    let mut offer = renegotiation(wallet());
    offer.signature = None;
    let pending = h.gondi.refinance_partial_loan(&offer, &loan(0)).await.unwrap();
    assert_eq!(pending.call.function, "refinancePartial");
    assert_eq!(pending.call.args.len(), 2);
    assert_eq!(pending.call.args[0]["loanId"], json!("11"));

    let confirmed = h.gondi.wait(&pending).await.unwrap();
    assert_eq!(
        confirmed.result.renegotiation_id,
        gondi_sdk::CompositeId::offer(&contract, &wallet(), U256::from(3u64))
    );
    assert_eq!(confirmed.result.loan.id.as_str(), format!("{}.12", gondi_sdk::lower_hex(&contract)));
}

#[tokio::test]
async fn extension_sends_the_added_duration() {
    let h = harness(ProtocolVersion::V5_1);
    let contract = msl(ProtocolVersion::V5_1);
    h.ledger
        .push_logs(vec![EventLog::new(
            contract,
            "LoanExtended",
            json!({ "oldLoanId": "5", "newLoanId": "6", "loan": loan_json() }),
        )])
        .await;
    h.ledger.push_logs(vec![]).await;

    let current = loan(0);
    let new_duration = U256::from(45 * gondi_sdk::SECONDS_IN_DAY);
    let pending = h
        .gondi
        .extend_loan(U256::from(5u64), &current, new_duration)
        .await
        .unwrap();
    assert_eq!(pending.call.function, "extendLoan");
    assert_eq!(pending.call.args[0], json!("5"));
    assert_eq!(pending.call.args[2], json!((15 * gondi_sdk::SECONDS_IN_DAY).to_string()));

    let confirmed = h.gondi.wait(&pending).await.unwrap();
    assert_eq!(confirmed.result.old_loan_id, gondi_sdk::CompositeId::loan(&contract, U256::from(5u64)));
    assert_eq!(confirmed.result.loan.loan_id, U256::from(6u64));

    let pending = h
        .gondi
        .extend_loan(U256::from(5u64), &current, new_duration)
        .await
        .unwrap();
    let err = h.gondi.wait(&pending).await.unwrap_err();
    assert_eq!(err.to_string(), "Loan not extended");

    // Shortening is not an extension
    let before = h.ledger.submitted().await.len();
    let err = h
        .gondi
        .extend_loan(U256::from(5u64), &current, U256::from(gondi_sdk::SECONDS_IN_DAY))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");
    assert_eq!(h.ledger.submitted().await.len(), before);
}

#[tokio::test]
async fn repayment_defaults_to_the_wallet_and_reports_totals() {
    let h = harness(ProtocolVersion::V4);
    let contract = msl(ProtocolVersion::V4);
    h.ledger
        .push_logs(vec![EventLog::new(
            contract,
            "LoanRepaid",
            json!({ "loanId": "5", "totalRepayment": "1010", "fee": "2" }),
        )])
        .await;

    let pending = h.gondi.repay_loan(U256::from(99u64), &loan(0), None).await.unwrap();
    assert_eq!(pending.call.function, "repayLoan");
    assert_eq!(pending.call.args[0], json!(wallet()));
    // V4 addresses the loan by its newest tranche
    assert_eq!(pending.call.args[1], json!("5"));

    let confirmed = h.gondi.wait(&pending).await.unwrap();
    assert_eq!(confirmed.result.loan_id, gondi_sdk::CompositeId::loan(&contract, U256::from(5u64)));
    assert_eq!(confirmed.result.total_repayment, U256::from(1_010u64));
    assert_eq!(confirmed.result.fee, U256::from(2u64));
}

#[tokio::test]
async fn v5_repayment_uses_the_execution_struct() {
    let h = harness(ProtocolVersion::V5_1);
    let pending = h.gondi.repay_loan(U256::from(99u64), &loan(0), None).await.unwrap();
    let repayment = &pending.call.args[0];
    assert_eq!(repayment["data"]["loanId"], json!("99"));
    assert_eq!(repayment["data"]["shouldDelegate"], json!(false));
    assert_eq!(repayment["borrowerSignature"], json!("0x"));
}

#[tokio::test]
async fn cancel_all_offers_and_renegotiations() {
    let h = harness(ProtocolVersion::V5_1);
    let contract = msl(ProtocolVersion::V5_1);
    h.ledger
        .push_logs(vec![EventLog::new(
            contract,
            "AllOffersCancelled",
            json!({ "lender": wallet(), "minOfferId": "10" }),
        )])
        .await;
    h.ledger
        .push_logs(vec![EventLog::new(
            contract,
            "AllRenegotiationOffersCancelled",
            json!({ "lender": wallet(), "minRenegotiationId": "4" }),
        )])
        .await;

    let pending = h.gondi.cancel_all_offers(U256::from(10u64)).await.unwrap();
    assert_eq!(pending.call.args, vec![json!("10")]);
    let confirmed = h.gondi.wait(&pending).await.unwrap();
    assert_eq!(confirmed.result.lender, wallet());
    assert_eq!(confirmed.result.min_offer_id, U256::from(10u64));

    let pending = h.gondi.cancel_all_renegotiations(U256::from(4u64)).await.unwrap();
    assert_eq!(pending.call.function, "cancelAllRenegotiationOffers");
    let confirmed = h.gondi.wait(&pending).await.unwrap();
    assert_eq!(confirmed.result.min_renegotiation_id, U256::from(4u64));
}

#[tokio::test]
async fn v4_cancel_all_passes_the_sender() {
    let h = harness(ProtocolVersion::V4);
    h.ledger.push_logs(vec![]).await;

    let pending = h.gondi.cancel_all_renegotiations(U256::from(4u64)).await.unwrap();
    assert_eq!(pending.call.function, "cancelAllRenegotiationOffer");
    assert_eq!(pending.call.args, vec![json!(wallet()), json!("4")]);

    let err = h.gondi.wait(&pending).await.unwrap_err();
    assert_eq!(err.to_string(), "Renegotiation offers not cancelled");
}

#[tokio::test]
async fn delegate_and_revoke_a_single_token() {
    let h = harness(ProtocolVersion::V5);
    let contract = msl(ProtocolVersion::V5);
    let delegate = gondi_sdk::Address::repeat_byte(0xd1);
    h.ledger
        .push_logs(vec![EventLog::new(
            contract,
            "Delegated",
            json!({ "loanId": "5", "delegate": delegate, "value": true }),
        )])
        .await;
    h.ledger.push_logs(vec![revoked(contract, 0xd1)]).await;

    let input = DelegationInput {
        loan_id: U256::from(5u64),
        loan: loan(0),
        to: delegate,
        rights: B256::ZERO,
        enable: true,
    };
    let pending = h.gondi.delegate(&input).await.unwrap();
    assert_eq!(pending.call.function, "delegate");
    let confirmed = h.gondi.wait(&pending).await.unwrap();
    assert_eq!(confirmed.result.loan_id, gondi_sdk::CompositeId::loan(&contract, U256::from(5u64)));
    assert_eq!(confirmed.result.delegate, delegate);
    assert!(confirmed.result.value);

    let pending = h
        .gondi
        .revoke_delegate(delegate, collection(), U256::from(7u64))
        .await
        .unwrap();
    assert_eq!(
        pending.call.args,
        vec![json!(delegate), json!(collection()), json!("7")]
    );
    let confirmed = h.gondi.wait(&pending).await.unwrap();
    assert_eq!(confirmed.result.token_id, U256::from(7u64));
}

#[tokio::test]
async fn delegation_batch_rejects_events_for_other_loans() {
    let h = harness(ProtocolVersion::V5);
    let contract = msl(ProtocolVersion::V5);
    let delegated = |loan_id: &str| {
        EventLog::new(
            contract,
            "Delegated",
            json!({ "loanId": loan_id, "delegate": wallet(), "value": true }),
        )
    };
    let input = |loan_id: u64| DelegationInput {
        loan_id: U256::from(loan_id),
        loan: loan(0),
        to: wallet(),
        rights: B256::ZERO,
        enable: true,
    };
    h.ledger.push_logs(vec![delegated("8"), delegated("9")]).await;

    let pending = h.gondi.delegate_multicall(&[input(1), input(2)]).await.unwrap();
    let err = h.gondi.wait(&pending).await.unwrap_err();
    assert_eq!(err.to_string(), "Delegate multicall failed");
}

#[tokio::test]
async fn ledger_rejection_surfaces_as_a_submission_error() {
    let h = harness(ProtocolVersion::V5_1);
    h.ledger.push_rejection("nonce too low").await;

    let err = h.gondi.cancel_all_offers(U256::from(1u64)).await.unwrap_err();
    match err {
        GondiError::Submission { tx_hash, reason, .. } => {
            assert_eq!(tx_hash, None);
            assert_eq!(reason, "nonce too low");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(h.ledger.submitted().await.len(), 0);
}
