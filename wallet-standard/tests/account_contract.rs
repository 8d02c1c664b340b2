//! Integration tests for the account capability contract.
//!
//! Two independently generated accounts exchange encrypted messages using
//! nothing but each other's public key, and sign-and-send goes through an
//! in-memory submitter.
//!
//! ```bash
//! cargo test -p wallet-standard --test account_contract
//! ```

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use wallet_standard::account::{
    verify_signature, DecryptInput, EncryptInput, KeypairAccount, SignMessageInput,
    SignTransactionInput, WalletAccount,
};
use wallet_standard::signing::primary_signature;
use wallet_standard::submitters::MockSubmitter;
use wallet_standard::WalletError;

use common::{account, account_with_submitter};

fn seal(from: &KeypairAccount, to: &KeypairAccount, messages: Vec<Vec<u8>>) -> DecryptInput {
    let outputs = futures::executor::block_on(
        from.encrypt(&[EncryptInput::new(to.public_key().to_vec(), messages)]),
    )
    .unwrap();
    DecryptInput::from_output(from.public_key().to_vec(), outputs.into_iter().next().unwrap())
}

// ============================================================================
// Encryption
// ============================================================================

#[tokio::test]
async fn encrypt_decrypt_between_accounts() {
    let alice = account();
    let bob = account();
    let messages = vec![b"gm".to_vec(), Vec::new(), vec![0u8; 4096]];

    let input = seal(&alice, &bob, messages.clone());
    let results = bob.decrypt(&[input]).await;
    let output = results.into_iter().next().unwrap().unwrap();

    assert_eq!(output.cleartexts, messages);
}

#[tokio::test]
async fn empty_input_is_valid_and_empty() {
    let alice = account();
    let bob = account();

    let input = seal(&alice, &bob, Vec::new());
    let output = bob.decrypt(&[input]).await.remove(0).unwrap();
    assert!(output.cleartexts.is_empty());
}

#[tokio::test]
async fn tampered_ciphertext_fails_authentication() {
    let alice = account();
    let bob = account();

    let mut input = seal(&alice, &bob, vec![b"first".to_vec(), b"second".to_vec()]);
    input.ciphertexts[1][0] ^= 0x01;

    let results = bob.decrypt(&[input]).await;
    assert_eq!(results[0], Err(WalletError::Authentication { index: 1 }));
}

#[tokio::test]
async fn tampered_nonce_fails_authentication() {
    let alice = account();
    let bob = account();

    let mut input = seal(&alice, &bob, vec![b"hello".to_vec()]);
    input.nonces[0][5] ^= 0x80;

    let results = bob.decrypt(&[input]).await;
    assert!(matches!(results[0], Err(WalletError::Authentication { .. })));
}

#[tokio::test]
async fn third_party_cannot_decrypt() {
    let alice = account();
    let bob = account();
    let eve = account();

    let input = seal(&alice, &bob, vec![b"secret".to_vec()]);
    let results = eve.decrypt(&[input]).await;
    assert!(matches!(results[0], Err(WalletError::Authentication { .. })));
}

#[tokio::test]
async fn failing_input_does_not_affect_others() {
    let alice = account();
    let bob = account();

    let good = seal(&alice, &bob, vec![b"good".to_vec()]);
    let mut bad = seal(&alice, &bob, vec![b"bad".to_vec()]);
    bad.ciphertexts[0].push(0);

    let results = bob.decrypt(&[good, bad]).await;
    assert_eq!(results[0].as_ref().unwrap().cleartexts, vec![b"good".to_vec()]);
    assert!(results[1].is_err());
}

#[tokio::test]
async fn nonces_are_fresh_within_and_across_calls() {
    let alice = account();
    let bob = account();
    let cleartexts = vec![b"same".to_vec(); 32];
    let input = EncryptInput::new(bob.public_key().to_vec(), cleartexts);

    let first = alice.encrypt(&[input.clone(), input.clone()]).await.unwrap();
    let second = alice.encrypt(&[input]).await.unwrap();

    let within: HashSet<_> = first.iter().flat_map(|o| o.nonces.iter()).collect();
    assert_eq!(within.len(), 64);

    assert_ne!(first[0].nonces, second[0].nonces);
    assert_ne!(first[0].ciphertexts, second[0].ciphertexts);
    assert!(first[0].nonces.iter().all(|n| n.len() == 24));
}

// ============================================================================
// Signing and sending
// ============================================================================

#[tokio::test]
async fn sign_message_verifies() {
    let alice = account();
    let messages = vec![b"sign in".to_vec(), b"".to_vec()];
    let output = alice
        .sign_message(&SignMessageInput::new(messages.clone()))
        .await
        .unwrap();

    for (message, signature) in messages.iter().zip(&output.signatures) {
        assert!(verify_signature(alice.public_key(), message, signature));
    }
}

#[tokio::test]
async fn sign_transaction_does_not_submit() {
    let submitter = Arc::new(MockSubmitter::new());
    let alice = account_with_submitter(submitter.clone());

    let output = alice
        .sign_transaction(&SignTransactionInput::new(vec![b"tx".to_vec()]))
        .await
        .unwrap();
    assert_eq!(output.signed_transactions.len(), 1);
    assert!(submitter.submissions().is_empty());
}

#[tokio::test]
async fn sign_and_send_preserves_input_order() {
    // Latency makes the submissions overlap
    let submitter = Arc::new(MockSubmitter::new().with_latency(Duration::from_millis(5)));
    let alice = account_with_submitter(submitter.clone());
    let transactions: Vec<Vec<u8>> = (0u8..8).map(|i| vec![i; 40]).collect();

    let output = alice
        .sign_and_send_transaction(&SignTransactionInput::new(transactions.clone()))
        .await
        .unwrap();

    assert!(output.is_complete());
    let signatures = output.into_signatures().unwrap();
    assert_eq!(signatures.len(), transactions.len());
    for (tx, signature) in transactions.iter().zip(&signatures) {
        assert!(verify_signature(alice.public_key(), tx, signature));
    }
    assert_eq!(submitter.submissions().len(), transactions.len());
}

#[tokio::test]
async fn rejected_transaction_reports_its_index() {
    let submitter = Arc::new(MockSubmitter::rejecting(|signed| signed.ends_with(b"reject-me")));
    let alice = account_with_submitter(submitter);

    let input = SignTransactionInput::new(vec![
        b"fine".to_vec(),
        b"also fine".to_vec(),
        b"reject-me".to_vec(),
    ]);
    let output = alice.sign_and_send_transaction(&input).await.unwrap();

    assert!(output.signatures[0].is_ok());
    assert!(output.signatures[1].is_ok());
    assert!(matches!(
        output.signatures[2],
        Err(WalletError::Submission { index: 2, .. })
    ));
}

#[tokio::test]
async fn rejection_mid_batch_keeps_landed_signatures() {
    let submitter = Arc::new(MockSubmitter::rejecting(|signed| signed.ends_with(b"bad")));
    let alice = account_with_submitter(submitter.clone());

    let input = SignTransactionInput::new(vec![b"ok1".to_vec(), b"bad".to_vec(), b"ok2".to_vec()]);
    let output = alice.sign_and_send_transaction(&input).await.unwrap();

    let landed: Vec<usize> = output.landed().map(|(index, _)| index).collect();
    assert_eq!(landed, vec![0, 2]);
    assert!(verify_signature(
        alice.public_key(),
        b"ok1",
        output.signatures[0].as_ref().unwrap()
    ));
    assert!(verify_signature(
        alice.public_key(),
        b"ok2",
        output.signatures[2].as_ref().unwrap()
    ));
    assert_eq!(output.failures().count(), 1);
    assert_eq!(submitter.submissions().len(), 2);
}

#[tokio::test]
async fn resubmitting_is_a_submission_error() {
    let submitter = Arc::new(MockSubmitter::new());
    let alice = account_with_submitter(submitter);
    let input = SignTransactionInput::new(vec![b"once".to_vec()]);

    let signed = alice.sign_transaction(&input).await.unwrap();
    let first = alice.sign_and_send_transaction(&input).await.unwrap();
    let second = alice.sign_and_send_transaction(&input).await.unwrap();

    assert!(first.is_complete());
    // ed25519 is deterministic, so the second send carries the same signature
    assert!(matches!(
        second.signatures[0],
        Err(WalletError::Submission { index: 0, .. })
    ));
    assert_eq!(
        primary_signature(&signed.signed_transactions[0]).unwrap().len(),
        64
    );
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn round_trip_any_messages(
        messages in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..256), 0..8)
    ) {
        let alice = account();
        let bob = account();

        let input = seal(&alice, &bob, messages.clone());
        let mut results = futures::executor::block_on(bob.decrypt(&[input]));
        let output = results.remove(0).unwrap();
        prop_assert_eq!(output.cleartexts, messages);
    }

    #[test]
    fn any_single_bit_flip_is_detected(
        message in prop::collection::vec(any::<u8>(), 0..128),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
        in_nonce in any::<bool>(),
    ) {
        let alice = account();
        let bob = account();

        let mut input = seal(&alice, &bob, vec![message]);
        let target = if in_nonce { &mut input.nonces[0] } else { &mut input.ciphertexts[0] };
        let at = position.index(target.len());
        target[at] ^= 1 << bit;

        let results = futures::executor::block_on(bob.decrypt(&[input]));
        prop_assert_eq!(results[0].clone(), Err(WalletError::Authentication { index: 0 }));
    }
}
