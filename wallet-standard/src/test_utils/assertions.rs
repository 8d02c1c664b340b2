//! Assertion helpers for account and registry results.

use crate::account::DecryptOutput;
use crate::wallet::WalletHandle;
use crate::{Result, WalletError};

use super::fixtures::wallet_names;

/// Assert that a decrypt result failed authentication.
///
/// # Panics
/// Panics if the result is not [`WalletError::Authentication`].
pub fn assert_authentication_failed(result: &Result<DecryptOutput>) {
    match result {
        Err(WalletError::Authentication { .. }) => {}
        Err(other) => panic!("Expected authentication failure, got error: {}", other),
        Ok(output) => panic!(
            "Expected authentication failure, got {} cleartexts",
            output.cleartexts.len()
        ),
    }
}

/// Assert that a result failed submission at transaction `index`.
///
/// # Panics
/// Panics if the result is not [`WalletError::Submission`] for `index`.
pub fn assert_submission_failed<T: std::fmt::Debug>(result: &Result<T>, index: usize) {
    match result {
        Err(WalletError::Submission { index: actual, .. }) => assert_eq!(
            *actual, index,
            "Submission failed at transaction {}, expected {}",
            actual, index
        ),
        other => panic!("Expected submission failure at {}, got {:?}", index, other),
    }
}

/// Assert the registered wallets, by name and in order.
///
/// # Panics
/// Panics on any difference.
pub fn assert_wallets(wallets: &[WalletHandle], expected: &[&str]) {
    assert_eq!(
        wallet_names(wallets),
        expected,
        "Registered wallets differ from expectation"
    );
}
