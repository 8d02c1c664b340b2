//! Fixtures for wallets, accounts and registry listeners.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::account::{AccountKeypair, KeypairAccount};
use crate::registry::{ErrorHandler, RegisterListener};
use crate::submitters::TransactionSubmitter;
use crate::wallet::{AccountHandle, StandardWallet, WalletHandle};
use crate::{ChainId, WalletError};

/// A 1x1 transparent SVG, small enough to inline.
pub const TEST_ICON: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHdpZHRoPSIxIiBoZWlnaHQ9IjEiLz4=";

/// Wallet names seen by each listener invocation.
pub type RecordedCalls = Arc<Mutex<Vec<Vec<String>>>>;

/// A fresh account on `chain` with no submitter.
pub fn test_account(chain: ChainId) -> AccountHandle {
    Arc::new(KeypairAccount::builder(AccountKeypair::generate(), chain).build())
}

/// A fresh account on `chain` broadcasting through `submitter`.
pub fn test_account_with_submitter(
    chain: ChainId,
    submitter: Arc<dyn TransactionSubmitter>,
) -> AccountHandle {
    Arc::new(
        KeypairAccount::builder(AccountKeypair::generate(), chain)
            .submitter(submitter)
            .build(),
    )
}

/// A wallet named `name` holding `accounts`.
///
/// # Panics
/// Panics if `name` is empty.
pub fn wallet_with_accounts(name: &str, accounts: Vec<AccountHandle>) -> WalletHandle {
    let builder = accounts
        .into_iter()
        .fold(StandardWallet::builder(name).icon(TEST_ICON), |b, a| {
            b.account(a)
        });
    Arc::new(builder.build().expect("test wallet should build"))
}

/// A wallet named `name` with one devnet account.
pub fn test_wallet(name: &str) -> WalletHandle {
    wallet_with_accounts(name, vec![test_account(ChainId::solana_devnet())])
}

/// Names of `wallets`, in order.
pub fn wallet_names(wallets: &[WalletHandle]) -> Vec<String> {
    wallets.iter().map(|w| w.name().to_string()).collect()
}

/// A register listener that records the names of each batch it sees.
pub fn recording_listener() -> (Arc<RegisterListener>, RecordedCalls) {
    let calls: RecordedCalls = Arc::new(Mutex::new(Vec::new()));
    let sink = calls.clone();
    let listener: Arc<RegisterListener> = Arc::new(move |wallets: &[WalletHandle]| {
        sink.lock().push(wallet_names(wallets));
    });
    (listener, calls)
}

/// An error handler that keeps every reported error.
pub fn collecting_error_handler() -> (ErrorHandler, Arc<Mutex<Vec<WalletError>>>) {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let handler: ErrorHandler = Arc::new(move |error: &WalletError| {
        sink.lock().push(error.clone());
    });
    (handler, errors)
}
