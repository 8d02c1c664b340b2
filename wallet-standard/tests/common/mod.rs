//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use wallet_standard::account::{AccountKeypair, KeypairAccount};
use wallet_standard::registry::RegisterListener;
use wallet_standard::submitters::TransactionSubmitter;
use wallet_standard::wallet::{StandardWallet, WalletHandle};
use wallet_standard::ChainId;

pub const ICON: &str = "data:image/svg+xml;base64,PHN2Zy8+";

pub type Calls = Arc<Mutex<Vec<Vec<String>>>>;

pub fn account() -> KeypairAccount {
    KeypairAccount::builder(AccountKeypair::generate(), ChainId::solana_devnet()).build()
}

pub fn account_with_submitter(submitter: Arc<dyn TransactionSubmitter>) -> KeypairAccount {
    KeypairAccount::builder(AccountKeypair::generate(), ChainId::solana_devnet())
        .submitter(submitter)
        .build()
}

pub fn wallet(name: &str) -> WalletHandle {
    Arc::new(
        StandardWallet::builder(name)
            .icon(ICON)
            .account(Arc::new(account()))
            .build()
            .unwrap(),
    )
}

pub fn names(wallets: &[WalletHandle]) -> Vec<String> {
    wallets.iter().map(|w| w.name().to_string()).collect()
}

pub fn recorder() -> (Arc<RegisterListener>, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let sink = calls.clone();
    let listener: Arc<RegisterListener> = Arc::new(move |wallets: &[WalletHandle]| {
        sink.lock().push(names(wallets));
    });
    (listener, calls)
}
