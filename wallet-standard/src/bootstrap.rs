//! Wallet load-time bootstrap.
//!
//! Every wallet runs [`initialize`] once when it loads, in whatever order the
//! host happens to load them:
//!
//! 1. claim the slot, creating the [`Registry`] and replaying any buffered
//!    commands if no wallet has done so yet
//! 2. register its own wallets through the now-authoritative registry
//!
//! Claiming is exactly-once no matter how many wallets bootstrap or from how
//! many threads.

use std::sync::Arc;

use crate::registry::{Command, DiscoverySlot, Registry};
use crate::wallet::WalletHandle;

/// Make sure `slot` holds a registry, then register `wallets` with it.
pub fn initialize(
    slot: &DiscoverySlot,
    wallets: impl IntoIterator<Item = WalletHandle>,
) -> Arc<Registry> {
    initialize_with(slot, wallets, Registry::new)
}

/// Like [`initialize`], building the registry with `factory` if this call wins the claim.
pub fn initialize_with(
    slot: &DiscoverySlot,
    wallets: impl IntoIterator<Item = WalletHandle>,
    factory: impl FnOnce() -> Registry,
) -> Arc<Registry> {
    let registry = slot.claim_with(factory);
    let wallets: Vec<WalletHandle> = wallets.into_iter().collect();

    tracing::debug!(
        wallets = ?wallets.iter().map(|w| w.name().to_string()).collect::<Vec<_>>(),
        "registering wallets"
    );
    slot.push([Command::register(wallets)]);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_wallets, test_wallet, wallet_names};
    use parking_lot::Mutex;

    #[test]
    fn test_app_get_before_any_wallet() {
        let slot = DiscoverySlot::new();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        slot.push([Command::get(move |wallets| {
            *sink.lock() = Some(wallet_names(&wallets));
        })]);
        assert!(seen.lock().is_none());

        initialize(&slot, [test_wallet("W1")]);
        assert_eq!(*seen.lock(), Some(Vec::<String>::new()));
    }

    #[test]
    fn test_two_wallets_share_one_registry() {
        let slot = DiscoverySlot::new();
        let first = initialize(&slot, [test_wallet("W1")]);
        let second = initialize(&slot, [test_wallet("W2")]);

        assert!(Arc::ptr_eq(&first, &second));
        assert_wallets(&first.wallets(), &["W1", "W2"]);
    }
}
