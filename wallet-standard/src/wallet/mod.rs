//! Wallet handles.
//!
//! A [`Wallet`] is the self-description a wallet registers with the registry:
//! name, icon, supported chains and ciphers, and the accounts an app may use.
//! Accessors return owned copies, so callers can never change a wallet's
//! state through them.

mod standard;
mod types;

pub use standard::{StandardWallet, StandardWalletBuilder};
pub use types::{WalletCipher, WalletVersion};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::account::WalletAccount;
use crate::registry::Unsubscribe;
use crate::{ChainId, Result};

/// Shared handle to a registered wallet.
pub type WalletHandle = Arc<dyn Wallet>;

/// Shared handle to a wallet account.
pub type AccountHandle = Arc<dyn WalletAccount>;

/// Called when a wallet event fires.
pub type WalletListener = dyn Fn() + Send + Sync;

/// Events a wallet emits when its properties change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WalletEvent {
    /// The set of authorized accounts changed.
    AccountsChanged,
    /// The set of supported chains changed.
    ChainsChanged,
}

/// Options for [`Wallet::connect`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Only return accounts on this chain.
    pub chain: Option<ChainId>,
    /// Only return accounts with these public keys.
    pub public_keys: Option<Vec<Vec<u8>>>,
    /// Do not prompt the user.
    pub silent: bool,
}

impl ConnectOptions {
    /// Connect to every account.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to `chain`.
    pub fn chain(mut self, chain: ChainId) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Restrict to accounts with these public keys.
    pub fn public_keys(mut self, public_keys: Vec<Vec<u8>>) -> Self {
        self.public_keys = Some(public_keys);
        self
    }

    /// Request a silent connection.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }
}

/// Result of [`Wallet::connect`].
#[derive(Clone)]
pub struct ConnectOutput {
    /// Accounts the app may use.
    pub accounts: Vec<AccountHandle>,
    /// True when the wallet holds accounts that were not returned.
    pub has_more_accounts: bool,
}

impl fmt::Debug for ConnectOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOutput")
            .field("accounts", &self.accounts.len())
            .field("has_more_accounts", &self.has_more_accounts)
            .finish()
    }
}

/// A discoverable wallet.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Standard version implemented by the wallet.
    fn version(&self) -> WalletVersion;

    /// Display name.
    fn name(&self) -> &str;

    /// Icon as a `data:` URI.
    fn icon(&self) -> &str;

    /// Accounts the app is authorized to use.
    fn accounts(&self) -> Vec<AccountHandle>;

    /// Chains the wallet supports.
    fn chains(&self) -> Vec<ChainId>;

    /// Ciphers the wallet supports.
    fn ciphers(&self) -> Vec<WalletCipher>;

    /// Ask the wallet for accounts.
    async fn connect(&self, options: &ConnectOptions) -> Result<ConnectOutput>;

    /// Subscribe to `event`. The returned handle removes the subscription.
    fn on(&self, event: WalletEvent, listener: Arc<WalletListener>) -> Unsubscribe;
}

impl fmt::Debug for dyn Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("name", &self.name())
            .field("version", &self.version())
            .field("chains", &self.chains())
            .finish_non_exhaustive()
    }
}
