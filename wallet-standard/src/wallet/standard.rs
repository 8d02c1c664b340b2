//! A ready-made [`Wallet`] over a fixed set of accounts.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{
    AccountHandle, ConnectOptions, ConnectOutput, Wallet, WalletCipher, WalletEvent,
    WalletListener, WalletVersion,
};
use crate::registry::{
    default_error_handler, invoke_isolated, ErrorHandler, ListenerSet, Unsubscribe,
};
use crate::{ChainId, Result, WalletError};

/// Wallet metadata plus accounts, fixed at construction.
pub struct StandardWallet {
    version: WalletVersion,
    name: String,
    icon: String,
    chains: Vec<ChainId>,
    ciphers: Vec<WalletCipher>,
    accounts: Vec<AccountHandle>,
    listeners: Arc<Mutex<ListenerSet<WalletEvent, WalletListener>>>,
    error_handler: ErrorHandler,
}

impl StandardWallet {
    /// Start building a wallet called `name`.
    pub fn builder(name: impl Into<String>) -> StandardWalletBuilder {
        StandardWalletBuilder::new(name)
    }

    /// Notify every listener of `event`, in subscription order.
    ///
    /// A panicking listener is reported to the error handler and the rest
    /// still run.
    pub fn emit(&self, event: WalletEvent) {
        let listeners = self.listeners.lock().snapshot(event);
        tracing::debug!(wallet = %self.name, ?event, listeners = listeners.len(), "emitting wallet event");
        for listener in listeners {
            invoke_isolated("wallet listener", &self.error_handler, || listener());
        }
    }

    /// Number of listeners subscribed to `event`.
    pub fn listener_count(&self, event: WalletEvent) -> usize {
        self.listeners.lock().len(event)
    }

    fn select_accounts(&self, options: &ConnectOptions) -> Result<Vec<AccountHandle>> {
        if let Some(chain) = &options.chain {
            if !self.chains.contains(chain) {
                return Err(WalletError::UnsupportedChain(chain.to_string()));
            }
        }

        if let Some(keys) = &options.public_keys {
            if let Some(missing) = keys
                .iter()
                .find(|key| !self.accounts.iter().any(|a| a.public_key() == key.as_slice()))
            {
                return Err(WalletError::invalid_data(
                    "public_keys",
                    format!(
                        "no account with public key {}",
                        bs58::encode(missing).into_string()
                    ),
                ));
            }
        }

        Ok(self
            .accounts
            .iter()
            .filter(|account| {
                options
                    .chain
                    .as_ref()
                    .map_or(true, |chain| account.chain() == chain)
            })
            .filter(|account| {
                options.public_keys.as_ref().map_or(true, |keys| {
                    keys.iter().any(|key| key.as_slice() == account.public_key())
                })
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Wallet for StandardWallet {
    fn version(&self) -> WalletVersion {
        self.version
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> &str {
        &self.icon
    }

    fn accounts(&self) -> Vec<AccountHandle> {
        self.accounts.clone()
    }

    fn chains(&self) -> Vec<ChainId> {
        self.chains.clone()
    }

    fn ciphers(&self) -> Vec<WalletCipher> {
        self.ciphers.clone()
    }

    async fn connect(&self, options: &ConnectOptions) -> Result<ConnectOutput> {
        // No prompt is ever shown, so `silent` changes nothing here
        let accounts = self.select_accounts(options)?;
        let has_more_accounts = accounts.len() < self.accounts.len();
        tracing::debug!(
            wallet = %self.name,
            silent = options.silent,
            accounts = accounts.len(),
            has_more_accounts,
            "connected"
        );
        Ok(ConnectOutput {
            accounts,
            has_more_accounts,
        })
    }

    fn on(&self, event: WalletEvent, listener: Arc<WalletListener>) -> Unsubscribe {
        let id = self.listeners.lock().insert(event, listener);
        Unsubscribe::new(&self.listeners, id)
    }
}

impl std::fmt::Debug for StandardWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardWallet")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("chains", &self.chains)
            .field("ciphers", &self.ciphers)
            .field("accounts", &self.accounts.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`StandardWallet`].
pub struct StandardWalletBuilder {
    name: String,
    icon: Option<String>,
    version: WalletVersion,
    chains: Vec<ChainId>,
    ciphers: Vec<WalletCipher>,
    accounts: Vec<AccountHandle>,
    error_handler: Option<ErrorHandler>,
}

impl StandardWalletBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            version: WalletVersion::default(),
            chains: Vec::new(),
            ciphers: Vec::new(),
            accounts: Vec::new(),
            error_handler: None,
        }
    }

    /// Set the icon. Must be a `data:` URI.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the standard version.
    pub fn version(mut self, version: WalletVersion) -> Self {
        self.version = version;
        self
    }

    /// Declare a supported chain.
    pub fn chain(mut self, chain: ChainId) -> Self {
        self.chains.push(chain);
        self
    }

    /// Declare a supported cipher.
    pub fn cipher(mut self, cipher: WalletCipher) -> Self {
        self.ciphers.push(cipher);
        self
    }

    /// Add an account.
    pub fn account(mut self, account: AccountHandle) -> Self {
        self.accounts.push(account);
        self
    }

    /// Report panicking event listeners to `handler` instead of the log.
    pub fn error_handler(mut self, handler: ErrorHandler) -> Self {
        self.error_handler = Some(handler);
        self
    }

    /// Build the wallet.
    ///
    /// Chains and ciphers default to the union of the accounts' when none are
    /// declared. Duplicates are dropped, first occurrence wins.
    pub fn build(self) -> Result<StandardWallet> {
        if self.name.trim().is_empty() {
            return Err(WalletError::invalid_data("name", "must not be empty"));
        }

        let icon = self
            .icon
            .ok_or_else(|| WalletError::invalid_data("icon", "is required"))?;
        if !icon.starts_with("data:") {
            return Err(WalletError::invalid_data("icon", "must be a data: URI"));
        }

        let chains = if self.chains.is_empty() {
            self.accounts.iter().map(|a| a.chain().clone()).collect()
        } else {
            self.chains
        };
        let ciphers = if self.ciphers.is_empty() {
            self.accounts.iter().flat_map(|a| a.ciphers()).collect()
        } else {
            self.ciphers
        };

        Ok(StandardWallet {
            version: self.version,
            name: self.name,
            icon,
            chains: dedup(chains),
            ciphers: dedup(ciphers),
            accounts: self.accounts,
            listeners: Arc::new(Mutex::new(ListenerSet::new())),
            error_handler: self.error_handler.unwrap_or_else(default_error_handler),
        })
    }
}

fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
