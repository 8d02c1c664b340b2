//! Wallet Standard library.
//!
//! Wallets announce themselves to applications through one shared discovery
//! slot, without anything coordinating which of them loads first. Once a
//! wallet is discovered, its accounts expose a uniform capability set.
//!
//! # Features
//!
//! - **Discovery protocol**: buffered commands, exactly-once registry creation
//!   and ordered replay ([`registry`], [`bootstrap`])
//! - **Wallet handles**: metadata, connect and change events ([`wallet`])
//! - **Account contract**: sign, sign-and-send, sign-message, encrypt and
//!   decrypt ([`account`])
//! - **Pluggable collaborators**: [`crypto::CryptoBox`],
//!   [`signing::TransactionSigner`], [`submitters::TransactionSubmitter`]
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wallet_standard::prelude::*;
//!
//! let account = KeypairAccount::builder(AccountKeypair::generate(), ChainId::solana_devnet())
//!     .submitter(Arc::new(MockSubmitter::new()))
//!     .build();
//! let wallet = StandardWallet::builder("Example")
//!     .icon("data:image/svg+xml;base64,PHN2Zy8+")
//!     .account(Arc::new(account))
//!     .build()?;
//!
//! wallet_standard::registry::global::initialize([Arc::new(wallet) as WalletHandle]);
//! ```

pub mod account;
pub mod bootstrap;
pub mod crypto;
pub mod errors;
pub mod prelude;
pub mod registry;
pub mod signing;
pub mod submitters;
pub mod wallet;

/// Test fixtures for wallets, accounts and registry listeners.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use errors::{WalletError, WalletErrorCode};

/// Common result alias for wallet operations.
pub type Result<T> = std::result::Result<T, WalletError>;

/// Identifier of a blockchain network, in `namespace:reference` form.
///
/// # Example
///
/// ```
/// use wallet_standard::ChainId;
///
/// let chain: ChainId = "solana:devnet".into();
/// assert_eq!(chain, ChainId::solana_devnet());
/// assert_eq!(chain.namespace(), "solana");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ChainId(pub String);

impl ChainId {
    /// Create a new ChainId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the chain ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part before the first `:`, or the whole id if there is none.
    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(ns, _)| ns)
    }

    /// Well-known chain ID for Solana mainnet.
    pub const SOLANA_MAINNET: &'static str = "solana:mainnet";

    /// Well-known chain ID for Solana devnet.
    pub const SOLANA_DEVNET: &'static str = "solana:devnet";

    /// Well-known chain ID for Solana testnet.
    pub const SOLANA_TESTNET: &'static str = "solana:testnet";

    /// Well-known chain ID for Ethereum mainnet.
    pub const ETHEREUM_MAINNET: &'static str = "ethereum:mainnet";

    /// Create the Solana mainnet chain ID.
    pub fn solana_mainnet() -> Self {
        Self::new(Self::SOLANA_MAINNET)
    }

    /// Create the Solana devnet chain ID.
    pub fn solana_devnet() -> Self {
        Self::new(Self::SOLANA_DEVNET)
    }

    /// Create the Solana testnet chain ID.
    pub fn solana_testnet() -> Self {
        Self::new(Self::SOLANA_TESTNET)
    }

    /// Create the Ethereum mainnet chain ID.
    pub fn ethereum_mainnet() -> Self {
        Self::new(Self::ETHEREUM_MAINNET)
    }
}

impl From<&str> for ChainId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChainId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ChainId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
