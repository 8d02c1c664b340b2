//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use wallet_standard::prelude::*;
//! ```

// Core types
pub use crate::ChainId;

// Error handling
pub use crate::errors::{WalletError, WalletErrorCode};
pub use crate::Result;

// Discovery
pub use crate::bootstrap::initialize;
pub use crate::registry::{Command, DiscoverySlot, Registry, RegistryEvent, Unsubscribe};

// Wallets
pub use crate::wallet::{
    AccountHandle, ConnectOptions, ConnectOutput, StandardWallet, Wallet, WalletCipher,
    WalletEvent, WalletHandle, WalletVersion,
};

// Accounts
pub use crate::account::{
    AccountKeypair, DecryptInput, DecryptOutput, EncryptInput, EncryptOutput, KeypairAccount,
    SignMessageInput, SignTransactionInput, WalletAccount,
};

// Collaborators
pub use crate::crypto::{CryptoBox, X25519XChaCha20Poly1305};
pub use crate::signing::{DetachedSigner, TransactionSigner};
pub use crate::submitters::{MockSubmitter, RpcConfig, RpcSubmitter, TransactionSubmitter};
