//! Shared-key authenticated encryption.
//!
//! Accounts never touch a cipher directly. They go through a [`CryptoBox`],
//! which derives a symmetric [`SharedKey`] from one party's secret key and the
//! other party's public key, then seals or opens individual messages under an
//! explicit nonce. Both parties derive the same key from their own secret and
//! the peer's public key.
//!
//! The default box is [`X25519XChaCha20Poly1305`].

mod xchacha;

pub use xchacha::X25519XChaCha20Poly1305;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::wallet::WalletCipher;

/// Size of a derived shared key in bytes.
pub const SHARED_KEY_SIZE: usize = 32;

/// Errors reported by a [`CryptoBox`].
#[derive(Debug, thiserror::Error)]
pub enum CryptoBoxError {
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
    #[error("Invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonce { expected: usize, actual: usize },
    #[error("Seal failed: {0}")]
    SealFailed(String),
    #[error("Message authentication failed")]
    OpenFailed,
}

/// Result type for crypto box operations.
pub type CryptoBoxResult<T> = Result<T, CryptoBoxError>;

/// Symmetric key derived from a key agreement. Cleared on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedKey([u8; SHARED_KEY_SIZE]);

impl SharedKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; SHARED_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; SHARED_KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedKey(..)")
    }
}

/// Authenticated-encryption primitive used by accounts for `encrypt`/`decrypt`.
///
/// Public and secret keys are X25519 (Montgomery-form) key bytes.
pub trait CryptoBox: Send + Sync {
    /// The cipher identifier reported alongside ciphertexts.
    fn cipher(&self) -> WalletCipher;

    /// Length in bytes of the nonces this box expects.
    fn nonce_len(&self) -> usize;

    /// Derive the shared key for `public_key` (remote) and `secret_key` (local).
    fn derive_shared_key(
        &self,
        public_key: &[u8; 32],
        secret_key: &[u8; 32],
    ) -> CryptoBoxResult<SharedKey>;

    /// Seal `plaintext` under `nonce` and `key`.
    fn seal(&self, plaintext: &[u8], nonce: &[u8], key: &SharedKey) -> CryptoBoxResult<Vec<u8>>;

    /// Open `ciphertext` sealed under `nonce` and `key`.
    ///
    /// Fails with [`CryptoBoxError::OpenFailed`] when the ciphertext does not verify.
    fn open(&self, ciphertext: &[u8], nonce: &[u8], key: &SharedKey) -> CryptoBoxResult<Vec<u8>>;
}
