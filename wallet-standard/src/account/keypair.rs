//! Account key material.
//!
//! An account is bound to one ed25519 signing key. The same key is used for
//! key agreement by mapping it onto Curve25519:
//!
//! - the local X25519 secret is the (unclamped) ed25519 scalar, clamped by X25519 itself
//! - a remote ed25519 public key is mapped to its Montgomery form
//!
//! so two accounts can derive a shared key from nothing but each other's
//! account public key.

use ed25519_dalek::{Signer, SigningKey, VerifyingKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::{Result, WalletError};

/// Size of an ed25519 signature in bytes.
pub const SIGNATURE_LENGTH: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// The secret half of an account. Never leaves the account; cleared on drop.
pub struct AccountKeypair {
    signing_key: SigningKey,
}

impl AccountKeypair {
    /// Generate a fresh keypair from the OS random source.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Restore a keypair from its 32-byte secret seed.
    pub fn from_secret_bytes(secret: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
        }
    }

    /// Restore a keypair from a secret seed of unchecked length.
    pub fn from_secret_slice(secret: &[u8]) -> Result<Self> {
        let secret: Zeroizing<[u8; SECRET_KEY_LENGTH]> =
            Zeroizing::new(secret.try_into().map_err(|_| {
                WalletError::InvalidKey(format!(
                    "secret key must be {} bytes, got {}",
                    SECRET_KEY_LENGTH,
                    secret.len()
                ))
            })?);
        Ok(Self::from_secret_bytes(&secret))
    }

    /// The ed25519 public key.
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign `message` with the account's secret key.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(message).to_bytes()
    }

    /// X25519 secret for key agreement.
    pub(crate) fn exchange_secret(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_scalar_bytes())
    }
}

impl std::fmt::Debug for AccountKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountKeypair")
            .field("public_key", &bs58::encode(self.public_key()).into_string())
            .finish_non_exhaustive()
    }
}

/// Map a remote ed25519 account public key to its X25519 form.
pub(crate) fn exchange_public_key(public_key: &[u8]) -> Result<[u8; 32]> {
    let bytes: [u8; PUBLIC_KEY_LENGTH] = public_key.try_into().map_err(|_| {
        WalletError::InvalidKey(format!(
            "public key must be {} bytes, got {}",
            PUBLIC_KEY_LENGTH,
            public_key.len()
        ))
    })?;
    let verifying_key = VerifyingKey::from_bytes(&bytes)
        .map_err(|_| WalletError::InvalidKey("public key is not a curve point".to_string()))?;
    Ok(verifying_key.to_montgomery().to_bytes())
}

/// Verify an ed25519 signature made by an account.
pub fn verify_signature(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(bytes) = <[u8; PUBLIC_KEY_LENGTH]>::try_from(public_key) else {
        return false;
    };
    let Ok(signature) = ed25519_dalek::Signature::from_slice(signature) else {
        return false;
    };
    VerifyingKey::from_bytes(&bytes)
        .map(|key| key.verify_strict(message, &signature).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use x25519_dalek::{PublicKey, StaticSecret};

    #[test]
    fn test_sign_and_verify() {
        let keypair = AccountKeypair::generate();
        let signature = keypair.sign(b"hello");
        assert!(verify_signature(&keypair.public_key(), b"hello", &signature));
        assert!(!verify_signature(&keypair.public_key(), b"hellO", &signature));
    }

    #[test]
    fn test_secret_roundtrip() {
        let seed = [7u8; 32];
        let a = AccountKeypair::from_secret_bytes(&seed);
        let b = AccountKeypair::from_secret_slice(&seed).unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert!(AccountKeypair::from_secret_slice(&seed[..31]).is_err());
    }

    #[test]
    fn test_exchange_keys_agree() {
        let keypair = AccountKeypair::generate();
        let secret = StaticSecret::from(*keypair.exchange_secret());
        let derived = PublicKey::from(&secret).to_bytes();
        assert_eq!(exchange_public_key(&keypair.public_key()).unwrap(), derived);
    }

    #[test]
    fn test_exchange_public_key_rejects_bad_length() {
        let err = exchange_public_key(&[1u8; 31]).unwrap_err();
        assert!(matches!(err, WalletError::InvalidKey(_)));
    }
}
