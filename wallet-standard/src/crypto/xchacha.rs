//! X25519 key agreement + XChaCha20-Poly1305 sealing.
//!
//! # Key Derivation
//!
//! ```text
//! shared_key = HKDF-SHA256(ikm = X25519(secret, public), salt = none, info = KEY_INFO)
//! ```
//!
//! Nonces are 24 bytes, which makes random nonces safe to draw per message.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    Key, XChaCha20Poly1305, XNonce,
};
use hkdf::Hkdf;
use sha2::Sha256;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use super::{CryptoBox, CryptoBoxError, CryptoBoxResult, SharedKey, SHARED_KEY_SIZE};
use crate::wallet::WalletCipher;

/// Size of the nonce in bytes (192 bits for XChaCha).
pub const NONCE_SIZE: usize = 24;

/// Size of the authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Domain separation for the HKDF expand step.
const KEY_INFO: &[u8] = b"wallet-standard/x25519-xchacha20-poly1305/v1";

/// The default [`CryptoBox`]: `x25519-xchacha20-poly1305`.
#[derive(Clone, Copy, Debug, Default)]
pub struct X25519XChaCha20Poly1305;

impl X25519XChaCha20Poly1305 {
    /// Create the box.
    pub fn new() -> Self {
        Self
    }

    fn nonce<'a>(&self, nonce: &'a [u8]) -> CryptoBoxResult<&'a XNonce> {
        if nonce.len() != NONCE_SIZE {
            return Err(CryptoBoxError::InvalidNonce {
                expected: NONCE_SIZE,
                actual: nonce.len(),
            });
        }
        Ok(XNonce::from_slice(nonce))
    }
}

impl CryptoBox for X25519XChaCha20Poly1305 {
    fn cipher(&self) -> WalletCipher {
        WalletCipher::X25519XChaCha20Poly1305
    }

    fn nonce_len(&self) -> usize {
        NONCE_SIZE
    }

    fn derive_shared_key(
        &self,
        public_key: &[u8; 32],
        secret_key: &[u8; 32],
    ) -> CryptoBoxResult<SharedKey> {
        let secret = StaticSecret::from(*secret_key);
        let shared = secret.diffie_hellman(&PublicKey::from(*public_key));

        // All-zero output means the peer sent a low-order point
        if !shared.was_contributory() {
            return Err(CryptoBoxError::InvalidPublicKey(
                "public key is a low-order point".to_string(),
            ));
        }

        let hk = Hkdf::<Sha256>::new(None, shared.as_bytes());
        let mut okm = Zeroizing::new([0u8; SHARED_KEY_SIZE]);
        hk.expand(KEY_INFO, &mut okm[..])
            .map_err(|e| CryptoBoxError::KeyDerivation(e.to_string()))?;

        Ok(SharedKey::from_bytes(*okm))
    }

    fn seal(&self, plaintext: &[u8], nonce: &[u8], key: &SharedKey) -> CryptoBoxResult<Vec<u8>> {
        let nonce = self.nonce(nonce)?;
        let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
        cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| CryptoBoxError::SealFailed(e.to_string()))
    }

    fn open(&self, ciphertext: &[u8], nonce: &[u8], key: &SharedKey) -> CryptoBoxResult<Vec<u8>> {
        let nonce = self.nonce(nonce)?;
        if ciphertext.len() < TAG_SIZE {
            return Err(CryptoBoxError::OpenFailed);
        }
        let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
        cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoBoxError::OpenFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use rand::RngCore;

    fn keypair() -> ([u8; 32], [u8; 32]) {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        (secret.to_bytes(), public.to_bytes())
    }

    fn nonce() -> [u8; NONCE_SIZE] {
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);
        nonce
    }

    #[test]
    fn test_both_sides_derive_same_key() {
        let cbox = X25519XChaCha20Poly1305::new();
        let (alice_sk, alice_pk) = keypair();
        let (bob_sk, bob_pk) = keypair();

        let k1 = cbox.derive_shared_key(&bob_pk, &alice_sk).unwrap();
        let k2 = cbox.derive_shared_key(&alice_pk, &bob_sk).unwrap();
        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_seal_open() {
        let cbox = X25519XChaCha20Poly1305::new();
        let (alice_sk, _) = keypair();
        let (_, bob_pk) = keypair();
        let key = cbox.derive_shared_key(&bob_pk, &alice_sk).unwrap();
        let nonce = nonce();

        let sealed = cbox.seal(b"gm", &nonce, &key).unwrap();
        assert_eq!(sealed.len(), 2 + TAG_SIZE);
        assert_eq!(cbox.open(&sealed, &nonce, &key).unwrap(), b"gm");
    }

    #[test]
    fn test_open_rejects_wrong_nonce() {
        let cbox = X25519XChaCha20Poly1305::new();
        let (alice_sk, _) = keypair();
        let (_, bob_pk) = keypair();
        let key = cbox.derive_shared_key(&bob_pk, &alice_sk).unwrap();

        let sealed = cbox.seal(b"payload", &nonce(), &key).unwrap();
        assert!(matches!(
            cbox.open(&sealed, &nonce(), &key),
            Err(CryptoBoxError::OpenFailed)
        ));
        assert!(matches!(
            cbox.open(&sealed, &[0u8; 12], &key),
            Err(CryptoBoxError::InvalidNonce { expected: 24, actual: 12 })
        ));
    }

    #[test]
    fn test_low_order_point_rejected() {
        let cbox = X25519XChaCha20Poly1305::new();
        let (alice_sk, _) = keypair();
        let result = cbox.derive_shared_key(&[0u8; 32], &alice_sk);
        assert!(matches!(result, Err(CryptoBoxError::InvalidPublicKey(_))));
    }
}
