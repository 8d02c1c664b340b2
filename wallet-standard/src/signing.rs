//! Transaction signing backends.
//!
//! A [`TransactionSigner`] turns raw transaction bytes into a signed
//! transaction using an account's keypair. Chain-specific transaction formats
//! live behind this trait; the account contract only moves bytes.

use crate::account::{AccountKeypair, SIGNATURE_LENGTH};
use crate::{Result, WalletError};

/// Signs serialized transactions with an account keypair.
pub trait TransactionSigner: Send + Sync {
    /// Sign one serialized transaction. Must not modify the input.
    fn sign_transaction(&self, keypair: &AccountKeypair, transaction: &[u8]) -> Result<Vec<u8>>;

    /// Sign an arbitrary message. No transaction parsing takes place.
    fn sign_message(&self, keypair: &AccountKeypair, message: &[u8]) -> Result<Vec<u8>> {
        Ok(keypair.sign(message).to_vec())
    }
}

/// Signer producing `signature || transaction`.
///
/// The first [`SIGNATURE_LENGTH`] bytes of the signed transaction are its
/// primary signature.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedSigner;

impl DetachedSigner {
    /// Create the signer.
    pub fn new() -> Self {
        Self
    }
}

impl TransactionSigner for DetachedSigner {
    fn sign_transaction(&self, keypair: &AccountKeypair, transaction: &[u8]) -> Result<Vec<u8>> {
        if transaction.is_empty() {
            return Err(WalletError::Signing("transaction is empty".to_string()));
        }

        let signature = keypair.sign(transaction);
        let mut signed = Vec::with_capacity(SIGNATURE_LENGTH + transaction.len());
        signed.extend_from_slice(&signature);
        signed.extend_from_slice(transaction);
        Ok(signed)
    }
}

/// Primary signature of a transaction signed by [`DetachedSigner`].
pub fn primary_signature(signed_transaction: &[u8]) -> Result<Vec<u8>> {
    if signed_transaction.len() <= SIGNATURE_LENGTH {
        return Err(WalletError::invalid_data(
            "signed_transaction",
            format!("expected more than {} bytes", SIGNATURE_LENGTH),
        ));
    }
    Ok(signed_transaction[..SIGNATURE_LENGTH].to_vec())
}
