//! Account capability contract.
//!
//! A [`WalletAccount`] is one key-pair-bound capability set: sign, sign and
//! send, sign arbitrary messages, and encrypt/decrypt with a key shared with
//! another account. Every batched operation is input-order-preserving: output
//! element `i` corresponds to input element `i`.
//!
//! # Example
//!
//! ```ignore
//! use wallet_standard::account::{AccountKeypair, EncryptInput, KeypairAccount, WalletAccount};
//! use wallet_standard::ChainId;
//!
//! let alice = KeypairAccount::builder(AccountKeypair::generate(), ChainId::solana_devnet()).build();
//! let bob = KeypairAccount::builder(AccountKeypair::generate(), ChainId::solana_devnet()).build();
//!
//! let sealed = alice
//!     .encrypt(&[EncryptInput::new(bob.public_key().to_vec(), vec![b"gm".to_vec()])])
//!     .await?;
//! ```

mod keypair;
mod keypair_account;

pub use keypair::{verify_signature, AccountKeypair, SIGNATURE_LENGTH};
pub use keypair_account::{KeypairAccount, KeypairAccountBuilder};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::wallet::WalletCipher;
use crate::{ChainId, Result, WalletError};

/// Input for signing one or more serialized transactions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignTransactionInput {
    /// Serialized transactions. They may already be partially signed.
    pub transactions: Vec<Vec<u8>>,
    /// Chain to sign for. Defaults to the account's chain.
    pub chain: Option<ChainId>,
}

impl SignTransactionInput {
    /// Sign `transactions` for the account's own chain.
    pub fn new(transactions: Vec<Vec<u8>>) -> Self {
        Self {
            transactions,
            chain: None,
        }
    }

    /// Sign for a specific chain.
    pub fn on_chain(mut self, chain: ChainId) -> Self {
        self.chain = Some(chain);
        self
    }
}

/// Result of signing one or more transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignTransactionOutput {
    /// Signed, serialized transactions in input order.
    ///
    /// Whole transactions rather than bare signatures, so wallets that rewrite
    /// transactions (multisig, meta-transactions) can return the modified form.
    pub signed_transactions: Vec<Vec<u8>>,
}

/// Input for signing and sending one or more transactions.
pub type SignAndSendTransactionInput = SignTransactionInput;

/// Result of signing and sending one or more transactions.
///
/// Every transaction is submitted on its own, so each slot carries its own
/// outcome: the transaction's "primary" signature as raw bytes once the
/// network acknowledged it, or the [`WalletError::Submission`] it was
/// rejected with. A rejection never hides the signatures of transactions
/// that landed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignAndSendTransactionOutput {
    /// Outcome of each transaction, in input order.
    pub signatures: Vec<Result<Vec<u8>>>,
}

impl SignAndSendTransactionOutput {
    /// True when the network acknowledged every transaction.
    pub fn is_complete(&self) -> bool {
        self.signatures.iter().all(|r| r.is_ok())
    }

    /// Signatures of the acknowledged transactions with their input index.
    pub fn landed(&self) -> impl Iterator<Item = (usize, &[u8])> + '_ {
        self.signatures
            .iter()
            .enumerate()
            .filter_map(|(index, r)| r.as_ref().ok().map(|sig| (index, sig.as_slice())))
    }

    /// Rejections, each naming its transaction's input index.
    pub fn failures(&self) -> impl Iterator<Item = &WalletError> + '_ {
        self.signatures.iter().filter_map(|r| r.as_ref().err())
    }

    /// All signatures, or the first rejection.
    pub fn into_signatures(self) -> Result<Vec<Vec<u8>>> {
        self.signatures.into_iter().collect()
    }
}

/// Input for signing arbitrary messages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignMessageInput {
    /// Messages to sign.
    pub messages: Vec<Vec<u8>>,
}

impl SignMessageInput {
    /// Sign `messages`.
    pub fn new(messages: Vec<Vec<u8>>) -> Self {
        Self { messages }
    }
}

/// Result of signing messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignMessageOutput {
    /// One signature per message, as raw bytes.
    pub signatures: Vec<Vec<u8>>,
}

/// One batch of cleartexts to encrypt for a single remote public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptInput {
    /// Remote account public key to derive the shared key with.
    pub public_key: Vec<u8>,
    /// Cleartexts to seal.
    pub cleartexts: Vec<Vec<u8>>,
    /// Cipher to use. Defaults to the account's preferred cipher.
    pub cipher: Option<WalletCipher>,
}

impl EncryptInput {
    /// Encrypt `cleartexts` for `public_key` with the default cipher.
    pub fn new(public_key: Vec<u8>, cleartexts: Vec<Vec<u8>>) -> Self {
        Self {
            public_key,
            cleartexts,
            cipher: None,
        }
    }

    /// Request a specific cipher.
    pub fn with_cipher(mut self, cipher: WalletCipher) -> Self {
        self.cipher = Some(cipher);
        self
    }
}

/// Result of encrypting one [`EncryptInput`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptOutput {
    /// Ciphertexts, one per cleartext.
    pub ciphertexts: Vec<Vec<u8>>,
    /// Nonce used for each ciphertext.
    pub nonces: Vec<Vec<u8>>,
    /// Cipher that was used.
    pub cipher: WalletCipher,
}

/// One batch of ciphertexts to decrypt from a single remote public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptInput {
    /// Remote account public key to derive the shared key with.
    pub public_key: Vec<u8>,
    /// Ciphertexts to open.
    pub ciphertexts: Vec<Vec<u8>>,
    /// Nonce for each ciphertext.
    pub nonces: Vec<Vec<u8>>,
    /// Cipher the ciphertexts were sealed with. Defaults to the account's preferred cipher.
    pub cipher: Option<WalletCipher>,
}

impl DecryptInput {
    /// Decrypt `ciphertexts` sealed under `nonces` by `public_key`.
    pub fn new(public_key: Vec<u8>, ciphertexts: Vec<Vec<u8>>, nonces: Vec<Vec<u8>>) -> Self {
        Self {
            public_key,
            ciphertexts,
            nonces,
            cipher: None,
        }
    }

    /// Decrypt the output of a matching encrypt call.
    pub fn from_output(public_key: Vec<u8>, output: EncryptOutput) -> Self {
        Self {
            public_key,
            ciphertexts: output.ciphertexts,
            nonces: output.nonces,
            cipher: Some(output.cipher),
        }
    }
}

/// Result of decrypting one [`DecryptInput`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptOutput {
    /// Cleartexts, one per ciphertext.
    pub cleartexts: Vec<Vec<u8>>,
    /// Cipher that was used.
    pub cipher: WalletCipher,
}

/// An account in a wallet that an app has been authorized to use.
///
/// Operations never mutate their inputs and are independent of each other.
#[async_trait]
pub trait WalletAccount: Send + Sync {
    /// Address of the account on its chain.
    fn address(&self) -> &[u8];

    /// Public key matching the secret key used to sign, encrypt and decrypt.
    fn public_key(&self) -> &[u8];

    /// Chain the account belongs to.
    fn chain(&self) -> &ChainId;

    /// Ciphers this account can encrypt and decrypt with.
    fn ciphers(&self) -> Vec<WalletCipher>;

    /// Sign transactions without submitting them.
    async fn sign_transaction(&self, input: &SignTransactionInput)
        -> Result<SignTransactionOutput>;

    /// Sign transactions and submit them to the network.
    ///
    /// Signing failures fail the whole call before anything is submitted.
    /// Once submission starts, each transaction's outcome is reported in its
    /// own slot of the output; a rejected transaction yields a
    /// [`WalletError::Submission`] carrying its index.
    async fn sign_and_send_transaction(
        &self,
        input: &SignAndSendTransactionInput,
    ) -> Result<SignAndSendTransactionOutput>;

    /// Sign arbitrary byte payloads.
    async fn sign_message(&self, input: &SignMessageInput) -> Result<SignMessageOutput>;

    /// Encrypt each input's cleartexts under a key shared with its public key.
    ///
    /// Every ciphertext gets a freshly drawn nonce.
    async fn encrypt(&self, inputs: &[EncryptInput]) -> Result<Vec<EncryptOutput>>;

    /// Decrypt each input independently.
    ///
    /// A failing input yields an error in its slot and no cleartexts at all;
    /// other inputs are unaffected.
    async fn decrypt(&self, inputs: &[DecryptInput]) -> Vec<Result<DecryptOutput>>;
}
