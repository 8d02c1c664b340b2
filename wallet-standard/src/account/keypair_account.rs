//! Keypair-backed account.
//!
//! [`KeypairAccount`] implements [`WalletAccount`] on top of three injected
//! collaborators: a [`TransactionSigner`], a [`CryptoBox`] and an optional
//! [`TransactionSubmitter`]. The secret key stays inside the account.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use rand::rngs::OsRng;
use rand::RngCore;

use super::keypair::{exchange_public_key, AccountKeypair};
use super::{
    DecryptInput, DecryptOutput, EncryptInput, EncryptOutput, SignAndSendTransactionInput,
    SignAndSendTransactionOutput, SignMessageInput, SignMessageOutput, SignTransactionInput,
    SignTransactionOutput, WalletAccount,
};
use crate::crypto::{CryptoBox, CryptoBoxError, SharedKey, X25519XChaCha20Poly1305};
use crate::signing::{DetachedSigner, TransactionSigner};
use crate::submitters::TransactionSubmitter;
use crate::wallet::WalletCipher;
use crate::{ChainId, Result, WalletError};

/// An account holding its own ed25519 keypair.
pub struct KeypairAccount {
    keypair: AccountKeypair,
    public_key: Vec<u8>,
    address: Vec<u8>,
    chain: ChainId,
    chains: Vec<ChainId>,
    signer: Arc<dyn TransactionSigner>,
    crypto_box: Arc<dyn CryptoBox>,
    submitter: Option<Arc<dyn TransactionSubmitter>>,
}

impl KeypairAccount {
    /// Start building an account for `keypair` on `chain`.
    pub fn builder(keypair: AccountKeypair, chain: ChainId) -> KeypairAccountBuilder {
        KeypairAccountBuilder::new(keypair, chain)
    }

    /// Chains this account can sign for. The first entry is its own chain.
    pub fn chains(&self) -> &[ChainId] {
        &self.chains
    }

    fn resolve_chain<'a>(&'a self, requested: Option<&'a ChainId>) -> Result<&'a ChainId> {
        let chain = requested.unwrap_or(&self.chain);
        if !self.chains.contains(chain) {
            return Err(WalletError::UnsupportedChain(chain.to_string()));
        }
        Ok(chain)
    }

    fn check_cipher(&self, requested: Option<WalletCipher>) -> Result<WalletCipher> {
        let supported = self.crypto_box.cipher();
        match requested {
            Some(cipher) if cipher != supported => {
                Err(WalletError::UnsupportedCipher(cipher.to_string()))
            }
            _ => Ok(supported),
        }
    }

    fn shared_key(&self, public_key: &[u8]) -> Result<SharedKey> {
        let remote = exchange_public_key(public_key)?;
        let secret = self.keypair.exchange_secret();
        Ok(self.crypto_box.derive_shared_key(&remote, &secret)?)
    }

    /// Draw a nonce not yet handed out during this call.
    fn fresh_nonce(&self, used: &mut HashSet<Vec<u8>>) -> Vec<u8> {
        loop {
            let mut nonce = vec![0u8; self.crypto_box.nonce_len()];
            OsRng.fill_bytes(&mut nonce);
            if used.insert(nonce.clone()) {
                return nonce;
            }
        }
    }

    fn sign_all(&self, transactions: &[Vec<u8>]) -> Result<Vec<Vec<u8>>> {
        transactions
            .iter()
            .map(|tx| self.signer.sign_transaction(&self.keypair, tx))
            .collect()
    }

    fn decrypt_one(&self, input: &DecryptInput) -> Result<DecryptOutput> {
        let cipher = self.check_cipher(input.cipher)?;
        if input.ciphertexts.len() != input.nonces.len() {
            return Err(WalletError::invalid_data(
                "nonces",
                format!(
                    "expected {} nonces, got {}",
                    input.ciphertexts.len(),
                    input.nonces.len()
                ),
            ));
        }

        let key = self.shared_key(&input.public_key)?;
        let cleartexts = input
            .ciphertexts
            .iter()
            .zip(&input.nonces)
            .enumerate()
            .map(|(index, (ciphertext, nonce))| {
                self.crypto_box
                    .open(ciphertext, nonce, &key)
                    .map_err(|e| match e {
                        CryptoBoxError::OpenFailed | CryptoBoxError::InvalidNonce { .. } => {
                            WalletError::Authentication { index }
                        }
                        other => other.into(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DecryptOutput { cleartexts, cipher })
    }
}

impl std::fmt::Debug for KeypairAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeypairAccount")
            .field("address", &bs58::encode(&self.address).into_string())
            .field("chain", &self.chain)
            .field("cipher", &self.crypto_box.cipher())
            .field("has_submitter", &self.submitter.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletAccount for KeypairAccount {
    fn address(&self) -> &[u8] {
        &self.address
    }

    fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    fn chain(&self) -> &ChainId {
        &self.chain
    }

    fn ciphers(&self) -> Vec<WalletCipher> {
        vec![self.crypto_box.cipher()]
    }

    #[tracing::instrument(skip_all, fields(count = input.transactions.len()))]
    async fn sign_transaction(
        &self,
        input: &SignTransactionInput,
    ) -> Result<SignTransactionOutput> {
        self.resolve_chain(input.chain.as_ref())?;
        let signed_transactions = self.sign_all(&input.transactions)?;
        Ok(SignTransactionOutput {
            signed_transactions,
        })
    }

    #[tracing::instrument(skip_all, fields(count = input.transactions.len()))]
    async fn sign_and_send_transaction(
        &self,
        input: &SignAndSendTransactionInput,
    ) -> Result<SignAndSendTransactionOutput> {
        let chain = self.resolve_chain(input.chain.as_ref())?;
        let signed = self.sign_all(&input.transactions)?;

        let Some(submitter) = &self.submitter else {
            return Err(WalletError::submission(0, "no submitter configured"));
        };

        let results = join_all(
            signed
                .iter()
                .map(|tx| submitter.submit_transaction(chain, tx)),
        )
        .await;

        let signatures = results
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                result.map_err(|e| {
                    tracing::warn!(index, error = %e, "transaction submission failed");
                    let reason = match e {
                        WalletError::Submission { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    WalletError::submission(index, reason)
                })
            })
            .collect();

        Ok(SignAndSendTransactionOutput { signatures })
    }

    #[tracing::instrument(skip_all, fields(count = input.messages.len()))]
    async fn sign_message(&self, input: &SignMessageInput) -> Result<SignMessageOutput> {
        let signatures = input
            .messages
            .iter()
            .map(|message| self.signer.sign_message(&self.keypair, message))
            .collect::<Result<Vec<_>>>()?;
        Ok(SignMessageOutput { signatures })
    }

    #[tracing::instrument(skip_all, fields(inputs = inputs.len()))]
    async fn encrypt(&self, inputs: &[EncryptInput]) -> Result<Vec<EncryptOutput>> {
        let mut used = HashSet::new();
        let mut outputs = Vec::with_capacity(inputs.len());

        for input in inputs {
            let cipher = self.check_cipher(input.cipher)?;
            let key = self.shared_key(&input.public_key)?;

            let mut ciphertexts = Vec::with_capacity(input.cleartexts.len());
            let mut nonces = Vec::with_capacity(input.cleartexts.len());
            for cleartext in &input.cleartexts {
                let nonce = self.fresh_nonce(&mut used);
                ciphertexts.push(self.crypto_box.seal(cleartext, &nonce, &key)?);
                nonces.push(nonce);
            }

            outputs.push(EncryptOutput {
                ciphertexts,
                nonces,
                cipher,
            });
        }

        Ok(outputs)
    }

    #[tracing::instrument(skip_all, fields(inputs = inputs.len()))]
    async fn decrypt(&self, inputs: &[DecryptInput]) -> Vec<Result<DecryptOutput>> {
        inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                let result = self.decrypt_one(input);
                if let Err(e) = &result {
                    tracing::debug!(index, error = %e, "decrypt input rejected");
                }
                result
            })
            .collect()
    }
}

/// Builder for [`KeypairAccount`].
pub struct KeypairAccountBuilder {
    keypair: AccountKeypair,
    chain: ChainId,
    extra_chains: Vec<ChainId>,
    address: Option<Vec<u8>>,
    signer: Arc<dyn TransactionSigner>,
    crypto_box: Arc<dyn CryptoBox>,
    submitter: Option<Arc<dyn TransactionSubmitter>>,
}

impl KeypairAccountBuilder {
    fn new(keypair: AccountKeypair, chain: ChainId) -> Self {
        Self {
            keypair,
            chain,
            extra_chains: Vec::new(),
            address: None,
            signer: Arc::new(DetachedSigner),
            crypto_box: Arc::new(X25519XChaCha20Poly1305),
            submitter: None,
        }
    }

    /// Use a chain-specific address instead of the raw public key.
    pub fn address(mut self, address: impl Into<Vec<u8>>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Allow signing for another chain via the per-call chain override.
    pub fn also_chain(mut self, chain: ChainId) -> Self {
        self.extra_chains.push(chain);
        self
    }

    /// Replace the default [`DetachedSigner`].
    pub fn signer(mut self, signer: Arc<dyn TransactionSigner>) -> Self {
        self.signer = signer;
        self
    }

    /// Replace the default [`X25519XChaCha20Poly1305`] box.
    pub fn crypto_box(mut self, crypto_box: Arc<dyn CryptoBox>) -> Self {
        self.crypto_box = crypto_box;
        self
    }

    /// Set the broadcast backend used by `sign_and_send_transaction`.
    pub fn submitter(mut self, submitter: Arc<dyn TransactionSubmitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    /// Build the account.
    pub fn build(self) -> KeypairAccount {
        let public_key = self.keypair.public_key().to_vec();
        let address = self.address.unwrap_or_else(|| public_key.clone());

        let mut chains = vec![self.chain.clone()];
        for chain in self.extra_chains {
            if !chains.contains(&chain) {
                chains.push(chain);
            }
        }

        KeypairAccount {
            keypair: self.keypair,
            public_key,
            address,
            chain: self.chain,
            chains,
            signer: self.signer,
            crypto_box: self.crypto_box,
            submitter: self.submitter,
        }
    }
}
