//! Transaction submission backends.
//!
//! Accounts delegate `sign_and_send_transaction` broadcasting to a
//! [`TransactionSubmitter`]. Timeouts, retries and network selection all
//! belong to the submitter; the account only sees success or failure.
//!
//! ## Feature Flags
//!
//! The `http-submitter` feature flag must be enabled for actual RPC requests:
//!
//! ```toml
//! [dependencies]
//! wallet-standard = { version = "1.0", features = ["http-submitter"] }
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wallet_standard::submitters::{RpcConfig, RpcSubmitter};
//!
//! let submitter = RpcSubmitter::new(RpcConfig::solana_devnet())?;
//! let signature = submitter.submit_transaction(&chain, &signed_tx).await?;
//! ```

mod config;
mod rpc;

pub use config::RpcConfig;
pub use rpc::RpcSubmitter;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::signing::primary_signature;
use crate::{ChainId, Result, WalletError};

/// Broadcasts signed transactions to a network.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Submit one signed transaction to `chain`.
    ///
    /// Returns the network-assigned primary signature as raw bytes once the
    /// network acknowledges the transaction.
    async fn submit_transaction(&self, chain: &ChainId, signed_transaction: &[u8])
        -> Result<Vec<u8>>;
}

type RejectFn = dyn Fn(&[u8]) -> bool + Send + Sync;

/// In-memory submitter for tests and demos.
///
/// Records every submission and acknowledges it with the primary signature of
/// a [`DetachedSigner`](crate::signing::DetachedSigner)-signed transaction.
#[derive(Default)]
pub struct MockSubmitter {
    reject: Option<Arc<RejectFn>>,
    latency: Option<Duration>,
    submissions: Mutex<Vec<(ChainId, Vec<u8>)>>,
    seen: Mutex<HashSet<Vec<u8>>>,
}

impl MockSubmitter {
    /// Create a submitter that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a submitter that rejects everything.
    pub fn failing() -> Self {
        Self::rejecting(|_| true)
    }

    /// Create a submitter that rejects signed transactions matching `predicate`.
    pub fn rejecting(predicate: impl Fn(&[u8]) -> bool + Send + Sync + 'static) -> Self {
        Self {
            reject: Some(Arc::new(predicate)),
            ..Self::default()
        }
    }

    /// Wait `latency` before acknowledging each submission.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Every accepted submission, in acknowledgement order.
    pub fn submissions(&self) -> Vec<(ChainId, Vec<u8>)> {
        self.submissions.lock().clone()
    }
}

#[async_trait]
impl TransactionSubmitter for MockSubmitter {
    async fn submit_transaction(
        &self,
        chain: &ChainId,
        signed_transaction: &[u8],
    ) -> Result<Vec<u8>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(reject) = &self.reject {
            if reject(signed_transaction) {
                return Err(WalletError::Transport("Simulated rejection".to_string()));
            }
        }

        let signature = primary_signature(signed_transaction)?;
        if !self.seen.lock().insert(signature.clone()) {
            return Err(WalletError::Transport(
                "transaction already processed".to_string(),
            ));
        }

        self.submissions
            .lock()
            .push((chain.clone(), signed_transaction.to_vec()));
        Ok(signature)
    }
}
