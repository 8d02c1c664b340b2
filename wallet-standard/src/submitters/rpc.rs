//! JSON-RPC `sendTransaction` submitter.
//!
//! Posts signed transactions to a Solana-compatible JSON-RPC node.
//!
//! # Feature Flags
//!
//! This module requires the `http-submitter` feature flag to be enabled for actual
//! HTTP requests. Without it, every submission returns an `Unimplemented` error.
//!
//! # Wire Format
//!
//! ```text
//! -> {"jsonrpc":"2.0","id":1,"method":"sendTransaction",
//!     "params":["<base64 tx>",{"encoding":"base64","skipPreflight":false,"preflightCommitment":"confirmed"}]}
//! <- {"jsonrpc":"2.0","id":1,"result":"<base58 signature>"}
//! <- {"jsonrpc":"2.0","id":1,"error":{"code":-32002,"message":"..."}}
//! ```

use async_trait::async_trait;
#[cfg(any(feature = "http-submitter", test))]
use base64::Engine;
#[cfg(any(feature = "http-submitter", test))]
use serde::Deserialize;
#[cfg(feature = "http-submitter")]
use std::time::Duration;

use super::config::RpcConfig;
use super::TransactionSubmitter;
use crate::{ChainId, Result, WalletError};

/// JSON-RPC error object.
#[cfg(any(feature = "http-submitter", test))]
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC response envelope.
#[cfg(any(feature = "http-submitter", test))]
#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorObject>,
}

/// Submitter broadcasting through a JSON-RPC node.
pub struct RpcSubmitter {
    config: RpcConfig,
    #[cfg(feature = "http-submitter")]
    client: reqwest::Client,
}

impl RpcSubmitter {
    /// Create a new RPC submitter with the given configuration.
    #[cfg(feature = "http-submitter")]
    pub fn new(config: RpcConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WalletError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create a new RPC submitter with the given configuration (stub when feature disabled).
    #[cfg(not(feature = "http-submitter"))]
    pub fn new(config: RpcConfig) -> Result<Self> {
        Ok(Self { config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Build the `sendTransaction` request body.
    #[cfg(any(feature = "http-submitter", test))]
    fn request_body(&self, signed_transaction: &[u8]) -> serde_json::Value {
        let encoded = base64::engine::general_purpose::STANDARD.encode(signed_transaction);
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "sendTransaction",
            "params": [
                encoded,
                {
                    "encoding": "base64",
                    "skipPreflight": self.config.skip_preflight,
                    "preflightCommitment": self.config.commitment,
                }
            ]
        })
    }

    /// Turn a response body into raw signature bytes.
    #[cfg(any(feature = "http-submitter", test))]
    fn parse_response(&self, body: &str) -> Result<Vec<u8>> {
        let response: RpcResponse = serde_json::from_str(body)?;

        if let Some(error) = response.error {
            return Err(WalletError::submission(
                0,
                format!("rpc error {}: {}", error.code, error.message),
            ));
        }

        let signature = response.result.ok_or_else(|| {
            WalletError::Serialization("rpc response has neither result nor error".to_string())
        })?;

        bs58::decode(&signature)
            .into_vec()
            .map_err(|e| WalletError::Serialization(format!("signature is not base58: {}", e)))
    }

    /// Post a request body to the node.
    #[cfg(feature = "http-submitter")]
    async fn post(&self, body: &serde_json::Value) -> Result<String> {
        let response = self
            .client
            .post(&self.config.rpc_url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| WalletError::Serialization(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(self.map_status_error(status.as_u16(), &text));
        }

        Ok(text)
    }

    /// Map HTTP status codes to WalletError.
    #[cfg(feature = "http-submitter")]
    fn map_status_error(&self, status: u16, error_text: &str) -> WalletError {
        match status {
            429 => WalletError::Transport(format!("rate limited: {}", error_text)),
            500..=599 => WalletError::Transport(format!(
                "rpc server error ({}): {}",
                status, error_text
            )),
            _ => WalletError::submission(
                0,
                format!("rpc request failed ({}): {}", status, error_text),
            ),
        }
    }

    /// Map reqwest errors to WalletError.
    #[cfg(feature = "http-submitter")]
    fn map_reqwest_error(&self, e: reqwest::Error) -> WalletError {
        if e.is_timeout() {
            WalletError::ConnectionTimeout {
                operation: "sendTransaction".to_string(),
                timeout_ms: self.config.timeout_ms(),
            }
        } else {
            WalletError::Transport(format!("rpc request failed: {}", e))
        }
    }

    /// Send one signed transaction and decode the acknowledged signature.
    #[cfg(feature = "http-submitter")]
    async fn send(&self, signed_transaction: &[u8]) -> Result<Vec<u8>> {
        let body = self.request_body(signed_transaction);
        let text = self.post(&body).await?;
        self.parse_response(&text)
    }

    /// Send one signed transaction (stub when feature disabled).
    #[cfg(not(feature = "http-submitter"))]
    async fn send(&self, _signed_transaction: &[u8]) -> Result<Vec<u8>> {
        Err(WalletError::Unimplemented(
            "RPC submission not compiled - enable the 'http-submitter' feature",
        ))
    }
}

#[async_trait]
impl TransactionSubmitter for RpcSubmitter {
    async fn submit_transaction(
        &self,
        chain: &ChainId,
        signed_transaction: &[u8],
    ) -> Result<Vec<u8>> {
        if chain != &self.config.chain {
            return Err(WalletError::UnsupportedChain(chain.to_string()));
        }

        let signature = self.send(signed_transaction).await?;
        tracing::debug!(
            chain = %chain,
            signature = %bs58::encode(&signature).into_string(),
            "transaction submitted"
        );
        Ok(signature)
    }
}
