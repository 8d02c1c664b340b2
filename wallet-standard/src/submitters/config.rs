//! Configuration types for transaction submitters.

use serde::{Deserialize, Serialize};

use crate::ChainId;

/// Environment variable holding the RPC endpoint URL.
pub const ENV_RPC_URL: &str = "WALLET_STANDARD_RPC_URL";

/// Environment variable holding the chain id (e.g. `solana:devnet`).
pub const ENV_CHAIN: &str = "WALLET_STANDARD_CHAIN";

/// Environment variable holding the request timeout in seconds.
pub const ENV_RPC_TIMEOUT: &str = "WALLET_STANDARD_RPC_TIMEOUT";

/// Configuration for the JSON-RPC transaction submitter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL (e.g., `https://api.devnet.solana.com`).
    pub rpc_url: String,

    /// Chain the endpoint serves. Submissions for other chains are refused.
    pub chain: ChainId,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Commitment level used for preflight simulation.
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Skip the node's preflight simulation.
    #[serde(default)]
    pub skip_preflight: bool,
}

fn default_timeout() -> u64 {
    30
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

impl RpcConfig {
    /// Create a new RPC configuration.
    pub fn new(rpc_url: impl Into<String>, chain: ChainId) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            chain,
            timeout_secs: default_timeout(),
            commitment: default_commitment(),
            skip_preflight: false,
        }
    }

    /// Solana mainnet (beta).
    pub fn solana_mainnet() -> Self {
        Self::new("https://api.mainnet-beta.solana.com", ChainId::solana_mainnet())
    }

    /// Solana devnet.
    pub fn solana_devnet() -> Self {
        Self::new("https://api.devnet.solana.com", ChainId::solana_devnet())
    }

    /// Solana testnet.
    pub fn solana_testnet() -> Self {
        Self::new("https://api.testnet.solana.com", ChainId::solana_testnet())
    }

    /// A local test validator on the default port.
    pub fn localnet() -> Self {
        Self::new("http://127.0.0.1:8899", ChainId::solana_devnet())
    }

    /// Load configuration from environment variables.
    ///
    /// Returns `None` when `WALLET_STANDARD_RPC_URL` is not set. The chain
    /// defaults to devnet and the timeout to 30 seconds.
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, keyed by the `ENV_*` names.
    ///
    /// An unparsable timeout is ignored and the default kept.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let rpc_url = lookup(ENV_RPC_URL)?;
        let chain = lookup(ENV_CHAIN)
            .map(ChainId::from)
            .unwrap_or_else(ChainId::solana_devnet);
        let mut config = Self::new(rpc_url, chain);

        if let Some(secs) = lookup(ENV_RPC_TIMEOUT).and_then(|v| v.trim().parse().ok()) {
            config.timeout_secs = secs;
        }

        Some(config)
    }

    /// Request timeout in milliseconds, saturating at `u64::MAX`.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_secs.saturating_mul(1000)
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the preflight commitment level.
    pub fn with_commitment(mut self, commitment: impl Into<String>) -> Self {
        self.commitment = commitment.into();
        self
    }

    /// Skip or run preflight simulation.
    pub fn with_skip_preflight(mut self, skip: bool) -> Self {
        self.skip_preflight = skip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_presets() {
        assert_eq!(RpcConfig::solana_devnet().chain, ChainId::solana_devnet());
        assert!(RpcConfig::solana_mainnet().rpc_url.contains("mainnet-beta"));
        assert_eq!(RpcConfig::localnet().timeout_secs, 30);
    }

    #[test]
    fn test_serde_defaults() {
        let config: RpcConfig = serde_json::from_str(
            r#"{"rpc_url":"http://localhost:8899","chain":"solana:devnet"}"#,
        )
        .unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.commitment, "confirmed");
        assert!(!config.skip_preflight);
    }

    #[test]
    fn test_builder() {
        let config = RpcConfig::solana_testnet()
            .with_timeout(5)
            .with_commitment("finalized")
            .with_skip_preflight(true);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.commitment, "finalized");
        assert!(config.skip_preflight);
    }

    #[test]
    fn test_from_vars_requires_url() {
        assert!(RpcConfig::from_vars(vars(&[])).is_none());
        assert!(RpcConfig::from_vars(vars(&[(ENV_CHAIN, "solana:mainnet")])).is_none());
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = RpcConfig::from_vars(vars(&[(ENV_RPC_URL, "http://node:8899")])).unwrap();
        assert_eq!(config.rpc_url, "http://node:8899");
        assert_eq!(config.chain, ChainId::solana_devnet());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = RpcConfig::from_vars(vars(&[
            (ENV_RPC_URL, "http://node:8899"),
            (ENV_CHAIN, "solana:mainnet"),
            (ENV_RPC_TIMEOUT, " 7 "),
        ]))
        .unwrap();
        assert_eq!(config.chain, ChainId::solana_mainnet());
        assert_eq!(config.timeout_secs, 7);
    }

    #[test]
    fn test_from_vars_ignores_bad_timeout() {
        let config = RpcConfig::from_vars(vars(&[
            (ENV_RPC_URL, "http://node:8899"),
            (ENV_RPC_TIMEOUT, "soon"),
        ]))
        .unwrap();
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_timeout_ms_saturates() {
        assert_eq!(RpcConfig::localnet().timeout_ms(), 30_000);
        let huge = RpcConfig::from_vars(vars(&[
            (ENV_RPC_URL, "http://node:8899"),
            (ENV_RPC_TIMEOUT, &u64::MAX.to_string()),
        ]))
        .unwrap();
        assert_eq!(huge.timeout_ms(), u64::MAX);
    }
}
