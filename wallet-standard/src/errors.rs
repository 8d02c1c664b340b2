//! Error types for wallet discovery and account operations.
//!
//! Registry-internal failures ([`WalletError::Protocol`], [`WalletError::Listener`])
//! never escape [`Registry::push`](crate::registry::Registry::push); they are logged
//! or handed to the registry's error handler. Everything else is returned as the
//! rejected outcome of the account call that produced it.

use std::fmt;

use crate::crypto::CryptoBoxError;

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum WalletErrorCode {
    /// Feature not implemented or not compiled in
    Unimplemented = 1000,
    /// Unknown or malformed registry command
    Protocol = 2000,
    /// A registry or wallet listener panicked
    Listener = 2001,
    /// Transport/network layer error
    Transport = 3000,
    /// Connection timeout
    ConnectionTimeout = 3001,
    /// Transaction submission rejected or failed
    Submission = 3002,
    /// Decryption integrity check failed
    Authentication = 4000,
    /// Key material is malformed or unusable
    InvalidKey = 4001,
    /// Signing failed
    Signing = 4002,
    /// Requested cipher is not supported
    UnsupportedCipher = 5000,
    /// Requested chain is not supported
    UnsupportedChain = 5001,
    /// Invalid request/data
    InvalidData = 5002,
    /// Serialization error
    Serialization = 5003,
    /// Internal/unexpected error
    Internal = 9999,
}

/// Comprehensive error type for wallet operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Feature not implemented yet, or disabled at compile time.
    Unimplemented(&'static str),

    /// A command the registry does not understand. Logged, never returned by `push`.
    Protocol(String),

    /// A listener or callback panicked while the registry or a wallet was dispatching.
    Listener {
        /// What was being dispatched (e.g. "register listener", "get callback")
        context: String,
        /// Panic payload rendered as text
        message: String,
    },

    /// Transport/network layer error.
    Transport(String),

    /// Connection timeout.
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// A transaction was rejected by, or could not be delivered to, the network.
    Submission {
        /// Position of the transaction in the submitted batch
        index: usize,
        /// Reason reported by the submission collaborator
        reason: String,
    },

    /// A ciphertext/nonce pair did not verify against the derived shared key.
    Authentication {
        /// Position of the offending ciphertext within its input
        index: usize,
    },

    /// Key material is malformed (wrong length, not a curve point, low order).
    InvalidKey(String),

    /// Producing a signature failed.
    Signing(String),

    /// The requested cipher is not offered by this account.
    UnsupportedCipher(String),

    /// The requested chain is not supported by this wallet or account.
    UnsupportedChain(String),

    /// Invalid data provided.
    InvalidData {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Serialization/deserialization error.
    Serialization(String),

    /// Internal/unexpected error.
    Internal(String),
}

impl WalletError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> WalletErrorCode {
        match self {
            Self::Unimplemented(_) => WalletErrorCode::Unimplemented,
            Self::Protocol(_) => WalletErrorCode::Protocol,
            Self::Listener { .. } => WalletErrorCode::Listener,
            Self::Transport(_) => WalletErrorCode::Transport,
            Self::ConnectionTimeout { .. } => WalletErrorCode::ConnectionTimeout,
            Self::Submission { .. } => WalletErrorCode::Submission,
            Self::Authentication { .. } => WalletErrorCode::Authentication,
            Self::InvalidKey(_) => WalletErrorCode::InvalidKey,
            Self::Signing(_) => WalletErrorCode::Signing,
            Self::UnsupportedCipher(_) => WalletErrorCode::UnsupportedCipher,
            Self::UnsupportedChain(_) => WalletErrorCode::UnsupportedChain,
            Self::InvalidData { .. } => WalletErrorCode::InvalidData,
            Self::Serialization(_) => WalletErrorCode::Serialization,
            Self::Internal(_) => WalletErrorCode::Internal,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns true if the caller may reasonably retry the operation.
    ///
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::ConnectionTimeout { .. } | Self::Submission { .. }
        )
    }

    /// Create a submission error for the transaction at `index`.
    pub fn submission(index: usize, reason: impl Into<String>) -> Self {
        Self::Submission {
            index,
            reason: reason.into(),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a listener error from a caught panic payload.
    pub fn listener(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Listener {
            context: context.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unimplemented(label) => write!(f, "{} is not implemented", label),
            Self::Protocol(msg) => write!(f, "protocol error: {}", msg),
            Self::Listener { context, message } => {
                write!(f, "{} panicked: {}", context, message)
            }
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::ConnectionTimeout {
                operation,
                timeout_ms,
            } => {
                write!(f, "{} timed out after {}ms", operation, timeout_ms)
            }
            Self::Submission { index, reason } => {
                write!(f, "submission of transaction {} failed: {}", index, reason)
            }
            Self::Authentication { index } => {
                write!(f, "message authentication failed for ciphertext {}", index)
            }
            Self::InvalidKey(msg) => write!(f, "invalid key: {}", msg),
            Self::Signing(msg) => write!(f, "signing failed: {}", msg),
            Self::UnsupportedCipher(cipher) => write!(f, "cipher not supported: {}", cipher),
            Self::UnsupportedChain(chain) => write!(f, "chain not supported: {}", chain),
            Self::InvalidData { field, reason } => write!(f, "invalid {}: {}", field, reason),
            Self::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Self::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for WalletError {}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<CryptoBoxError> for WalletError {
    fn from(err: CryptoBoxError) -> Self {
        match err {
            CryptoBoxError::InvalidPublicKey(msg) | CryptoBoxError::KeyDerivation(msg) => {
                Self::InvalidKey(msg)
            }
            CryptoBoxError::InvalidNonce { .. } | CryptoBoxError::OpenFailed => {
                Self::Authentication { index: 0 }
            }
            CryptoBoxError::SealFailed(msg) => Self::Internal(msg),
        }
    }
}
