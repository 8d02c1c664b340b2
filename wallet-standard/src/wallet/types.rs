//! Wallet metadata value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the wallet standard a wallet implements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletVersion {
    /// `1.0.0`
    #[default]
    #[serde(rename = "1.0.0")]
    V1_0_0,
}

impl WalletVersion {
    /// Wire string of the version.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1_0_0 => "1.0.0",
        }
    }
}

impl fmt::Display for WalletVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of an encryption scheme an account supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletCipher {
    /// X25519 key agreement with XChaCha20-Poly1305 (24-byte nonces).
    #[serde(rename = "x25519-xchacha20-poly1305")]
    X25519XChaCha20Poly1305,
    /// X25519 key agreement with XSalsa20-Poly1305 (NaCl box).
    #[serde(rename = "x25519-xsalsa20-poly1305")]
    X25519XSalsa20Poly1305,
}

impl WalletCipher {
    /// Wire string of the cipher.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X25519XChaCha20Poly1305 => "x25519-xchacha20-poly1305",
            Self::X25519XSalsa20Poly1305 => "x25519-xsalsa20-poly1305",
        }
    }

    /// Parse a wire string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "x25519-xchacha20-poly1305" => Some(Self::X25519XChaCha20Poly1305),
            "x25519-xsalsa20-poly1305" => Some(Self::X25519XSalsa20Poly1305),
            _ => None,
        }
    }
}

impl fmt::Display for WalletCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
