//! Wallet address type.
//!
//! Addresses arrive from unauthenticated clients and are treated as opaque
//! identifiers. No key material is involved; the only guarantees are the
//! well-formedness rules enforced by [`WalletAddress::parse`].

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque wallet address string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Longest address accepted from a client.
    pub const MAX_LEN: usize = 128;

    /// Wrap a raw string without validation.
    ///
    /// For internal use (store keys, fixtures). Client input goes through
    /// [`parse`](Self::parse).
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Validate and wrap a client-supplied address.
    ///
    /// Rejects empty strings, strings longer than [`MAX_LEN`](Self::MAX_LEN),
    /// and strings containing whitespace or control characters.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let addr = Self(raw.into());
        if addr.is_valid() {
            Ok(addr)
        } else {
            Err(TypeError::InvalidAddress(addr.0))
        }
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this address is well-formed.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= Self::MAX_LEN
            && !self.0.chars().any(|c| c.is_whitespace() || c.is_control())
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
