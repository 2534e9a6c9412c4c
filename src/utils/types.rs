//! Common types used throughout the reputation engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{Error, Result};

/// A wallet address as reported by the connected wallet.
///
/// The original casing is kept for display and outbound requests; comparisons
/// go through [`WalletAddress::key`], which lowercases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn new(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument("wallet address must not be empty".into()));
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c == '/' || c == '?' || c == '#') {
            return Err(Error::InvalidArgument(format!("invalid wallet address: {:?}", trimmed)));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form, used as a set / map key.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Shortened `0x1234...abcd` form for logs and terminal output.
    pub fn short(&self) -> String {
        if self.0.len() > 12 && self.0.is_ascii() {
            format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
        } else {
            self.0.clone()
        }
    }
}

impl PartialEq for WalletAddress {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for WalletAddress {}

impl std::hash::Hash for WalletAddress {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl FromStr for WalletAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric EVM chain id. Wallet-switch requests use the hex form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Parse a `0x`-prefixed hex chain id such as `0xaa36a7`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| Error::InvalidArgument(format!("chain id {:?} is not hex", s)))?;
        u64::from_str_radix(digits, 16)
            .map(ChainId)
            .map_err(|e| Error::InvalidArgument(format!("invalid hex chain id {:?}: {}", s, e)))
    }

    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        ChainId(id)
    }
}

/// Accepts either decimal (`11155111`) or hex (`0xaa36a7`).
impl FromStr for ChainId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with("0x") || s.starts_with("0X") {
            return Self::from_hex(s);
        }
        s.parse::<u64>()
            .map(ChainId)
            .map_err(|e| Error::InvalidArgument(format!("invalid chain id {:?}: {}", s, e)))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
