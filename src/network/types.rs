//! Chain identifiers and network descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Wire representation, e.g. `0x2105`.
    pub fn to_hex(self) -> String {
        format!("0x{:x}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A chain id string that is neither `0x`-hex nor decimal.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid chain id '{0}'")]
pub struct InvalidChainId(pub String);

impl FromStr for ChainId {
    type Err = InvalidChainId;

    /// Accepts `0x`-prefixed hex (any case) or plain decimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
                u64::from_str_radix(hex, 16).ok()
            }
            Some(_) => None,
            // `parse` alone would let a leading sign through.
            None if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) => {
                trimmed.parse::<u64>().ok()
            }
            None => None,
        };
        parsed.map(ChainId).ok_or_else(|| InvalidChainId(s.to_string()))
    }
}

/// Network the session talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    /// Hex chain id, e.g. `0x14a34`.
    pub chain_id: String,
    /// Display name.
    pub name: String,
    /// JSON-RPC endpoint.
    pub rpc_url: String,
}

impl NetworkDescriptor {
    /// Replace the RPC URL when an override is given.
    ///
    /// Blank overrides are ignored.
    pub fn with_rpc_override(mut self, custom_rpc_url: Option<&str>) -> Self {
        if let Some(url) = custom_rpc_url.map(str::trim).filter(|u| !u.is_empty()) {
            self.rpc_url = url.to_string();
        }
        self
    }

    /// Numeric chain id of this descriptor.
    pub fn chain(&self) -> Option<ChainId> {
        self.chain_id.parse().ok()
    }

    /// Serialize for the host side.
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}
