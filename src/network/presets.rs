//! The fixed network table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::network::types::{ChainId, NetworkDescriptor};

/// Base mainnet chain id (8453).
pub const BASE_CHAIN_ID: ChainId = ChainId(0x2105);
/// Base Sepolia chain id (84532).
pub const BASE_SEPOLIA_CHAIN_ID: ChainId = ChainId(0x14a34);

/// Supported networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// Base mainnet.
    Base,
    /// Base Sepolia testnet.
    #[serde(rename = "basesepolia")]
    BaseSepolia,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported network '{0}' (expected 'base' or 'basesepolia')")]
pub struct UnknownNetwork(pub String);

impl NetworkId {
    pub const ALL: [NetworkId; 2] = [NetworkId::Base, NetworkId::BaseSepolia];

    /// Identifier used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkId::Base => "base",
            NetworkId::BaseSepolia => "basesepolia",
        }
    }

    pub fn chain_id(self) -> ChainId {
        match self {
            NetworkId::Base => BASE_CHAIN_ID,
            NetworkId::BaseSepolia => BASE_SEPOLIA_CHAIN_ID,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            NetworkId::Base => "Base",
            NetworkId::BaseSepolia => "Base Sepolia",
        }
    }

    pub fn default_rpc_url(self) -> &'static str {
        match self {
            NetworkId::Base => "https://mainnet.base.org",
            NetworkId::BaseSepolia => "https://sepolia.base.org",
        }
    }

    /// Preset descriptor for this network.
    pub fn descriptor(self) -> NetworkDescriptor {
        NetworkDescriptor {
            chain_id: self.chain_id().to_hex(),
            name: self.display_name().to_string(),
            rpc_url: self.default_rpc_url().to_string(),
        }
    }

    /// Reverse lookup by chain id.
    pub fn from_chain_id(chain_id: ChainId) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.chain_id() == chain_id)
    }
}

impl FromStr for NetworkId {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|n| n.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownNetwork(s.to_string()))
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
