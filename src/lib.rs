//! Base Account bridge library.
//!
//! Drives a Base Account wallet provider through a fixed pipeline:
//! initialize → connect wallet → fetch or create sub-account → send batch transactions.

pub mod bridge;
pub mod client;
pub mod config;
pub mod network;
pub mod observability;
pub mod provider;
pub mod sdk;
pub mod session;

pub use bridge::{Bridge, HostPlatform, LocalBridge};
pub use client::{BaseAccountClient, BridgeEvent, ClientError, ClientState};
pub use config::BridgeConfig;
pub use network::{NetworkDescriptor, NetworkId};
pub use session::{Call, WalletSession};
