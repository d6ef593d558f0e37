//! Network selection.
//!
//! # Data Flow
//! ```text
//! config "network" string (case-insensitive)
//!     → presets.rs (fixed table lookup)
//!     → optional custom RPC override
//!     → NetworkDescriptor (immutable for the session)
//! ```
//!
//! # Design Decisions
//! - Only Base mainnet and Base Sepolia are supported
//! - Chain IDs travel as `0x`-prefixed lowercase hex on the wire

pub mod presets;
pub mod types;

pub use presets::NetworkId;
pub use types::{ChainId, NetworkDescriptor};
