//! Client lifecycle state machine.
//!
//! # States
//! ```text
//! Uninitialized → Initializing → Ready
//!     → WalletConnecting → WalletConnected
//!     → SubAccountFetching → SubAccountReady
//! ```
//!
//! # State Transitions
//! - A failed initialization returns to `Uninitialized`
//! - A failed connect or sub-account lookup returns to the state it started from
//! - Sending a transaction does not change state

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientState {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
    WalletConnecting,
    WalletConnected,
    SubAccountFetching,
    SubAccountReady,
}

impl ClientState {
    /// True once the SDK has been created.
    pub fn is_initialized(self) -> bool {
        !matches!(self, ClientState::Uninitialized | ClientState::Initializing)
    }

    /// True once a wallet connect has returned at least one address.
    pub fn is_wallet_connected(self) -> bool {
        matches!(
            self,
            ClientState::WalletConnected
                | ClientState::SubAccountFetching
                | ClientState::SubAccountReady
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClientState::Uninitialized => "uninitialized",
            ClientState::Initializing => "initializing",
            ClientState::Ready => "ready",
            ClientState::WalletConnecting => "wallet_connecting",
            ClientState::WalletConnected => "wallet_connected",
            ClientState::SubAccountFetching => "sub_account_fetching",
            ClientState::SubAccountReady => "sub_account_ready",
        }
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
