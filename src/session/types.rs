//! Session data types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::ProviderError;
use crate::sdk::SdkError;

/// Version tag sent with every `wallet_sendCalls` payload.
pub const SEND_CALLS_VERSION: &str = "1";

/// One call in a batch transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Target contract, `0x` + 40 hex digits.
    pub to: String,
    /// Hex call data, `0x` prefix optional.
    pub data: String,
}

impl Call {
    pub fn new(to: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            data: data.into(),
        }
    }
}

/// Payload submitted with `wallet_sendCalls`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCallsPayload {
    pub from: String,
    pub chain_id: String,
    pub version: String,
    pub calls: Vec<Call>,
}

/// Addresses reported by the wallet.
///
/// Index 0 is the primary (universal) address; index 1, when present, is the sub-account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountSet {
    pub addresses: Vec<String>,
    pub sub_account: Option<String>,
}

impl AccountSet {
    pub fn from_addresses(addresses: Vec<String>) -> Self {
        let sub_account = addresses.get(1).cloned();
        Self {
            addresses,
            sub_account,
        }
    }

    pub fn primary(&self) -> Option<&str> {
        self.addresses.first().map(String::as_str)
    }

    /// Same addresses with a different sub-account.
    pub fn with_sub_account(&self, sub_account: Option<String>) -> Self {
        Self {
            addresses: self.addresses.clone(),
            sub_account,
        }
    }
}

/// Field of a [`Call`] that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallField {
    To,
    Data,
}

impl std::fmt::Display for CallField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallField::To => f.write_str("to"),
            CallField::Data => f.write_str("data"),
        }
    }
}

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No SDK/provider has been created yet.
    #[error("SDK not initialized")]
    NotInitialized,

    /// Network identifier outside the supported table.
    #[error("unsupported network '{0}'")]
    UnsupportedNetwork(String),

    /// Chain id that matches neither supported network.
    #[error("unsupported chain id '{0}'")]
    UnsupportedChain(String),

    /// Sub-account lookup attempted before a wallet connected.
    #[error("no primary address; connect the wallet first")]
    NoPrimaryAccount,

    /// Transaction attempted before a sub-account is known.
    #[error("no sub-account address available")]
    NoSubAccount,

    #[error("call list is empty")]
    EmptyCalls,

    /// A call failed shape validation.
    #[error("invalid '{field}' in call {index}: '{value}'")]
    InvalidCall {
        index: usize,
        field: CallField,
        value: String,
    },

    /// Provider answered with an unexpected shape.
    #[error("unexpected {method} response: {detail}")]
    UnexpectedResponse { method: &'static str, detail: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Sdk(#[from] SdkError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
