//! Wire contract between the host adapter and the wallet session.
//!
//! Every message carries `version`; both sides reject versions they do not speak.
//!
//! ```text
//! host → session   {"version":"1","id":"<uuid>","request":{"method":"connectWallet"}}
//! session → host   {"version":"1","id":"<uuid>","response":{"kind":"accounts","value":["0x.."]}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::sdk::SdkConfig;
use crate::session::Call;

/// Contract version spoken by this crate.
pub const BRIDGE_VERSION: &str = "1";

/// Operations the host can ask of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum BridgeRequest {
    #[serde(rename_all = "camelCase")]
    InitSdk {
        config: SdkConfig,
        network: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        custom_rpc_url: Option<String>,
    },
    ConnectWallet,
    GetSubAccount,
    #[serde(rename_all = "camelCase")]
    SendTransaction {
        calls: Vec<Call>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chain_id: Option<String>,
    },
    GetCurrentNetwork,
    Reset,
    /// Wallet event (`accountsChanged`, `chainChanged`) pushed by the host.
    ProviderEvent {
        name: String,
        #[serde(default)]
        payload: Value,
    },
}

impl BridgeRequest {
    /// Method name as it appears on the wire.
    pub fn method(&self) -> &'static str {
        match self {
            BridgeRequest::InitSdk { .. } => "initSdk",
            BridgeRequest::ConnectWallet => "connectWallet",
            BridgeRequest::GetSubAccount => "getSubAccount",
            BridgeRequest::SendTransaction { .. } => "sendTransaction",
            BridgeRequest::GetCurrentNetwork => "getCurrentNetwork",
            BridgeRequest::Reset => "reset",
            BridgeRequest::ProviderEvent { .. } => "providerEvent",
        }
    }
}

/// Session answers. Failure is carried as `false`, `null` or an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum BridgeResponse {
    Initialized(bool),
    Accounts(Vec<String>),
    SubAccount(Option<String>),
    TransactionHash(Option<String>),
    /// Network descriptor JSON.
    Network(Option<String>),
    Reset,
    /// Whether any session listener received the event.
    EventDelivered(bool),
}

impl BridgeResponse {
    /// Whether the response signals success.
    pub fn is_success(&self) -> bool {
        match self {
            BridgeResponse::Initialized(ok) | BridgeResponse::EventDelivered(ok) => *ok,
            BridgeResponse::Accounts(list) => !list.is_empty(),
            BridgeResponse::SubAccount(v)
            | BridgeResponse::TransactionHash(v)
            | BridgeResponse::Network(v) => v.is_some(),
            BridgeResponse::Reset => true,
        }
    }
}

/// A request as sent across the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeEnvelope {
    pub version: String,
    pub id: Uuid,
    pub request: BridgeRequest,
}

impl BridgeEnvelope {
    pub fn new(request: BridgeRequest) -> Self {
        Self {
            version: BRIDGE_VERSION.to_string(),
            id: Uuid::new_v4(),
            request,
        }
    }
}

/// The answer to an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeReply {
    pub version: String,
    /// Echo of the request id; absent when the envelope could not be read.
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<BridgeResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeReply {
    pub fn ok(id: Uuid, response: BridgeResponse) -> Self {
        Self {
            version: BRIDGE_VERSION.to_string(),
            id: Some(id),
            response: Some(response),
            error: None,
        }
    }

    pub fn rejected(id: Option<Uuid>, error: impl Into<String>) -> Self {
        Self {
            version: BRIDGE_VERSION.to_string(),
            id,
            response: None,
            error: Some(error.into()),
        }
    }
}
