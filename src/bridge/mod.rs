//! Host ↔ session boundary.
//!
//! # Data Flow
//! ```text
//! client (host side)
//!     → Bridge::call(BridgeRequest)            typed path
//!     → LocalBridge::handle_json(&str)         stringly-typed path (protocol.rs)
//!     → WalletSession (one per bridge, behind a mutex)
//!     → BridgeResponse
//! ```
//!
//! # Design Decisions
//! - The session is locked for the whole operation, so overlapping calls run one after another
//! - Platform support is a property of the bridge, checked before any call

pub mod protocol;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::provider::ProviderEvent;
use crate::sdk::SdkFactory;
use crate::session::WalletSession;

pub use protocol::{BridgeEnvelope, BridgeReply, BridgeRequest, BridgeResponse, BRIDGE_VERSION};

/// Where the host runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    /// Browser / WebAssembly build.
    Web,
    /// Native desktop or server build.
    Native,
    /// Mobile build.
    Mobile,
}

impl HostPlatform {
    /// Platform of the running binary.
    pub fn current() -> Self {
        if cfg!(target_arch = "wasm32") {
            HostPlatform::Web
        } else if cfg!(any(target_os = "android", target_os = "ios")) {
            HostPlatform::Mobile
        } else {
            HostPlatform::Native
        }
    }
}

/// The session side as seen by the host.
#[async_trait]
pub trait Bridge: Send + Sync {
    /// Execute one request. Never fails; failures come back as sentinels.
    async fn call(&self, request: BridgeRequest) -> BridgeResponse;

    /// Whether this bridge can run on the given platform.
    fn supports(&self, platform: HostPlatform) -> bool {
        platform == HostPlatform::Web
    }
}

/// In-process bridge owning a [`WalletSession`].
pub struct LocalBridge {
    session: Mutex<WalletSession>,
    platforms: Vec<HostPlatform>,
}

impl LocalBridge {
    /// Bridge usable on every platform.
    pub fn new(factory: Arc<dyn SdkFactory>, origin: impl Into<String>) -> Self {
        Self::from_session(WalletSession::new(factory, origin))
    }

    pub fn from_session(session: WalletSession) -> Self {
        Self {
            session: Mutex::new(session),
            platforms: vec![HostPlatform::Web, HostPlatform::Native, HostPlatform::Mobile],
        }
    }

    /// Restrict the platforms this bridge reports as supported.
    pub fn with_platforms(mut self, platforms: Vec<HostPlatform>) -> Self {
        self.platforms = platforms;
        self
    }

    /// Direct access to the session, e.g. for inspection in tests.
    pub fn session(&self) -> &Mutex<WalletSession> {
        &self.session
    }

    /// Handle a JSON envelope and return a JSON reply.
    pub async fn handle_json(&self, raw: &str) -> String {
        let reply = match serde_json::from_str::<BridgeEnvelope>(raw) {
            Ok(envelope) if envelope.version != BRIDGE_VERSION => {
                tracing::error!(
                    version = %envelope.version,
                    supported = BRIDGE_VERSION,
                    "Bridge version mismatch"
                );
                BridgeReply::rejected(
                    Some(envelope.id),
                    format!(
                        "unsupported bridge version '{}' (expected '{}')",
                        envelope.version, BRIDGE_VERSION
                    ),
                )
            }
            Ok(envelope) => {
                let response = self.call(envelope.request).await;
                BridgeReply::ok(envelope.id, response)
            }
            Err(e) => {
                tracing::error!(error = %e, "Malformed bridge envelope");
                BridgeReply::rejected(None, format!("malformed envelope: {}", e))
            }
        };

        serde_json::to_string(&reply).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to encode bridge reply");
            format!(
                "{{\"version\":\"{}\",\"id\":null,\"error\":\"encoding failed\"}}",
                BRIDGE_VERSION
            )
        })
    }
}

#[async_trait]
impl Bridge for LocalBridge {
    async fn call(&self, request: BridgeRequest) -> BridgeResponse {
        let method = request.method();
        tracing::debug!(method = method, "Bridge call");

        let mut session = self.session.lock().await;
        let response = match request {
            BridgeRequest::InitSdk {
                config,
                network,
                custom_rpc_url,
            } => BridgeResponse::Initialized(
                session
                    .init_sdk(&config, &network, custom_rpc_url.as_deref())
                    .await,
            ),
            BridgeRequest::ConnectWallet => BridgeResponse::Accounts(session.connect_wallet().await),
            BridgeRequest::GetSubAccount => BridgeResponse::SubAccount(session.get_sub_account().await),
            BridgeRequest::SendTransaction { calls, chain_id } => BridgeResponse::TransactionHash(
                session.send_transaction(&calls, chain_id.as_deref()).await,
            ),
            BridgeRequest::GetCurrentNetwork => BridgeResponse::Network(session.current_network_json()),
            BridgeRequest::Reset => {
                session.reset();
                BridgeResponse::Reset
            }
            BridgeRequest::ProviderEvent { name, payload } => {
                let delivered = match ProviderEvent::from_raw(&name, &payload) {
                    Some(event) => session.deliver_event(&event) > 0,
                    None => {
                        tracing::warn!(event = %name, "Ignoring unknown or malformed wallet event");
                        false
                    }
                };
                BridgeResponse::EventDelivered(delivered)
            }
        };

        tracing::debug!(method = method, success = response.is_success(), "Bridge call finished");
        response
    }

    fn supports(&self, platform: HostPlatform) -> bool {
        self.platforms.contains(&platform)
    }
}

impl std::fmt::Debug for LocalBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalBridge")
            .field("platforms", &self.platforms)
            .finish()
    }
}
