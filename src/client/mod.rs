//! Host-side adapter: the single object game code talks to.
//!
//! # Data Flow
//! ```text
//! initialize()
//!     → Bridge: initSdk          → SdkReady(bool)
//!     → (ok) connect step        → WalletReady(addresses)
//!     → (non-empty) sub-account  → SubAccountReady(address?)
//! send_transaction(calls)        → TransactionSent(hash?)   (on demand, repeatable)
//! handle_wallet_event(name, ..)  → Bridge: providerEvent    (accountsChanged → WalletReady)
//! ```
//!
//! # Design Decisions
//! - Precondition violations fail locally; the bridge is never called
//! - Operations hold an async lock, so overlapping callers queue instead of interleaving
//! - Reads come from an `ArcSwap` snapshot and never wait on an operation
//! - No step is retried automatically

pub mod events;
pub mod state;

use arc_swap::ArcSwap;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};

use crate::bridge::{Bridge, BridgeRequest, BridgeResponse, HostPlatform};
use crate::observability::metrics;
use crate::provider::ProviderEvent;
use crate::session::Call;

pub use crate::config::schema::AppConfig;
pub use events::{BridgeEvent, EventBus};
pub use state::ClientState;

/// Errors returned to the caller of a client operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("already initialized (state: {0})")]
    AlreadyInitialized(ClientState),

    #[error("platform '{0:?}' is not supported by this bridge")]
    UnsupportedPlatform(HostPlatform),

    #[error("not initialized; call initialize() first")]
    NotInitialized,

    #[error("wallet not connected; call connect_wallet() first")]
    WalletNotConnected,

    #[error("no sub-account available; connect the wallet first")]
    NoSubAccount,

    #[error("transaction has no calls")]
    EmptyCalls,

    /// The session answered with a failure sentinel.
    #[error("{0} failed")]
    OperationFailed(&'static str),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone, Default)]
struct Snapshot {
    state: ClientState,
    network: Option<String>,
    addresses: Vec<String>,
    sub_account: Option<String>,
}

/// Configuration holder and pipeline driver.
pub struct BaseAccountClient {
    config: AppConfig,
    bridge: Arc<dyn Bridge>,
    snapshot: ArcSwap<Snapshot>,
    events: EventBus,
    op_lock: Mutex<()>,
}

impl BaseAccountClient {
    pub fn new(config: AppConfig, bridge: Arc<dyn Bridge>) -> Self {
        Self {
            config,
            bridge,
            snapshot: ArcSwap::from_pointee(Snapshot::default()),
            events: EventBus::default(),
            op_lock: Mutex::new(()),
        }
    }

    /// Create the SDK, then connect and resolve the sub-account.
    ///
    /// Returns once the whole chain has run. Only the SDK step decides the
    /// return value; later steps report through events.
    pub async fn initialize(&self) -> ClientResult<()> {
        let _guard = self.op_lock.lock().await;

        let current = self.state();
        if current != ClientState::Uninitialized {
            tracing::error!(state = %current, "initialize() called while already initialized");
            return Err(ClientError::AlreadyInitialized(current));
        }

        let platform = self.config.platform();
        if !self.bridge.supports(platform) {
            tracing::error!(platform = ?platform, "Base Account bridge is not available on this platform");
            return Err(ClientError::UnsupportedPlatform(platform));
        }

        self.set_state(ClientState::Initializing);
        tracing::info!(
            app_name = %self.config.app_name,
            network = %self.config.network,
            "Initializing Base Account SDK"
        );

        let response = self
            .bridge
            .call(BridgeRequest::InitSdk {
                config: self.config.sdk_config(),
                network: self.config.network.clone(),
                custom_rpc_url: self.config.custom_rpc_url().map(str::to_string),
            })
            .await;
        let ok = matches!(response, BridgeResponse::Initialized(true));
        metrics::record_operation("initialize", ok);

        if !ok {
            tracing::error!(network = %self.config.network, "SDK initialization failed");
            self.set_state(ClientState::Uninitialized);
            self.events.emit(BridgeEvent::SdkReady(false));
            return Err(ClientError::OperationFailed("initialize"));
        }

        let network = match self.bridge.call(BridgeRequest::GetCurrentNetwork).await {
            BridgeResponse::Network(network) => network,
            other => {
                tracing::warn!(response = ?other, "Unexpected bridge response for network");
                None
            }
        };
        self.update(|s| {
            s.state = ClientState::Ready;
            s.network = network.clone();
        });
        tracing::info!(network = network.as_deref().unwrap_or(""), "SDK ready");
        self.events.emit(BridgeEvent::SdkReady(true));

        if let Err(e) = self.connect_step().await {
            tracing::warn!(error = %e, "Wallet connection after initialization did not complete");
        }
        Ok(())
    }

    /// Request wallet accounts; on success continue with the sub-account.
    pub async fn connect_wallet(&self) -> ClientResult<Vec<String>> {
        let _guard = self.op_lock.lock().await;
        self.connect_step().await
    }

    /// Look up (or create) the sub-account for the primary address.
    pub async fn get_sub_account(&self) -> ClientResult<String> {
        let _guard = self.op_lock.lock().await;
        self.sub_account_step().await
    }

    /// Submit a batch of calls from the sub-account.
    ///
    /// `chain_id_override` skips the live chain query when given.
    pub async fn send_transaction(
        &self,
        calls: Vec<Call>,
        chain_id_override: Option<String>,
    ) -> ClientResult<String> {
        let _guard = self.op_lock.lock().await;

        if let Err(e) = self.check_can_send(&calls) {
            tracing::error!(error = %e, "sendTransaction rejected");
            metrics::record_operation("send_transaction", false);
            self.events.emit(BridgeEvent::TransactionSent(None));
            return Err(e);
        }

        tracing::info!(calls = calls.len(), chain_id = ?chain_id_override, "Sending transaction");
        let response = self
            .bridge
            .call(BridgeRequest::SendTransaction {
                calls,
                chain_id: chain_id_override,
            })
            .await;
        let hash = match response {
            BridgeResponse::TransactionHash(hash) => hash,
            other => {
                tracing::warn!(response = ?other, "Unexpected bridge response for transaction");
                None
            }
        };
        metrics::record_operation("send_transaction", hash.is_some());

        match &hash {
            Some(h) => tracing::info!(tx_hash = %h, "Transaction sent"),
            None => tracing::error!("Transaction failed"),
        }
        self.events.emit(BridgeEvent::TransactionSent(hash.clone()));
        hash.ok_or(ClientError::OperationFailed("send_transaction"))
    }

    /// Forward a wallet event raised on the host (e.g. by an injected wallet).
    ///
    /// Returns whether the session had listeners for it. A delivered
    /// `accountsChanged` also replaces the cached addresses and sub-account.
    pub async fn handle_wallet_event(&self, name: &str, payload: Value) -> ClientResult<bool> {
        let _guard = self.op_lock.lock().await;
        self.require_initialized("providerEvent")?;

        let event = ProviderEvent::from_raw(name, &payload);
        let response = self
            .bridge
            .call(BridgeRequest::ProviderEvent {
                name: name.to_string(),
                payload,
            })
            .await;
        let delivered = matches!(response, BridgeResponse::EventDelivered(true));

        if let (true, Some(ProviderEvent::AccountsChanged(addresses))) = (delivered, event) {
            let sub_account = addresses.get(1).cloned();
            self.update(|s| {
                s.addresses = addresses.clone();
                s.sub_account = sub_account.clone();
                s.state = match (addresses.is_empty(), sub_account.is_some()) {
                    (true, _) => ClientState::Ready,
                    (false, true) => ClientState::SubAccountReady,
                    (false, false) => ClientState::WalletConnected,
                };
            });
            tracing::info!(count = addresses.len(), state = %self.state(), "Wallet accounts changed");
            self.events.emit(BridgeEvent::WalletReady(addresses));
        }
        Ok(delivered)
    }

    /// Reset the session and return to `Uninitialized`.
    pub async fn dispose(&self) {
        let _guard = self.op_lock.lock().await;
        if self.state() != ClientState::Uninitialized {
            self.bridge.call(BridgeRequest::Reset).await;
        }
        self.snapshot.store(Arc::new(Snapshot::default()));
        tracing::info!("Base Account client disposed");
    }

    /// Network descriptor JSON, `None` before initialization.
    pub fn network_info(&self) -> Option<String> {
        self.snapshot.load().network.clone()
    }

    pub fn connected_addresses(&self) -> Vec<String> {
        self.snapshot.load().addresses.clone()
    }

    pub fn sub_account(&self) -> Option<String> {
        self.snapshot.load().sub_account.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.state().is_initialized()
    }

    pub fn state(&self) -> ClientState {
        self.snapshot.load().state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Receive completion notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.events.subscribe()
    }

    async fn connect_step(&self) -> ClientResult<Vec<String>> {
        let start = self.require_initialized("connectWallet")?;
        self.set_state(ClientState::WalletConnecting);

        let addresses = match self.bridge.call(BridgeRequest::ConnectWallet).await {
            BridgeResponse::Accounts(addresses) => addresses,
            other => {
                tracing::warn!(response = ?other, "Unexpected bridge response for connect");
                Vec::new()
            }
        };
        metrics::record_operation("connect_wallet", !addresses.is_empty());

        let connected = !addresses.is_empty();
        self.update(|s| {
            s.addresses = addresses.clone();
            s.state = if connected {
                ClientState::WalletConnected
            } else {
                start
            };
        });
        self.events.emit(BridgeEvent::WalletReady(addresses.clone()));

        if !connected {
            tracing::error!("Wallet connection failed");
            return Err(ClientError::OperationFailed("connect_wallet"));
        }
        tracing::info!(primary = %addresses[0], count = addresses.len(), "Wallet connected");

        if let Err(e) = self.sub_account_step().await {
            tracing::warn!(error = %e, "Sub-account lookup after connect did not complete");
        }
        Ok(addresses)
    }

    async fn sub_account_step(&self) -> ClientResult<String> {
        let start = self.require_initialized("getSubAccount")?;
        if !start.is_wallet_connected() {
            tracing::error!(state = %start, "getSubAccount called before a wallet connected");
            return Err(ClientError::WalletNotConnected);
        }
        self.set_state(ClientState::SubAccountFetching);

        let sub_account = match self.bridge.call(BridgeRequest::GetSubAccount).await {
            BridgeResponse::SubAccount(address) => address.filter(|a| !a.is_empty()),
            other => {
                tracing::warn!(response = ?other, "Unexpected bridge response for sub-account");
                None
            }
        };
        metrics::record_operation("get_sub_account", sub_account.is_some());

        let found = sub_account.is_some();
        self.update(|s| {
            s.sub_account = sub_account.clone();
            s.state = match (found, start) {
                (true, _) => ClientState::SubAccountReady,
                (false, ClientState::SubAccountReady) => ClientState::WalletConnected,
                (false, other) => other,
            };
        });
        self.events.emit(BridgeEvent::SubAccountReady(sub_account.clone()));

        match sub_account {
            Some(address) => {
                tracing::info!(sub_account = %address, "Sub-account ready");
                Ok(address)
            }
            None => {
                tracing::error!("Sub-account unavailable");
                Err(ClientError::OperationFailed("get_sub_account"))
            }
        }
    }

    fn require_initialized(&self, operation: &'static str) -> ClientResult<ClientState> {
        let state = self.state();
        if !state.is_initialized() {
            tracing::error!(operation = operation, state = %state, "SDK not initialized");
            return Err(ClientError::NotInitialized);
        }
        Ok(state)
    }

    fn check_can_send(&self, calls: &[Call]) -> ClientResult<()> {
        let snapshot = self.snapshot.load();
        if !snapshot.state.is_initialized() {
            return Err(ClientError::NotInitialized);
        }
        if snapshot.sub_account.as_deref().map_or(true, str::is_empty) {
            return Err(ClientError::NoSubAccount);
        }
        if calls.is_empty() {
            return Err(ClientError::EmptyCalls);
        }
        Ok(())
    }

    fn set_state(&self, state: ClientState) {
        self.update(|s| s.state = state);
    }

    fn update(&self, f: impl Fn(&mut Snapshot)) {
        self.snapshot.rcu(|current| {
            let mut next = Snapshot::clone(current);
            f(&mut next);
            next
        });
        tracing::trace!(state = %self.state(), "Client state updated");
    }
}

impl std::fmt::Debug for BaseAccountClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot.load();
        f.debug_struct("BaseAccountClient")
            .field("app_name", &self.config.app_name)
            .field("network", &self.config.network)
            .field("state", &snapshot.state)
            .field("addresses", &snapshot.addresses)
            .field("sub_account", &snapshot.sub_account)
            .finish()
    }
}
