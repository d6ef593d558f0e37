//! Wallet session: the provider-facing half of the bridge.
//!
//! # Data Flow
//! ```text
//! init_sdk(config, network, rpc override)
//!     → NetworkId lookup → SdkLoader → Arc<dyn Provider>
//! connect_wallet()
//!     → eth_requestAccounts → AccountSet (+ listeners, once)
//! get_sub_account()
//!     → wallet_getSubAccounts → [wallet_addSubAccount → wallet_getSubAccounts]
//! send_transaction(calls, chain override)
//!     → validation.rs → eth_chainId (unless overridden) → wallet_sendCalls
//! ```
//!
//! # Failure Policy
//! - `try_*` methods return `SessionResult`
//! - The plain methods never fail: they log and return `false`, `None` or an empty list
//! - Nothing is retried

pub mod types;
pub mod validation;

use alloy::primitives::TxHash;
use arc_swap::ArcSwap;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::network::{ChainId, NetworkDescriptor, NetworkId};
use crate::observability::metrics;
use crate::provider::methods::{
    ETH_CHAIN_ID, ETH_REQUEST_ACCOUNTS, WALLET_ADD_SUB_ACCOUNT, WALLET_GET_SUB_ACCOUNTS,
    WALLET_SEND_CALLS,
};
use crate::provider::{Provider, ProviderEvent, ProviderEventKind, SubscriptionId};
use crate::sdk::{SdkConfig, SdkFactory, SdkLoader};

pub use types::{AccountSet, Call, CallField, SendCallsPayload, SessionError, SessionResult};
use types::SEND_CALLS_VERSION;

/// Origin reported to the wallet when none is configured.
pub const DEFAULT_ORIGIN: &str = "http://localhost";

struct ActiveSdk {
    provider: Arc<dyn Provider>,
    network: NetworkDescriptor,
    config: SdkConfig,
}

/// Owns one live provider and the addresses it reported.
pub struct WalletSession {
    loader: SdkLoader,
    origin: String,
    active: Option<ActiveSdk>,
    /// Shared with the `accountsChanged` listener.
    accounts: Arc<ArcSwap<AccountSet>>,
    subscriptions: Vec<SubscriptionId>,
}

impl WalletSession {
    pub fn new(factory: Arc<dyn SdkFactory>, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            loader: SdkLoader::new(factory),
            origin: if origin.trim().is_empty() {
                DEFAULT_ORIGIN.to_string()
            } else {
                origin
            },
            active: None,
            accounts: Arc::new(ArcSwap::from_pointee(AccountSet::default())),
            subscriptions: Vec::new(),
        }
    }

    /// Create the SDK and its provider.
    ///
    /// An unknown network leaves the session untouched.
    pub async fn try_init_sdk(
        &mut self,
        config: &SdkConfig,
        network: &str,
        custom_rpc_url: Option<&str>,
    ) -> SessionResult<()> {
        let network_id: NetworkId = network
            .parse()
            .map_err(|_| SessionError::UnsupportedNetwork(network.to_string()))?;
        let descriptor = network_id.descriptor().with_rpc_override(custom_rpc_url);
        let merged = config.merged_over_defaults();

        let provider = self.loader.create(&merged, &descriptor).await?;

        if self.active.is_some() {
            tracing::info!("Replacing existing SDK instance");
            self.detach();
        }

        tracing::info!(
            network = %network_id,
            chain_id = %descriptor.chain_id,
            rpc_url = %descriptor.rpc_url,
            "SDK initialized"
        );

        self.active = Some(ActiveSdk {
            provider,
            network: descriptor,
            config: merged,
        });
        Ok(())
    }

    pub async fn init_sdk(
        &mut self,
        config: &SdkConfig,
        network: &str,
        custom_rpc_url: Option<&str>,
    ) -> bool {
        let result = self.try_init_sdk(config, network, custom_rpc_url).await;
        metrics::record_operation("init_sdk", result.is_ok());
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(network = %network, error = %e, "SDK initialization failed");
                false
            }
        }
    }

    /// Request wallet accounts and remember them.
    pub async fn try_connect_wallet(&mut self) -> SessionResult<Vec<String>> {
        let provider = self.provider()?;

        let result = provider.request(ETH_REQUEST_ACCOUNTS, json!([])).await?;
        let addresses = parse_accounts(&result).ok_or_else(|| SessionError::UnexpectedResponse {
            method: ETH_REQUEST_ACCOUNTS,
            detail: result.to_string(),
        })?;

        let set = AccountSet::from_addresses(addresses.clone());
        tracing::info!(
            primary = set.primary().unwrap_or(""),
            sub_account = set.sub_account.as_deref().unwrap_or(""),
            count = addresses.len(),
            "Wallet connected"
        );
        self.accounts.store(Arc::new(set));
        self.attach_listeners(&provider);

        Ok(addresses)
    }

    pub async fn connect_wallet(&mut self) -> Vec<String> {
        let result = self.try_connect_wallet().await;
        metrics::record_operation("connect_wallet", result.is_ok());
        result.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Wallet connection failed");
            Vec::new()
        })
    }

    /// Look up the sub-account for the primary address, creating one if none exists.
    pub async fn try_get_sub_account(&mut self) -> SessionResult<Option<String>> {
        let provider = self.provider()?;
        let primary = self
            .accounts
            .load()
            .primary()
            .map(str::to_string)
            .ok_or(SessionError::NoPrimaryAccount)?;

        let address = match self.query_sub_account(&provider, &primary).await? {
            Some(existing) => Some(existing),
            None => {
                tracing::info!(primary = %primary, "No sub-account found, requesting creation");
                provider
                    .request(
                        WALLET_ADD_SUB_ACCOUNT,
                        json!([{ "version": "1", "account": { "type": "create" } }]),
                    )
                    .await?;
                self.query_sub_account(&provider, &primary).await?
            }
        };

        self.accounts
            .rcu(|current| current.with_sub_account(address.clone()));
        tracing::info!(sub_account = address.as_deref().unwrap_or(""), "Sub-account resolved");
        Ok(address)
    }

    pub async fn get_sub_account(&mut self) -> Option<String> {
        let result = self.try_get_sub_account().await;
        metrics::record_operation("get_sub_account", matches!(result, Ok(Some(_))));
        result.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Sub-account lookup failed");
            None
        })
    }

    async fn query_sub_account(
        &self,
        provider: &Arc<dyn Provider>,
        primary: &str,
    ) -> SessionResult<Option<String>> {
        let result = provider
            .request(
                WALLET_GET_SUB_ACCOUNTS,
                json!([{ "account": primary, "domain": self.origin }]),
            )
            .await?;
        Ok(first_sub_account(&result))
    }

    /// Validate and submit a batch of calls from the sub-account.
    pub async fn try_send_transaction(
        &self,
        calls: &[Call],
        chain_id_override: Option<&str>,
    ) -> SessionResult<String> {
        let active = self.active.as_ref().ok_or(SessionError::NotInitialized)?;
        let from = self
            .accounts
            .load()
            .sub_account
            .clone()
            .ok_or(SessionError::NoSubAccount)?;

        let targets = validation::validate_calls(calls)?;

        let raw_chain = match chain_id_override.map(str::trim).filter(|c| !c.is_empty()) {
            Some(chain) => chain.to_string(),
            None => {
                let result = active.provider.request(ETH_CHAIN_ID, json!([])).await?;
                result
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| SessionError::UnexpectedResponse {
                        method: ETH_CHAIN_ID,
                        detail: result.to_string(),
                    })?
            }
        };
        let chain_id: ChainId = raw_chain
            .parse()
            .map_err(|_| SessionError::UnsupportedChain(raw_chain.clone()))?;
        let network = NetworkId::from_chain_id(chain_id)
            .ok_or_else(|| SessionError::UnsupportedChain(raw_chain.clone()))?;

        if active.network.chain() != Some(chain_id) {
            tracing::warn!(
                configured = %active.network.chain_id,
                requested = %chain_id,
                "Sending on a chain other than the configured network"
            );
        }

        let payload = SendCallsPayload {
            from,
            chain_id: chain_id.to_hex(),
            version: SEND_CALLS_VERSION.to_string(),
            calls: calls.to_vec(),
        };
        tracing::debug!(
            network = %network,
            from = %payload.from,
            targets = ?targets,
            "Submitting batch call"
        );

        let result = active
            .provider
            .request(WALLET_SEND_CALLS, json!([payload]))
            .await?;
        let hash = extract_call_id(&result).ok_or_else(|| SessionError::UnexpectedResponse {
            method: WALLET_SEND_CALLS,
            detail: result.to_string(),
        })?;

        match hash.parse::<TxHash>() {
            Ok(tx_hash) => tracing::info!(tx_hash = %tx_hash, calls = calls.len(), "Transaction sent"),
            Err(_) => tracing::info!(call_id = %hash, calls = calls.len(), "Batch submitted"),
        }
        Ok(hash)
    }

    pub async fn send_transaction(
        &self,
        calls: &[Call],
        chain_id_override: Option<&str>,
    ) -> Option<String> {
        let result = self.try_send_transaction(calls, chain_id_override).await;
        metrics::record_operation("send_transaction", result.is_ok());
        result
            .map_err(|e| tracing::error!(error = %e, "Transaction failed"))
            .ok()
    }

    /// Network descriptor as JSON, `None` before initialization.
    pub fn current_network_json(&self) -> Option<String> {
        self.active.as_ref().and_then(|a| a.network.to_json())
    }

    pub fn network(&self) -> Option<&NetworkDescriptor> {
        self.active.as_ref().map(|a| &a.network)
    }

    /// Effective SDK configuration (after merging defaults).
    pub fn sdk_config(&self) -> Option<&SdkConfig> {
        self.active.as_ref().map(|a| &a.config)
    }

    pub fn is_initialized(&self) -> bool {
        self.active.is_some()
    }

    pub fn accounts(&self) -> Vec<String> {
        self.accounts.load().addresses.clone()
    }

    pub fn primary_address(&self) -> Option<String> {
        self.accounts.load().primary().map(str::to_string)
    }

    pub fn sub_account(&self) -> Option<String> {
        self.accounts.load().sub_account.clone()
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Number of provider listeners this session holds.
    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Hand a wallet event to the active provider's listeners.
    ///
    /// Returns how many listeners ran; zero before initialization or before
    /// the first connect registered them.
    pub fn deliver_event(&self, event: &ProviderEvent) -> usize {
        match &self.active {
            Some(active) => {
                let delivered = active.provider.emit(event);
                tracing::debug!(event = event.kind().as_str(), listeners = delivered, "Wallet event delivered");
                delivered
            }
            None => {
                tracing::warn!(event = event.kind().as_str(), "Wallet event received without an SDK");
                0
            }
        }
    }

    /// Drop the provider and all state. The SDK stays loaded.
    pub fn reset(&mut self) {
        self.detach();
        tracing::info!("Wallet session reset");
    }

    fn detach(&mut self) {
        if let Some(active) = self.active.take() {
            for id in self.subscriptions.drain(..) {
                active.provider.remove_listener(id);
            }
        }
        self.subscriptions.clear();
        self.accounts.store(Arc::new(AccountSet::default()));
    }

    fn provider(&self) -> SessionResult<Arc<dyn Provider>> {
        self.active
            .as_ref()
            .map(|a| a.provider.clone())
            .ok_or(SessionError::NotInitialized)
    }

    /// Register `accountsChanged` and `chainChanged` once per provider.
    fn attach_listeners(&mut self, provider: &Arc<dyn Provider>) {
        if !self.subscriptions.is_empty() {
            return;
        }

        let accounts = self.accounts.clone();
        let on_accounts = provider.on(
            ProviderEventKind::AccountsChanged,
            Arc::new(move |event: &ProviderEvent| {
                if let ProviderEvent::AccountsChanged(list) = event {
                    tracing::info!(count = list.len(), "Wallet accounts changed");
                    accounts.store(Arc::new(AccountSet::from_addresses(list.clone())));
                }
            }),
        );

        let expected = self.active.as_ref().and_then(|a| a.network.chain());
        let on_chain = provider.on(
            ProviderEventKind::ChainChanged,
            Arc::new(move |event: &ProviderEvent| {
                if let ProviderEvent::ChainChanged(raw) = event {
                    let actual = raw.parse::<ChainId>().ok();
                    if actual.is_none() || actual != expected {
                        tracing::warn!(
                            chain_id = %raw,
                            expected = ?expected.map(ChainId::to_hex),
                            "Wallet switched to an unexpected chain"
                        );
                    } else {
                        tracing::debug!(chain_id = %raw, "Wallet chain changed");
                    }
                }
            }),
        );

        self.subscriptions.extend([on_accounts, on_chain]);
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("origin", &self.origin)
            .field("network", &self.network())
            .field("accounts", &self.accounts.load().addresses)
            .field("listeners", &self.subscriptions.len())
            .finish()
    }
}

fn parse_accounts(result: &Value) -> Option<Vec<String>> {
    result
        .as_array()?
        .iter()
        .map(|a| a.as_str().map(str::to_string))
        .collect()
}

fn first_sub_account(result: &Value) -> Option<String> {
    result
        .get("subAccounts")?
        .as_array()?
        .iter()
        .find_map(|entry| entry.get("address").and_then(Value::as_str))
        .map(str::to_string)
}

/// `wallet_sendCalls` answers with a hash string or an object carrying `id`.
fn extract_call_id(result: &Value) -> Option<String> {
    match result {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map.get("id").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accounts() {
        assert_eq!(
            parse_accounts(&json!(["0xa", "0xb"])),
            Some(vec!["0xa".to_string(), "0xb".to_string()])
        );
        assert_eq!(parse_accounts(&json!([])), Some(vec![]));
        assert_eq!(parse_accounts(&json!(["0xa", 1])), None);
        assert_eq!(parse_accounts(&json!(null)), None);
    }

    #[test]
    fn test_first_sub_account() {
        let result = json!({"subAccounts": [{"address": "0xsub", "factory": "0xf"}]});
        assert_eq!(first_sub_account(&result).as_deref(), Some("0xsub"));
        assert_eq!(first_sub_account(&json!({"subAccounts": []})), None);
        assert_eq!(first_sub_account(&json!(null)), None);
    }

    #[test]
    fn test_extract_call_id() {
        assert_eq!(extract_call_id(&json!("0xhash")).as_deref(), Some("0xhash"));
        assert_eq!(extract_call_id(&json!({"id": "0xbundle"})).as_deref(), Some("0xbundle"));
        assert_eq!(extract_call_id(&json!("")), None);
        assert_eq!(extract_call_id(&json!(null)), None);
    }
}
