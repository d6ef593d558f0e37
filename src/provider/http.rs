//! Wallet provider over an HTTP JSON-RPC endpoint.
//!
//! # Responsibilities
//! - Issue wallet methods through alloy's RPC client
//! - Attach per-session headers (SDK configuration) to every request
//! - Map RPC error responses and transport failures to `ProviderError`
//! - Hold the event hub so hosts can forward wallet events

use alloy::providers::{Provider as RpcProvider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::rpc::json_rpc::RpcError;
use alloy::transports::http::Http;
use alloy::transports::TransportError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::observability::metrics;
use crate::provider::events::{EventHub, Listener, ProviderEvent, ProviderEventKind, SubscriptionId};
use crate::provider::{Provider, ProviderError, ProviderResult};

/// HTTP-backed provider.
pub struct HttpProvider {
    rpc: Arc<dyn RpcProvider + Send + Sync>,
    endpoint: url::Url,
    timeout: Option<Duration>,
    events: EventHub,
}

impl HttpProvider {
    /// Create a provider for the given endpoint.
    ///
    /// # Arguments
    /// * `endpoint` - JSON-RPC URL
    /// * `timeout` - Optional per-request deadline; `None` waits indefinitely
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> ProviderResult<Self> {
        Self::with_headers(endpoint, timeout, HeaderMap::new())
    }

    /// Create a provider whose every request carries `headers`.
    pub fn with_headers(
        endpoint: &str,
        timeout: Option<Duration>,
        headers: HeaderMap,
    ) -> ProviderResult<Self> {
        let endpoint: url::Url = endpoint.parse().map_err(|e| {
            ProviderError::Transport(format!("Invalid endpoint URL '{}': {}", endpoint, e))
        })?;

        let rpc = if headers.is_empty() {
            Arc::new(ProviderBuilder::new().connect_http(endpoint.clone()))
                as Arc<dyn RpcProvider + Send + Sync>
        } else {
            let client = reqwest::Client::builder()
                .default_headers(headers)
                .build()
                .map_err(|e| ProviderError::Transport(e.to_string()))?;
            let transport = Http::with_client(client, endpoint.clone());
            Arc::new(ProviderBuilder::new().connect_client(RpcClient::new(transport, false)))
                as Arc<dyn RpcProvider + Send + Sync>
        };

        Ok(Self {
            rpc,
            endpoint,
            timeout,
            events: EventHub::new(),
        })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    async fn send(&self, method: &str, params: Value) -> ProviderResult<Value> {
        let call = self
            .rpc
            .client()
            .request::<Value, Value>(method.to_string(), params);

        let result = match self.timeout {
            Some(limit) => timeout(limit, call).await.map_err(|_| {
                ProviderError::Transport(format!("request timed out after {:?}", limit))
            })?,
            None => call.await,
        };

        match result {
            Ok(value) => Ok(value),
            // A `null` result is a valid answer (e.g. no sub-accounts).
            Err(RpcError::NullResp) => Ok(Value::Null),
            Err(e) => Err(map_rpc_error(e)),
        }
    }
}

fn map_rpc_error(error: TransportError) -> ProviderError {
    match error {
        RpcError::ErrorResp(payload) => ProviderError::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        },
        RpcError::DeserError { err, text } => {
            ProviderError::InvalidResponse(format!("{}: {}", err, text))
        }
        RpcError::Transport(kind) => ProviderError::Transport(kind.to_string()),
        other => ProviderError::Transport(other.to_string()),
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> ProviderResult<Value> {
        tracing::debug!(method = %method, endpoint = %self.endpoint, "Provider request");
        let result = self.send(method, params).await;
        metrics::record_provider_request(method, result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(method = %method, error = %e, "Provider request failed");
        }
        result
    }

    fn on(&self, kind: ProviderEventKind, listener: Listener) -> SubscriptionId {
        self.events.subscribe(kind, listener)
    }

    fn remove_listener(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn emit(&self, event: &ProviderEvent) -> usize {
        self.events.emit(event)
    }
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .field("listeners", &self.events.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_endpoint() {
        let result = HttpProvider::new("not a url", None);
        assert!(matches!(result, Err(ProviderError::Transport(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let provider = HttpProvider::new("http://127.0.0.1:1", Some(Duration::from_secs(2))).unwrap();
        let result = provider.request("eth_chainId", json!([])).await;
        assert!(matches!(result, Err(ProviderError::Transport(_))));
    }

    #[test]
    fn test_emit_forwards_to_listeners() {
        let provider = HttpProvider::new("http://localhost:8545", None).unwrap();
        let id = provider.on(ProviderEventKind::ChainChanged, std::sync::Arc::new(|_: &ProviderEvent| {}));
        assert_eq!(provider.emit(&ProviderEvent::ChainChanged("0x2105".into())), 1);
        assert!(provider.remove_listener(id));
        assert_eq!(provider.listener_count(), 0);
    }
}
