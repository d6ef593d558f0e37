//! Shared utilities for session, pipeline and HTTP provider tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use base_account_bridge::bridge::{Bridge, BridgeRequest, BridgeResponse, HostPlatform};
use base_account_bridge::network::NetworkDescriptor;
use base_account_bridge::provider::{
    EventHub, Listener, Provider, ProviderError, ProviderEvent, ProviderEventKind, ProviderResult,
    SubscriptionId,
};
use base_account_bridge::sdk::{SdkConfig, SdkError, SdkFactory, SdkResult};

pub const PRIMARY: &str = "0x1111111111111111111111111111111111111111";
pub const SUB: &str = "0x2222222222222222222222222222222222222222";
pub const TARGET: &str = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01";
pub const TX_HASH: &str = "0x8f3c1b0c2d4e5f60718293a4b5c6d7e8f90123456789abcdef0123456789abcd";
pub const ORIGIN: &str = "https://game.example.org";

/// Provider answering from scripted responses and recording every request.
#[derive(Default)]
pub struct MockProvider {
    requests: Mutex<Vec<(String, Value)>>,
    queued: Mutex<HashMap<String, VecDeque<ProviderResult<Value>>>>,
    defaults: Mutex<HashMap<String, Value>>,
    events: EventHub,
}

#[allow(dead_code)]
impl MockProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A wallet that reports `[PRIMARY, SUB]`, sits on Base Sepolia and accepts calls.
    pub fn base_wallet() -> Arc<Self> {
        let provider = Self::new();
        provider.respond("eth_requestAccounts", json!([PRIMARY, SUB]));
        provider.respond("eth_chainId", json!("0x14a34"));
        provider.respond("wallet_getSubAccounts", json!({ "subAccounts": [{ "address": SUB }] }));
        provider.respond("wallet_sendCalls", json!(TX_HASH));
        provider
    }

    /// Answer every call to `method` with `value`.
    pub fn respond(&self, method: &str, value: Value) {
        self.defaults.lock().unwrap().insert(method.to_string(), value);
    }

    /// Answer the next call to `method` with `result`, ahead of the default.
    pub fn respond_once(&self, method: &str, result: ProviderResult<Value>) {
        self.queued
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(result);
    }

    /// Make every call to `method` fail.
    pub fn fail(&self, method: &str) {
        self.defaults.lock().unwrap().remove(method);
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }

    /// Params of the last call to `method`.
    pub fn last_params(&self, method: &str) -> Option<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> ProviderResult<Value> {
        self.requests
            .lock()
            .unwrap()
            .push((method.to_string(), params));

        if let Some(result) = self
            .queued
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(VecDeque::pop_front)
        {
            return result;
        }

        self.defaults
            .lock()
            .unwrap()
            .get(method)
            .cloned()
            .ok_or_else(|| ProviderError::Rpc {
                code: 4100,
                message: format!("{} rejected", method),
            })
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

/// Factory handing out one shared mock provider.
pub struct MockFactory {
    pub provider: Arc<MockProvider>,
    pub loads: AtomicU32,
    pub creations: AtomicU32,
    pub last_config: Mutex<Option<SdkConfig>>,
    pub fail_create: bool,
}

#[allow(dead_code)]
impl MockFactory {
    pub fn new(provider: Arc<MockProvider>) -> Arc<Self> {
        Arc::new(Self {
            provider,
            loads: AtomicU32::new(0),
            creations: AtomicU32::new(0),
            last_config: Mutex::new(None),
            fail_create: false,
        })
    }

    pub fn failing(provider: Arc<MockProvider>) -> Arc<Self> {
        Arc::new(Self {
            provider,
            loads: AtomicU32::new(0),
            creations: AtomicU32::new(0),
            last_config: Mutex::new(None),
            fail_create: true,
        })
    }

    pub fn loads(&self) -> u32 {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn creations(&self) -> u32 {
        self.creations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SdkFactory for MockFactory {
    async fn load(&self) -> SdkResult<()> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn create_provider(
        &self,
        config: &SdkConfig,
        _network: &NetworkDescriptor,
    ) -> SdkResult<Arc<dyn Provider>> {
        if self.fail_create {
            return Err(SdkError::Create("wallet unavailable".into()));
        }
        self.creations.fetch_add(1, Ordering::SeqCst);
        *self.last_config.lock().unwrap() = Some(config.clone());
        Ok(self.provider.clone() as Arc<dyn Provider>)
    }
}

/// Bridge wrapper recording which methods crossed the boundary.
pub struct RecordingBridge<B> {
    pub inner: B,
    pub methods: Mutex<Vec<&'static str>>,
}

#[allow(dead_code)]
impl<B: Bridge> RecordingBridge<B> {
    pub fn new(inner: B) -> Arc<Self> {
        Arc::new(Self {
            inner,
            methods: Mutex::new(Vec::new()),
        })
    }

    pub fn methods(&self) -> Vec<&'static str> {
        self.methods.lock().unwrap().clone()
    }
}

#[async_trait]
impl<B: Bridge> Bridge for RecordingBridge<B> {
    async fn call(&self, request: BridgeRequest) -> BridgeResponse {
        self.methods.lock().unwrap().push(request.method());
        self.inner.call(request).await
    }

    fn supports(&self, platform: HostPlatform) -> bool {
        self.inner.supports(platform)
    }
}

/// One-shot JSON-RPC endpoint on localhost.
///
/// Answers the first request with `reply` (its `id` echoed back) and yields
/// the raw HTTP request text it received.
#[allow(dead_code)]
pub async fn serve_once(reply: Value) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let raw = read_http_request(&mut socket).await;

        let body_start = raw.find("\r\n\r\n").map(|i| i + 4).unwrap_or(raw.len());
        let request: Value = serde_json::from_str(&raw[body_start..]).unwrap_or(Value::Null);
        let mut response = reply;
        response["jsonrpc"] = json!("2.0");
        response["id"] = request["id"].clone();

        let body = response.to_string();
        let http = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(http.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        raw
    });

    (url, handle)
}

/// Endpoint that accepts connections and never answers.
#[allow(dead_code)]
pub async fn serve_silent() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    });
    (url, handle)
}

#[allow(dead_code)]
async fn read_http_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(split) = text.find("\r\n\r\n") {
            let length = text[..split]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= split + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
