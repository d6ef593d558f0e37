//! Wallet provider interface.
//!
//! # Data Flow
//! ```text
//! session.rs
//!     → Provider::request(method, params)   (JSON-RPC style)
//!     → wallet / relay endpoint
//!
//! wallet events (host → bridge `providerEvent`)
//!     → Provider::emit → EventHub::emit
//!     → listeners registered through Provider::on
//! ```
//!
//! # Design Decisions
//! - Params and results stay as `serde_json::Value`; the wallet owns the schema
//! - Listeners are plain callbacks so they can run on any thread

pub mod events;
pub mod http;
pub mod methods;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use events::{EventHub, Listener, ProviderEvent, ProviderEventKind, SubscriptionId};
pub use http::HttpProvider;

/// Errors raised by a provider request.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Request never reached the wallet, or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Wallet answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Wallet answered with something that is not a JSON-RPC response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// EIP-1193 style provider handle.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Issue a request and wait for its result.
    async fn request(&self, method: &str, params: Value) -> ProviderResult<Value>;

    /// Register a listener for a provider event.
    fn on(&self, kind: ProviderEventKind, listener: Listener) -> SubscriptionId;

    /// Remove a listener. Returns false if it was not registered.
    fn remove_listener(&self, id: SubscriptionId) -> bool;

    /// Deliver a wallet event to registered listeners. Returns how many ran.
    fn emit(&self, event: &ProviderEvent) -> usize;
}
