//! Provider event subscriptions.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::provider::methods::{ACCOUNTS_CHANGED, CHAIN_CHANGED};

/// Event kinds a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEventKind {
    AccountsChanged,
    ChainChanged,
}

impl ProviderEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderEventKind::AccountsChanged => ACCOUNTS_CHANGED,
            ProviderEventKind::ChainChanged => CHAIN_CHANGED,
        }
    }
}

/// An event raised by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// New ordered account list.
    AccountsChanged(Vec<String>),
    /// New chain id as reported by the wallet (hex string).
    ChainChanged(String),
}

impl ProviderEvent {
    pub fn kind(&self) -> ProviderEventKind {
        match self {
            ProviderEvent::AccountsChanged(_) => ProviderEventKind::AccountsChanged,
            ProviderEvent::ChainChanged(_) => ProviderEventKind::ChainChanged,
        }
    }

    /// Decode a raw `(name, payload)` pair as delivered by an injected wallet.
    pub fn from_raw(name: &str, payload: &Value) -> Option<Self> {
        match name {
            ACCOUNTS_CHANGED => {
                let accounts = payload
                    .as_array()?
                    .iter()
                    .filter_map(|a| a.as_str().map(str::to_string))
                    .collect();
                Some(ProviderEvent::AccountsChanged(accounts))
            }
            CHAIN_CHANGED => payload
                .as_str()
                .map(|c| ProviderEvent::ChainChanged(c.to_string())),
            _ => None,
        }
    }
}

/// Listener callback.
pub type Listener = Arc<dyn Fn(&ProviderEvent) + Send + Sync>;

/// Handle returned by a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Thread-safe listener registry shared by provider implementations.
#[derive(Clone, Default)]
pub struct EventHub {
    listeners: Arc<DashMap<SubscriptionId, (ProviderEventKind, Listener)>>,
    next_id: Arc<AtomicU64>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kind: ProviderEventKind, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.listeners.insert(id, (kind, listener));
        tracing::debug!(event = kind.as_str(), subscription = id.0, "Listener registered");
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Deliver an event to every matching listener.
    ///
    /// Returns the number of listeners invoked.
    pub fn emit(&self, event: &ProviderEvent) -> usize {
        let kind = event.kind();
        // Collect first so a listener may (un)subscribe without deadlocking the map.
        let matching: Vec<Listener> = self
            .listeners
            .iter()
            .filter(|entry| entry.value().0 == kind)
            .map(|entry| entry.value().1.clone())
            .collect();

        for listener in &matching {
            listener(event);
        }
        matching.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_emit_reaches_matching_listeners_only() {
        let hub = EventHub::new();
        let accounts_hits = Arc::new(AtomicUsize::new(0));
        let chain_hits = Arc::new(AtomicUsize::new(0));

        let a = accounts_hits.clone();
        hub.subscribe(
            ProviderEventKind::AccountsChanged,
            Arc::new(move |_: &ProviderEvent| {
                a.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let c = chain_hits.clone();
        hub.subscribe(
            ProviderEventKind::ChainChanged,
            Arc::new(move |_: &ProviderEvent| {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let delivered = hub.emit(&ProviderEvent::ChainChanged("0x2105".into()));
        assert_eq!(delivered, 1);
        assert_eq!(chain_hits.load(Ordering::SeqCst), 1);
        assert_eq!(accounts_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let hub = EventHub::new();
        let id = hub.subscribe(ProviderEventKind::ChainChanged, Arc::new(|_: &ProviderEvent| {}));
        assert_eq!(hub.listener_count(), 1);
        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        assert_eq!(hub.emit(&ProviderEvent::ChainChanged("0x1".into())), 0);
    }

    #[test]
    fn test_from_raw() {
        let event = ProviderEvent::from_raw("accountsChanged", &json!(["0xa", "0xb"]));
        assert_eq!(
            event,
            Some(ProviderEvent::AccountsChanged(vec!["0xa".into(), "0xb".into()]))
        );
        let event = ProviderEvent::from_raw("chainChanged", &json!("0x14a34"));
        assert_eq!(event, Some(ProviderEvent::ChainChanged("0x14a34".into())));
        assert!(ProviderEvent::from_raw("disconnect", &json!({})).is_none());
    }
}
