//! Completion notifications for game code.

use tokio::sync::broadcast;

/// Raised when a pipeline step completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// SDK creation finished.
    SdkReady(bool),
    /// Wallet connect finished; empty on failure.
    WalletReady(Vec<String>),
    /// Sub-account lookup finished.
    SubAccountReady(Option<String>),
    /// Transaction submission finished.
    TransactionSent(Option<String>),
}

/// Broadcast channel fanning events out to every subscriber.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BridgeEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn emit(&self, event: BridgeEvent) {
        tracing::debug!(event = ?event, subscribers = self.tx.receiver_count(), "Bridge event");
        let _ = self.tx.send(event);
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_subscriber_sees_events() {
        let bus = EventBus::default();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        bus.emit(BridgeEvent::SdkReady(true));

        assert_eq!(a.recv().await.unwrap(), BridgeEvent::SdkReady(true));
        assert_eq!(b.recv().await.unwrap(), BridgeEvent::SdkReady(true));
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new(0);
        bus.emit(BridgeEvent::TransactionSent(None));
        assert_eq!(bus.receiver_count(), 0);
    }
}
