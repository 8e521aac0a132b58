//! Store change events
//!
//! Repositories emit a [`StoreEvent`] after every successful write; watch
//! streams subscribe and re-query on relevant changes. The bus wraps
//! `tokio::sync::broadcast`: no subscribers is fine, slow subscribers lag
//! rather than block writers.

use tokio::sync::broadcast;
use uuid::Uuid;

/// Which entity family changed. Shot and recommendation events carry the
/// owning bean so bean-scoped streams can filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    BeansChanged,
    ShotsChanged { bean_id: Uuid },
    GrinderConfigsChanged,
    BasketConfigsChanged,
    RecommendationsChanged { bean_id: Uuid },
}

impl StoreEvent {
    /// Whether a bean-list query could observe this change. Shot writes
    /// touch beans too: deleting shots en masse follows a bean deletion.
    pub fn touches_beans(&self) -> bool {
        matches!(
            self,
            StoreEvent::BeansChanged | StoreEvent::ShotsChanged { .. }
        )
    }

    /// Whether a query over the given bean's shots could observe this change.
    pub fn touches_shots_for(&self, bean_id: Uuid) -> bool {
        match self {
            StoreEvent::ShotsChanged { bean_id: changed } => *changed == bean_id,
            StoreEvent::BeansChanged => true,
            _ => false,
        }
    }
}

/// Broadcast bus for store change events.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Emit without caring whether anyone is listening. A send error just
    /// means there are no subscribers right now.
    pub fn emit(&self, event: StoreEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
