//! Broadcast-backed publish subject for reactive view bindings.

use tokio::sync::broadcast;

pub const DEFAULT_SUBJECT_CAPACITY: usize = 16;

/// Fans each published value out to every live subscriber. Subscribers only
/// see values published after they subscribed.
pub struct Subject<T: Clone> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone> Subject<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.tx.subscribe()
    }

    /// Returns how many subscribers received the value.
    pub fn publish(&self, value: T) -> usize {
        self.tx.send(value).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone> Default for Subject<T> {
    fn default() -> Self {
        Self::new(DEFAULT_SUBJECT_CAPACITY)
    }
}
