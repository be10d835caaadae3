use tokio::sync::broadcast;

use crate::dto::sse::SnapshotEvent;

/// Snapshots buffered per subscriber; a slower one skips to newer snapshots.
pub const FEED_CAPACITY: usize = 16;

/// Fan-out of snapshot events to the SSE subscribers.
#[derive(Clone)]
pub struct SnapshotFeed {
    sender: broadcast::Sender<SnapshotEvent>,
}

impl SnapshotFeed {
    /// Feed keeping up to `capacity` undelivered events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SnapshotEvent> {
        self.sender.subscribe()
    }

    /// Publish to current subscribers; nobody listening is not an error.
    pub fn publish(&self, event: SnapshotEvent) {
        let _ = self.sender.send(event);
    }

    /// Number of live SSE subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
