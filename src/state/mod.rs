mod feed;
pub mod hub;
pub mod match_state;
pub mod store;

use std::sync::Arc;

use crate::config::AppConfig;

pub use self::feed::{FEED_CAPACITY, SnapshotFeed};
pub use self::hub::{ConnectionId, HubHandle};

/// Shared handle to the application state, cloned into every handler.
pub type SharedState = Arc<AppState>;

/// Central application state: configuration plus handles to the sync hub and snapshot feed.
pub struct AppState {
    config: AppConfig,
    hub: HubHandle,
    feed: SnapshotFeed,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// Spawns the hub task, so this must run inside a Tokio runtime.
    pub fn new(config: AppConfig) -> SharedState {
        let feed = SnapshotFeed::new(FEED_CAPACITY);
        let hub = HubHandle::spawn(feed.clone());
        Arc::new(Self { config, hub, feed })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle to the task owning the authoritative match state.
    pub fn hub(&self) -> &HubHandle {
        &self.hub
    }

    /// Snapshot feed behind the SSE stream.
    pub fn feed(&self) -> &SnapshotFeed {
        &self.feed
    }
}
