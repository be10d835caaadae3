use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of the `/healthcheck` route.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// "ok" while the sync hub answers, "degraded" otherwise.
    pub status: String,
    /// Clients currently receiving snapshots over WebSocket.
    pub connections: usize,
    /// Clients following the SSE snapshot stream.
    pub sse_subscribers: usize,
}

impl HealthResponse {
    /// The hub answered with its connection count.
    pub fn ok(connections: usize, sse_subscribers: usize) -> Self {
        Self {
            status: "ok".to_string(),
            connections,
            sse_subscribers,
        }
    }

    /// The hub task is gone; only the feed can still be inspected.
    pub fn degraded(sse_subscribers: usize) -> Self {
        Self {
            status: "degraded".to_string(),
            connections: 0,
            sse_subscribers,
        }
    }

    /// Whether the relay can serve clients.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
