use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ask the sync hub for its connection count and combine it with the feed's subscriber count.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let sse_subscribers = state.feed().subscriber_count();
    match state.hub().connection_count().await {
        Ok(connections) => HealthResponse::ok(connections, sse_subscribers),
        Err(err) => {
            warn!(error = %err, "sync hub did not answer health probe");
            HealthResponse::degraded(sse_subscribers)
        }
    }
}
