use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::SharedState;

pub mod docs;
pub mod health;
pub mod scoreboard;
pub mod sse;
pub mod websocket;

/// Every route of the relay, bound to the shared state.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(websocket::router())
        .merge(sse::router())
        .merge(scoreboard::router())
        .merge(docs::router())
        .with_state(state)
}

/// Build the top-level application and attach cross-cutting middleware layers.
pub fn app(state: SharedState) -> Router<()> {
    router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
