use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};

use crate::{services::websocket_service, state::SharedState};

/// Upper bound for an inbound frame; a full `update` is a few hundred bytes.
const MAX_FRAME_SIZE: usize = 64 * 1024;

#[utoipa::path(
    get,
    path = "/ws",
    tag = "sync",
    responses(
        (status = 101, description = "Switched to the sync channel; an `init` snapshot follows")
    )
)]
/// Upgrade to the sync channel: `init` on join, then a `sync` after every mutation.
pub async fn ws_handler(
    State(state): State<SharedState>,
    upgrade: WebSocketUpgrade,
) -> impl IntoResponse {
    upgrade
        .max_message_size(MAX_FRAME_SIZE)
        .max_frame_size(MAX_FRAME_SIZE)
        .on_upgrade(move |socket| websocket_service::handle_socket(state, socket))
}

/// Route of the sync channel.
pub fn router() -> Router<SharedState> {
    Router::new().route("/ws", get(ws_handler))
}
