use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{error::AppError, services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse",
    tag = "sse",
    responses((status = 200, description = "Snapshot SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream the scoreboard snapshot: once on connect, then after every mutation.
pub async fn snapshot_stream(
    State(state): State<SharedState>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    let (initial, receiver) = sse_service::subscribe(&state).await?;
    info!("New snapshot SSE connection");
    Ok(sse_service::to_sse_stream(initial, receiver))
}

/// Configure the SSE endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse", get(snapshot_stream))
}
