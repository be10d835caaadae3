use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;

use crate::{dto::sse::SnapshotEvent, error::ServiceError, state::SharedState};

/// Subscribe to the snapshot feed, returning the `init` event to send first.
///
/// The receiver is created before the snapshot is taken so no mutation can slip
/// between the two.
pub async fn subscribe(
    state: &SharedState,
) -> Result<(SnapshotEvent, broadcast::Receiver<SnapshotEvent>), ServiceError> {
    let receiver = state.feed().subscribe();
    let snapshot = state.hub().snapshot().await?;
    let initial = SnapshotEvent::init(&snapshot)?;
    Ok((initial, receiver))
}

/// Convert a broadcast receiver into an SSE response, forwarding events and
/// cleaning up once the client disconnects.
pub fn to_sse_stream(
    initial: SnapshotEvent,
    mut receiver: broadcast::Receiver<SnapshotEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    // forwarder task: reads from broadcast and pushes into mpsc
    tokio::spawn(async move {
        if tx.send(Ok(to_event(initial))).await.is_err() {
            return;
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            if tx.send(Ok(to_event(payload))).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            // Only the latest snapshot matters; keep the stream alive.
                            warn!(skipped, "sse subscriber lagged behind");
                            continue;
                        }
                    }
                }
            }
        }

        tracing::info!("snapshot SSE stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn to_event(payload: SnapshotEvent) -> Event {
    Event::default().event(payload.event).data(payload.data)
}
