use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::{MessageError, decode_mutation},
    state::{ConnectionId, SharedState},
};

/// Handle the full lifecycle for an individual scoreboard WebSocket connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let connection_id: ConnectionId = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    if let Err(err) = state.hub().join(connection_id, outbound_tx.clone()) {
        warn!(%connection_id, error = %err, "cannot register connection");
        let _ = outbound_tx.send(Message::Close(None));
        finalize(writer_task, outbound_tx).await;
        return;
    }

    info!(%connection_id, "client connected");

    while let Some(message) = receiver.next().await {
        let decoded = match message {
            Ok(Message::Text(text)) => decode_mutation(text.as_str()),
            Ok(Message::Binary(bytes)) => std::str::from_utf8(&bytes)
                .map_err(|_| MessageError::NotUtf8)
                .and_then(decode_mutation),
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
                continue;
            }
            Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(frame)) => {
                debug!(%connection_id, "client sent close frame");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Err(err) => {
                warn!(%connection_id, error = %err, "websocket error");
                break;
            }
        };

        match decoded {
            Ok(mutation) => {
                if let Err(err) = state.hub().apply(connection_id, mutation) {
                    warn!(%connection_id, error = %err, "dropping mutation");
                    break;
                }
            }
            Err(err) => {
                warn!(%connection_id, error = %err, "dropping malformed message");
            }
        }
    }

    let _ = state.hub().leave(connection_id);
    info!(%connection_id, "client disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
