//! Task owning the authoritative match state and the set of connected clients.
//!
//! Every mutation and every connection change goes through a single command
//! channel, so the state is only ever touched by the hub task itself.

use std::collections::HashMap;

use axum::extract::ws::Message;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::{sse::SnapshotEvent, ws::ServerMessage},
    error::ServiceError,
    state::{
        SnapshotFeed,
        match_state::MatchState,
        store::{MatchStore, Mutation},
    },
};

/// Identifier assigned to each WebSocket connection.
pub type ConnectionId = Uuid;

enum HubCommand {
    Join {
        id: ConnectionId,
        tx: mpsc::UnboundedSender<Message>,
    },
    Leave {
        id: ConnectionId,
    },
    Apply {
        origin: ConnectionId,
        mutation: Mutation,
    },
    Snapshot {
        reply: oneshot::Sender<MatchState>,
    },
    ConnectionCount {
        reply: oneshot::Sender<usize>,
    },
}

/// Cloneable handle used to talk to the hub task.
#[derive(Clone)]
pub struct HubHandle {
    commands: mpsc::UnboundedSender<HubCommand>,
}

impl HubHandle {
    /// Spawn the hub task, publishing every snapshot on `feed` as well.
    pub fn spawn(feed: SnapshotFeed) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let hub = SyncHub {
            store: MatchStore::new(),
            connections: HashMap::new(),
            feed,
        };
        tokio::spawn(hub.run(receiver));
        Self { commands }
    }

    /// Register a connection; it receives an `init` snapshot before any `sync`.
    pub fn join(
        &self,
        id: ConnectionId,
        tx: mpsc::UnboundedSender<Message>,
    ) -> Result<(), ServiceError> {
        self.send(HubCommand::Join { id, tx })
    }

    /// Remove a connection from the broadcast set.
    pub fn leave(&self, id: ConnectionId) -> Result<(), ServiceError> {
        self.send(HubCommand::Leave { id })
    }

    /// Queue a mutation; the resulting snapshot is broadcast to every connection.
    pub fn apply(&self, origin: ConnectionId, mutation: Mutation) -> Result<(), ServiceError> {
        self.send(HubCommand::Apply { origin, mutation })
    }

    /// Current authoritative snapshot.
    pub async fn snapshot(&self) -> Result<MatchState, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.send(HubCommand::Snapshot { reply })?;
        response.await.map_err(|_| ServiceError::HubUnavailable)
    }

    /// Number of connections in the broadcast set.
    pub async fn connection_count(&self) -> Result<usize, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.send(HubCommand::ConnectionCount { reply })?;
        response.await.map_err(|_| ServiceError::HubUnavailable)
    }

    fn send(&self, command: HubCommand) -> Result<(), ServiceError> {
        self.commands
            .send(command)
            .map_err(|_| ServiceError::HubUnavailable)
    }
}

struct SyncHub {
    store: MatchStore,
    connections: HashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
    feed: SnapshotFeed,
}

impl SyncHub {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<HubCommand>) {
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        info!("sync hub stopped");
    }

    fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Join { id, tx } => {
                let state = self.store.snapshot();
                let Some(message) = encode(&ServerMessage::Init { state }) else {
                    return;
                };
                if tx.send(message).is_err() {
                    debug!(connection_id = %id, "connection closed before init");
                    return;
                }
                self.connections.insert(id, tx);
                debug!(connection_id = %id, clients = self.connections.len(), "client joined");
            }
            HubCommand::Leave { id } => {
                if self.connections.remove(&id).is_some() {
                    debug!(connection_id = %id, clients = self.connections.len(), "client left");
                }
            }
            HubCommand::Apply { origin, mutation } => {
                let kind = mutation.kind();
                let state = self.store.apply(mutation).clone();
                info!(connection_id = %origin, kind, "applied mutation");
                debug!(?state, "state updated");
                self.broadcast_sync(state);
            }
            HubCommand::Snapshot { reply } => {
                let _ = reply.send(self.store.snapshot());
            }
            HubCommand::ConnectionCount { reply } => {
                let _ = reply.send(self.connections.len());
            }
        }
    }

    /// Push `state` to every connection, dropping the ones whose writer is gone.
    fn broadcast_sync(&mut self, state: MatchState) {
        match SnapshotEvent::sync(&state) {
            Ok(event) => self.feed.publish(event),
            Err(err) => warn!(error = %err, "failed to serialize feed snapshot"),
        }

        let Some(message) = encode(&ServerMessage::Sync { state }) else {
            return;
        };
        self.connections.retain(|id, tx| {
            let open = tx.send(message.clone()).is_ok();
            if !open {
                debug!(connection_id = %id, "dropping closed connection");
            }
            open
        });
    }
}

fn encode(message: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(payload) => Some(Message::Text(payload.into())),
        Err(err) => {
            warn!(error = %err, "failed to serialize server message");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        FEED_CAPACITY,
        match_state::{SideIndex, TimerPatch},
    };

    fn decode(message: Message) -> ServerMessage {
        match message {
            Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    async fn join(hub: &HubHandle) -> (ConnectionId, mpsc::UnboundedReceiver<Message>) {
        let id = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.join(id, tx).unwrap();
        let init = decode(rx.recv().await.unwrap());
        assert!(matches!(init, ServerMessage::Init { .. }));
        (id, rx)
    }

    #[tokio::test]
    async fn join_receives_current_snapshot() {
        let hub = HubHandle::spawn(SnapshotFeed::new(FEED_CAPACITY));
        let (writer, _rx) = join(&hub).await;
        hub.apply(
            writer,
            Mutation::Score {
                side: SideIndex::Home,
                score: 2,
                timer: None,
            },
        )
        .unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.join(Uuid::new_v4(), tx).unwrap();
        let ServerMessage::Init { state } = decode(rx.recv().await.unwrap()) else {
            panic!("expected init");
        };
        assert_eq!(state, hub.snapshot().await.unwrap());
        assert_eq!(state.team1.score, 2);
    }

    #[tokio::test]
    async fn mutation_is_broadcast_to_everyone_including_sender() {
        let hub = HubHandle::spawn(SnapshotFeed::new(FEED_CAPACITY));
        let (sender, mut sender_rx) = join(&hub).await;
        let (_viewer, mut viewer_rx) = join(&hub).await;

        hub.apply(
            sender,
            Mutation::Timer(TimerPatch {
                seconds: 10,
                running: true,
            }),
        )
        .unwrap();

        for rx in [&mut sender_rx, &mut viewer_rx] {
            let ServerMessage::Sync { state } = decode(rx.recv().await.unwrap()) else {
                panic!("expected sync");
            };
            assert_eq!(state.timer.seconds, 10);
            assert!(state.timer.running);
        }
    }

    #[tokio::test]
    async fn left_and_closed_connections_are_removed() {
        let hub = HubHandle::spawn(SnapshotFeed::new(FEED_CAPACITY));
        let (left, _left_rx) = join(&hub).await;
        let (_closed, closed_rx) = join(&hub).await;
        let (stayer, _stayer_rx) = join(&hub).await;
        assert_eq!(hub.connection_count().await.unwrap(), 3);

        hub.leave(left).unwrap();
        drop(closed_rx);
        hub.apply(stayer, Mutation::Timer(TimerPatch::default()))
            .unwrap();

        assert_eq!(hub.connection_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn snapshots_are_published_on_the_feed() {
        let feed = SnapshotFeed::new(FEED_CAPACITY);
        let mut events = feed.subscribe();
        let hub = HubHandle::spawn(feed);

        hub.apply(
            Uuid::new_v4(),
            Mutation::Score {
                side: SideIndex::Away,
                score: 1,
                timer: None,
            },
        )
        .unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.event, "sync");
        let state: MatchState = serde_json::from_str(&event.data).unwrap();
        assert_eq!(state.team2.score, 1);
    }
}
