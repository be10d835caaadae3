use std::{net::SocketAddr, time::Duration};

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

use scoreboard_relay::{
    config::AppConfig,
    dto::ws::ServerMessage,
    routes,
    state::{AppState, SharedState, match_state::MatchState},
};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: SharedState,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a relay on an ephemeral port.
    pub async fn new() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        Self::on_listener(listener).await
    }

    /// Start a relay on an already bound listener.
    pub async fn on_listener(listener: TcpListener) -> Self {
        let addr = listener.local_addr().unwrap();
        let state = AppState::new(AppConfig::default());
        let app = routes::app(state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            state,
            _handle: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub async fn snapshot(&self) -> MatchState {
        self.state.hub().snapshot().await.unwrap()
    }
}

/// Connect a WebSocket client to the given URL.
pub async fn ws_connect(url: &str) -> WsClient {
    let (stream, _) = tokio_tungstenite::connect_async(url).await.unwrap();
    stream
}

/// Connect and consume the `init` message, returning its state.
pub async fn ws_join(url: &str) -> (WsClient, MatchState) {
    let mut stream = ws_connect(url).await;
    match ws_read(&mut stream).await {
        ServerMessage::Init { state } => (stream, state),
        other => panic!("Expected init, got: {other:?}"),
    }
}

/// Send a raw text frame.
pub async fn ws_send(stream: &mut WsClient, payload: serde_json::Value) {
    stream
        .send(Message::Text(payload.to_string().into()))
        .await
        .unwrap();
}

/// Read the next server message, failing after two seconds.
pub async fn ws_read(stream: &mut WsClient) -> ServerMessage {
    let deadline = Duration::from_secs(2);
    loop {
        let frame = tokio::time::timeout(deadline, stream.next())
            .await
            .expect("timed out waiting for server message")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Read the next message and require it to be a `sync`.
pub async fn ws_read_sync(stream: &mut WsClient) -> MatchState {
    match ws_read(stream).await {
        ServerMessage::Sync { state } => state,
        other => panic!("Expected sync, got: {other:?}"),
    }
}

/// Assert that nothing arrives within `wait`.
pub async fn ws_expect_silence(stream: &mut WsClient, wait: Duration) {
    if let Ok(frame) = tokio::time::timeout(wait, stream.next()).await {
        panic!("Expected no message, got: {frame:?}");
    }
}
