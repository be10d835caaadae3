//! WebSocket client keeping a [`Mirror`] in sync with the relay.
//!
//! A single task owns the mirror. It multiplexes frames from the server,
//! commands from the UI and the one-second display ticker, and reconnects on a
//! fixed delay whenever the connection drops.

pub mod mirror;

use std::{future::pending, time::Duration};

use futures::{SinkExt, StreamExt, stream::SplitSink};
use thiserror::Error;
use tokio::{
    net::TcpStream,
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{Instant, Interval, MissedTickBehavior, interval_at, sleep_until, timeout},
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::{
    catalog::TeamCatalog,
    dto::ws::{ClientMessage, ServerMessage},
    state::match_state::{MatchState, SideIndex},
};

pub use self::mirror::Mirror;

/// Delay between two reconnection attempts.
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(2);
/// Period of the local display ticker.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);
/// Time allowed for one connection attempt, handshake included.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// Errors surfaced to the UI layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The mirror task has stopped.
    #[error("mirror task is no longer running")]
    Closed,
}

/// Settings of a mirror connection.
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    /// WebSocket endpoint of the relay, e.g. `ws://127.0.0.1:3000/ws`.
    pub url: String,
    /// Delay between reconnection attempts.
    pub reconnect_interval: Duration,
    /// Bound on a single connection attempt.
    pub connect_timeout: Duration,
    /// Period of the display ticker.
    pub tick_period: Duration,
    /// Catalog used to resolve team selections.
    pub catalog: TeamCatalog,
}

impl MirrorOptions {
    /// Options with the default timings and the built-in catalog.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect_interval: RECONNECT_INTERVAL,
            connect_timeout: CONNECT_TIMEOUT,
            tick_period: TICK_PERIOD,
            catalog: TeamCatalog::builtin(),
        }
    }
}

/// What the UI renders: the mirrored state and whether the link is up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorView {
    /// Local copy of the scoreboard, including the locally ticked clock.
    pub state: MatchState,
    /// Whether the WebSocket is currently connected.
    pub connected: bool,
}

/// Requests the UI can make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorCommand {
    /// Select a team for a side, or clear it with `None`.
    TeamChange {
        /// Side to change.
        side: SideIndex,
        /// Catalog key.
        key: Option<String>,
    },
    /// Add to (or subtract from) a side's score.
    ScoreDelta {
        /// Side to change.
        side: SideIndex,
        /// Signed amount.
        delta: i64,
    },
    /// Start the clock.
    TimerStart,
    /// Pause the clock.
    TimerPause,
    /// Start or pause depending on the current state.
    TimerToggle,
    /// Stop the clock at zero.
    TimerReset,
    /// Stop the clock at the given number of minutes.
    TimerSetMinutes(u32),
    /// Zero scores and clock.
    FullReset,
}

/// Handle to a running mirror task.
pub struct MirrorHandle {
    commands: mpsc::UnboundedSender<MirrorCommand>,
    view: watch::Receiver<MirrorView>,
    task: JoinHandle<()>,
}

impl MirrorHandle {
    /// Select a team for `side`; `None` clears it.
    pub fn request_team_change(&self, side: SideIndex, key: Option<&str>) -> Result<(), ClientError> {
        self.request(MirrorCommand::TeamChange {
            side,
            key: key.map(str::to_string),
        })
    }

    /// Change a side's score by `delta`, clamped at zero.
    pub fn request_score_delta(&self, side: SideIndex, delta: i64) -> Result<(), ClientError> {
        self.request(MirrorCommand::ScoreDelta { side, delta })
    }

    /// Start the clock.
    pub fn request_timer_start(&self) -> Result<(), ClientError> {
        self.request(MirrorCommand::TimerStart)
    }

    /// Pause the clock.
    pub fn request_timer_pause(&self) -> Result<(), ClientError> {
        self.request(MirrorCommand::TimerPause)
    }

    /// Toggle the clock.
    pub fn request_timer_toggle(&self) -> Result<(), ClientError> {
        self.request(MirrorCommand::TimerToggle)
    }

    /// Stop the clock at zero.
    pub fn request_timer_reset(&self) -> Result<(), ClientError> {
        self.request(MirrorCommand::TimerReset)
    }

    /// Stop the clock at `minutes`.
    pub fn request_timer_set_minutes(&self, minutes: u32) -> Result<(), ClientError> {
        self.request(MirrorCommand::TimerSetMinutes(minutes))
    }

    /// Zero both scores and the clock.
    pub fn request_full_reset(&self) -> Result<(), ClientError> {
        self.request(MirrorCommand::FullReset)
    }

    /// Subscribe to view changes.
    pub fn view(&self) -> watch::Receiver<MirrorView> {
        self.view.clone()
    }

    /// Stop the mirror task and wait for it to finish.
    pub async fn shutdown(self) {
        let Self { commands, task, .. } = self;
        drop(commands);
        let _ = task.await;
    }

    /// Queue any request.
    pub fn request(&self, command: MirrorCommand) -> Result<(), ClientError> {
        self.commands.send(command).map_err(|_| ClientError::Closed)
    }
}

/// Spawn a mirror task connecting to `options.url`.
pub fn spawn(options: MirrorOptions) -> MirrorHandle {
    let (commands, receiver) = mpsc::unbounded_channel();
    let (view_tx, view) = watch::channel(MirrorView::default());
    let task = tokio::spawn(MirrorTask::new(options, receiver, view_tx).run());
    MirrorHandle {
        commands,
        view,
        task,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Disconnected,
    Shutdown,
}

struct MirrorTask {
    options: MirrorOptions,
    commands: mpsc::UnboundedReceiver<MirrorCommand>,
    view: watch::Sender<MirrorView>,
    mirror: Mirror,
    ticker: Option<Interval>,
    connected: bool,
}

impl MirrorTask {
    fn new(
        options: MirrorOptions,
        commands: mpsc::UnboundedReceiver<MirrorCommand>,
        view: watch::Sender<MirrorView>,
    ) -> Self {
        Self {
            options,
            commands,
            view,
            mirror: Mirror::new(),
            ticker: None,
            connected: false,
        }
    }

    async fn run(mut self) {
        loop {
            match self.connect().await {
                Ok(stream) => {
                    info!(url = %self.options.url, "connected to scoreboard relay");
                    self.set_connected(true);
                    if self.drive(stream).await == Outcome::Shutdown {
                        break;
                    }
                    warn!(url = %self.options.url, "connection lost; reconnecting");
                    self.set_connected(false);
                }
                Err(Outcome::Shutdown) => break,
                Err(Outcome::Disconnected) => {}
            }

            if self.wait_before_retry().await == Outcome::Shutdown {
                break;
            }
        }
        debug!("mirror task stopped");
    }

    /// Attempt one connection while the ticker and local commands keep running.
    async fn connect(&mut self) -> Result<WsStream, Outcome> {
        let attempt = timeout(
            self.options.connect_timeout,
            connect_async(self.options.url.clone()),
        );
        tokio::pin!(attempt);

        loop {
            tokio::select! {
                result = &mut attempt => {
                    return match result {
                        Ok(Ok((stream, _))) => Ok(stream),
                        Ok(Err(err)) => {
                            warn!(url = %self.options.url, error = %err, "connection attempt failed");
                            Err(Outcome::Disconnected)
                        }
                        Err(_) => {
                            warn!(url = %self.options.url, "connection attempt timed out");
                            Err(Outcome::Disconnected)
                        }
                    };
                },
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        return Err(Outcome::Shutdown);
                    };
                    self.apply_offline(command);
                },
                _ = next_tick(&mut self.ticker) => self.on_tick(),
            }
        }
    }

    /// Serve one connection until it drops or the UI goes away.
    async fn drive(&mut self, stream: WsStream) -> Outcome {
        let (sink, mut frames) = stream.split();
        let (outbound, outbound_rx) = mpsc::unbounded_channel::<Message>();
        let writer = tokio::spawn(write_frames(sink, outbound_rx));

        let outcome = loop {
            tokio::select! {
                frame = frames.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.on_server_frame(text.as_str()),
                    Some(Ok(Message::Close(_))) | None => break Outcome::Disconnected,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(error = %err, "websocket error");
                        break Outcome::Disconnected;
                    }
                },
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        let _ = outbound.send(Message::Close(None));
                        break Outcome::Shutdown;
                    };
                    let Some(message) = self.apply_command(command) else {
                        continue;
                    };
                    match serde_json::to_string(&message) {
                        Ok(payload) => {
                            if outbound.send(Message::Text(payload.into())).is_err() {
                                warn!("writer stopped; dropping mutation");
                                break Outcome::Disconnected;
                            }
                        }
                        Err(err) => warn!(error = %err, "failed to serialize mutation"),
                    }
                },
                _ = next_tick(&mut self.ticker) => self.on_tick(),
            }
        };

        drop(outbound);
        if outcome == Outcome::Shutdown {
            let _ = writer.await;
        } else {
            writer.abort();
        }
        outcome
    }

    /// Keep ticking and accepting commands until the retry delay expires.
    async fn wait_before_retry(&mut self) -> Outcome {
        let deadline = Instant::now() + self.options.reconnect_interval;
        loop {
            tokio::select! {
                _ = sleep_until(deadline) => return Outcome::Disconnected,
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        return Outcome::Shutdown;
                    };
                    self.apply_offline(command);
                },
                _ = next_tick(&mut self.ticker) => self.on_tick(),
            }
        }
    }

    fn apply_offline(&mut self, command: MirrorCommand) {
        if let Some(message) = self.apply_command(command) {
            debug!(?message, "not connected; dropping mutation");
        }
    }

    fn on_server_frame(&mut self, payload: &str) {
        match serde_json::from_str::<ServerMessage>(payload) {
            Ok(message) => match message.into_state() {
                Some(snapshot) => {
                    self.mirror.reconcile(snapshot);
                    self.refresh();
                }
                None => debug!("ignoring unknown server message"),
            },
            Err(err) => warn!(error = %err, "failed to parse server message"),
        }
    }

    fn on_tick(&mut self) {
        if self.mirror.tick() {
            self.publish();
        }
    }

    fn apply_command(&mut self, command: MirrorCommand) -> Option<ClientMessage> {
        let message = match command {
            MirrorCommand::TeamChange { side, key } => {
                Some(
                    self.mirror
                        .team_change(side, key.as_deref(), &self.options.catalog),
                )
            }
            MirrorCommand::ScoreDelta { side, delta } => Some(self.mirror.score_delta(side, delta)),
            MirrorCommand::TimerStart => self.mirror.timer_start(),
            MirrorCommand::TimerPause => self.mirror.timer_pause(),
            MirrorCommand::TimerToggle => self.mirror.timer_toggle(),
            MirrorCommand::TimerReset => Some(self.mirror.timer_reset()),
            MirrorCommand::TimerSetMinutes(minutes) => Some(self.mirror.timer_set_minutes(minutes)),
            MirrorCommand::FullReset => Some(self.mirror.full_reset()),
        };
        self.refresh();
        message
    }

    /// Align the ticker with the mirrored clock, then publish.
    fn refresh(&mut self) {
        match (self.mirror.is_running(), self.ticker.is_some()) {
            (true, false) => {
                let period = self.options.tick_period;
                let mut ticker = interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.ticker = Some(ticker);
            }
            (false, true) => self.ticker = None,
            _ => {}
        }
        self.publish();
    }

    fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
        self.publish();
    }

    fn publish(&self) {
        self.view.send_replace(MirrorView {
            state: self.mirror.state().clone(),
            connected: self.connected,
        });
    }
}

/// Forward queued frames to the socket until the channel closes or a write fails.
async fn write_frames(mut sink: WsSink, mut outbound: mpsc::UnboundedReceiver<Message>) {
    while let Some(message) = outbound.recv().await {
        if let Err(err) = sink.send(message).await {
            warn!(error = %err, "failed to send frame");
            break;
        }
    }
}

/// Resolve on the next tick, or never when the clock is stopped.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => pending::<()>().await,
    }
}
