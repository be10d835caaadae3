use crate::state::match_state::MatchState;

/// SSE event name of the snapshot sent to a fresh subscriber.
pub const EVENT_INIT: &str = "init";
/// SSE event name of the snapshot sent after each mutation.
pub const EVENT_SYNC: &str = "sync";

/// Snapshot ready to be written on the SSE stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotEvent {
    /// Either [`EVENT_INIT`] or [`EVENT_SYNC`].
    pub event: &'static str,
    /// Serialized [`MatchState`].
    pub data: String,
}

impl SnapshotEvent {
    /// Event greeting a new subscriber with the current state.
    pub fn init(state: &MatchState) -> serde_json::Result<Self> {
        Self::encode(EVENT_INIT, state)
    }

    /// Event published after a mutation was applied.
    pub fn sync(state: &MatchState) -> serde_json::Result<Self> {
        Self::encode(EVENT_SYNC, state)
    }

    fn encode(event: &'static str, state: &MatchState) -> serde_json::Result<Self> {
        Ok(Self {
            event,
            data: serde_json::to_string(state)?,
        })
    }
}
