use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::state::{
    match_state::{MatchPatch, MatchState, SideIndex, TimerPatch},
    store::Mutation,
};

/// Reasons an inbound frame is dropped without touching the state.
#[derive(Debug, Error)]
pub enum MessageError {
    /// Payload is not valid JSON or does not match any message shape.
    #[error("unparseable message: {0}")]
    Parse(#[from] serde_json::Error),
    /// Binary frame that is not UTF-8 text.
    #[error("binary frame is not valid UTF-8")]
    NotUtf8,
    /// Envelope carries a `type` nobody handles.
    #[error("unknown message type")]
    UnknownType,
    /// `score` message naming a side other than 1 or 2.
    #[error("unknown team number {0}")]
    InvalidSide(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
/// Mutation messages accepted from scoreboard clients.
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Merge a partial state and broadcast it.
    Update {
        /// Parts of the state to replace.
        state: MatchPatch,
    },
    /// Set one side's score.
    Score {
        /// `1` for home, `2` for away.
        team: u8,
        /// New score.
        score: i64,
        /// Clock observed by the sender, refreshed along with the score.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timer: Option<TimerPatch>,
    },
    /// Replace the clock.
    Timer {
        /// New clock value.
        timer: TimerPatch,
    },
    /// Any other `type`; ignored.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Decode a text frame.
    pub fn from_json_str(payload: &str) -> Result<Self, MessageError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Convert into a store mutation, rejecting messages the store cannot apply.
    pub fn into_mutation(self) -> Result<Mutation, MessageError> {
        match self {
            Self::Update { state } => Ok(Mutation::Full(state)),
            Self::Score { team, score, timer } => {
                let side = SideIndex::from_wire(team).ok_or(MessageError::InvalidSide(team))?;
                Ok(Mutation::Score { side, score, timer })
            }
            Self::Timer { timer } => Ok(Mutation::Timer(timer)),
            Self::Unknown => Err(MessageError::UnknownType),
        }
    }
}

/// Decode a text frame straight into a store mutation.
pub fn decode_mutation(payload: &str) -> Result<Mutation, MessageError> {
    ClientMessage::from_json_str(payload)?.into_mutation()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
/// Snapshots pushed by the server.
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Sent once to a client right after it connects.
    Init {
        /// Current snapshot.
        state: MatchState,
    },
    /// Sent to every client after each accepted mutation.
    Sync {
        /// Snapshot after the mutation.
        state: MatchState,
    },
    /// Any other `type`; ignored.
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    /// Snapshot carried by `init` and `sync`.
    pub fn into_state(self) -> Option<MatchState> {
        match self {
            Self::Init { state } | Self::Sync { state } => Some(state),
            Self::Unknown => None,
        }
    }
}
