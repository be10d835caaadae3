use crate::state::match_state::{
    MatchPatch, MatchState, SideIndex, TimerPatch, TimerState, clamp_count,
};

/// Mutation requested by a client, already decoded from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Merge a partial state, replacing each supplied part as a whole.
    Full(MatchPatch),
    /// Set one side's score, optionally refreshing the clock at the same time.
    Score {
        /// Side whose score changes.
        side: SideIndex,
        /// New score as sent by the client.
        score: i64,
        /// Clock value observed by the client when it sent the score.
        timer: Option<TimerPatch>,
    },
    /// Replace the clock.
    Timer(TimerPatch),
}

impl Mutation {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Full(_) => "update",
            Self::Score { .. } => "score",
            Self::Timer(_) => "timer",
        }
    }
}

/// Holder of the authoritative match state.
///
/// The store never rejects a mutation; out of range values are clamped.
#[derive(Debug, Default)]
pub struct MatchStore {
    state: MatchState,
}

impl MatchStore {
    /// Store initialised with the kick-off state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply any mutation and return the resulting state.
    pub fn apply(&mut self, mutation: Mutation) -> &MatchState {
        match mutation {
            Mutation::Full(patch) => self.apply_full_update(patch),
            Mutation::Score { side, score, timer } => self.apply_score_update(side, score, timer),
            Mutation::Timer(timer) => self.apply_timer_update(timer),
        }
        &self.state
    }

    /// Merge `patch` into the state. Each supplied side replaces the stored one.
    pub fn apply_full_update(&mut self, patch: MatchPatch) {
        let MatchPatch {
            team1,
            team2,
            timer,
        } = patch;
        if let Some(side) = team1 {
            self.state.team1 = side.into_side(SideIndex::Home);
        }
        if let Some(side) = team2 {
            self.state.team2 = side.into_side(SideIndex::Away);
        }
        if let Some(timer) = timer {
            self.state.timer = TimerState::from(timer);
        }
    }

    /// Set the score of `side`, replacing the clock too when `timer` is given.
    pub fn apply_score_update(&mut self, side: SideIndex, score: i64, timer: Option<TimerPatch>) {
        self.state.side_mut(side).score = clamp_count(score);
        if let Some(timer) = timer {
            self.state.timer = TimerState::from(timer);
        }
    }

    /// Replace the clock.
    pub fn apply_timer_update(&mut self, timer: TimerPatch) {
        self.state.timer = TimerState::from(timer);
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> MatchState {
        self.state.clone()
    }
}
