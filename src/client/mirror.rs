//! Local copy of the scoreboard kept by each client.
//!
//! Operations update the local copy right away and return the message to send;
//! the next `init`/`sync` from the server overwrites whatever was applied
//! locally.

use crate::{
    catalog::TeamCatalog,
    dto::ws::ClientMessage,
    state::match_state::{MatchPatch, MatchState, SideIndex, TimerPatch, TimerState},
};

/// Client-side mirror of the authoritative [`MatchState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mirror {
    state: MatchState,
}

impl Mirror {
    /// Mirror showing the kick-off state until the first snapshot arrives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Local copy of the state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Whether the display ticker should be counting.
    pub fn is_running(&self) -> bool {
        self.state.timer.running
    }

    /// Replace the local copy with a snapshot from the server.
    pub fn reconcile(&mut self, snapshot: MatchState) {
        self.state = snapshot;
    }

    /// Advance the displayed clock by one second if it is running.
    pub fn tick(&mut self) -> bool {
        if !self.state.timer.running {
            return false;
        }
        self.state.timer.seconds = self.state.timer.seconds.saturating_add(1);
        true
    }

    /// Select `key` (or clear the selection) on `side`.
    ///
    /// Sends the whole side, so its score and the current clock travel along.
    pub fn team_change(
        &mut self,
        side: SideIndex,
        key: Option<&str>,
        catalog: &TeamCatalog,
    ) -> ClientMessage {
        let selection = catalog.select(side, key);
        let target = self.state.side_mut(side);
        target.key = selection.key;
        target.name = selection.name;
        target.logo = selection.logo;

        let full = MatchPatch::full(&self.state);
        let mut patch = MatchPatch {
            timer: full.timer,
            ..MatchPatch::default()
        };
        match side {
            SideIndex::Home => patch.team1 = full.team1,
            SideIndex::Away => patch.team2 = full.team2,
        }
        ClientMessage::Update { state: patch }
    }

    /// Add `delta` to a side's score, never going below zero.
    pub fn score_delta(&mut self, side: SideIndex, delta: i64) -> ClientMessage {
        let current = i64::from(self.state.side(side).score);
        let score = current.saturating_add(delta).max(0);
        self.state.side_mut(side).score = u32::try_from(score).unwrap_or(u32::MAX);

        ClientMessage::Score {
            team: side.wire(),
            score,
            timer: Some(TimerPatch::from(self.state.timer)),
        }
    }

    /// Start the clock; `None` when it is already running.
    pub fn timer_start(&mut self) -> Option<ClientMessage> {
        if self.state.timer.running {
            return None;
        }
        self.state.timer.running = true;
        Some(self.timer_message())
    }

    /// Pause the clock; `None` when it is already stopped.
    pub fn timer_pause(&mut self) -> Option<ClientMessage> {
        if !self.state.timer.running {
            return None;
        }
        self.state.timer.running = false;
        Some(self.timer_message())
    }

    /// Pause a running clock, start a stopped one.
    pub fn timer_toggle(&mut self) -> Option<ClientMessage> {
        if self.state.timer.running {
            self.timer_pause()
        } else {
            self.timer_start()
        }
    }

    /// Stop the clock and put it back to zero.
    pub fn timer_reset(&mut self) -> ClientMessage {
        self.state.timer = TimerState::stopped(0);
        self.timer_message()
    }

    /// Stop the clock and set it to `minutes` minutes.
    pub fn timer_set_minutes(&mut self, minutes: u32) -> ClientMessage {
        self.state.timer = TimerState::stopped(minutes.saturating_mul(60));
        self.timer_message()
    }

    /// Zero both scores, stop and zero the clock, keeping the selected teams.
    pub fn full_reset(&mut self) -> ClientMessage {
        self.state.team1.score = 0;
        self.state.team2.score = 0;
        self.state.timer = TimerState::stopped(0);
        ClientMessage::Update {
            state: MatchPatch::full(&self.state),
        }
    }

    fn timer_message(&self) -> ClientMessage {
        ClientMessage::Timer {
            timer: TimerPatch::from(self.state.timer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::store::MatchStore;

    /// Send `message` through a store and hand the result back as a `sync` would.
    fn round_trip(mirror: &mut Mirror, store: &mut MatchStore, message: ClientMessage) {
        let mutation = message.into_mutation().unwrap();
        let snapshot = store.apply(mutation).clone();
        mirror.reconcile(snapshot);
    }

    #[test]
    fn score_deltas_are_clamped_at_zero() {
        let mut mirror = Mirror::new();
        let mut store = MatchStore::new();
        let mut expected = 0i64;

        for delta in [1, 1, -1, -1, -1, 2, -5, 3] {
            expected = (expected + delta).max(0);
            let message = mirror.score_delta(SideIndex::Home, delta);
            round_trip(&mut mirror, &mut store, message);
            assert_eq!(i64::from(store.snapshot().team1.score), expected);
        }
        assert_eq!(mirror.state().team1.score, 3);
    }

    #[test]
    fn extreme_deltas_saturate_instead_of_overflowing() {
        let mut mirror = Mirror::new();
        mirror.score_delta(SideIndex::Home, 1);

        let ClientMessage::Score { score, .. } = mirror.score_delta(SideIndex::Home, i64::MAX)
        else {
            panic!("expected score");
        };
        assert_eq!(score, i64::MAX);
        assert_eq!(mirror.state().team1.score, u32::MAX);

        let ClientMessage::Score { score, .. } = mirror.score_delta(SideIndex::Home, i64::MIN)
        else {
            panic!("expected score");
        };
        assert_eq!(score, 0);
        assert_eq!(mirror.state().team1.score, 0);
    }

    #[test]
    fn score_message_carries_local_clock() {
        let mut mirror = Mirror::new();
        mirror.reconcile(MatchState {
            timer: TimerState {
                seconds: 300,
                running: true,
            },
            ..MatchState::default()
        });
        mirror.tick();

        let message = mirror.score_delta(SideIndex::Away, 1);
        assert_eq!(
            message,
            ClientMessage::Score {
                team: 2,
                score: 1,
                timer: Some(TimerPatch {
                    seconds: 301,
                    running: true
                }),
            }
        );
    }

    #[test]
    fn team_selection_scenario() {
        let catalog = TeamCatalog::builtin();
        let mut mirror = Mirror::new();
        let mut store = MatchStore::new();

        let message = mirror.team_change(SideIndex::Home, Some("ARCANGELES"), &catalog);
        round_trip(&mut mirror, &mut store, message);
        let message = mirror.team_change(SideIndex::Away, None, &catalog);
        round_trip(&mut mirror, &mut store, message);

        let state = store.snapshot();
        assert_eq!(state.team1.key, "ARCANGELES");
        assert_eq!(state.team1.name, "ARCÁNGELES");
        assert_eq!(state.team2.key, "");
        assert_eq!(state.team2.name, "VISITANTE");
        assert_eq!(mirror.state(), &state);
    }

    #[test]
    fn team_change_only_sends_the_changed_side() {
        let catalog = TeamCatalog::builtin();
        let mut mirror = Mirror::new();
        let ClientMessage::Update { state } =
            mirror.team_change(SideIndex::Away, Some("TITISTEAM"), &catalog)
        else {
            panic!("expected update");
        };
        assert!(state.team1.is_none());
        assert_eq!(
            state.side(SideIndex::Away).and_then(|side| side.key.as_deref()),
            Some("TITISTEAM")
        );
        assert!(state.timer.is_some());
    }

    #[test]
    fn full_reset_zeroes_scores_and_clock() {
        let mut mirror = Mirror::new();
        let mut store = MatchStore::new();
        for message in [
            mirror.score_delta(SideIndex::Home, 3),
            mirror.score_delta(SideIndex::Away, 2),
        ] {
            round_trip(&mut mirror, &mut store, message);
        }
        let start = mirror.timer_start().unwrap();
        round_trip(&mut mirror, &mut store, start);
        mirror.tick();

        let message = mirror.full_reset();
        round_trip(&mut mirror, &mut store, message);

        let state = store.snapshot();
        assert_eq!(state.team1.score, 0);
        assert_eq!(state.team2.score, 0);
        assert_eq!(state.timer, TimerState::stopped(0));
    }

    #[test]
    fn ticks_only_while_running() {
        let mut mirror = Mirror::new();
        assert!(!mirror.tick());
        assert_eq!(mirror.state().timer.seconds, 0);

        mirror.timer_start().unwrap();
        assert!(mirror.tick());
        assert!(mirror.tick());
        assert_eq!(mirror.state().timer.seconds, 2);

        mirror.timer_pause().unwrap();
        assert!(!mirror.tick());
        assert_eq!(mirror.state().timer.seconds, 2);
    }

    #[test]
    fn sync_overwrites_locally_advanced_clock() {
        let mut mirror = Mirror::new();
        mirror.timer_start();
        for _ in 0..5 {
            mirror.tick();
        }

        mirror.reconcile(MatchState {
            timer: TimerState {
                seconds: 3,
                running: true,
            },
            ..MatchState::default()
        });
        assert_eq!(mirror.state().timer.seconds, 3);
        assert!(mirror.is_running());
    }

    #[test]
    fn start_and_pause_are_idempotent() {
        let mut mirror = Mirror::new();
        assert!(mirror.timer_pause().is_none());
        assert!(mirror.timer_start().is_some());
        assert!(mirror.timer_start().is_none());
        assert!(mirror.timer_toggle().is_some());
        assert!(!mirror.is_running());
    }

    #[test]
    fn set_minutes_stops_the_clock() {
        let mut mirror = Mirror::new();
        mirror.timer_start();
        let message = mirror.timer_set_minutes(45);
        assert_eq!(
            message,
            ClientMessage::Timer {
                timer: TimerPatch {
                    seconds: 2700,
                    running: false
                }
            }
        );
        assert_eq!(mirror.timer_reset(), ClientMessage::Timer {
            timer: TimerPatch::default()
        });
    }
}
