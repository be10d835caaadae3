use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display name used for the home side when no team is selected.
pub const HOME_DEFAULT_NAME: &str = "LOCAL";
/// Display name used for the away side when no team is selected.
pub const AWAY_DEFAULT_NAME: &str = "VISITANTE";

/// One of the two competing sides of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideIndex {
    /// Home side, `team1` on the wire.
    Home,
    /// Away side, `team2` on the wire.
    Away,
}

impl SideIndex {
    /// Both sides, home first.
    pub const ALL: [SideIndex; 2] = [SideIndex::Home, SideIndex::Away];

    /// Resolve the `team` number used by `score` messages (`1` or `2`).
    pub fn from_wire(team: u8) -> Option<Self> {
        match team {
            1 => Some(Self::Home),
            2 => Some(Self::Away),
            _ => None,
        }
    }

    /// Wire number of the side (`1` for home, `2` for away).
    pub fn wire(self) -> u8 {
        match self {
            Self::Home => 1,
            Self::Away => 2,
        }
    }

    /// Name displayed when the side has no team selected.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Home => HOME_DEFAULT_NAME,
            Self::Away => AWAY_DEFAULT_NAME,
        }
    }
}

/// State of one side of the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SideState {
    /// Team catalog key, empty when no team is selected.
    #[serde(default)]
    pub key: String,
    /// Name shown on the scoreboard.
    pub name: String,
    /// Current score.
    pub score: u32,
    /// Logo reference; `None` renders the placeholder.
    #[serde(default)]
    pub logo: Option<String>,
}

impl SideState {
    /// Empty side carrying the default display name for `side`.
    pub fn new(side: SideIndex) -> Self {
        Self {
            key: String::new(),
            name: side.default_name().to_string(),
            score: 0,
            logo: None,
        }
    }

    /// Selected team key, if any.
    pub fn team_key(&self) -> Option<&str> {
        (!self.key.is_empty()).then_some(self.key.as_str())
    }
}

/// Match clock as seen by the scoreboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimerState {
    /// Elapsed seconds since kick-off.
    pub seconds: u32,
    /// Whether the clock is currently counting.
    pub running: bool,
}

impl TimerState {
    /// Stopped clock showing `seconds`.
    pub fn stopped(seconds: u32) -> Self {
        Self {
            seconds,
            running: false,
        }
    }
}

/// Complete scoreboard state, the unit of synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MatchState {
    /// Home side.
    pub team1: SideState,
    /// Away side.
    pub team2: SideState,
    /// Match clock.
    pub timer: TimerState,
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            team1: SideState::new(SideIndex::Home),
            team2: SideState::new(SideIndex::Away),
            timer: TimerState::default(),
        }
    }
}

impl MatchState {
    /// Borrow one side.
    pub fn side(&self, side: SideIndex) -> &SideState {
        match side {
            SideIndex::Home => &self.team1,
            SideIndex::Away => &self.team2,
        }
    }

    /// Mutably borrow one side.
    pub fn side_mut(&mut self, side: SideIndex) -> &mut SideState {
        match side {
            SideIndex::Home => &mut self.team1,
            SideIndex::Away => &mut self.team2,
        }
    }
}

/// Partial state carried by an `update` message.
///
/// Absent parts keep their stored value; a present side or timer replaces the
/// stored one as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MatchPatch {
    /// Replacement for the home side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team1: Option<SidePatch>,
    /// Replacement for the away side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team2: Option<SidePatch>,
    /// Replacement for the clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerPatch>,
}

impl MatchPatch {
    /// Patch replacing every part of the state with `state`.
    pub fn full(state: &MatchState) -> Self {
        Self {
            team1: Some(SidePatch::from(&state.team1)),
            team2: Some(SidePatch::from(&state.team2)),
            timer: Some(TimerPatch::from(state.timer)),
        }
    }

    /// Borrow the patch for one side.
    pub fn side(&self, side: SideIndex) -> Option<&SidePatch> {
        match side {
            SideIndex::Home => self.team1.as_ref(),
            SideIndex::Away => self.team2.as_ref(),
        }
    }
}

/// Side object as received from a client. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SidePatch {
    /// Team catalog key; missing or `null` clears the selection.
    #[serde(default)]
    pub key: Option<String>,
    /// Display name; missing or empty falls back to the side default.
    #[serde(default)]
    pub name: Option<String>,
    /// Score; negative values are clamped to zero.
    #[serde(default)]
    pub score: Option<i64>,
    /// Logo reference.
    #[serde(default)]
    pub logo: Option<String>,
}

impl SidePatch {
    /// Build the stored side, filling missing fields with the defaults of `side`.
    pub fn into_side(self, side: SideIndex) -> SideState {
        SideState {
            key: self.key.unwrap_or_default(),
            name: self
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| side.default_name().to_string()),
            score: self.score.map(clamp_count).unwrap_or(0),
            logo: self.logo,
        }
    }
}

impl From<&SideState> for SidePatch {
    fn from(value: &SideState) -> Self {
        Self {
            key: Some(value.key.clone()),
            name: Some(value.name.clone()),
            score: Some(i64::from(value.score)),
            logo: value.logo.clone(),
        }
    }
}

/// Clock object as received from a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimerPatch {
    /// Elapsed seconds; negative values are clamped to zero.
    #[serde(default)]
    pub seconds: i64,
    /// Whether the clock is counting.
    #[serde(default)]
    pub running: bool,
}

impl From<TimerPatch> for TimerState {
    fn from(value: TimerPatch) -> Self {
        Self {
            seconds: clamp_count(value.seconds),
            running: value.running,
        }
    }
}

impl From<TimerState> for TimerPatch {
    fn from(value: TimerState) -> Self {
        Self {
            seconds: i64::from(value.seconds),
            running: value.running,
        }
    }
}

/// Clamp a client supplied count into the non-negative range stored on the server.
pub fn clamp_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Render elapsed seconds as `MM:SS`; minutes keep counting past 59.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_matches_kickoff() {
        let state = MatchState::default();
        assert_eq!(state.team1.name, "LOCAL");
        assert_eq!(state.team2.name, "VISITANTE");
        assert_eq!(state.team1.score, 0);
        assert_eq!(state.team2.team_key(), None);
        assert_eq!(state.timer, TimerState::stopped(0));
    }

    #[test]
    fn side_patch_fills_missing_fields_with_side_defaults() {
        let side = SidePatch {
            score: Some(3),
            ..SidePatch::default()
        }
        .into_side(SideIndex::Away);

        assert_eq!(side.key, "");
        assert_eq!(side.name, "VISITANTE");
        assert_eq!(side.score, 3);
        assert_eq!(side.logo, None);
    }

    #[test]
    fn empty_name_falls_back_to_default() {
        let side = SidePatch {
            name: Some(String::new()),
            ..SidePatch::default()
        }
        .into_side(SideIndex::Home);
        assert_eq!(side.name, "LOCAL");
    }

    #[test]
    fn clamp_count_bounds() {
        assert_eq!(clamp_count(-5), 0);
        assert_eq!(clamp_count(0), 0);
        assert_eq!(clamp_count(42), 42);
        assert_eq!(clamp_count(i64::MAX), u32::MAX);
    }

    #[test]
    fn wire_shape_uses_team_keys() {
        let json = serde_json::to_value(MatchState::default()).unwrap();
        assert_eq!(json["team1"]["name"], "LOCAL");
        assert_eq!(json["team2"]["key"], "");
        assert!(json["team1"]["logo"].is_null());
        assert_eq!(json["timer"]["seconds"], 0);
        assert_eq!(json["timer"]["running"], false);
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(45 * 60), "45:00");
        assert_eq!(format_clock(100 * 60 + 7), "100:07");
    }

    #[test]
    fn side_index_wire_numbers() {
        assert_eq!(SideIndex::from_wire(1), Some(SideIndex::Home));
        assert_eq!(SideIndex::from_wire(2), Some(SideIndex::Away));
        assert_eq!(SideIndex::from_wire(3), None);
        assert_eq!(SideIndex::Away.wire(), 2);
    }
}
