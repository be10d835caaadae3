//! Static team catalog used to resolve a team key into display attributes.

use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::match_state::SideIndex;

/// Scoreboard background color shown behind sides without a team.
pub const CENTER_COLOR: &str = "#24243F";

/// Display and branding attributes of a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TeamEntry {
    /// Full display name.
    pub name: String,
    /// Abbreviated name for narrow layouts.
    pub short_name: String,
    /// Logo image reference.
    pub logo: String,
    /// Main team color (`#rrggbb`).
    pub primary_color: String,
    /// Secondary team color (`#rrggbb`).
    pub secondary_color: String,
    /// Color for text drawn over the primary color (`#rrggbb`).
    pub text_color: String,
}

/// Display attributes a side takes when a team is selected (or cleared).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSelection {
    /// Catalog key, empty for no team.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Logo reference, `None` for the placeholder.
    pub logo: Option<String>,
}

/// Ordered mapping from team key to [`TeamEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamCatalog {
    teams: IndexMap<String, TeamEntry>,
}

impl TeamCatalog {
    /// Catalog from already validated entries.
    pub fn new(teams: IndexMap<String, TeamEntry>) -> Self {
        Self { teams }
    }

    /// Teams of the league shipped with the binary.
    pub fn builtin() -> Self {
        let teams = BUILTIN_TEAMS
            .iter()
            .map(|(key, name, short_name, primary, text)| {
                (
                    (*key).to_string(),
                    TeamEntry {
                        name: (*name).to_string(),
                        short_name: (*short_name).to_string(),
                        logo: format!("img/{key}_ESCUDO.png"),
                        primary_color: (*primary).to_string(),
                        secondary_color: CENTER_COLOR.to_string(),
                        text_color: (*text).to_string(),
                    },
                )
            })
            .collect();
        Self { teams }
    }

    /// Look a team up by key.
    pub fn get(&self, key: &str) -> Option<&TeamEntry> {
        self.teams.get(key)
    }

    /// Look a team up by key, returning the stored key alongside it.
    pub fn get_key_value(&self, key: &str) -> Option<(&String, &TeamEntry)> {
        self.teams.get_key_value(key)
    }

    /// Iterate teams in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TeamEntry)> {
        self.teams.iter()
    }

    /// Number of teams.
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Whether the catalog has no teams.
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Resolve what `side` shows when the operator picks `key`.
    ///
    /// `None`, an empty key or a key missing from the catalog clear the side back
    /// to its default name and placeholder logo.
    pub fn select(&self, side: SideIndex, key: Option<&str>) -> TeamSelection {
        match key.and_then(|key| self.teams.get_key_value(key)) {
            Some((key, team)) => TeamSelection {
                key: key.clone(),
                name: team.name.clone(),
                logo: Some(team.logo.clone()),
            },
            None => TeamSelection {
                key: String::new(),
                name: side.default_name().to_string(),
                logo: None,
            },
        }
    }

    /// Gradient color for a side: the team's primary color, or [`CENTER_COLOR`].
    pub fn accent_color(&self, key: &str) -> &str {
        self.teams
            .get(key)
            .map(|team| team.primary_color.as_str())
            .unwrap_or(CENTER_COLOR)
    }
}

// key, name, short name, primary color, text color
const BUILTIN_TEAMS: &[(&str, &str, &str, &str, &str)] = &[
    ("ARCANGELES", "ARCÁNGELES", "ARC", "#FFFFFF", "#101010"),
    ("BLACKPANTHERS", "BLACK PANTHERS", "BPA", "#030316", "#FFFFFF"),
    ("BRICKSBROTHERS", "BRICKS BROTHERS", "BRB", "#DDDDDD", "#101010"),
    ("EQUIPOA", "EQUIPO A", "EQA", "#D21036", "#FFFFFF"),
    ("FILOSOFOSOLIMPICOS", "FILÓSOFOS OLÍMPICOS", "FIL", "#EED000", "#101010"),
    ("GRANAUDITORIO", "GRAN AUDITORIO", "GAU", "#101010", "#FFFFFF"),
    ("MANDARINAALFA", "MANDARINA ALFA", "MAN", "#101010", "#FFFFFF"),
    ("REALSPORTICO", "REAL SPÓRTICO", "RSP", "#FFFFFF", "#101010"),
    ("THEKINGDOM", "THE KINGDOM", "TKD", "#006260", "#FFFFFF"),
    ("TITISTEAM", "TITIS TEAM", "TIT", "#09BDDF", "#101010"),
];
