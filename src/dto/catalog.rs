use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::TeamEntry;

/// Team catalog entry as exposed over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamSummary {
    /// Catalog key sent in `update` messages.
    pub key: String,
    /// Full display name.
    pub name: String,
    /// Abbreviated name.
    pub short_name: String,
    /// Logo image reference.
    pub logo: String,
    /// Main team color.
    pub primary_color: String,
    /// Secondary team color.
    pub secondary_color: String,
    /// Text color over the primary color.
    pub text_color: String,
}

impl From<(&String, &TeamEntry)> for TeamSummary {
    fn from((key, team): (&String, &TeamEntry)) -> Self {
        Self {
            key: key.clone(),
            name: team.name.clone(),
            short_name: team.short_name.clone(),
            logo: team.logo.clone(),
            primary_color: team.primary_color.clone(),
            secondary_color: team.secondary_color.clone(),
            text_color: team.text_color.clone(),
        }
    }
}
