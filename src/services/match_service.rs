use crate::{
    dto::catalog::TeamSummary,
    error::ServiceError,
    state::{SharedState, match_state::MatchState},
};

/// Current authoritative snapshot.
pub async fn current_state(state: &SharedState) -> Result<MatchState, ServiceError> {
    state.hub().snapshot().await
}

/// Every team of the catalog, in catalog order.
pub fn list_teams(state: &SharedState) -> Vec<TeamSummary> {
    state
        .config()
        .catalog()
        .iter()
        .map(TeamSummary::from)
        .collect()
}

/// One team of the catalog.
pub fn get_team(state: &SharedState, key: &str) -> Result<TeamSummary, ServiceError> {
    state
        .config()
        .catalog()
        .get_key_value(key)
        .map(TeamSummary::from)
        .ok_or_else(|| ServiceError::NotFound(format!("team `{key}` not found")))
}
