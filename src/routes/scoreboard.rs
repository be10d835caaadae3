use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::catalog::TeamSummary,
    error::AppError,
    services::match_service,
    state::{SharedState, match_state::MatchState},
};

/// Read-only routes exposing the scoreboard snapshot and the team catalog.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/state", get(current_state))
        .route("/teams", get(list_teams))
        .route("/teams/{key}", get(get_team))
}

/// Return the current authoritative snapshot.
#[utoipa::path(
    get,
    path = "/state",
    tag = "scoreboard",
    responses(
        (status = 200, description = "Current scoreboard", body = MatchState)
    )
)]
pub async fn current_state(State(state): State<SharedState>) -> Result<Json<MatchState>, AppError> {
    let snapshot = match_service::current_state(&state).await?;
    Ok(Json(snapshot))
}

/// List the team catalog in display order.
#[utoipa::path(
    get,
    path = "/teams",
    tag = "scoreboard",
    responses(
        (status = 200, description = "Team catalog", body = [TeamSummary])
    )
)]
pub async fn list_teams(State(state): State<SharedState>) -> Json<Vec<TeamSummary>> {
    Json(match_service::list_teams(&state))
}

/// Return a single catalog entry.
#[utoipa::path(
    get,
    path = "/teams/{key}",
    tag = "scoreboard",
    params(("key" = String, Path, description = "Team catalog key")),
    responses(
        (status = 200, description = "Team found", body = TeamSummary),
        (status = 404, description = "Unknown team key")
    )
)]
pub async fn get_team(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> Result<Json<TeamSummary>, AppError> {
    let team = match_service::get_team(&state, &key)?;
    Ok(Json(team))
}
