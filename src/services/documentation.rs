use utoipa::OpenApi;

#[derive(OpenApi)]
/// OpenAPI document of the scoreboard relay.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::snapshot_stream,
        crate::routes::websocket::ws_handler,
        crate::routes::scoreboard::current_state,
        crate::routes::scoreboard::list_teams,
        crate::routes::scoreboard::get_team,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::catalog::TeamSummary,
            crate::dto::ws::ClientMessage,
            crate::dto::ws::ServerMessage,
            crate::state::match_state::MatchState,
            crate::state::match_state::MatchPatch,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "scoreboard", description = "Read-only scoreboard state and team catalog"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "sync", description = "WebSocket synchronization channel"),
    )
)]
pub struct ApiDoc;
