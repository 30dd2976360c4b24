use axum::extract::{Query, State};
use axum::Json;

use crate::models::{SearchParams, SearchView, StatusResponse};
use crate::state::AppState;

/// GET /api/search?q= - Run the search pipeline for the current text:
///   1. Configuration and token gates
///   2. Query building (organization scope or alias rewrite)
///   3. GitHub search, most-starred first
///   4. Bookmark/alias ranking, plus recent repos for an empty search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchView> {
    Json(state.search(&params.q).await)
}

/// GET /api/status - Configuration problems and token check progress
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        organizations: state.config.github.organizations(),
        config: state.config.issues(),
        token: state.token_status(),
    })
}
