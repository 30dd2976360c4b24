pub mod repos;
pub mod search;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

/// All API routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(search::status))
        .route("/api/search", get(search::search))
        .route("/api/recent", get(repos::list_recent).delete(repos::clear_recent))
        .route("/api/bookmarks", get(repos::list_bookmarks))
        .route("/api/aliases", get(repos::list_aliases))
        .route("/api/repos/{id}/bookmark", post(repos::toggle_bookmark))
        .route(
            "/api/repos/{id}/alias",
            put(repos::set_alias).delete(repos::remove_alias),
        )
        .route("/api/repos/{id}/open", post(repos::open_repo))
        .route("/api/repos/{id}/clone", post(repos::clone))
        .with_state(state)
}
