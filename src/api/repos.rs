use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::git::{clone_destination, clone_repo, CloneAuth};
use crate::models::{
    AliasEntry, BookmarkResponse, CloneResponse, RepositoryRecord, SetAliasRequest,
};
use crate::state::{AppState, OpenError};
use crate::store::StoreError;

/// GET /api/recent - Recently opened repositories, newest first
pub async fn list_recent(State(state): State<AppState>) -> Json<Vec<RepositoryRecord>> {
    Json(state.snapshots().recent.displayable().cloned().collect())
}

/// DELETE /api/recent - Forget all recently opened repositories
pub async fn clear_recent(
    State(state): State<AppState>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.clear_recent().await.map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/bookmarks - Bookmarked repository ids
pub async fn list_bookmarks(State(state): State<AppState>) -> Json<Vec<u64>> {
    Json(state.snapshots().bookmarks.ids().to_vec())
}

/// POST /api/repos/:id/bookmark - Toggle bookmark
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<BookmarkResponse>, (StatusCode, String)> {
    let bookmarked = state.toggle_bookmark(id).await.map_err(internal)?;
    Ok(Json(BookmarkResponse {
        repo_id: id,
        bookmarked,
    }))
}

/// GET /api/aliases - All aliases
pub async fn list_aliases(State(state): State<AppState>) -> Json<Vec<AliasEntry>> {
    Json(state.snapshots().aliases.into_entries())
}

/// PUT /api/repos/:id/alias - Set or replace a repo's alias
pub async fn set_alias(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<SetAliasRequest>,
) -> Result<Json<AliasEntry>, (StatusCode, String)> {
    match state.set_alias(id, &req.repo_full_name, &req.alias).await {
        Ok(entry) => Ok(Json(entry)),
        Err(StoreError::EmptyAlias) => {
            Err((StatusCode::BAD_REQUEST, "Alias is required".to_string()))
        }
        Err(StoreError::Storage(e)) => Err(internal(e)),
    }
}

/// DELETE /api/repos/:id/alias - Remove a repo's alias
pub async fn remove_alias(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.remove_alias(id).await.map_err(internal)? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err((StatusCode::NOT_FOUND, "Alias not found".to_string())),
    }
}

/// POST /api/repos/:id/open - Record an open; the caller opens `html_url`
pub async fn open_repo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<RepositoryRecord>, (StatusCode, String)> {
    let repo = state.open_repository(id).await.map_err(open_error)?;
    Ok(Json(repo))
}

/// POST /api/repos/:id/clone - Record an open and clone into the clone directory
pub async fn clone(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<(StatusCode, Json<CloneResponse>), (StatusCode, String)> {
    let repo = state.open_repository(id).await.map_err(open_error)?;

    let base_dir = state.config.clone_base_dir().map_err(internal)?;
    let target = clone_destination(&base_dir, &repo.name);

    let url = repo.clone_url.clone();
    let target_clone = target.clone();
    let auth = state.config.github.token().and_then(|token| {
        Some(CloneAuth {
            token: token.to_string(),
            host: state.config.github.web_host()?,
        })
    });
    tokio::task::spawn_blocking(move || clone_repo(&url, &target_clone, auth))
        .await
        .map_err(|e| internal(anyhow::anyhow!("Clone task failed: {e}")))?
        .map_err(|e| {
            tracing::error!("Failed to clone {}: {e:#}", repo.full_name);
            (StatusCode::BAD_GATEWAY, format!("{e:#}"))
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CloneResponse {
            repo,
            path: target.display().to_string(),
        }),
    ))
}

fn open_error(e: OpenError) -> (StatusCode, String) {
    match e {
        OpenError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        OpenError::Storage(e) => internal(e),
    }
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    tracing::error!("{e:#}");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
}
