//! Integration tests for the search pipeline.
//!
//! A fake GitHub API is served by axum on a loopback port so the token check,
//! query building, fetching and ranking all run for real.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use org_repo_search::api;
use org_repo_search::config::{Config, GithubConfig};
use org_repo_search::models::{SearchResults, SearchView};
use org_repo_search::state::AppState;
use org_repo_search::store::{FileStore, KeyValueStore};

const TOKEN: &str = "ghp_test";

#[derive(Clone)]
struct FakeGithub {
    scopes: &'static str,
    search_status: StatusCode,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl FakeGithub {
    fn new(scopes: &'static str) -> Self {
        Self {
            scopes,
            search_status: StatusCode::OK,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn last_query(&self) -> Option<String> {
        self.queries.lock().last().and_then(|p| p.get("q").cloned())
    }
}

/// Three repositories, already in GitHub's stars-descending order.
fn items() -> Vec<Value> {
    [(1, "alpha", 900), (2, "beta", 500), (3, "gamma", 100)]
        .into_iter()
        .map(|(id, name, stars)| {
            json!({
                "id": id,
                "name": name,
                "full_name": format!("acme/{name}"),
                "description": format!("The {name} service"),
                "owner": {"login": "acme", "avatar_url": "https://avatars.example/acme"},
                "private": false,
                "language": "Rust",
                "stargazers_count": stars,
                "updated_at": "2024-05-01T12:00:00Z",
                "html_url": format!("https://github.com/acme/{name}"),
                "clone_url": format!("https://github.com/acme/{name}.git"),
            })
        })
        .collect()
}

async fn fake_user(State(fake): State<FakeGithub>, headers: HeaderMap) -> Response {
    let expected = format!("Bearer {TOKEN}");
    let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
    if auth != Some(expected.as_str()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    ([("x-oauth-scopes", fake.scopes)], Json(json!({"login": "me"}))).into_response()
}

async fn fake_search(
    State(fake): State<FakeGithub>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    fake.queries.lock().push(params);
    if !fake.search_status.is_success() {
        return (fake.search_status, "boom").into_response();
    }
    let items = items();
    Json(json!({"total_count": items.len(), "items": items})).into_response()
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_fake_github(fake: FakeGithub) -> String {
    let router = Router::new()
        .route("/user", get(fake_user))
        .route("/search/repositories", get(fake_search))
        .with_state(fake);
    serve(router).await
}

fn config(api_base_url: String, data_dir: &std::path::Path) -> Config {
    Config {
        data_dir: data_dir.to_path_buf(),
        github: GithubConfig {
            token: Some(TOKEN.to_string()),
            organizations: "acme, ".to_string(),
            api_base_url,
        },
        ..Config::default()
    }
}

async fn ready_state(fake: &FakeGithub, data_dir: &std::path::Path) -> AppState {
    let base = spawn_fake_github(fake.clone()).await;
    let state = AppState::open(config(base, data_dir)).await.unwrap();
    let token = state.validate_token().await;
    assert!(token.valid, "token should be accepted: {token:?}");
    state
}

fn expect_ready(view: SearchView) -> SearchResults {
    match view {
        SearchView::Ready(results) => results,
        other => panic!("expected results, got {other:?}"),
    }
}

fn result_ids(results: &SearchResults) -> Vec<u64> {
    results.results.iter().map(|r| r.repo.id).collect()
}

#[tokio::test]
async fn test_end_to_end_browse_and_bookmark_ranking() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeGithub::new("repo, read:org");
    let state = ready_state(&fake, dir.path()).await;

    let results = expect_ready(state.search("").await);
    assert_eq!(results.query.as_deref(), Some("org:acme"));
    assert_eq!(result_ids(&results), vec![1, 2, 3]);
    assert!(results.error.is_none());

    let params = fake.queries.lock().last().cloned().unwrap();
    assert_eq!(params.get("sort").map(String::as_str), Some("stars"));
    assert_eq!(params.get("order").map(String::as_str), Some("desc"));
    assert_eq!(params.get("per_page").map(String::as_str), Some("30"));

    // Bookmark the least-starred repo: it moves first, the rest keep star order
    assert!(state.toggle_bookmark(3).await.unwrap());
    let results = expect_ready(state.search("*").await);
    assert_eq!(result_ids(&results), vec![3, 1, 2]);
    assert!(results.results[0].bookmarked);
}

#[tokio::test]
async fn test_free_text_is_scoped_to_organizations() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeGithub::new("repo");
    let state = ready_state(&fake, dir.path()).await;

    expect_ready(state.search("  billing  ").await);
    assert_eq!(fake.last_query().as_deref(), Some("billing org:acme"));
}

#[tokio::test]
async fn test_alias_match_rewrites_query_and_ranks_first() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeGithub::new("repo");
    let state = ready_state(&fake, dir.path()).await;

    state.set_alias(3, "acme/gamma", "  gm  ").await.unwrap();

    let results = expect_ready(state.search("GM").await);
    assert_eq!(results.query.as_deref(), Some("repo:acme/gamma"));
    assert_eq!(fake.last_query().as_deref(), Some("repo:acme/gamma"));
    // The fake ignores the query; ranking still lifts the alias match
    assert_eq!(result_ids(&results), vec![3, 1, 2]);
    assert_eq!(results.results[0].alias.as_deref(), Some("gm"));
}

#[tokio::test]
async fn test_dangerous_token_blocks_search() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeGithub::new("repo, workflow");
    let base = spawn_fake_github(fake.clone()).await;
    let state = AppState::open(config(base, dir.path())).await.unwrap();

    let token = state.validate_token().await;
    assert!(!token.valid);
    assert_eq!(token.scopes, vec!["repo", "workflow"]);
    assert_eq!(state.search("alpha").await, SearchView::InvalidToken);
    assert!(fake.queries.lock().is_empty());
}

#[tokio::test]
async fn test_fetch_failure_reports_error_with_empty_results() {
    let dir = tempfile::tempdir().unwrap();
    let mut fake = FakeGithub::new("repo");
    fake.search_status = StatusCode::SERVICE_UNAVAILABLE;
    let state = ready_state(&fake, dir.path()).await;

    let results = expect_ready(state.search("alpha").await);
    assert!(results.results.is_empty());
    let error = results.error.expect("error should be reported");
    assert!(error.contains("503"), "unexpected error: {error}");
}

#[tokio::test]
async fn test_opened_repos_persist_and_show_for_empty_search() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeGithub::new("repo");
    let state = ready_state(&fake, dir.path()).await;

    expect_ready(state.search("service").await);
    state.open_repository(2).await.unwrap();
    state.open_repository(1).await.unwrap();

    let results = expect_ready(state.search("").await);
    let recent: Vec<u64> = results.recent.iter().map(|r| r.id).collect();
    assert_eq!(recent, vec![1, 2]);

    let results = expect_ready(state.search("alpha").await);
    assert!(results.recent.is_empty());

    // A fresh session sees the same history from disk
    let reopened = ready_state(&fake, dir.path()).await;
    let recent: Vec<u64> = reopened.snapshots().recent.repos().iter().map(|r| r.id).collect();
    assert_eq!(recent, vec![1, 2]);
}

#[tokio::test]
async fn test_corrupt_storage_files_start_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let kv = FileStore::open(&config.storage_dir()).unwrap();
    kv.set_item("bookmarked-repos", "[1,").await.unwrap();
    kv.set_item("repo-aliases", "{}").await.unwrap();
    kv.set_item("recent-repos", "null").await.unwrap();

    let state = AppState::open(config).await.unwrap();
    let snapshots = state.snapshots();
    assert!(snapshots.bookmarks.is_empty());
    assert!(snapshots.aliases.is_empty());
    assert!(snapshots.recent.is_empty());
}

#[tokio::test]
async fn test_http_api_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeGithub::new("repo");
    let state = ready_state(&fake, dir.path()).await;
    let base = serve(api::router(state)).await;
    let client = reqwest::Client::new();

    let status: Value = client
        .get(format!("{base}/api/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["token"]["state"], "checked");
    assert_eq!(status["token"]["valid"], true);
    assert_eq!(status["organizations"], json!(["acme"]));

    let resp = client
        .put(format!("{base}/api/repos/2/alias"))
        .json(&json!({"repo_full_name": "acme/beta", "alias": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    let resp = client
        .put(format!("{base}/api/repos/2/alias"))
        .json(&json!({"repo_full_name": "acme/beta", "alias": " be "}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let aliases: Value = client
        .get(format!("{base}/api/aliases"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(aliases, json!([{"repoId": 2, "repoFullName": "acme/beta", "alias": "be"}]));

    let bookmark: Value = client
        .post(format!("{base}/api/repos/3/bookmark"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(bookmark["bookmarked"], true);

    let view: Value = client
        .get(format!("{base}/api/search"))
        .query(&[("q", "")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["state"], "ready");
    assert_eq!(view["query"], "org:acme");
    assert_eq!(view["results"][0]["id"], 3);
    assert_eq!(view["results"][0]["bookmarked"], true);
    assert_eq!(view["results"][2]["alias"], "be");

    let resp = client
        .post(format!("{base}/api/repos/999/open"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

    let opened: Value = client
        .post(format!("{base}/api/repos/1/open"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(opened["html_url"], "https://github.com/acme/alpha");

    let recent: Value = client
        .get(format!("{base}/api/recent"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(recent[0]["id"], 1);

    let resp = client
        .delete(format!("{base}/api/recent"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);
}
