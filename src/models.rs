use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ConfigIssues;

/// A GitHub repository as returned by the search API.
///
/// Every field has a default so that partially written records (older
/// versions of the recent list, hand-edited storage) still load; callers
/// that need a complete record check [`RepositoryRecord::has_identity`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryRecord {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub owner: RepositoryOwner,
    pub private: bool,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub updated_at: DateTime<Utc>,
    pub html_url: String,
    pub clone_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryOwner {
    pub login: String,
    pub avatar_url: String,
}

impl RepositoryRecord {
    /// True when the record has the id, owner and avatar needed to render it.
    pub fn has_identity(&self) -> bool {
        self.id != 0 && !self.owner.login.is_empty() && !self.owner.avatar_url.is_empty()
    }
}

/// A user-chosen short label for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasEntry {
    pub repo_id: u64,
    /// Kept so the alias can be shown (and searched) without a GitHub lookup
    pub repo_full_name: String,
    pub alias: String,
}

/// Outcome of checking the configured token against the identity endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenScopeResult {
    pub valid: bool,
    pub scopes: Vec<String>,
}

impl TokenScopeResult {
    pub fn rejected() -> Self {
        Self::default()
    }
}

/// A search result annotated with the local state that ranked it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRepository {
    #[serde(flatten)]
    pub repo: RepositoryRecord,
    pub bookmarked: bool,
    pub alias: Option<String>,
}

/// Progress of the once-per-session token check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TokenStatus {
    Validating,
    Checked(TokenScopeResult),
}

/// What the search screen should show for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchView {
    NeedsConfiguration(ConfigIssues),
    Validating,
    InvalidToken,
    Ready(SearchResults),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    /// Query sent to GitHub, `None` when nothing was executed
    pub query: Option<String>,
    /// "Recently Opened" section, only populated for an empty search
    pub recent: Vec<RepositoryRecord>,
    pub results: Vec<RankedRepository>,
    /// Set when the fetch failed; results are empty in that case
    pub error: Option<String>,
}

/// Search request query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Set-alias request
#[derive(Debug, Clone, Deserialize)]
pub struct SetAliasRequest {
    pub repo_full_name: String,
    pub alias: String,
}

/// Bookmark toggle response
#[derive(Debug, Clone, Serialize)]
pub struct BookmarkResponse {
    pub repo_id: u64,
    pub bookmarked: bool,
}

/// Clone response
#[derive(Debug, Clone, Serialize)]
pub struct CloneResponse {
    pub repo: RepositoryRecord,
    pub path: String,
}

/// Session status response
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub organizations: Vec<String>,
    pub config: ConfigIssues,
    pub token: TokenStatus,
}
