use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::Config;
use crate::github;
use crate::models::{
    AliasEntry, RepositoryRecord, SearchResults, SearchView, TokenScopeResult, TokenStatus,
};
use crate::search::{build_query, find_opened, rank_results, recent_section, should_execute};
use crate::store::{
    AliasSnapshot, AliasStore, BookmarkSet, BookmarkStore, FileStore, KeyValueStore, RecentList,
    RecentStore, StoreError,
};

/// In-memory copies of the three stores, refreshed after every write.
#[derive(Debug, Clone, Default)]
pub struct Snapshots {
    pub aliases: AliasSnapshot,
    pub bookmarks: BookmarkSet,
    pub recent: RecentList,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("repository {0} is not in the current results or recent list")]
    NotFound(u64),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Shared application state: the search pipeline and its local stores.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub http_client: reqwest::Client,
    pub aliases: AliasStore,
    pub bookmarks: BookmarkStore,
    pub recent: RecentStore,
    snapshots: Arc<RwLock<Snapshots>>,
    latest_results: Arc<RwLock<Vec<RepositoryRecord>>>,
    token_status: Arc<RwLock<TokenStatus>>,
}

impl AppState {
    /// Open file-backed storage under the configured data directory.
    pub async fn open(config: Config) -> anyhow::Result<Self> {
        let kv = FileStore::open(&config.storage_dir())?;
        Self::initialize(config, Arc::new(kv)).await
    }

    /// Load all three stores and return a state ready to serve searches.
    ///
    /// The token is not checked here; call [`AppState::validate_token`].
    pub async fn initialize(config: Config, kv: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let aliases = AliasStore::new(kv.clone());
        let bookmarks = BookmarkStore::new(kv.clone());
        let recent = RecentStore::new(kv);

        let (alias_snapshot, bookmark_set, recent_list) =
            tokio::join!(aliases.load(), bookmarks.load(), recent.load());
        tracing::info!(
            "Loaded {} aliases, {} bookmarks, {} recent repos",
            alias_snapshot.len(),
            bookmark_set.ids().len(),
            recent_list.len()
        );

        Ok(Self {
            config,
            http_client: github::http_client()?,
            aliases,
            bookmarks,
            recent,
            snapshots: Arc::new(RwLock::new(Snapshots {
                aliases: alias_snapshot,
                bookmarks: bookmark_set,
                recent: recent_list,
            })),
            latest_results: Arc::new(RwLock::new(Vec::new())),
            token_status: Arc::new(RwLock::new(TokenStatus::Validating)),
        })
    }

    /// Check the token once for this session and remember the outcome.
    pub async fn validate_token(&self) -> TokenScopeResult {
        let result = github::check_token_scopes(&self.http_client, &self.config.github).await;
        tracing::info!("GitHub token valid: {} (scopes: {:?})", result.valid, result.scopes);
        *self.token_status.write() = TokenStatus::Checked(result.clone());
        result
    }

    pub fn token_status(&self) -> TokenStatus {
        self.token_status.read().clone()
    }

    pub fn snapshots(&self) -> Snapshots {
        self.snapshots.read().clone()
    }

    /// Run the whole pipeline for one search text.
    pub async fn search(&self, text: &str) -> SearchView {
        let issues = self.config.issues();
        if issues.is_blocking() {
            return SearchView::NeedsConfiguration(issues);
        }
        match self.token_status() {
            TokenStatus::Validating => return SearchView::Validating,
            TokenStatus::Checked(result) if !result.valid => return SearchView::InvalidToken,
            TokenStatus::Checked(_) => {}
        }

        let organizations = self.config.github.organizations();
        let query = {
            let snapshots = self.snapshots.read();
            build_query(text, &organizations, Some(&snapshots.aliases))
        };

        if !should_execute(&query) {
            return SearchView::Ready(SearchResults {
                recent: recent_section(&self.snapshots.read().recent, text),
                ..SearchResults::default()
            });
        }

        let fetched =
            github::search_repositories(&self.http_client, &self.config.github, &query).await;

        // Rank against the snapshots as they are now, after the fetch
        let snapshots = self.snapshots();
        let recent = recent_section(&snapshots.recent, text);
        match fetched {
            Ok(items) => {
                *self.latest_results.write() = items.clone();
                let results = rank_results(items, &snapshots.bookmarks, &snapshots.aliases, text);
                SearchView::Ready(SearchResults {
                    query: Some(query),
                    recent,
                    results,
                    error: None,
                })
            }
            Err(e) => {
                tracing::warn!("Search for \"{query}\" failed: {e:#}");
                SearchView::Ready(SearchResults {
                    query: Some(query),
                    recent,
                    results: Vec::new(),
                    error: Some(format!("{e:#}")),
                })
            }
        }
    }

    pub async fn toggle_bookmark(&self, repo_id: u64) -> anyhow::Result<bool> {
        let bookmarked = self.bookmarks.toggle(repo_id).await?;
        let set = self.bookmarks.load().await;
        self.snapshots.write().bookmarks = set;
        Ok(bookmarked)
    }

    pub async fn set_alias(
        &self,
        repo_id: u64,
        repo_full_name: &str,
        alias: &str,
    ) -> Result<AliasEntry, StoreError> {
        let entry = self.aliases.set(repo_id, repo_full_name, alias).await?;
        self.refresh_aliases().await;
        Ok(entry)
    }

    pub async fn remove_alias(&self, repo_id: u64) -> anyhow::Result<Option<AliasEntry>> {
        let removed = self.aliases.remove(repo_id).await?;
        self.refresh_aliases().await;
        Ok(removed)
    }

    async fn refresh_aliases(&self) {
        let snapshot = self.aliases.load().await;
        self.snapshots.write().aliases = snapshot;
    }

    /// Record that a repository was opened (in the browser or by cloning).
    pub async fn open_repository(&self, repo_id: u64) -> Result<RepositoryRecord, OpenError> {
        let repo = {
            let results = self.latest_results.read();
            let snapshots = self.snapshots.read();
            let found = find_opened(repo_id, &results, &snapshots.recent).cloned();
            found
        }
        .ok_or(OpenError::NotFound(repo_id))?;

        let list = self.recent.record_opened(repo.clone()).await?;
        self.snapshots.write().recent = list;
        Ok(repo)
    }

    pub async fn clear_recent(&self) -> anyhow::Result<()> {
        self.recent.clear().await?;
        self.snapshots.write().recent = RecentList::default();
        Ok(())
    }
}
