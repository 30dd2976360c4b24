use std::sync::Arc;

use super::kv::{keys, KeyValueStore};
use super::{load_json, save_json};
use crate::models::RepositoryRecord;

/// Maximum number of repositories kept in the recent list.
pub const MAX_RECENT_REPOS: usize = 10;

/// Recently opened repositories, newest first, unique by id, at most
/// [`MAX_RECENT_REPOS`] long.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentList {
    repos: Vec<RepositoryRecord>,
}

impl RecentList {
    pub fn from_repos(repos: impl IntoIterator<Item = RepositoryRecord>) -> Self {
        let mut list = Self::default();
        for repo in repos {
            if list.find(repo.id).is_none() {
                list.repos.push(repo);
            }
        }
        list.repos.truncate(MAX_RECENT_REPOS);
        list
    }

    /// Move (or insert) a repository to the front.
    pub fn push_front(&mut self, repo: RepositoryRecord) {
        self.repos.retain(|r| r.id != repo.id);
        self.repos.insert(0, repo);
        self.repos.truncate(MAX_RECENT_REPOS);
    }

    pub fn find(&self, repo_id: u64) -> Option<&RepositoryRecord> {
        self.repos.iter().find(|r| r.id == repo_id)
    }

    /// Entries complete enough to render.
    pub fn displayable(&self) -> impl Iterator<Item = &RepositoryRecord> {
        self.repos.iter().filter(|r| r.has_identity())
    }

    pub fn repos(&self) -> &[RepositoryRecord] {
        &self.repos
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}

/// Durable recent list stored under [`keys::RECENT_REPOS`].
#[derive(Clone)]
pub struct RecentStore {
    kv: Arc<dyn KeyValueStore>,
}

impl RecentStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the list, skipping individual entries that fail to decode.
    pub async fn load(&self) -> RecentList {
        let raw: Vec<serde_json::Value> = load_json(self.kv.as_ref(), keys::RECENT_REPOS).await;
        let total = raw.len();
        let repos: Vec<RepositoryRecord> = raw
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        if repos.len() < total {
            tracing::debug!("Skipped {} undecodable recent entries", total - repos.len());
        }
        RecentList::from_repos(repos)
    }

    pub async fn save(&self, list: &RecentList) -> anyhow::Result<()> {
        save_json(self.kv.as_ref(), keys::RECENT_REPOS, list.repos()).await
    }

    /// Record that a repository was opened and return the updated list.
    pub async fn record_opened(&self, repo: RepositoryRecord) -> anyhow::Result<RecentList> {
        let mut list = self.load().await;
        tracing::debug!("Recording {} as recently opened", repo.full_name);
        list.push_front(repo);
        self.save(&list).await?;
        Ok(list)
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        self.kv.remove_item(keys::RECENT_REPOS).await?;
        tracing::info!("Cleared recent repositories");
        Ok(())
    }
}
