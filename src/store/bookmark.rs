use std::sync::Arc;

use super::kv::{keys, KeyValueStore};
use super::{load_json, save_json};

/// Set of bookmarked repository ids, in the order they were bookmarked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkSet {
    ids: Vec<u64>,
}

impl BookmarkSet {
    pub fn from_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        let mut set = Self::default();
        for id in ids {
            if !set.contains(id) {
                set.ids.push(id);
            }
        }
        set
    }

    pub fn contains(&self, repo_id: u64) -> bool {
        self.ids.contains(&repo_id)
    }

    /// Flip membership, returning whether the repo is now bookmarked.
    pub fn toggle(&mut self, repo_id: u64) -> bool {
        match self.ids.iter().position(|&id| id == repo_id) {
            Some(idx) => {
                self.ids.remove(idx);
                false
            }
            None => {
                self.ids.push(repo_id);
                true
            }
        }
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Durable bookmark set stored under [`keys::BOOKMARKED_REPOS`].
#[derive(Clone)]
pub struct BookmarkStore {
    kv: Arc<dyn KeyValueStore>,
}

impl BookmarkStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn load(&self) -> BookmarkSet {
        let ids: Vec<u64> = load_json(self.kv.as_ref(), keys::BOOKMARKED_REPOS).await;
        BookmarkSet::from_ids(ids)
    }

    pub async fn save(&self, set: &BookmarkSet) -> anyhow::Result<()> {
        save_json(self.kv.as_ref(), keys::BOOKMARKED_REPOS, set.ids()).await
    }

    pub async fn toggle(&self, repo_id: u64) -> anyhow::Result<bool> {
        let mut set = self.load().await;
        let bookmarked = set.toggle(repo_id);
        self.save(&set).await?;
        tracing::info!(
            "Repo {repo_id} {}",
            if bookmarked { "bookmarked" } else { "unbookmarked" }
        );
        Ok(bookmarked)
    }
}
