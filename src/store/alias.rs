use std::collections::HashSet;
use std::sync::Arc;

use super::kv::{keys, KeyValueStore};
use super::{load_json, save_json, StoreError};
use crate::models::AliasEntry;

/// In-memory view of the alias store, keyed by repository id.
///
/// Entries keep their first-insertion order: updating an existing alias
/// replaces it in place, new aliases go to the end. Query building walks
/// the entries in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasSnapshot {
    entries: Vec<AliasEntry>,
}

impl AliasSnapshot {
    pub fn from_entries(entries: impl IntoIterator<Item = AliasEntry>) -> Self {
        let mut snapshot = Self::default();
        for entry in entries {
            snapshot.upsert(entry);
        }
        snapshot
    }

    pub fn get(&self, repo_id: u64) -> Option<&AliasEntry> {
        self.entries.iter().find(|e| e.repo_id == repo_id)
    }

    pub fn alias_for(&self, repo_id: u64) -> Option<&str> {
        self.get(repo_id).map(|e| e.alias.as_str())
    }

    pub fn upsert(&mut self, entry: AliasEntry) {
        match self.entries.iter_mut().find(|e| e.repo_id == entry.repo_id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn remove(&mut self, repo_id: u64) -> Option<AliasEntry> {
        let idx = self.entries.iter().position(|e| e.repo_id == repo_id)?;
        Some(self.entries.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AliasEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose label contains `text` (trimmed, case-insensitive).
    ///
    /// Blank text matches nothing.
    pub fn matching<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a AliasEntry> + 'a {
        let needle = text.trim().to_lowercase();
        self.entries
            .iter()
            .filter(move |e| !needle.is_empty() && e.alias.to_lowercase().contains(&needle))
    }

    pub fn matching_repo_ids(&self, text: &str) -> HashSet<u64> {
        self.matching(text).map(|e| e.repo_id).collect()
    }

    pub fn into_entries(self) -> Vec<AliasEntry> {
        self.entries
    }
}

/// Durable alias map stored under [`keys::ALIASES`] as a JSON array.
#[derive(Clone)]
pub struct AliasStore {
    kv: Arc<dyn KeyValueStore>,
}

impl AliasStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn load(&self) -> AliasSnapshot {
        let entries: Vec<AliasEntry> = load_json(self.kv.as_ref(), keys::ALIASES).await;
        AliasSnapshot::from_entries(entries)
    }

    pub async fn save(&self, snapshot: &AliasSnapshot) -> anyhow::Result<()> {
        save_json(self.kv.as_ref(), keys::ALIASES, &snapshot.entries).await
    }

    /// Set or replace the alias for a repository. The label is trimmed first.
    pub async fn set(
        &self,
        repo_id: u64,
        repo_full_name: &str,
        alias: &str,
    ) -> Result<AliasEntry, StoreError> {
        let alias = alias.trim();
        if alias.is_empty() {
            return Err(StoreError::EmptyAlias);
        }

        let entry = AliasEntry {
            repo_id,
            repo_full_name: repo_full_name.to_string(),
            alias: alias.to_string(),
        };

        let mut snapshot = self.load().await;
        snapshot.upsert(entry.clone());
        self.save(&snapshot).await?;
        tracing::info!("Alias \"{}\" -> {}", entry.alias, entry.repo_full_name);
        Ok(entry)
    }

    /// Remove the alias for a repository, returning the removed entry if any.
    pub async fn remove(&self, repo_id: u64) -> anyhow::Result<Option<AliasEntry>> {
        let mut snapshot = self.load().await;
        let removed = snapshot.remove(repo_id);
        self.save(&snapshot).await?;
        Ok(removed)
    }

    pub async fn get(&self, repo_id: u64) -> Option<String> {
        self.load().await.alias_for(repo_id).map(str::to_string)
    }
}
