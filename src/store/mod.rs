//! Durable local state: aliases, bookmarks and recently opened repositories.
//!
//! Each store owns one key in a [`KeyValueStore`] and persists its whole
//! collection as JSON. Mutations are read-modify-write cycles against
//! storage with no locking, so two overlapping writes to the same store
//! resolve as last-write-wins. Stores never share a transaction.

pub mod alias;
pub mod bookmark;
pub mod kv;
pub mod recent;

pub use alias::{AliasSnapshot, AliasStore};
pub use bookmark::{BookmarkSet, BookmarkStore};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use recent::{RecentList, RecentStore, MAX_RECENT_REPOS};

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("alias must not be empty")]
    EmptyAlias,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Read and decode a stored collection.
///
/// Missing keys, unreadable values and malformed JSON all yield the default
/// value: a corrupt store resets itself instead of blocking the caller.
pub(crate) async fn load_json<T>(kv: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match kv.get_item(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!("Failed to read {key}, starting empty: {e:#}");
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Discarding malformed {key} data: {e}");
            T::default()
        }
    }
}

pub(crate) async fn save_json<T>(kv: &dyn KeyValueStore, key: &str, value: &T) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    let data = serde_json::to_string(value)?;
    kv.set_item(key, &data).await
}
