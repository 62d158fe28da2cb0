pub mod cloudflare;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};
use thiserror::Error;

pub use cloudflare::CloudflareKv;

/// A single key-value pair held by the remote store
///
/// `value` is `None` only when a listed key was gone by the time its value
/// was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// Non-success response, carrying the upstream message or status text
    #[error("{0}")]
    Upstream(String),
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Key cannot be used in a request path: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Key names in the order the store reports them.
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// `Ok(None)` when the store reports the key as not found.
    async fn get_value(&self, key: &str) -> Result<Option<String>>;

    async fn put_value(&self, key: &str, value: &str) -> Result<()>;

    async fn delete_value(&self, key: &str) -> Result<()>;

    /// Maximum number of value fetches in flight during `list_entries`.
    /// `None` allows one per key.
    fn list_concurrency(&self) -> Option<usize> {
        None
    }

    /// List every key, then fetch all values concurrently.
    ///
    /// Entries keep the listing order, one per listed key. The first failed
    /// fetch fails the whole listing and drops the fetches still in flight.
    /// A key whose value is gone by the time it is fetched keeps its place
    /// with no value.
    async fn list_entries(&self) -> Result<Vec<Entry>> {
        let keys = self.list_keys().await?;
        let key_count = keys.len();
        let limit = self
            .list_concurrency()
            .unwrap_or(key_count)
            .max(1);

        let entries: Vec<Entry> = stream::iter(keys)
            .map(|key| async move {
                let value = self.get_value(&key).await?;
                Ok::<_, StoreError>(Entry { key, value })
            })
            .buffered(limit)
            .try_collect()
            .await?;

        let vanished = entries.iter().filter(|entry| entry.value.is_none()).count();
        if vanished > 0 {
            tracing::debug!(
                "{} listed keys vanished before their values were fetched",
                vanished
            );
        }
        Ok(entries)
    }
}
