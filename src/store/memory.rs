use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{KvStore, Result, StoreError};

/// In-memory store for exercising the HTTP layer without a network.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<(String, String)>>,
    failing_listing: Option<String>,
    failing_key: Option<String>,
    phantom_keys: Vec<String>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let store = Self::new();
        {
            let mut guard = store.entries.lock().unwrap();
            for (key, value) in entries {
                guard.push((key.to_string(), value.to_string()));
            }
        }
        store
    }

    /// Make `list_keys` fail with the given upstream message.
    pub fn fail_listing(mut self, message: &str) -> Self {
        self.failing_listing = Some(message.to_string());
        self
    }

    /// Make every operation on `key` fail.
    pub fn fail_key(mut self, key: &str) -> Self {
        self.failing_key = Some(key.to_string());
        self
    }

    /// List `key` after the stored entries without ever holding a value for it.
    pub fn list_phantom(mut self, key: &str) -> Self {
        self.phantom_keys.push(key.to_string());
        self
    }

    /// Number of store operations performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn list_keys(&self) -> Result<Vec<String>> {
        self.record_call();
        if let Some(message) = &self.failing_listing {
            return Err(StoreError::Upstream(message.clone()));
        }
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .map(|(key, _)| key.clone())
            .chain(self.phantom_keys.iter().cloned())
            .collect())
    }

    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.record_call();
        if self.failing_key.as_deref() == Some(key) {
            return Err(StoreError::Upstream(format!("failed to read {}", key)));
        }
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.clone()))
    }

    async fn put_value(&self, key: &str, value: &str) -> Result<()> {
        self.record_call();
        if self.failing_key.as_deref() == Some(key) {
            return Err(StoreError::Upstream(format!("failed to write {}", key)));
        }
        let mut entries = self.entries.lock().unwrap();
        match entries.iter().position(|(k, _)| k == key) {
            Some(index) => entries[index].1 = value.to_string(),
            None => entries.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    async fn delete_value(&self, key: &str) -> Result<()> {
        self.record_call();
        if self.failing_key.as_deref() == Some(key) {
            return Err(StoreError::Upstream(format!("failed to delete {}", key)));
        }
        self.entries.lock().unwrap().retain(|(k, _)| k != key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Entry;

    #[tokio::test]
    async fn test_put_then_get_round_trip() {
        let store = MemoryStore::new();
        store.put_value("greeting", "hello").await.unwrap();

        assert_eq!(
            store.get_value("greeting").await.unwrap(),
            Some("hello".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_after_delete_is_absent() {
        let store = MemoryStore::with_entries(&[("a", "1")]);
        store.delete_value("a").await.unwrap();

        assert_eq!(store.get_value("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_entries_keeps_listing_order() {
        let store = MemoryStore::with_entries(&[("zeta", "26"), ("alpha", "1"), ("mid", "13")]);

        let entries = store.list_entries().await.unwrap();

        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        for entry in &entries {
            let direct = store.get_value(&entry.key).await.unwrap();
            assert_eq!(direct, entry.value);
        }
    }

    #[tokio::test]
    async fn test_list_entries_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.list_entries().await.unwrap(), Vec::<Entry>::new());
    }

    #[tokio::test]
    async fn test_list_entries_fails_when_one_fetch_fails() {
        let store = MemoryStore::with_entries(&[("a", "1"), ("b", "2"), ("c", "3")]).fail_key("b");

        let error = store.list_entries().await.unwrap_err();
        assert_eq!(error.to_string(), "failed to read b");
    }

    #[tokio::test]
    async fn test_list_entries_propagates_listing_failure() {
        let store = MemoryStore::with_entries(&[("a", "1")]).fail_listing("namespace unavailable");

        let error = store.list_entries().await.unwrap_err();
        assert!(matches!(error, StoreError::Upstream(ref m) if m == "namespace unavailable"));
    }
}
