use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::models::UserSkillProfile;
use crate::services::store::{StoreError, UserStore};

/// Shared member list, as handed out by the cache
pub type UserSnapshot = Arc<Vec<UserSkillProfile>>;

/// In-process cache of member snapshots
///
/// Catalog, suggestion and pairing requests all need the full member list.
/// Reading the whole `users` node on every request is the expensive part,
/// so the decoded list is kept for a short TTL and shared between requests.
/// A TTL of zero disables caching.
pub struct SnapshotCache {
    snapshots: moka::future::Cache<String, UserSnapshot>,
    ttl_secs: u64,
}

impl SnapshotCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let mut builder = moka::future::CacheBuilder::new(max_entries.max(1));
        if ttl_secs > 0 {
            builder = builder.time_to_live(Duration::from_secs(ttl_secs));
        }

        Self {
            snapshots: builder.build(),
            ttl_secs,
        }
    }

    pub fn disabled() -> Self {
        Self::new(1, 0)
    }

    pub fn is_enabled(&self) -> bool {
        self.ttl_secs > 0
    }

    /// Current member list, from cache when fresh
    pub async fn users(&self, store: &dyn UserStore) -> Result<UserSnapshot, StoreError> {
        if !self.is_enabled() {
            return Ok(Arc::new(store.fetch_users().await?));
        }

        let key = CacheKey::users(store.backend_name());

        if let Some(snapshot) = self.snapshots.get(&key).await {
            tracing::trace!("Snapshot cache hit: {}", key);
            return Ok(snapshot);
        }

        let snapshot: UserSnapshot = Arc::new(store.fetch_users().await?);
        self.snapshots.insert(key.clone(), snapshot.clone()).await;

        tracing::debug!("Snapshot cache refreshed: {} ({} users)", key, snapshot.len());
        Ok(snapshot)
    }

    /// Drop every cached snapshot
    pub fn invalidate_all(&self) {
        self.snapshots.invalidate_all();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.snapshots.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for the full member list of a store
    pub fn users(backend: &str) -> String {
        format!("users:{}", backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl UserStore for CountingStore {
        async fn fetch_users(&self) -> Result<Vec<UserSkillProfile>, StoreError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(vec![UserSkillProfile::new("a")])
        }

        async fn fetch_user(&self, _user_id: &str) -> Result<Option<UserSkillProfile>, StoreError> {
            Ok(None)
        }

        async fn health_check(&self) -> Result<bool, StoreError> {
            Ok(true)
        }

        fn backend_name(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_snapshot_reused_within_ttl() {
        let store = CountingStore { fetches: AtomicUsize::new(0) };
        let cache = SnapshotCache::new(10, 60);

        let first = cache.users(&store).await.unwrap();
        let second = cache.users(&store).await.unwrap();

        assert_eq!(store.fetches.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let store = CountingStore { fetches: AtomicUsize::new(0) };
        let cache = SnapshotCache::new(10, 60);

        cache.users(&store).await.unwrap();
        cache.invalidate_all();
        cache.users(&store).await.unwrap();

        assert_eq!(store.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_reads_store() {
        let store = CountingStore { fetches: AtomicUsize::new(0) };
        let cache = SnapshotCache::disabled();

        cache.users(&store).await.unwrap();
        cache.users(&store).await.unwrap();

        assert!(!cache.is_enabled());
        assert_eq!(store.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::users("firebase"), "users:firebase");
    }
}
