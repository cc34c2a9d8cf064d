//! In-process cache of the dish groups in use
//!
//! The ordering page lists the groups that have at least one dish. Entries
//! live for an hour and are dropped whenever a dish is written through the
//! back office.

use std::sync::Arc;
use std::time::Duration;

use shared::models::DishGroup;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::db;
use crate::error::ServiceResult;

const CACHE_TTL: Duration = Duration::from_secs(3600);

struct CacheEntry {
    groups: Vec<DishGroup>,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct GroupCache {
    entry: Arc<RwLock<Option<CacheEntry>>>,
    ttl: Duration,
}

impl Default for GroupCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupCache {
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entry: Arc::new(RwLock::new(None)),
            ttl,
        }
    }

    /// Cached groups if still fresh
    pub async fn get(&self) -> Option<Vec<DishGroup>> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.groups.clone())
    }

    pub async fn put(&self, groups: Vec<DishGroup>) {
        let mut entry = self.entry.write().await;
        *entry = Some(CacheEntry {
            groups,
            expires_at: Instant::now() + self.ttl,
        });
    }

    pub async fn invalidate(&self) {
        self.entry.write().await.take();
    }

    /// Cached groups, loading from the database on a miss
    pub async fn get_or_load(&self, pool: &PgPool) -> ServiceResult<Vec<DishGroup>> {
        if let Some(groups) = self.get().await {
            return Ok(groups);
        }
        let groups = db::dishes::groups_in_use(pool).await?;
        tracing::debug!(count = groups.len(), "Dish group cache refreshed");
        self.put(groups.clone()).await;
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = GroupCache::new();
        assert!(cache.get().await.is_none());
        cache.put(vec![DishGroup::Carne, DishGroup::Pescado]).await;
        assert_eq!(
            cache.get().await,
            Some(vec![DishGroup::Carne, DishGroup::Pescado])
        );
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = GroupCache::new();
        cache.put(vec![DishGroup::Otros]).await;
        cache.invalidate().await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires() {
        let cache = GroupCache::with_ttl(Duration::from_secs(60));
        cache.put(vec![DishGroup::Tortillas]).await;
        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(cache.get().await.is_none());
    }
}
