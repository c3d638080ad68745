//! Metagraph cache.
//!
//! A TTL+size-bounded cache keyed by block number, backed by `moka`'s async
//! cache. No single-flight: two concurrent misses for the same key both
//! compute, and the second write wins.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::domain::{BlockNumber, Metagraph, NetUid};

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    netuid: NetUid,
    block: BlockNumber,
}

/// Caches metagraphs by `(netuid, block)` for `ttl`, evicting least-recently
/// used entries past `max_size`.
pub struct MetagraphCache {
    inner: Cache<CacheKey, Arc<Metagraph>>,
}

impl MetagraphCache {
    pub fn new(ttl: Duration, max_size: u64) -> Self {
        Self {
            inner: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_size)
                .build(),
        }
    }

    pub async fn get(&self, netuid: NetUid, block: BlockNumber) -> Option<Arc<Metagraph>> {
        self.inner.get(&CacheKey { netuid, block }).await
    }

    pub async fn insert(&self, netuid: NetUid, block: BlockNumber, metagraph: Metagraph) -> Arc<Metagraph> {
        let value = Arc::new(metagraph);
        self.inner
            .insert(CacheKey { netuid, block }, value.clone())
            .await;
        value
    }

    pub async fn invalidate(&self, netuid: NetUid, block: BlockNumber) {
        self.inner.invalidate(&CacheKey { netuid, block }).await;
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for MetagraphCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(600), 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Block, BlockHash};

    fn metagraph(block_number: BlockNumber) -> Metagraph {
        Metagraph::new(
            Block {
                number: block_number,
                hash: BlockHash::new("0xabc"),
            },
            vec![],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn miss_then_insert_then_hit() {
        let cache = MetagraphCache::new(Duration::from_secs(60), 10);
        assert!(cache.get(1, 100).await.is_none());
        cache.insert(1, 100, metagraph(100)).await;
        assert!(cache.get(1, 100).await.is_some());
    }

    #[tokio::test]
    async fn distinct_blocks_are_distinct_keys() {
        let cache = MetagraphCache::new(Duration::from_secs(60), 10);
        cache.insert(1, 100, metagraph(100)).await;
        assert!(cache.get(1, 101).await.is_none());
    }

    #[tokio::test]
    async fn expires_after_ttl() {
        let cache = MetagraphCache::new(Duration::from_millis(10), 10);
        cache.insert(1, 100, metagraph(100)).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.get(1, 100).await.is_none());
    }
}
