//! Block metadata cache.
//!
//! Block headers never change once committed, so resolved heights are kept
//! in an LRU and never looked up twice. Misses (`None`) and errors are not
//! cached.

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use shared_types::{BlockMeta, Height};
use tracing::trace;
use wallet_telemetry::BLOCK_CACHE_HITS;

use crate::domain::TxHistoryError;
use crate::ports::outbound::BlockInfoSource;

/// LRU-cached [`BlockInfoSource`].
pub struct CachedBlockSource<B: BlockInfoSource> {
    inner: Arc<B>,
    cache: Mutex<LruCache<Height, BlockMeta>>,
}

impl<B: BlockInfoSource> CachedBlockSource<B> {
    /// Wrap `inner`, keeping up to `capacity` blocks (at least one).
    pub fn new(inner: Arc<B>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached blocks.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Drop every cached block.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}

#[async_trait]
impl<B: BlockInfoSource> BlockInfoSource for CachedBlockSource<B> {
    async fn block_meta(&self, height: Height) -> Result<Option<BlockMeta>, TxHistoryError> {
        let hit = self.cache.lock().get(&height).cloned();
        if let Some(meta) = hit {
            BLOCK_CACHE_HITS.inc();
            trace!(height, "Block cache hit");
            return Ok(Some(meta));
        }

        let meta = self.inner.block_meta(height).await?;
        if let Some(meta) = &meta {
            self.cache.lock().put(height, meta.clone());
        }
        Ok(meta)
    }
}
