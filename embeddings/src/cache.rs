//! Embedding cache to avoid redundant provider calls.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::Embedding;
use crate::error::Result;
use crate::provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};

/// Cache entry for an embedding.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The embedding vector.
    embedding: Embedding,

    /// Insertion sequence number, used for FIFO eviction.
    inserted_seq: u64,
}

/// Interior state guarded by one lock so the sequence counter stays
/// consistent with the map.
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    next_seq: u64,
}

/// Bounded cache mapping exact query text to its embedding.
///
/// Keys are exact-match only; there are no fuzzy or semantic hits. When
/// the entry count would exceed the bound, the single oldest-inserted
/// entry is evicted first. Hits do not re-order entries (FIFO, not LRU).
///
/// The cache is the only mutable structure shared between concurrent
/// requests; writes serialize on the internal lock, and since an
/// embedding is a pure function of its text, last-writer-wins on a
/// racing key is harmless.
pub struct EmbeddingCache {
    inner: Arc<RwLock<CacheInner>>,

    /// Maximum cache size.
    max_entries: usize,
}

impl EmbeddingCache {
    /// Create a new in-memory cache.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                entries: HashMap::new(),
                next_seq: 0,
            })),
            max_entries,
        }
    }

    /// Get an embedding from the cache.
    pub async fn get(&self, text: &str) -> Option<Embedding> {
        let inner = self.inner.read().await;
        inner.entries.get(text).map(|e| e.embedding.clone())
    }

    /// Put an embedding in the cache, evicting the oldest entry at capacity.
    pub async fn put(&self, text: &str, embedding: Embedding) {
        let mut inner = self.inner.write().await;

        // Overwriting an existing key must not trigger eviction.
        if !inner.entries.contains_key(text) && inner.entries.len() >= self.max_entries {
            if let Some(oldest_key) = inner
                .entries
                .iter()
                .min_by_key(|(_, v)| v.inserted_seq)
                .map(|(k, _)| k.clone())
            {
                debug!("Evicting oldest cache entry: {oldest_key}");
                inner.entries.remove(&oldest_key);
            }
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(
            text.to_string(),
            CacheEntry {
                embedding,
                inserted_seq: seq,
            },
        );
        debug!("Cached embedding for text ({} chars)", text.len());
    }

    /// Check if an embedding is cached.
    pub async fn contains(&self, text: &str) -> bool {
        self.inner.read().await.entries.contains_key(text)
    }

    /// Remove an embedding from the cache.
    pub async fn remove(&self, text: &str) {
        self.inner.write().await.entries.remove(text);
    }

    /// Clear the entire cache.
    pub async fn clear(&self) {
        self.inner.write().await.entries.clear();
        info!("Cleared embedding cache");
    }

    /// Get cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.read().await;
        CacheStats {
            entries: inner.entries.len(),
            max_entries: self.max_entries,
        }
    }
}

/// Statistics about the embedding cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of entries in cache.
    pub entries: usize,

    /// Maximum cache size.
    pub max_entries: usize,
}

/// A wrapper that provides cached embedding generation.
pub struct CachedProvider<P> {
    provider: P,
    cache: EmbeddingCache,

    /// Model requested from the provider; `None` uses the provider default.
    model: Option<String>,
}

impl<P> CachedProvider<P>
where
    P: EmbeddingProvider,
{
    /// Create a new cached provider.
    pub fn new(provider: P, cache: EmbeddingCache) -> Self {
        Self {
            provider,
            cache,
            model: None,
        }
    }

    /// Set the model requested on every provider call.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    fn request_for(&self, text: &str) -> EmbeddingRequest {
        match &self.model {
            Some(model) => EmbeddingRequest::new(text).with_model(model.clone()),
            None => EmbeddingRequest::new(text),
        }
    }

    /// Generate an embedding, using the cache if available.
    ///
    /// On a miss the provider is called and the result stored; provider
    /// failures propagate uncached, so no partial entries are stored.
    pub async fn embed_cached(&self, text: &str) -> Result<Embedding> {
        if let Some(embedding) = self.cache.get(text).await {
            debug!("Cache hit for embedding");
            return Ok(embedding);
        }

        let response = self.provider.embed(self.request_for(text)).await?;
        self.cache.put(text, response.embedding.clone()).await;

        Ok(response.embedding)
    }

    /// Generate a full embedding response, bypassing the cache.
    pub async fn embed_uncached(&self, text: &str) -> Result<EmbeddingResponse> {
        self.provider.embed(self.request_for(text)).await
    }

    /// Get the underlying cache.
    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmbeddingError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic provider that counts external calls.
    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
        seen_models: std::sync::Mutex<Vec<Option<String>>>,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
                seen_models: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn seen_models(&self) -> Vec<Option<String>> {
            self.seen_models.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn default_model(&self) -> &str {
            "stub"
        }

        fn default_dimension(&self) -> usize {
            2
        }

        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_models.lock().unwrap().push(request.model.clone());
            if self.fail {
                return Err(EmbeddingError::ApiRequest("stub failure".to_string()));
            }
            let embedding = vec![request.text.len() as f32, 0.0];
            Ok(EmbeddingResponse {
                embedding,
                model: "stub".to_string(),
                dimension: 2,
                tokens_used: None,
            })
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_cache_put_get() {
        let cache = EmbeddingCache::new(100);
        let embedding = vec![1.0, 2.0, 3.0];

        cache.put("hello", embedding.clone()).await;

        let retrieved = cache.get("hello").await;
        assert_eq!(retrieved, Some(embedding));
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let cache = EmbeddingCache::new(100);
        let result = cache.get("not cached").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_cache_keys_are_exact_match() {
        let cache = EmbeddingCache::new(100);
        cache.put("Central Park", vec![1.0]).await;

        assert!(cache.get("central park").await.is_none());
        assert!(cache.get("Central Park ").await.is_none());
        assert!(cache.get("Central Park").await.is_some());
    }

    #[tokio::test]
    async fn test_fifo_eviction_removes_oldest() {
        let cache = EmbeddingCache::new(2);

        cache.put("a", vec![1.0]).await;
        cache.put("b", vec![2.0]).await;
        cache.put("c", vec![3.0]).await;

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 2);
        assert!(!cache.contains("a").await);
        assert!(cache.contains("b").await);
        assert!(cache.contains("c").await);
    }

    #[tokio::test]
    async fn test_hit_does_not_reorder() {
        let cache = EmbeddingCache::new(2);

        cache.put("a", vec![1.0]).await;
        cache.put("b", vec![2.0]).await;

        // Touch "a"; FIFO ignores the hit, so "a" is still evicted next.
        assert!(cache.get("a").await.is_some());
        cache.put("c", vec![3.0]).await;

        assert!(!cache.contains("a").await);
        assert!(cache.contains("b").await);
    }

    #[tokio::test]
    async fn test_overwrite_does_not_evict() {
        let cache = EmbeddingCache::new(2);

        cache.put("a", vec![1.0]).await;
        cache.put("b", vec![2.0]).await;
        cache.put("a", vec![9.0]).await;

        assert_eq!(cache.get("a").await, Some(vec![9.0]));
        assert!(cache.contains("b").await);
    }

    #[tokio::test]
    async fn test_embed_cached_calls_provider_once() {
        let cached = CachedProvider::new(CountingProvider::new(), EmbeddingCache::new(100));

        let first = cached.embed_cached("hello world").await.unwrap();
        let second = cached.embed_cached("hello world").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.provider().call_count(), 1);
    }

    #[tokio::test]
    async fn test_configured_model_reaches_provider() {
        let cached = CachedProvider::new(CountingProvider::new(), EmbeddingCache::new(100))
            .with_model("custom-model");

        cached.embed_cached("hello").await.unwrap();
        cached.embed_uncached("world").await.unwrap();

        assert_eq!(
            cached.provider().seen_models(),
            vec![
                Some("custom-model".to_string()),
                Some("custom-model".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_default_model_left_to_provider() {
        let cached = CachedProvider::new(CountingProvider::new(), EmbeddingCache::new(100));

        cached.embed_cached("hello").await.unwrap();

        assert_eq!(cached.provider().seen_models(), vec![None]);
    }

    #[tokio::test]
    async fn test_provider_failure_not_cached() {
        let cached = CachedProvider::new(CountingProvider::failing(), EmbeddingCache::new(100));

        assert!(cached.embed_cached("oops").await.is_err());
        assert!(!cached.cache().contains("oops").await);

        // A second attempt reaches the provider again.
        assert!(cached.embed_cached("oops").await.is_err());
        assert_eq!(cached.provider().call_count(), 2);
    }
}
