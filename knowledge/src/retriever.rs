//! Retrieval over the knowledge store.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use tripcraft_embeddings::cache::CachedProvider;
use tripcraft_embeddings::provider::EmbeddingProvider;
use tripcraft_embeddings::EmbeddingCache;

use crate::error::Result;
use crate::record::KnowledgeRecord;
use crate::store::KnowledgeStore;

/// Default number of records returned by a retrieval.
pub const DEFAULT_TOP_K: usize = 5;

/// A record returned by retrieval, with its distance to the query.
#[derive(Debug, Clone)]
pub struct RetrievedRecord {
    /// The matched record.
    pub record: KnowledgeRecord,

    /// Squared L2 distance between query and record embeddings.
    pub distance: f32,
}

/// Orchestrates query embedding, index search, and record lookup.
///
/// The retriever owns the cached embedding provider and shares the
/// knowledge store behind a lock; the store is read-mostly, written only
/// during the load phase. Retrieval itself has no side effects beyond
/// the embedding cache's, and is deterministic for a deterministic
/// provider.
pub struct Retriever<P> {
    /// Cached embedding generation.
    embedder: CachedProvider<P>,

    /// Shared knowledge store.
    store: Arc<RwLock<KnowledgeStore>>,
}

impl<P: EmbeddingProvider> Retriever<P> {
    /// Create a retriever with a fresh store of the given dimension.
    pub fn new(provider: P, cache: EmbeddingCache, dimension: usize) -> Self {
        Self {
            embedder: CachedProvider::new(provider, cache),
            store: Arc::new(RwLock::new(KnowledgeStore::new(dimension))),
        }
    }

    /// Set the embedding model requested on every provider call.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.embedder = self.embedder.with_model(model);
        self
    }

    /// Create a retriever over an existing shared store.
    pub fn with_store(
        provider: P,
        cache: EmbeddingCache,
        store: Arc<RwLock<KnowledgeStore>>,
    ) -> Self {
        Self {
            embedder: CachedProvider::new(provider, cache),
            store,
        }
    }

    /// Load records into the shared store through the embedding cache.
    pub async fn load(&self, records: Vec<KnowledgeRecord>) -> Result<usize> {
        self.store.write().await.load(records, &self.embedder).await
    }

    /// Retrieve the k records most similar to the query text.
    ///
    /// Returned records preserve the index's distance-ascending order.
    pub async fn retrieve(&self, query_text: &str, k: usize) -> Result<Vec<RetrievedRecord>> {
        debug!("Retrieving top-{k} records for query ({} chars)", query_text.len());

        let query_embedding = self.embedder.embed_cached(query_text).await?;

        let store = self.store.read().await;
        let neighbors = store.search(&query_embedding, k)?;

        let mut results = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            match store.record(&neighbor.id) {
                Some(record) => results.push(RetrievedRecord {
                    record: record.clone(),
                    distance: neighbor.distance,
                }),
                // Unreachable while the index is only fed by the store.
                None => warn!("index returned unknown record id: {}", neighbor.id),
            }
        }

        Ok(results)
    }

    /// The shared knowledge store.
    pub fn store(&self) -> Arc<RwLock<KnowledgeStore>> {
        Arc::clone(&self.store)
    }

    /// The cached embedding provider.
    pub fn embedder(&self) -> &CachedProvider<P> {
        &self.embedder
    }
}
