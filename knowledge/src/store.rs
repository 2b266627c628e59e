//! Knowledge store: loaded records plus their similarity index.

use tracing::{info, warn};

use tripcraft_embeddings::cache::CachedProvider;
use tripcraft_embeddings::provider::EmbeddingProvider;
use tripcraft_embeddings::similarity::Neighbor;
use tripcraft_embeddings::{Embedding, SimilarityIndex};

use crate::error::{KnowledgeError, Result};
use crate::record::KnowledgeRecord;

/// Holds the loaded knowledge records and their embeddings.
///
/// The record list and the similarity index stay positionally aligned:
/// index entry `i` was produced from the `i`-th loaded record. The store
/// is read-only after its load phase, so concurrent retrievals need no
/// coordination beyond the surrounding lock.
pub struct KnowledgeStore {
    /// Loaded records, in load order.
    records: Vec<KnowledgeRecord>,

    /// Nearest-neighbor index over record description embeddings.
    index: SimilarityIndex,
}

impl KnowledgeStore {
    /// Create an empty store expecting embeddings of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            records: Vec::new(),
            index: SimilarityIndex::new(dimension),
        }
    }

    /// Ingest a batch of records, embedding each description.
    ///
    /// Embeddings go through the shared cache, keyed by the record's
    /// description text, and are appended to the index in record order.
    /// Calling `load` again appends: re-loading the same records
    /// duplicates entries rather than deduplicating them.
    ///
    /// Returns the number of records loaded.
    pub async fn load<P: EmbeddingProvider>(
        &mut self,
        records: Vec<KnowledgeRecord>,
        embedder: &CachedProvider<P>,
    ) -> Result<usize> {
        // Validate the whole batch before any external call.
        for record in &records {
            if record.description().trim().is_empty() {
                return Err(KnowledgeError::Validation(format!(
                    "record '{}' has no description",
                    record.name()
                )));
            }
        }

        if !self.records.is_empty() {
            warn!(
                "loading {} records into a store already holding {}; entries will duplicate",
                records.len(),
                self.records.len()
            );
        }

        let count = records.len();
        for record in records {
            let embedding = embedder.embed_cached(record.description()).await?;
            self.index.add(record.id(), embedding)?;
            self.records.push(record);
        }

        info!("Loaded {count} knowledge records");
        Ok(count)
    }

    /// Look up a record by identifier.
    ///
    /// If loading duplicated an id, the earliest-loaded record wins.
    pub fn record(&self, id: &str) -> Option<&KnowledgeRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// All loaded records, in load order.
    pub fn records(&self) -> &[KnowledgeRecord] {
        &self.records
    }

    /// Search the index for the k nearest records to the query vector.
    pub fn search(&self, query: &Embedding, k: usize) -> Result<Vec<Neighbor>> {
        Ok(self.index.search(query, k)?)
    }

    /// Number of loaded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
