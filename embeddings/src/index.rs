//! Positional similarity index over knowledge embeddings.

use tracing::debug;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::similarity::{Neighbor, find_nearest_k};

/// An append-only nearest-neighbor index.
///
/// Entries are stored positionally: index `i` refers to the `i`-th added
/// entry, which keeps the index aligned with the knowledge store that
/// loaded it. Search is an exhaustive scan by squared L2 distance.
pub struct SimilarityIndex {
    /// Record identifiers, in insertion order.
    ids: Vec<String>,

    /// Embeddings, parallel to `ids`.
    embeddings: Vec<Embedding>,

    /// Expected dimension of embeddings.
    dimension: usize,
}

impl SimilarityIndex {
    /// Create a new similarity index.
    pub fn new(dimension: usize) -> Self {
        Self {
            ids: Vec::new(),
            embeddings: Vec::new(),
            dimension,
        }
    }

    /// Append an embedding to the index.
    pub fn add(&mut self, id: impl Into<String>, embedding: Embedding) -> Result<()> {
        if embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        let id = id.into();
        debug!("Added embedding to index: {id}");
        self.ids.push(id);
        self.embeddings.push(embedding);

        Ok(())
    }

    /// Get the number of entries in the index.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Get the expected embedding dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get all IDs in insertion order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Search for the k nearest entries to the query.
    ///
    /// Results are ordered by ascending squared L2 distance, ties broken
    /// by insertion order. Returns at most `k` neighbors; if the index
    /// holds fewer than `k` entries, all of them are returned.
    pub fn search(&self, query: &Embedding, k: usize) -> Result<Vec<Neighbor>> {
        if self.is_empty() {
            return Err(EmbeddingError::EmptyIndex);
        }
        if k == 0 {
            return Err(EmbeddingError::InvalidK);
        }
        if query.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let ranked = find_nearest_k(query, &self.embeddings, k)?;

        Ok(ranked
            .into_iter()
            .map(|(position, distance)| Neighbor::new(self.ids[position].clone(), distance))
            .collect())
    }
}
