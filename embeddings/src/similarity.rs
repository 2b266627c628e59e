//! Distance computation for embeddings.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Compute the squared Euclidean (L2) distance between two embeddings.
///
/// Returns 0.0 for identical vectors; larger values mean less similar.
/// The square root is never taken since only the relative ordering of
/// distances matters for ranking.
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    Ok(a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum())
}

/// A nearest-neighbor search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighbor {
    /// ID of the matched item.
    pub id: String,

    /// Squared L2 distance to the query.
    pub distance: f32,
}

impl Neighbor {
    /// Create a new neighbor result.
    pub fn new(id: impl Into<String>, distance: f32) -> Self {
        Self {
            id: id.into(),
            distance,
        }
    }
}

/// Find the k nearest candidates to the query by squared L2 distance.
///
/// Returns `(position, distance)` pairs ordered by ascending distance,
/// at most `k` of them. Ties keep the earlier-positioned candidate first
/// (the sort is stable over input order). The scan is exhaustive, which
/// is acceptable for the tens-to-hundreds of vectors this system holds.
pub fn find_nearest_k(
    query: &Embedding,
    candidates: &[Embedding],
    k: usize,
) -> Result<Vec<(usize, f32)>> {
    let mut distances: Vec<(usize, OrderedFloat<f32>)> = Vec::with_capacity(candidates.len());

    for (position, embedding) in candidates.iter().enumerate() {
        let distance = squared_euclidean(query, embedding)?;
        distances.push((position, OrderedFloat(distance)));
    }

    // Stable sort: equal distances preserve insertion order.
    distances.sort_by_key(|(_, distance)| *distance);

    Ok(distances
        .into_iter()
        .take(k)
        .map(|(position, distance)| (position, distance.0))
        .collect())
}
