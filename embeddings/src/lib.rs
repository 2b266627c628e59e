//! # Embeddings
//!
//! This crate provides embedding generation, caching, and exact
//! nearest-neighbor search for the tripcraft retrieval system.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert text to dense vectors via an API provider
//! - **Caching**: Bounded memoization of embeddings keyed by exact text
//! - **Similarity Search**: Exhaustive top-k search by squared L2 distance
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Embeddings System                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► CachedProvider ──► SimilarityIndex      │
//! │       │                     │                   │               │
//! │       ▼                     ▼                   ▼               │
//! │    OpenAI            EmbeddingCache       Neighbor results     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod index;
pub mod provider;
pub mod similarity;

pub use cache::{CachedProvider, EmbeddingCache};
pub use error::{EmbeddingError, Result};
pub use index::SimilarityIndex;
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, OpenAIProvider};
pub use similarity::{Neighbor, squared_euclidean};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of embeddings (varies by model).
pub const DEFAULT_DIMENSION: usize = 1536; // OpenAI text-embedding-ada-002
