//! Configuration for the trip planner.

use serde::{Deserialize, Serialize};

use tripcraft_embeddings::DEFAULT_DIMENSION;
use tripcraft_knowledge::DEFAULT_TOP_K;

/// Configuration for the trip planner engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,

    /// Retrieval configuration.
    pub retrieval: RetrievalConfig,

    /// Plan generation configuration.
    pub generation: GenerationConfig,
}

impl PlannerConfig {
    /// Set the embedding configuration.
    pub fn with_embedding(mut self, config: EmbeddingConfig) -> Self {
        self.embedding = config;
        self
    }

    /// Set the retrieval configuration.
    pub fn with_retrieval(mut self, config: RetrievalConfig) -> Self {
        self.retrieval = config;
        self
    }

    /// Set the generation configuration.
    pub fn with_generation(mut self, config: GenerationConfig) -> Self {
        self.generation = config;
        self
    }
}

/// Configuration for the embedding provider and cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model to use for embeddings.
    pub model: String,

    /// Expected embedding dimension.
    pub dimension: usize,

    /// Maximum embedding cache size (oldest-inserted evicted first).
    pub cache_max_entries: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-ada-002".to_string(),
            dimension: DEFAULT_DIMENSION,
            cache_max_entries: 1000,
        }
    }
}

/// Configuration for retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of records retrieved per query.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K }
    }
}

/// Configuration for plan generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model to use for generation.
    pub model: String,

    /// Maximum tokens in the generated plan.
    pub max_tokens: u32,

    /// Timeout applied to each generation call, in seconds.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            max_tokens: 4096,
            timeout_secs: 120,
        }
    }
}
