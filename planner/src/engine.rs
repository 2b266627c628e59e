//! Trip planner engine implementation.

use tracing::{debug, info};

use tripcraft_embeddings::EmbeddingCache;
use tripcraft_embeddings::provider::EmbeddingProvider;
use tripcraft_knowledge::{KnowledgeFile, KnowledgeRecord, Retriever};

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::generator::{GenerationRequest, PlanGenerator};
use crate::plan::{TripPlan, TripRequest};
use crate::prompt;

/// Top-level orchestrator combining retrieval and generation.
///
/// Each `plan_trip` call is stateless aside from the shared embedding
/// cache and knowledge store, so independent requests may run
/// concurrently against one planner.
pub struct TripPlanner<P, G> {
    /// Configuration.
    config: PlannerConfig,

    /// Knowledge retrieval (embedding cache + store + index).
    retriever: Retriever<P>,

    /// Plan generation boundary.
    generator: G,
}

impl<P: EmbeddingProvider, G: PlanGenerator> TripPlanner<P, G> {
    /// Create a planner from a config, embedding provider, and generator.
    pub fn new(config: PlannerConfig, provider: P, generator: G) -> Self {
        info!(
            "Initializing trip planner (dimension {}, top-k {})",
            config.embedding.dimension, config.retrieval.top_k
        );

        let cache = EmbeddingCache::new(config.embedding.cache_max_entries);
        let retriever = Retriever::new(provider, cache, config.embedding.dimension)
            .with_model(config.embedding.model.clone());

        Self {
            config,
            retriever,
            generator,
        }
    }

    /// Ingest a knowledge file: validate, embed, and index every record.
    pub async fn load_knowledge(&self, file: KnowledgeFile) -> Result<usize> {
        let records = file.into_records()?;
        self.load_records(records).await
    }

    /// Ingest pre-built records.
    pub async fn load_records(&self, records: Vec<KnowledgeRecord>) -> Result<usize> {
        Ok(self.retriever.load(records).await?)
    }

    /// Plan a trip: validate, retrieve, generate, parse.
    ///
    /// Generation failures propagate without retry; callers wanting
    /// retry wrap this with their own backoff policy.
    pub async fn plan_trip(&self, request: TripRequest) -> Result<TripPlan> {
        request.validate()?;

        let query = request.retrieval_query();
        debug!("Planning trip, retrieval query: {query}");

        let retrieved = self
            .retriever
            .retrieve(&query, self.config.retrieval.top_k)
            .await?;
        debug!("Retrieved {} records for prompt", retrieved.len());

        let knowledge_summary = prompt::summarize_records(&retrieved);
        let generation = GenerationRequest::new(
            prompt::system_prompt(&request),
            prompt::user_prompt(&request, &knowledge_summary),
        )
        .with_model(self.config.generation.model.clone())
        .with_max_tokens(self.config.generation.max_tokens)
        .with_timeout_secs(self.config.generation.timeout_secs);

        let itinerary = self.generator.generate(generation).await?;

        Ok(TripPlan::from_generated(itinerary, request.budget))
    }

    /// The underlying retriever.
    pub fn retriever(&self) -> &Retriever<P> {
        &self.retriever
    }

    /// Planner statistics.
    pub async fn stats(&self) -> PlannerStats {
        let cache_stats = self.retriever.embedder().cache().stats().await;
        let records_loaded = self.retriever.store().read().await.len();

        PlannerStats {
            records_loaded,
            cache_entries: cache_stats.entries,
            cache_max_entries: cache_stats.max_entries,
        }
    }
}

/// Statistics about the planner's shared state.
#[derive(Debug, Clone)]
pub struct PlannerStats {
    /// Number of knowledge records loaded.
    pub records_loaded: usize,

    /// Number of cached embeddings.
    pub cache_entries: usize,

    /// Embedding cache bound.
    pub cache_max_entries: usize,
}
