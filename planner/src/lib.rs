//! # Planner
//!
//! Retrieval-augmented trip planning: the crate ties together the
//! knowledge retriever and an LLM plan generator.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Trip Planner                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  TripRequest ──► Retriever ──► Prompt Assembly ──► Generator   │
//! │       │              │               │                 │        │
//! │       ▼              ▼               ▼                 ▼        │
//! │   validation    cache + index   system + user      TripPlan    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tripcraft_planner::{PlannerConfig, TripPlanner, TripRequest};
//!
//! let planner = TripPlanner::new(PlannerConfig::default(), provider, generator);
//! planner.load_knowledge(knowledge_file).await?;
//!
//! let plan = planner.plan_trip(request).await?;
//! println!("{}", plan.itinerary);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod plan;
pub mod prompt;

pub use config::{EmbeddingConfig, GenerationConfig, PlannerConfig, RetrievalConfig};
pub use engine::TripPlanner;
pub use error::{PlannerError, Result};
pub use generator::{GenerationRequest, GeneratorError, OpenAIGenerator, PlanGenerator};
pub use plan::{CostSummary, ItinerarySection, TripPlan, TripRequest};

// Re-export from dependencies for convenience
pub use tripcraft_embeddings::{EmbeddingCache, EmbeddingProvider, OpenAIProvider};
pub use tripcraft_knowledge::{KnowledgeFile, KnowledgeRecord, Retriever};
