//! # Knowledge
//!
//! This crate holds the typed travel knowledge base for tripcraft:
//!
//! - **Records**: category-tagged knowledge entries (attractions,
//!   restaurants, transport, lodging), validated at ingestion time
//! - **Store**: the loaded record set plus its positionally aligned
//!   similarity index
//! - **Retriever**: embeds a query through the shared cache, searches the
//!   index, and maps results back to records

pub mod error;
pub mod record;
pub mod retriever;
pub mod store;

pub use error::{KnowledgeError, Result};
pub use record::{Category, KnowledgeFile, KnowledgeRecord, RecordCore};
pub use retriever::{DEFAULT_TOP_K, RetrievedRecord, Retriever};
pub use store::KnowledgeStore;
