//! # Knowledge
//!
//! Topical knowledge passages searched by embedding similarity.
//!
//! - [`KnowledgeIndex`]: nearest-neighbour search over passage embeddings.
//! - [`InMemoryKnowledgeIndex`]: cosine-similarity index held in memory.
//! - [`load_jsonl`]: builds an in-memory index from a JSON-lines file, embedding every
//!   passage through an [`embedding::EmbeddingService`].

mod index;
mod loader;
mod types;

pub use index::{cosine_similarity, InMemoryKnowledgeIndex, KnowledgeIndex};
pub use loader::{load_jsonl, parse_jsonl, DEFAULT_LOAD_BATCH_SIZE};
pub use types::{KnowledgeDocument, KnowledgeFilter, KnowledgePassage};
