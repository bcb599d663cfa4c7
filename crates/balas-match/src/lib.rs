//! # balas-match
//!
//! Retrieval and matching engine for balas.
//!
//! This crate provides:
//! - Cosine similarity over embedding vectors
//! - An append-only, concurrently readable embedding store
//! - Deterministic keyword-triggered canned responses
//! - The two-tier match engine (semantic first, keyword fallback)
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use balas_match::{EmbeddingStore, MatchEngine};
//!
//! let backend = Arc::new(OllamaBackend::from_env());
//! let store = Arc::new(EmbeddingStore::new(backend.clone()));
//! store.insert_messages(&transcript.messages).await?;
//!
//! let engine = MatchEngine::new(backend, store);
//! let result = engine.find_match("what's your moq").await;
//! ```

pub mod engine;
pub mod keyword;
pub mod similarity;
pub mod store;

// Re-export core types
pub use balas_core::*;

// Re-export matching types
pub use engine::{MatchConfig, MatchEngine};
pub use keyword::{KeywordRule, KeywordRules};
pub use similarity::cosine_similarity;
pub use store::EmbeddingStore;
