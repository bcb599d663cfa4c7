//! # balas-inference
//!
//! Inference backend implementations for balas.
//!
//! This crate provides:
//! - Ollama implementation of the core backend traits (default)
//! - Reply suggestion and conversation tagging over any generation backend
//! - Deterministic mock backend for offline testing (feature `mock`)
//!
//! # Feature Flags
//!
//! - `ollama` (default): Enable Ollama backend
//! - `mock`: Expose the mock backend to downstream test suites
//! - `integration`: Enable tests that require a live Ollama server
//!
//! # Example
//!
//! ```rust,no_run
//! use balas_inference::OllamaBackend;
//! use balas_core::EmbeddingBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OllamaBackend::from_env();
//!     let texts = vec!["Hello".to_string()];
//!     let embeddings = backend.embed_texts(&texts).await.unwrap();
//! }
//! ```

pub mod reply;

#[cfg(feature = "ollama")]
pub mod ollama;

// Mock inference backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use balas_core::*;

#[cfg(feature = "ollama")]
pub use ollama::OllamaBackend;

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockBackend, MockEmbeddingGenerator};

pub use reply::{ConversationTagger, ReplyComposer, REPLY_FALLBACK};
