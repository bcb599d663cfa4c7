//! Two-tier match decision: semantic retrieval first, keyword fallback.
//!
//! Semantic retrieval generalizes across phrasing but is unreliable at
//! low confidence, so queries that fail the similarity threshold drop
//! to a deterministic substring-triggered canned answer. Keyword
//! matching needs no embeddings, which also makes it the degradation
//! path when the embedding backend is down.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use balas_core::{defaults, EmbeddingBackend, MatchResult};

use crate::keyword::KeywordRules;
use crate::store::EmbeddingStore;

/// Configuration for the match engine.
#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    /// Minimum cosine similarity for a semantic match, inclusive.
    /// Clamped to [-1.0, 1.0], the cosine range.
    pub threshold: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: defaults::MATCH_THRESHOLD,
        }
    }
}

impl MatchConfig {
    /// Set the similarity threshold, clamped to the cosine range.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(-1.0, 1.0);
        self
    }

    /// Load configuration from environment variables with fallback to
    /// defaults. An unparseable value is logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(val) = std::env::var("BALAS_MATCH_THRESHOLD") {
            match val.parse::<f32>() {
                Ok(threshold) => config.threshold = threshold.clamp(-1.0, 1.0),
                Err(_) => {
                    warn!(value = %val, "Invalid BALAS_MATCH_THRESHOLD, using default")
                }
            }
        }
        config
    }
}

/// Retrieval engine over an embedding store and a keyword rule set.
///
/// Holds no per-query state: given the same corpus, rules, threshold,
/// and query, the outcome is deterministic.
pub struct MatchEngine {
    backend: Arc<dyn EmbeddingBackend>,
    store: Arc<EmbeddingStore>,
    rules: KeywordRules,
    config: MatchConfig,
}

impl MatchEngine {
    /// Engine with the built-in rule set and default configuration.
    pub fn new(backend: Arc<dyn EmbeddingBackend>, store: Arc<EmbeddingStore>) -> Self {
        Self {
            backend,
            store,
            rules: KeywordRules::new(),
            config: MatchConfig::default(),
        }
    }

    /// Replace the keyword rule set.
    pub fn with_rules(mut self, rules: KeywordRules) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// The active similarity threshold.
    pub fn threshold(&self) -> f32 {
        self.config.threshold
    }

    /// Resolve a query against the corpus.
    ///
    /// Embeds the query, takes the best-ranked candidate, and accepts it
    /// when its score meets the threshold (inclusive). Anything else
    /// drops to the keyword tier: embedding failure, empty corpus, or a
    /// best score below threshold. Never errors; the worst outcome is a
    /// `none` result.
    #[instrument(skip(self, query), fields(subsystem = "match", component = "engine", op = "find_match", query_len = query.len()))]
    pub async fn find_match(&self, query: &str) -> MatchResult {
        let vector = match self.backend.embed_texts(&[query.to_string()]).await {
            Ok(mut vectors) => match vectors.pop() {
                Some(vector) => vector,
                None => {
                    warn!("Embedding backend returned no vector, using keyword fallback");
                    return self.keyword_fallback(query);
                }
            },
            Err(e) => {
                warn!(error = %e, "Embedding unavailable, using keyword fallback");
                return self.keyword_fallback(query);
            }
        };

        let ranked = self.store.rank(&vector).await;
        let (record, score) = match ranked.into_iter().next() {
            Some(best) => best,
            None => {
                debug!("Empty corpus, using keyword fallback");
                return self.keyword_fallback(query);
            }
        };

        if score >= self.config.threshold {
            debug!(
                score,
                threshold = self.config.threshold,
                "Semantic match accepted"
            );
            return MatchResult::semantic(record.text, score, record.sender);
        }

        debug!(
            score,
            threshold = self.config.threshold,
            "Best score below threshold, using keyword fallback"
        );
        self.keyword_fallback(query)
    }

    fn keyword_fallback(&self, query: &str) -> MatchResult {
        match self.rules.find_match(query) {
            Some(response) => MatchResult::keyword(response),
            None => MatchResult::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use balas_core::{Error, MatchType, Result, Vector};
    use std::collections::HashMap;

    struct KeyedBackend {
        vectors: HashMap<String, Vector>,
    }

    impl KeyedBackend {
        fn new(entries: &[(&str, &[f32])]) -> Self {
            Self {
                vectors: entries
                    .iter()
                    .map(|(text, v)| (text.to_string(), v.to_vec()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl EmbeddingBackend for KeyedBackend {
        async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>> {
            Ok(texts
                .iter()
                .map(|t| self.vectors.get(t).cloned().unwrap_or_else(|| vec![0.0; 3]))
                .collect())
        }

        fn dimension(&self) -> usize {
            3
        }

        fn model_name(&self) -> &str {
            "keyed"
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl EmbeddingBackend for FailingBackend {
        async fn embed_texts(&self, _texts: &[String]) -> Result<Vec<Vector>> {
            Err(Error::Embedding("model not loaded".to_string()))
        }

        fn dimension(&self) -> usize {
            3
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    async fn engine_with(
        entries: &[(&str, &[f32])],
        stored: &[(&str, &str)],
    ) -> (Arc<dyn EmbeddingBackend>, Arc<EmbeddingStore>) {
        let backend: Arc<dyn EmbeddingBackend> = Arc::new(KeyedBackend::new(entries));
        let store = Arc::new(EmbeddingStore::new(Arc::clone(&backend)));
        for (sender, text) in stored {
            store.insert(*sender, *text).await.unwrap();
        }
        (backend, store)
    }

    // =========================================================================
    // Configuration Tests
    // =========================================================================

    #[test]
    fn test_config_default_threshold() {
        let config = MatchConfig::default();
        assert!((config.threshold - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_with_threshold() {
        let config = MatchConfig::default().with_threshold(0.5);
        assert!((config.threshold - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_threshold_clamped_to_cosine_range() {
        assert_eq!(MatchConfig::default().with_threshold(3.0).threshold, 1.0);
        assert_eq!(MatchConfig::default().with_threshold(-3.0).threshold, -1.0);
    }

    // =========================================================================
    // Decision Procedure Tests
    // =========================================================================

    #[tokio::test]
    async fn test_semantic_match_above_threshold() {
        let (backend, store) = engine_with(
            &[
                ("what is the price?", &[1.0, 0.0, 0.0]),
                ("how much does it cost?", &[0.95, 0.05, 0.0]),
            ],
            &[("Client", "how much does it cost?")],
        )
        .await;
        let engine = MatchEngine::new(backend, store);

        let result = engine.find_match("what is the price?").await;
        assert_eq!(result.match_type, MatchType::Semantic);
        assert_eq!(result.best_text.as_deref(), Some("how much does it cost?"));
        assert_eq!(result.source_sender.as_deref(), Some("Client"));
        assert!(result.score >= 0.7);
    }

    #[tokio::test]
    async fn test_threshold_boundary_is_inclusive() {
        // Identical vectors score exactly 1.0; a threshold of 1.0 must
        // still accept them.
        let (backend, store) = engine_with(
            &[("hello", &[1.0, 0.0, 0.0])],
            &[("Client", "hello")],
        )
        .await;
        let engine = MatchEngine::new(backend, store)
            .with_config(MatchConfig::default().with_threshold(1.0));

        let result = engine.find_match("hello").await;
        assert_eq!(result.match_type, MatchType::Semantic);
        assert!((result.score - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_below_threshold_falls_to_keyword() {
        let (backend, store) = engine_with(
            &[
                ("what's your moq", &[1.0, 0.0, 0.0]),
                ("nice weather today", &[0.0, 1.0, 0.0]),
            ],
            &[("Client", "nice weather today")],
        )
        .await;
        let engine = MatchEngine::new(backend, store);

        let result = engine.find_match("what's your moq").await;
        assert_eq!(result.match_type, MatchType::Keyword);
        assert_eq!(
            result.best_text.as_deref(),
            Some("Our minimum order quantity (MOQ) is 500pcs.")
        );
    }

    #[tokio::test]
    async fn test_below_threshold_without_rule_is_none() {
        let (backend, store) = engine_with(
            &[
                ("completely unrelated", &[1.0, 0.0, 0.0]),
                ("nice weather today", &[0.0, 1.0, 0.0]),
            ],
            &[("Client", "nice weather today")],
        )
        .await;
        let engine = MatchEngine::new(backend, store);

        let result = engine.find_match("completely unrelated").await;
        assert_eq!(result.match_type, MatchType::None);
        assert!(result.best_text.is_none());
    }

    #[tokio::test]
    async fn test_empty_corpus_falls_to_keyword() {
        let (backend, store) = engine_with(&[("what's your moq", &[1.0, 0.0, 0.0])], &[]).await;
        let engine = MatchEngine::new(backend, store);

        let result = engine.find_match("what's your moq").await;
        assert_eq!(result.match_type, MatchType::Keyword);
    }

    #[tokio::test]
    async fn test_embedding_failure_still_tries_keyword() {
        let backend: Arc<dyn EmbeddingBackend> = Arc::new(FailingBackend);
        let keyed: Arc<dyn EmbeddingBackend> =
            Arc::new(KeyedBackend::new(&[("hello", &[1.0, 0.0, 0.0])]));
        let store = Arc::new(EmbeddingStore::new(keyed));
        store.insert("Client", "hello").await.unwrap();
        let engine = MatchEngine::new(backend, store);

        let result = engine.find_match("lead time please").await;
        assert_eq!(result.match_type, MatchType::Keyword);
        assert_eq!(
            result.best_text.as_deref(),
            Some("Our lead time is typically 7-10 business days after design approval.")
        );
    }

    #[tokio::test]
    async fn test_embedding_failure_without_rule_is_none() {
        let backend: Arc<dyn EmbeddingBackend> = Arc::new(FailingBackend);
        let keyed: Arc<dyn EmbeddingBackend> = Arc::new(KeyedBackend::new(&[]));
        let store = Arc::new(EmbeddingStore::new(keyed));
        let engine = MatchEngine::new(backend, store);

        let result = engine.find_match("hello there").await;
        assert_eq!(result.match_type, MatchType::None);
    }

    #[tokio::test]
    async fn test_tie_break_first_inserted_wins() {
        let (backend, store) = engine_with(
            &[("greeting", &[1.0, 0.0, 0.0])],
            &[("first", "greeting"), ("second", "greeting")],
        )
        .await;
        let engine = MatchEngine::new(backend, store);

        let result = engine.find_match("greeting").await;
        assert_eq!(result.match_type, MatchType::Semantic);
        assert_eq!(result.source_sender.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_custom_rules_replace_defaults() {
        let (backend, store) = engine_with(&[], &[]).await;
        let engine = MatchEngine::new(backend, store).with_rules(KeywordRules::empty());

        let result = engine.find_match("what's your moq").await;
        assert_eq!(result.match_type, MatchType::None);
    }
}
