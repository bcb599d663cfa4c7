//! In-memory embedding corpus with similarity ranking.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use balas_core::{EmbeddingBackend, EmbeddingRecord, Error, Message, Result};

use crate::similarity::cosine_similarity;

/// Append-only corpus of embedded historical messages.
///
/// Mutations are serialized through a single write lock; ranking takes a
/// read lock, so concurrent rank calls proceed in parallel but never
/// interleave with an insert. Records keep insertion order, which is the
/// tie-break order for equal similarity scores.
pub struct EmbeddingStore {
    backend: Arc<dyn EmbeddingBackend>,
    records: RwLock<Vec<EmbeddingRecord>>,
}

impl EmbeddingStore {
    /// Create an empty store over the given embedding backend.
    pub fn new(backend: Arc<dyn EmbeddingBackend>) -> Self {
        Self {
            backend,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Embed one text and append it to the corpus.
    #[instrument(skip(self, sender, text), fields(subsystem = "match", component = "store", op = "insert"))]
    pub async fn insert(&self, sender: impl Into<String>, text: impl Into<String>) -> Result<()> {
        let sender = sender.into();
        let text = text.into();

        let mut vectors = self.backend.embed_texts(&[text.clone()]).await?;
        let vector = match vectors.pop() {
            Some(vector) if vectors.is_empty() => vector,
            _ => {
                return Err(Error::Embedding(
                    "backend returned wrong vector count for single input".to_string(),
                ))
            }
        };

        let mut records = self.records.write().await;
        records.push(EmbeddingRecord {
            sender,
            text,
            vector,
        });
        debug!(corpus_size = records.len(), "Embedding inserted");
        Ok(())
    }

    /// Embed and index the text messages of a parsed transcript.
    ///
    /// Media messages and empty bodies are skipped; the remaining texts
    /// go to the backend as one batch. Returns the number of records
    /// appended.
    #[instrument(skip(self, messages), fields(subsystem = "match", component = "store", op = "index", message_count = messages.len()))]
    pub async fn insert_messages(&self, messages: &[Message]) -> Result<usize> {
        let indexable: Vec<&Message> = messages
            .iter()
            .filter(|m| !m.is_media() && !m.text.trim().is_empty())
            .collect();

        if indexable.is_empty() {
            debug!("No indexable messages in batch");
            return Ok(0);
        }

        let texts: Vec<String> = indexable.iter().map(|m| m.text.clone()).collect();
        let vectors = self.backend.embed_texts(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "backend returned {} vectors for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }

        let mut records = self.records.write().await;
        for (message, vector) in indexable.iter().zip(vectors) {
            records.push(EmbeddingRecord {
                sender: message.sender.clone(),
                text: message.text.clone(),
                vector,
            });
        }

        info!(
            indexed = texts.len(),
            skipped = messages.len() - texts.len(),
            corpus_size = records.len(),
            "Transcript indexed"
        );
        Ok(texts.len())
    }

    /// Rank the whole corpus against a query vector, best first.
    ///
    /// The sort is stable and descending, so records with equal scores
    /// come back in insertion order. An empty corpus yields an empty
    /// ranking, never an error.
    pub async fn rank(&self, query: &[f32]) -> Vec<(EmbeddingRecord, f32)> {
        let records = self.records.read().await;
        let mut ranked: Vec<(EmbeddingRecord, f32)> = records
            .iter()
            .map(|record| {
                let score = cosine_similarity(query, &record.vector);
                (record.clone(), score)
            })
            .collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        debug!(
            corpus_size = ranked.len(),
            top_score = ranked.first().map(|(_, s)| *s).unwrap_or(0.0),
            "Corpus ranked"
        );
        ranked
    }

    /// Number of records in the corpus.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the corpus holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Drop all records.
    pub async fn clear(&self) {
        let mut records = self.records.write().await;
        let dropped = records.len();
        records.clear();
        info!(dropped, "Embedding store cleared");
    }
}
