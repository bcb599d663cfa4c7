//! Core data models for balas.
//!
//! These types are shared across all balas crates and represent the
//! core domain entities: parsed messages, transcripts, and match outcomes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// =============================================================================
// MESSAGE TYPES
// =============================================================================

/// Media classification of an export line that carried an attachment
/// sentinel instead of (or alongside) text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Image attachment
    Image,
    /// Document attachment
    Document,
    /// Audio attachment
    Audio,
    /// Video attachment
    Video,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Document => write!(f, "document"),
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "document" => Ok(Self::Document),
            "audio" => Ok(Self::Audio),
            "video" => Ok(Self::Video),
            _ => Err(format!("Invalid media type: {}", s)),
        }
    }
}

/// One utterance reconstructed from a transcript export line.
///
/// Created once per successfully parsed line and immutable afterward.
/// Sequence position in the owning transcript is the ordering contract;
/// messages are never re-sorted by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Trimmed sender name as exported.
    pub sender: String,
    /// Trimmed message body. May be a media sentinel for attachment lines.
    pub text: String,
    /// Naive local timestamp reconstructed from the export line.
    /// No timezone guarantee; the export carries none.
    pub timestamp: NaiveDateTime,
    /// Media classification, present only for attachment lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
}

impl Message {
    /// True when the line carried a media sentinel. A media message
    /// always has a concrete `media_type`.
    pub fn is_media(&self) -> bool {
        self.media_type.is_some()
    }
}

/// A fully parsed transcript: ordered messages plus derived identity
/// and display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedTranscript {
    /// Messages in source document order.
    pub messages: Vec<Message>,
    /// First non-self sender, or the "Unknown Client" sentinel.
    pub client_name: String,
    /// Always the "Unknown" sentinel in this core; phone extraction
    /// belongs to an external collaborator.
    pub client_phone: String,
    /// Preview title derived from the first message.
    pub title: String,
}

impl ParsedTranscript {
    /// Number of parsed messages.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Number of media messages.
    pub fn media_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_media()).count()
    }
}

// =============================================================================
// EMBEDDING TYPES
// =============================================================================

/// Embedding vector type.
pub type Vector = Vec<f32>;

/// An embedding record pairing a historical message with its vector.
///
/// Owned exclusively by the embedding store; never mutated after insertion.
#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    /// Sender of the source message.
    pub sender: String,
    /// Text that was embedded.
    pub text: String,
    /// The embedding vector.
    pub vector: Vector,
}

// =============================================================================
// MATCH TYPES
// =============================================================================

/// How a retrieval query was resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Best-ranked stored message cleared the similarity threshold.
    Semantic,
    /// A keyword rule fired on the raw query text.
    Keyword,
    /// Neither tier produced an answer.
    #[default]
    None,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Semantic => write!(f, "semantic"),
            Self::Keyword => write!(f, "keyword"),
            Self::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for MatchType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "semantic" => Ok(Self::Semantic),
            "keyword" => Ok(Self::Keyword),
            "none" => Ok(Self::None),
            _ => Err(format!("Invalid match type: {}", s)),
        }
    }
}

/// Output of one retrieval query.
///
/// Invariants, enforced by the constructors: a `None` outcome carries no
/// text; a `Semantic` outcome carries the winning score; `score` is only
/// meaningful for `Semantic` outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Which tier resolved the query.
    pub match_type: MatchType,
    /// Matched stored text or canned response, absent for `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_text: Option<String>,
    /// Cosine similarity of the winning candidate, in [-1, 1].
    /// Zero and meaningless unless `match_type` is `Semantic`.
    pub score: f32,
    /// Sender of the matched stored message, for `Semantic` outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_sender: Option<String>,
}

impl MatchResult {
    /// A semantic match that cleared the threshold.
    pub fn semantic(text: impl Into<String>, score: f32, sender: impl Into<String>) -> Self {
        Self {
            match_type: MatchType::Semantic,
            best_text: Some(text.into()),
            score,
            source_sender: Some(sender.into()),
        }
    }

    /// A keyword-rule fallback hit with its canned response.
    pub fn keyword(response: impl Into<String>) -> Self {
        Self {
            match_type: MatchType::Keyword,
            best_text: Some(response.into()),
            score: 0.0,
            source_sender: None,
        }
    }

    /// No useful answer from either tier.
    pub fn none() -> Self {
        Self {
            match_type: MatchType::None,
            best_text: None,
            score: 0.0,
            source_sender: None,
        }
    }

    /// True when either tier produced an answer.
    pub fn is_match(&self) -> bool {
        self.match_type != MatchType::None
    }
}
