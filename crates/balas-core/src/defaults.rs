//! Centralized default constants for the balas system.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates reference these constants instead of defining their
//! own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// PARSING
// =============================================================================

/// Sender name the messaging app assigns to the exporting account itself.
pub const SELF_SENDER: &str = "You";

/// Sentinel client name when no non-self sender exists in a transcript.
pub const UNKNOWN_CLIENT: &str = "Unknown Client";

/// Sentinel client phone; phone extraction is an external concern.
pub const UNKNOWN_PHONE: &str = "Unknown";

/// Title for a transcript with no parseable messages.
pub const EMPTY_CHAT_TITLE: &str = "Empty Chat";

/// Maximum characters of the first message used as a transcript title.
pub const TITLE_PREVIEW_CHARS: usize = 50;

/// Marker appended to a title only when truncation actually occurred.
pub const TITLE_ELLIPSIS: &str = "...";

// =============================================================================
// EMBEDDING
// =============================================================================

/// Default embedding model name (Ollama).
pub const EMBED_MODEL: &str = "nomic-embed-text";

/// Default embedding vector dimension for nomic-embed-text.
pub const EMBED_DIMENSION: usize = 768;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Ollama base URL.
pub const OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default generation model name (Ollama).
pub const GEN_MODEL: &str = "gpt-oss:20b";

/// Timeout for embedding requests in seconds.
pub const EMBED_TIMEOUT_SECS: u64 = 30;

/// Timeout for generation requests in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// MATCHING
// =============================================================================

/// Minimum cosine similarity for accepting a semantic match instead of
/// falling back to keyword rules. The boundary is inclusive: a candidate
/// scoring exactly this value is accepted as semantic.
pub const MATCH_THRESHOLD: f32 = 0.7;

// =============================================================================
// REPLY
// =============================================================================

/// Maximum number of trailing conversation messages included in a reply
/// suggestion prompt.
pub const REPLY_HISTORY_WINDOW: usize = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_threshold_within_cosine_range() {
        // Runtime check needed for floating point comparison
        assert!((-1.0..=1.0).contains(&MATCH_THRESHOLD));
    }

    #[test]
    fn title_preview_is_nonzero() {
        const {
            assert!(TITLE_PREVIEW_CHARS > 0);
        }
    }

    #[test]
    fn reply_window_is_nonzero() {
        const {
            assert!(REPLY_HISTORY_WINDOW > 0);
        }
    }

    #[test]
    fn embed_dimension_is_standard() {
        let valid_dims = [384, 512, 768, 1536];
        assert!(
            valid_dims.contains(&EMBED_DIMENSION),
            "EMBED_DIMENSION {} should be a standard embedding dimension",
            EMBED_DIMENSION
        );
    }

    #[test]
    fn sentinels_are_distinct() {
        assert_ne!(SELF_SENDER, UNKNOWN_CLIENT);
        assert_ne!(UNKNOWN_CLIENT, UNKNOWN_PHONE);
    }
}
