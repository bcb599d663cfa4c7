//! Reply suggestion and conversation tagging over a generation backend.
//!
//! Both helpers are thin prompt assemblers: they own no model state and
//! degrade gracefully when the backend is unreachable, since a missing
//! suggestion should never take down an ingestion flow.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use balas_core::{defaults, GenerationBackend, Message, Result};

/// Default system prompt for reply suggestions.
const REPLY_SYSTEM_PROMPT: &str = r#"You are a helpful assistant for a packaging business in Malaysia.
Generate professional, conversational replies in Malaysian-English (Bahasa rojak) tone.
Focus on being helpful and building relationships. Avoid discussing specific prices - instead,
suggest scheduling a call or meeting to discuss requirements in detail.

Keep responses concise, friendly, and professional. Use appropriate Malaysian expressions when natural."#;

/// System prompt for conversation tagging.
const TAG_SYSTEM_PROMPT: &str = "You are a tagging assistant for a packaging business. \
Based on the conversation content, generate relevant tags. Focus on product types \
(paper bag, sampul raya, kampung, F&B, etc.), client industry, and conversation topics. \
Return only the tags as a comma-separated list.";

/// Fixed response returned when generation fails.
pub const REPLY_FALLBACK: &str = "Sorry, I could not generate a reply at this time.";

/// Composes reply suggestions from recent conversation history.
pub struct ReplyComposer {
    backend: Arc<dyn GenerationBackend>,
    system_prompt: String,
}

impl ReplyComposer {
    /// Create a composer with the default packaging-business system prompt.
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            system_prompt: REPLY_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replace the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Suggest a reply based on the tail of the conversation.
    ///
    /// Only the last [`defaults::REPLY_HISTORY_WINDOW`] messages are sent to
    /// the model; older history adds latency without improving the reply.
    #[instrument(skip(self, messages), fields(subsystem = "inference", component = "reply", op = "suggest", message_count = messages.len()))]
    pub async fn suggest(&self, messages: &[Message]) -> Result<String> {
        let window_start = messages
            .len()
            .saturating_sub(defaults::REPLY_HISTORY_WINDOW);
        let history = messages[window_start..]
            .iter()
            .map(|m| format!("{}: {}", m.sender, m.text))
            .collect::<Vec<_>>()
            .join("\n");

        debug!(
            window = messages.len() - window_start,
            history_len = history.len(),
            "Composing reply prompt"
        );

        let prompt = format!(
            "Based on this conversation history, generate an appropriate reply:\n\n{}",
            history
        );
        self.backend
            .generate_with_system(&self.system_prompt, &prompt)
            .await
    }

    /// Like [`suggest`](Self::suggest), but degrades to [`REPLY_FALLBACK`]
    /// instead of returning an error.
    pub async fn suggest_or_fallback(&self, messages: &[Message]) -> String {
        match self.suggest(messages).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Reply generation failed, using fallback");
                REPLY_FALLBACK.to_string()
            }
        }
    }
}

/// Derives comma-separated topic tags for a conversation.
pub struct ConversationTagger {
    backend: Arc<dyn GenerationBackend>,
}

impl ConversationTagger {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Tag the given conversation text.
    ///
    /// Returns an empty list on any generation failure; tagging is
    /// advisory and must never fail the caller.
    #[instrument(skip(self, text), fields(subsystem = "inference", component = "tagger", op = "tag", text_len = text.len()))]
    pub async fn tag(&self, text: &str) -> Vec<String> {
        let prompt = format!("Tag this conversation: {}", text);
        match self
            .backend
            .generate_with_system(TAG_SYSTEM_PROMPT, &prompt)
            .await
        {
            Ok(response) => {
                let tags: Vec<String> = response
                    .split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
                debug!(tag_count = tags.len(), "Conversation tagged");
                tags
            }
            Err(e) => {
                warn!(error = %e, "Tagging failed, returning no tags");
                Vec::new()
            }
        }
    }
}
