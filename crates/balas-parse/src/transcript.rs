//! Whole-document transcript parsing.
//!
//! Drives line recognition over an export document and reconstructs the
//! ordered message sequence. The parse is total: no input line can fail
//! it, and the worst outcome for a line is being skipped (or, in
//! continuation mode, appended to the previous message).

use tracing::{debug, info, instrument};

use balas_core::{Message, ParsedTranscript};

use crate::client::{extract_client_info, transcript_title};
use crate::line::{classify_media, parse_export_line};

/// Options controlling how non-matching lines are treated.
///
/// Read from environment variables on construction via `from_env` (no
/// restart semantics; each parser owns its options).
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// When true, a non-matching, non-empty line is appended to the
    /// previous message's text (newline-separated) instead of being
    /// dropped. Off by default, preserving the historical export
    /// behavior of discarding wrapped continuation lines.
    pub append_continuations: bool,
}

impl ParserOptions {
    /// Load options from environment variables with fallback to defaults.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(val) = std::env::var("BALAS_PARSE_CONTINUATIONS") {
            options.append_continuations = val == "true" || val == "1";
        }
        options
    }

    /// Enable or disable continuation appending.
    pub fn with_continuations(mut self, append: bool) -> Self {
        self.append_continuations = append;
        self
    }
}

/// Tolerant parser over a full export document.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptParser {
    options: ParserOptions,
}

impl TranscriptParser {
    /// Parser with default options (continuation lines dropped).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser with explicit options.
    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parse a full export document into an ordered transcript.
    ///
    /// Messages appear in the output in the same relative order as their
    /// originating lines; the source is assumed already chronological and
    /// is never re-sorted. Empty input yields an empty transcript with
    /// the sentinel title and client fields.
    #[instrument(skip(self, document), fields(subsystem = "parse", component = "transcript", op = "parse", doc_len = document.len()))]
    pub fn parse(&self, document: &str) -> ParsedTranscript {
        let mut messages: Vec<Message> = Vec::new();
        let mut skipped = 0usize;
        let mut continuations = 0usize;

        for line in document.lines() {
            match parse_export_line(line) {
                Ok(parsed) => {
                    let media_type = classify_media(&parsed.body);
                    messages.push(Message {
                        sender: parsed.sender,
                        text: parsed.body,
                        timestamp: parsed.timestamp,
                        media_type,
                    });
                }
                Err(reason) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if self.options.append_continuations {
                        if let Some(last) = messages.last_mut() {
                            last.text.push('\n');
                            last.text.push_str(trimmed);
                            continuations += 1;
                            continue;
                        }
                    }
                    debug!(reason = %reason, "Skipping non-message line");
                    skipped += 1;
                }
            }
        }

        let (client_name, client_phone) = extract_client_info(&messages);
        let title = transcript_title(&messages);

        info!(
            message_count = messages.len(),
            skipped,
            continuations,
            client = %client_name,
            "Transcript parsed"
        );

        ParsedTranscript {
            messages,
            client_name,
            client_phone,
            title,
        }
    }
}
