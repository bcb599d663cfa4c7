//! # balas-parse
//!
//! Tolerant parsing of plain-text chat transcript exports.
//!
//! An export document is a sequence of lines, one message per line, in the
//! pattern `[D/M/YYYY, H:MM:SS] Sender: Body`. This crate recognizes those
//! lines, reconstructs an ordered message sequence with media
//! classification, and derives client identity and a display title. Lines
//! that do not match never abort a parse; the parser is total over any
//! input string.

pub mod client;
pub mod line;
pub mod transcript;

// Re-export commonly used items at crate root
pub use client::{extract_client_info, transcript_title};
pub use line::{classify_media, parse_export_line, ExportLine, LineError};
pub use transcript::{ParserOptions, TranscriptParser};
