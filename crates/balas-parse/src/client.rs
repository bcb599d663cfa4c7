//! Client identity and display title derivation.

use balas_core::{defaults, Message};

/// Derive the client's name and phone from parsed messages.
///
/// The client is the first sender in encounter order whose identity is not
/// the exporting account's own `"You"`. A transcript with no such sender
/// (self-only or empty) gets the `"Unknown Client"` sentinel. Phone
/// extraction is out of scope here; an external collaborator may recover it
/// from filenames or contact metadata, so the phone is always the
/// `"Unknown"` sentinel.
pub fn extract_client_info(messages: &[Message]) -> (String, String) {
    let client_name = messages
        .iter()
        .map(|m| m.sender.as_str())
        .find(|sender| *sender != defaults::SELF_SENDER)
        .unwrap_or(defaults::UNKNOWN_CLIENT)
        .to_string();

    (client_name, defaults::UNKNOWN_PHONE.to_string())
}

/// Derive a display title from the first message.
///
/// An empty sequence gets the `"Empty Chat"` sentinel. Otherwise the first
/// message's text is cut to `TITLE_PREVIEW_CHARS` characters (counted as
/// chars, never splitting a code point) and the ellipsis marker is
/// appended only when truncation actually occurred.
pub fn transcript_title(messages: &[Message]) -> String {
    let first = match messages.first() {
        Some(msg) => &msg.text,
        None => return defaults::EMPTY_CHAT_TITLE.to_string(),
    };

    if first.chars().count() <= defaults::TITLE_PREVIEW_CHARS {
        return first.clone();
    }

    let preview: String = first.chars().take(defaults::TITLE_PREVIEW_CHARS).collect();
    format!("{}{}", preview, defaults::TITLE_ELLIPSIS)
}
