//! Single export line recognition.
//!
//! One transcript line either matches the bracketed-timestamp pattern
//! `[D/M/YYYY, H:MM:SS] Sender: Body` or it does not. Recognition is
//! lexical (regex) followed by calendar validation, because the pattern
//! alone accepts impossible dates like month 13 or day 32.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use balas_core::MediaType;

/// Export line pattern: `[D/M/YYYY, H:MM:SS] Sender: Body`.
///
/// Day, month, and hour are 1-2 digits; year is 4 digits; minutes and
/// seconds are exactly 2. The sender runs up to the first colon after the
/// bracket, so sender names themselves must not contain colons (a property
/// of the export format, not a choice made here).
static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(\d{1,2})/(\d{1,2})/(\d{4}),\s(\d{1,2}):(\d{2}):(\d{2})\]\s([^:]+):\s(.+)$")
        .expect("export line pattern is valid")
});

/// Fixed sentinel substrings the export writes for attachment lines.
/// Matching is case-sensitive on the literal substrings as exported.
const MEDIA_SENTINELS: [&str; 5] = [
    "<Media omitted>",
    "document omitted",
    "image omitted",
    "audio omitted",
    "video omitted",
];

/// Why a line was rejected. Both cases are non-fatal skips to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LineError {
    /// The line does not match the export pattern at all. The caller
    /// treats it as a continuation or noise line.
    #[error("not an export line")]
    Pattern,

    /// The pattern matched but a date or time component is out of
    /// calendar range (e.g. month 13, day 32).
    #[error("timestamp out of calendar range")]
    Calendar,
}

/// One recognized export line, before media classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportLine {
    /// Naive local timestamp; the export carries no timezone.
    pub timestamp: NaiveDateTime,
    /// Sender name, trimmed of surrounding whitespace.
    pub sender: String,
    /// Message body, trimmed but otherwise unnormalized.
    pub body: String,
}

/// Recognize one transcript line.
///
/// Returns the structured line on a match. `LineError::Pattern` marks a
/// line that is not a standalone message; `LineError::Calendar` marks a
/// lexically valid line whose timestamp components do not form a real
/// date or time.
pub fn parse_export_line(line: &str) -> Result<ExportLine, LineError> {
    let caps = LINE_PATTERN.captures(line).ok_or(LineError::Pattern)?;

    // Groups are all-digit by construction, so parse failure here would
    // mean the pattern itself changed.
    let day: u32 = caps[1].parse().map_err(|_| LineError::Pattern)?;
    let month: u32 = caps[2].parse().map_err(|_| LineError::Pattern)?;
    let year: i32 = caps[3].parse().map_err(|_| LineError::Pattern)?;
    let hour: u32 = caps[4].parse().map_err(|_| LineError::Pattern)?;
    let minute: u32 = caps[5].parse().map_err(|_| LineError::Pattern)?;
    let second: u32 = caps[6].parse().map_err(|_| LineError::Pattern)?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(LineError::Calendar)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or(LineError::Calendar)?;

    Ok(ExportLine {
        timestamp: NaiveDateTime::new(date, time),
        sender: caps[7].trim().to_string(),
        body: caps[8].trim().to_string(),
    })
}

/// Classify a message body's media subtype.
///
/// Returns `None` for plain text bodies. A body containing any media
/// sentinel is classified by substring containment in priority order
/// `image > document > audio > video`; the order is a deliberate
/// tie-break for the pathological case of multiple sentinels on one
/// line. A bare `<Media omitted>` sentinel names no subtype and takes
/// the head of the order, so a media message always carries a concrete
/// subtype.
pub fn classify_media(body: &str) -> Option<MediaType> {
    if !MEDIA_SENTINELS.iter().any(|s| body.contains(s)) {
        return None;
    }

    if body.contains("image") {
        Some(MediaType::Image)
    } else if body.contains("document") {
        Some(MediaType::Document)
    } else if body.contains("audio") {
        Some(MediaType::Audio)
    } else if body.contains("video") {
        Some(MediaType::Video)
    } else {
        Some(MediaType::Image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Pattern Recognition Tests
    // =========================================================================

    #[test]
    fn test_parse_basic_line() {
        let line = "[15/1/2024, 10:30:00] Ahmad Restaurant: What are the minimum order quantities?";
        let parsed = parse_export_line(line).unwrap();
        assert_eq!(parsed.sender, "Ahmad Restaurant");
        assert_eq!(parsed.body, "What are the minimum order quantities?");
        assert_eq!(
            parsed.timestamp,
            NaiveDateTime::new(
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            )
        );
    }

    #[test]
    fn test_parse_two_digit_components() {
        let line = "[05/12/2023, 09:05:59] You: Morning!";
        let parsed = parse_export_line(line).unwrap();
        assert_eq!(parsed.sender, "You");
        assert_eq!(
            parsed.timestamp.date(),
            NaiveDate::from_ymd_opt(2023, 12, 5).unwrap()
        );
    }

    #[test]
    fn test_parse_single_digit_hour() {
        let line = "[1/2/2024, 7:01:02] Siti: ok";
        let parsed = parse_export_line(line).unwrap();
        assert_eq!(
            parsed.timestamp.time(),
            NaiveTime::from_hms_opt(7, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_reject_plain_text() {
        assert_eq!(parse_export_line("just some text"), Err(LineError::Pattern));
    }

    #[test]
    fn test_reject_empty_line() {
        assert_eq!(parse_export_line(""), Err(LineError::Pattern));
    }

    #[test]
    fn test_reject_missing_brackets() {
        let line = "15/1/2024, 10:30:00 Ahmad: hello";
        assert_eq!(parse_export_line(line), Err(LineError::Pattern));
    }

    #[test]
    fn test_reject_two_digit_year() {
        let line = "[15/1/24, 10:30:00] Ahmad: hello";
        assert_eq!(parse_export_line(line), Err(LineError::Pattern));
    }

    #[test]
    fn test_reject_missing_seconds() {
        let line = "[15/1/2024, 10:30] Ahmad: hello";
        assert_eq!(parse_export_line(line), Err(LineError::Pattern));
    }

    #[test]
    fn test_reject_missing_body() {
        let line = "[15/1/2024, 10:30:00] Ahmad:";
        assert_eq!(parse_export_line(line), Err(LineError::Pattern));
    }

    #[test]
    fn test_sender_and_body_trimmed() {
        let line = "[15/1/2024, 10:30:00]  Ahmad Restaurant : hello there  ";
        let parsed = parse_export_line(line).unwrap();
        assert_eq!(parsed.sender, "Ahmad Restaurant");
        assert_eq!(parsed.body, "hello there");
    }

    #[test]
    fn test_windows_line_ending_tolerated() {
        // A CRLF document split on '\n' leaves a trailing '\r'.
        let line = "[15/1/2024, 10:30:00] Ahmad: hello\r";
        let parsed = parse_export_line(line).unwrap();
        assert_eq!(parsed.body, "hello");
    }

    // =========================================================================
    // Calendar Validation Tests
    // =========================================================================

    #[test]
    fn test_reject_month_thirteen() {
        let line = "[15/13/2024, 10:30:00] Ahmad: hello";
        assert_eq!(parse_export_line(line), Err(LineError::Calendar));
    }

    #[test]
    fn test_reject_day_thirty_two() {
        let line = "[32/1/2024, 10:30:00] Ahmad: hello";
        assert_eq!(parse_export_line(line), Err(LineError::Calendar));
    }

    #[test]
    fn test_reject_hour_twenty_five() {
        let line = "[15/1/2024, 25:30:00] Ahmad: hello";
        assert_eq!(parse_export_line(line), Err(LineError::Calendar));
    }

    #[test]
    fn test_reject_nonexistent_february_day() {
        let line = "[30/2/2024, 10:30:00] Ahmad: hello";
        assert_eq!(parse_export_line(line), Err(LineError::Calendar));
    }

    #[test]
    fn test_accept_leap_day() {
        let line = "[29/2/2024, 10:30:00] Ahmad: hello";
        assert!(parse_export_line(line).is_ok());
    }

    // =========================================================================
    // Media Classification Tests
    // =========================================================================

    #[test]
    fn test_classify_plain_text() {
        assert_eq!(classify_media("hello there"), None);
    }

    #[test]
    fn test_classify_bare_media_sentinel() {
        assert_eq!(classify_media("<Media omitted>"), Some(MediaType::Image));
    }

    #[test]
    fn test_classify_each_subtype_sentinel() {
        assert_eq!(classify_media("image omitted"), Some(MediaType::Image));
        assert_eq!(
            classify_media("document omitted"),
            Some(MediaType::Document)
        );
        assert_eq!(classify_media("audio omitted"), Some(MediaType::Audio));
        assert_eq!(classify_media("video omitted"), Some(MediaType::Video));
    }

    #[test]
    fn test_classify_priority_image_over_document() {
        let body = "image omitted document omitted";
        assert_eq!(classify_media(body), Some(MediaType::Image));
    }

    #[test]
    fn test_classify_priority_document_over_audio() {
        let body = "document omitted audio omitted";
        assert_eq!(classify_media(body), Some(MediaType::Document));
    }

    #[test]
    fn test_classify_case_sensitive_sentinels() {
        // The export writes sentinels verbatim; other casings are text.
        assert_eq!(classify_media("Image Omitted"), None);
        assert_eq!(classify_media("<media omitted>"), None);
    }

    #[test]
    fn test_classify_sentinel_with_surrounding_text() {
        let body = "see attachment video omitted thanks";
        assert_eq!(classify_media(body), Some(MediaType::Video));
    }
}
