//! Topic validation.
//!
//! Sanitizes the raw topic before the debate loop starts and enforces the
//! length bounds. Failure here aborts the run before any turn is produced.

use std::sync::OnceLock;

use regex::Regex;

use super::state::LogEntry;
use super::text::char_len;
use crate::error::ValidationError;

/// Minimum topic length in characters, after sanitization.
pub const MIN_TOPIC_LENGTH: usize = 10;

/// Maximum topic length in characters, after sanitization.
pub const MAX_TOPIC_LENGTH: usize = 500;

/// Node name recorded in the event log.
pub const NODE_NAME: &str = "topic_validator";

/// C0 and C1 control characters plus DEL.
fn control_chars() -> &'static Regex {
    static CONTROL_CHARS: OnceLock<Regex> = OnceLock::new();
    CONTROL_CHARS.get_or_init(|| {
        Regex::new(r"[\x00-\x1f\x7f-\x9f]").expect("Invalid regex for control chars")
    })
}

/// A topic that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTopic {
    text: String,
    raw_length: usize,
}

impl ValidatedTopic {
    /// The sanitized topic text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Character length of the input before sanitization.
    pub fn raw_length(&self) -> usize {
        self.raw_length
    }

    /// Character length of the sanitized topic.
    pub fn sanitized_length(&self) -> usize {
        char_len(&self.text)
    }

    /// Consumes the wrapper, returning the topic text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// The audit entry recording this validation.
    pub fn log_entry(&self) -> LogEntry {
        LogEntry::new(NODE_NAME, "topic_validated")
            .with("topic", self.text.clone())
            .with("original_length", self.raw_length)
            .with("sanitized_length", self.sanitized_length())
    }
}

impl std::fmt::Display for ValidatedTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Strips control characters and normalizes whitespace.
///
/// Control characters are removed outright (not replaced by a space), then
/// every whitespace run collapses to a single space and the ends are trimmed.
pub fn sanitize_topic(raw: &str) -> String {
    let stripped = control_chars().replace_all(raw, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sanitizes and validates a raw topic.
///
/// # Errors
///
/// Returns `ValidationError::EmptyTopic` for empty or whitespace-only input,
/// `TooShort` / `TooLong` when the sanitized length is outside
/// `[MIN_TOPIC_LENGTH, MAX_TOPIC_LENGTH]`.
pub fn validate_topic(raw: &str) -> Result<ValidatedTopic, ValidationError> {
    let text = sanitize_topic(raw);
    let len = char_len(&text);

    if text.is_empty() {
        return Err(ValidationError::EmptyTopic);
    }
    if len < MIN_TOPIC_LENGTH {
        return Err(ValidationError::TooShort {
            len,
            min: MIN_TOPIC_LENGTH,
        });
    }
    if len > MAX_TOPIC_LENGTH {
        return Err(ValidationError::TooLong {
            len,
            max: MAX_TOPIC_LENGTH,
        });
    }

    let topic = ValidatedTopic {
        text,
        raw_length: char_len(raw),
    };

    tracing::info!(
        original_length = topic.raw_length,
        sanitized_length = topic.sanitized_length(),
        "Topic validated"
    );

    Ok(topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_topic_unchanged() {
        let topic = validate_topic("Should AI be regulated?").expect("valid");
        assert_eq!(topic.as_str(), "Should AI be regulated?");
    }

    #[test]
    fn test_whitespace_normalized() {
        let topic = validate_topic("  Should   AI \t be\n regulated?  ").expect("valid");
        assert_eq!(topic.as_str(), "Should AI be regulated?");
        assert_eq!(topic.raw_length(), 32);
        assert_eq!(topic.sanitized_length(), 23);
    }

    #[test]
    fn test_control_characters_removed() {
        let topic = validate_topic("Should\u{0007} AI\u{0085} be regulated?").expect("valid");
        assert_eq!(topic.as_str(), "Should AI be regulated?");
    }

    #[test]
    fn test_empty_and_blank_topics_rejected() {
        assert_eq!(validate_topic(""), Err(ValidationError::EmptyTopic));
        assert_eq!(validate_topic("   \t\n "), Err(ValidationError::EmptyTopic));
        assert_eq!(
            validate_topic("\u{0001}\u{0002}"),
            Err(ValidationError::EmptyTopic)
        );
    }

    #[test]
    fn test_length_boundaries() {
        assert!(validate_topic(&"a".repeat(10)).is_ok());
        assert_eq!(
            validate_topic(&"a".repeat(9)),
            Err(ValidationError::TooShort { len: 9, min: 10 })
        );
        assert!(validate_topic(&"a".repeat(500)).is_ok());
        assert_eq!(
            validate_topic(&"a".repeat(501)),
            Err(ValidationError::TooLong { len: 501, max: 500 })
        );
    }

    #[test]
    fn test_length_counted_after_sanitization() {
        // 9 visible characters padded with whitespace is still too short.
        assert!(matches!(
            validate_topic("   abcdefghi     "),
            Err(ValidationError::TooShort { len: 9, .. })
        ));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert!(validate_topic(&"é".repeat(10)).is_ok());
        assert!(validate_topic(&"é".repeat(500)).is_ok());
    }

    #[test]
    fn test_log_entry_records_lengths() {
        let topic = validate_topic("  Should AI be regulated?").expect("valid");
        let entry = topic.log_entry();
        assert_eq!(entry.action, "topic_validated");
        assert_eq!(entry.field("original_length"), Some(&serde_json::json!(25)));
        assert_eq!(
            entry.field("sanitized_length"),
            Some(&serde_json::json!(23))
        );
    }
}
