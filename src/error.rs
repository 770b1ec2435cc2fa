//! Error types for debate-forge operations.
//!
//! Defines the error taxonomy for the debate run:
//! - Topic validation (fatal, before any turn)
//! - LLM client and turn-generation capability failures (fatal, never retried)
//! - Configuration loading
//! - Record persistence
//!
//! Non-fatal conditions (coherence warnings, duplicate regenerations) are not
//! errors; they are folded into the debate event log.

use thiserror::Error;

use crate::debate::state::Actor;

/// Errors produced by the topic validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Topic cannot be empty")]
    EmptyTopic,

    #[error("Topic too short: {len} characters (minimum {min})")]
    TooShort { len: usize, min: usize },

    #[error("Topic too long: {len} characters (maximum {max})")]
    TooLong { len: usize, max: usize },
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API base URL: LITELLM_API_BASE environment variable not set")]
    MissingApiBase,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },
}

/// Failure of the external turn-generation capability.
///
/// Always fatal for the run and never retried.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("provider error: {0}")]
    Provider(#[from] LlmError),

    #[error("generation timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("provider returned an empty response")]
    EmptyResponse,

    #[error("generator exhausted: {0}")]
    Exhausted(String),
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Errors that can occur while writing the debate record.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Refusing to write record of an incomplete debate")]
    Incomplete,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fatal errors that abort a debate run.
///
/// Each variant names the component that failed; see [`DebateError::component`].
#[derive(Debug, Error)]
pub enum DebateError {
    #[error("topic_validator: {0}")]
    Validation(#[from] ValidationError),

    #[error("{}: turn generation failed in round {round}: {source}", .actor.node_name())]
    Capability {
        actor: Actor,
        round: usize,
        #[source]
        source: CapabilityError,
    },

    #[error("rounds_controller: turn order violated: {0}")]
    TurnOrder(String),

    #[error("judge: debate is not complete ({turns} turns recorded)")]
    NotComplete { turns: usize },

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("logger: {0}")]
    Sink(#[from] SinkError),
}

impl DebateError {
    /// Returns the name of the component that raised this error.
    pub fn component(&self) -> &'static str {
        match self {
            Self::Validation(_) => "topic_validator",
            Self::Capability { actor, .. } => actor.node_name(),
            Self::TurnOrder(_) => "rounds_controller",
            Self::NotComplete { .. } => "judge",
            Self::Config(_) => "config",
            Self::Sink(_) => "logger",
        }
    }
}

/// Result type alias for debate runs.
pub type DebateResult<T> = Result<T, DebateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_component() {
        let err = DebateError::from(ValidationError::EmptyTopic);
        assert_eq!(err.component(), "topic_validator");
        assert!(err.to_string().starts_with("topic_validator:"));

        let err = DebateError::Capability {
            actor: Actor::AgentB,
            round: 4,
            source: CapabilityError::Timeout { seconds: 30 },
        };
        assert_eq!(err.component(), "agent_b");
        assert!(err.to_string().contains("round 4"));
        assert!(err.to_string().contains("30 seconds"));
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::TooShort { len: 9, min: 10 };
        assert_eq!(
            err.to_string(),
            "Topic too short: 9 characters (minimum 10)"
        );
    }
}
