//! debate-forge: fixed-round, turn-alternating two-agent debates.
//!
//! Two personas exchange arguments under a round limit. A round controller
//! enforces turn order and soft-checks coherence, a memory compressor keeps
//! each turn's context bounded, and a judge scores the transcript to
//! declare a winner. The finished debate is emitted as a JSON record.

pub mod cli;
pub mod config;
pub mod debate;
pub mod error;
pub mod llm;

// Re-export commonly used types
pub use config::{load_config, DebateConfig};
pub use debate::{DebateOrchestrator, DebateOutcome, DebateSettings, DebateState};
pub use error::{
    CapabilityError, ConfigError, DebateError, DebateResult, LlmError, SinkError,
    ValidationError,
};
