//! The debate engine.
//!
//! Two personas alternate turns under a fixed round limit. A round
//! controller enforces turn order and soft-checks coherence, a memory
//! compressor keeps the context bounded, and a judge scores the finished
//! transcript.
//!
//! ```ignore
//! use debate_forge::debate::{DebateOrchestrator, DebateSettings, TemplateTurnGenerator};
//!
//! let settings = DebateSettings::new().with_seed(42);
//! let mut orchestrator = DebateOrchestrator::new(settings, TemplateTurnGenerator::new(42));
//! let outcome = orchestrator.run("Should AI be regulated?").await?;
//! println!("{}", outcome.state.judgment);
//! ```

pub mod agent;
pub mod context;
pub mod controller;
pub mod generator;
pub mod graph;
pub mod judge;
pub mod memory;
pub mod orchestrator;
pub mod persona;
pub mod seed;
pub mod sink;
pub mod state;
pub mod text;
pub mod topic;

pub use agent::{duplicate_annotation, is_duplicate, DebateAgent};
pub use context::build_context;
pub use controller::{check_coherence, CoherenceIssue, ControllerPhase, RoundController};
pub use generator::{
    LlmGeneratorConfig, LlmTurnGenerator, ScriptedTurnGenerator, TemplateTurnGenerator,
    TurnGenerator, TurnRequest,
};
pub use graph::workflow_dot;
pub use judge::{Judge, Scores, Verdict};
pub use memory::{compress, MemoryCompressor};
pub use orchestrator::{DebateOrchestrator, DebateOutcome, DebateSettings, Route};
pub use persona::{Persona, Personas};
pub use seed::resolve_seed;
pub use sink::{DebateLogWriter, DebateRecord};
pub use state::{Actor, DebateState, LogEntry, TurnRecord};
pub use topic::{sanitize_topic, validate_topic, ValidatedTopic};
