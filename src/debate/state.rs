//! The debate record threaded through every step of a run.
//!
//! `DebateState` is owned by the orchestrator and handed to each component
//! by `&mut` for the duration of one step. Turns and log entries are
//! append-only; the scalar fields are updated in place.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Actors
// ============================================================================

/// One of the two fixed debate participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// Opens the debate and speaks in odd rounds.
    AgentA,
    /// Speaks in even rounds.
    AgentB,
}

impl Actor {
    /// Both actors, in speaking order.
    pub const BOTH: [Actor; 2] = [Actor::AgentA, Actor::AgentB];

    /// Returns the other participant.
    pub fn opponent(self) -> Self {
        match self {
            Self::AgentA => Self::AgentB,
            Self::AgentB => Self::AgentA,
        }
    }

    /// Node name used in the event log and error reports.
    pub fn node_name(self) -> &'static str {
        match self {
            Self::AgentA => "agent_a",
            Self::AgentB => "agent_b",
        }
    }

    /// Human-readable label used when no persona name is available.
    pub fn label(self) -> &'static str {
        match self {
            Self::AgentA => "Agent A",
            Self::AgentB => "Agent B",
        }
    }

    /// Stable index for per-actor arrays.
    pub fn index(self) -> usize {
        match self {
            Self::AgentA => 0,
            Self::AgentB => 1,
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Turn Records
// ============================================================================

/// One accepted argument in the transcript. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// 1-indexed round number; equals the turn's position in the transcript.
    pub round: usize,
    /// Who produced the turn.
    pub actor: Actor,
    /// The argument text.
    pub text: String,
    /// When the turn was produced.
    pub produced_at: DateTime<Utc>,
    /// Free-form metadata (agent id, attempt count, ...).
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,
}

impl TurnRecord {
    /// Creates a turn stamped with the current time and no metadata.
    pub fn new(round: usize, actor: Actor, text: impl Into<String>) -> Self {
        Self {
            round,
            actor,
            text: text.into(),
            produced_at: Utc::now(),
            meta: BTreeMap::new(),
        }
    }

    /// Adds a metadata field.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// Event Log
// ============================================================================

/// One audit entry appended by a state-affecting operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the operation happened.
    pub timestamp: DateTime<Utc>,
    /// The component that performed it.
    pub node: String,
    /// What it did (`topic_validated`, `turn_assigned`, ...).
    pub action: String,
    /// Operation-specific fields, flattened into the entry when serialized.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(node: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            node: node.into(),
            action: action.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a field to the entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns a field by name.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

// ============================================================================
// Debate State
// ============================================================================

/// The mutable record of one debate run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateState {
    /// Validated topic; never changed after validation.
    pub topic: String,
    /// Append-only transcript in round order.
    pub turns: Vec<TurnRecord>,
    /// Number of turns the controller has accepted.
    pub current_round: usize,
    /// Who speaks next; `None` once the debate is complete.
    pub current_actor: Option<Actor>,
    /// Terminal flag. Only ever goes from false to true.
    pub debate_complete: bool,
    /// Derived digest of the transcript, rebuilt after every turn.
    pub memory_summary: String,
    /// Declared winner, set once by the judge.
    pub winner: Option<Actor>,
    /// Judgment report, set together with `winner`.
    pub judgment: String,
    /// Append-only audit trail.
    pub event_log: Vec<LogEntry>,
    /// When the state was created.
    pub started_at: DateTime<Utc>,
}

impl DebateState {
    /// Creates the initial state for a validated topic.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            turns: Vec::new(),
            current_round: 0,
            current_actor: Some(Actor::AgentA),
            debate_complete: false,
            memory_summary: String::new(),
            winner: None,
            judgment: String::new(),
            event_log: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Appends an audit entry.
    pub fn log(&mut self, entry: LogEntry) {
        self.event_log.push(entry);
    }

    /// Returns the most recent turn, if any.
    pub fn latest_turn(&self) -> Option<&TurnRecord> {
        self.turns.last()
    }

    /// Iterates over the turns of one actor in chronological order.
    pub fn turns_by(&self, actor: Actor) -> impl Iterator<Item = &TurnRecord> {
        self.turns.iter().filter(move |t| t.actor == actor)
    }

    /// Returns true if any entry in the event log has the given action.
    pub fn has_logged(&self, action: &str) -> bool {
        self.event_log.iter().any(|e| e.action == action)
    }

    /// Marks the debate complete. Returns false if it already was.
    pub(crate) fn mark_complete(&mut self) -> bool {
        if self.debate_complete {
            return false;
        }
        self.debate_complete = true;
        self.current_actor = None;
        true
    }

    /// Checks the transcript's turn order without relying on the controller's
    /// bookkeeping: actors strictly alternate starting with agent A, and the
    /// k-th turn carries round k.
    pub fn turn_order_is_valid(&self) -> bool {
        self.turn_order_violation().is_none()
    }

    /// Describes the first turn-order violation in the transcript, if any.
    pub fn turn_order_violation(&self) -> Option<String> {
        let mut expected = Actor::AgentA;
        for (idx, turn) in self.turns.iter().enumerate() {
            if turn.actor != expected {
                return Some(format!(
                    "turn {} was taken by {} but {} was due",
                    idx + 1,
                    turn.actor,
                    expected
                ));
            }
            if turn.round != idx + 1 {
                return Some(format!("turn {} carries round number {}", idx + 1, turn.round));
            }
            expected = expected.opponent();
        }
        None
    }
}
