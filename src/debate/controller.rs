//! Round controller: the debate state machine.
//!
//! The controller is visited once before the first turn and again after
//! every appended turn. On each visit it soft-checks the newest turn, syncs
//! `current_round` with the transcript, and either assigns the next speaker
//! or completes the debate.
//!
//! ```text
//!   AwaitingTurn(AgentA) --turn--> Evaluating --+--> AwaitingTurn(AgentB) --turn--> ...
//!                                               |
//!                                               +--> Complete   (current_round >= max_rounds)
//! ```
//!
//! Coherence problems are advisory: they are written to the event log and
//! never block progression.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::{Actor, DebateState, LogEntry, TurnRecord};
use super::text::{char_len, word_set};
use crate::error::{DebateError, DebateResult};

/// Node name recorded in the event log.
pub const NODE_NAME: &str = "rounds_controller";

/// Default number of turns in a debate.
pub const DEFAULT_MAX_ROUNDS: usize = 8;

/// Minimum length of a coherent turn, in characters.
pub const MIN_TURN_LENGTH: usize = 20;

/// Maximum length of a coherent turn, in characters.
pub const MAX_TURN_LENGTH: usize = 1000;

/// Phrases marking an affirmative stance.
const POSITIVE_MARKERS: &[&str] = &["should", "must", "essential", "necessary", "important"];

/// Phrases marking a negative stance.
const NEGATIVE_MARKERS: &[&str] = &[
    "should not",
    "must not",
    "shouldn't",
    "mustn't",
    "unnecessary",
];

// ============================================================================
// Phases
// ============================================================================

/// Phase of the round controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "actor")]
pub enum ControllerPhase {
    /// Waiting for the given actor to produce a turn.
    AwaitingTurn(Actor),
    /// Checking the latest turn.
    Evaluating,
    /// Round limit reached; no more turns are accepted.
    Complete,
}

impl ControllerPhase {
    /// Whether this is the terminal phase.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for ControllerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingTurn(actor) => write!(f, "AwaitingTurn({})", actor),
            Self::Evaluating => write!(f, "Evaluating"),
            Self::Complete => write!(f, "Complete"),
        }
    }
}

// ============================================================================
// Coherence
// ============================================================================

/// A non-fatal problem found in a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoherenceIssue {
    /// Turn is shorter than [`MIN_TURN_LENGTH`].
    TooShort { len: usize },
    /// Turn is longer than [`MAX_TURN_LENGTH`].
    TooLong { len: usize },
    /// Turn shares no word with the topic.
    OffTopic,
    /// Actor switched from an affirmative to a negative stance.
    PossibleContradiction,
}

impl CoherenceIssue {
    /// Whether the issue rejects the turn (as opposed to a review note).
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::PossibleContradiction)
    }
}

impl fmt::Display for CoherenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len } => write!(
                f,
                "Argument too short ({} < {} characters)",
                len, MIN_TURN_LENGTH
            ),
            Self::TooLong { len } => write!(
                f,
                "Argument too long ({} > {} characters)",
                len, MAX_TURN_LENGTH
            ),
            Self::OffTopic => write!(f, "Argument doesn't reference debate topic"),
            Self::PossibleContradiction => {
                write!(f, "Possible contradiction detected (logged for review)")
            }
        }
    }
}

/// Soft-checks the latest turn against the topic and the actor's earlier turns.
///
/// Length and topic checks short-circuit: a turn failing one of them is not
/// also checked for contradictions.
pub fn check_coherence(topic: &str, turns: &[TurnRecord]) -> Option<CoherenceIssue> {
    let latest = turns.last()?;

    let len = char_len(&latest.text);
    if len < MIN_TURN_LENGTH {
        return Some(CoherenceIssue::TooShort { len });
    }
    if len > MAX_TURN_LENGTH {
        return Some(CoherenceIssue::TooLong { len });
    }

    let topic_words = word_set(topic);
    let turn_words = word_set(&latest.text);
    if topic_words.is_disjoint(&turn_words) {
        return Some(CoherenceIssue::OffTopic);
    }

    let earlier: Vec<String> = turns[..turns.len() - 1]
        .iter()
        .filter(|t| t.actor == latest.actor)
        .map(|t| t.text.to_lowercase())
        .collect();
    if !earlier.is_empty() {
        let earlier = earlier.join(" ");
        let latest_text = latest.text.to_lowercase();
        let was_positive = POSITIVE_MARKERS.iter().any(|m| earlier.contains(m));
        let now_negative = NEGATIVE_MARKERS.iter().any(|m| latest_text.contains(m));
        if was_positive && now_negative {
            return Some(CoherenceIssue::PossibleContradiction);
        }
    }

    None
}

// ============================================================================
// Controller
// ============================================================================

/// Drives the debate through its rounds.
#[derive(Debug, Clone)]
pub struct RoundController {
    max_rounds: usize,
    phase: ControllerPhase,
}

impl Default for RoundController {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROUNDS)
    }
}

impl RoundController {
    /// Creates a controller for a debate of `max_rounds` turns.
    ///
    /// `max_rounds` should be even so both actors get the same number of
    /// turns; an odd value is accepted and gives agent A one extra turn.
    pub fn new(max_rounds: usize) -> Self {
        Self {
            max_rounds,
            phase: ControllerPhase::AwaitingTurn(Actor::AgentA),
        }
    }

    /// Configured round limit.
    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// Current phase.
    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    /// Runs one controller visit against the state.
    ///
    /// # Errors
    ///
    /// Returns `DebateError::TurnOrder` if the transcript no longer
    /// alternates correctly or has grown past the round limit. Coherence
    /// problems are logged, not returned.
    pub fn step(&mut self, state: &mut DebateState) -> DebateResult<ControllerPhase> {
        if let Some(violation) = state.turn_order_violation() {
            return Err(DebateError::TurnOrder(violation));
        }
        if state.turns.len() > self.max_rounds {
            return Err(DebateError::TurnOrder(format!(
                "{} turns recorded but the debate is limited to {}",
                state.turns.len(),
                self.max_rounds
            )));
        }

        if state.turns.len() > state.current_round {
            self.phase = ControllerPhase::Evaluating;
            self.evaluate_latest(state);
            state.current_round = state.turns.len();
        }

        if state.current_round >= self.max_rounds {
            if state.mark_complete() {
                state.log(
                    LogEntry::new(NODE_NAME, "debate_completed")
                        .with("total_rounds", state.current_round),
                );
                tracing::info!(total_rounds = state.current_round, "Debate complete");
            }
            self.phase = ControllerPhase::Complete;
            return Ok(self.phase);
        }

        let next = state
            .latest_turn()
            .map(|t| t.actor.opponent())
            .unwrap_or(Actor::AgentA);
        state.current_actor = Some(next);
        state.log(
            LogEntry::new(NODE_NAME, "turn_assigned")
                .with("next_turn", next.node_name())
                .with("round", state.current_round + 1),
        );
        tracing::debug!(next = %next, round = state.current_round + 1, "Turn assigned");

        self.phase = ControllerPhase::AwaitingTurn(next);
        Ok(self.phase)
    }

    fn evaluate_latest(&self, state: &mut DebateState) {
        let Some(issue) = check_coherence(&state.topic, &state.turns) else {
            return;
        };
        let round = state.turns.len();

        if issue.is_rejection() {
            tracing::warn!(round, issue = %issue, "Coherence warning");
            state.log(
                LogEntry::new(NODE_NAME, "coherence_issue")
                    .with("issue", issue.to_string())
                    .with("round", round),
            );
        } else {
            tracing::info!(round, issue = %issue, "Coherence note");
            state.log(
                LogEntry::new(NODE_NAME, "coherence_warning")
                    .with("warning", issue.to_string())
                    .with("round", round),
            );
        }
    }
}
