//! Memory compression.
//!
//! Folds the whole transcript into a short running summary. The summary is
//! rebuilt from scratch after every turn; it is derived data and can always
//! be regenerated from `turns`.

use super::state::{Actor, DebateState, LogEntry, TurnRecord};
use super::text::first_sentence;

/// Node name recorded in the event log.
pub const NODE_NAME: &str = "memory";

/// Maximum characters kept from an actor's latest first sentence.
pub const KEY_POINT_MAX_CHARS: usize = 100;

/// Summarizes the transcript per actor.
#[derive(Debug, Clone)]
pub struct MemoryCompressor {
    names: [String; 2],
}

impl Default for MemoryCompressor {
    fn default() -> Self {
        Self::new([
            Actor::AgentA.label().to_string(),
            Actor::AgentB.label().to_string(),
        ])
    }
}

impl MemoryCompressor {
    /// Creates a compressor that refers to actors by the given display names.
    pub fn new(names: [String; 2]) -> Self {
        Self { names }
    }

    /// Compresses the transcript.
    ///
    /// For each actor, in order of first appearance: how many turns it took
    /// and the first sentence of its most recent turn. An empty transcript
    /// compresses to an empty string.
    pub fn compress(&self, turns: &[TurnRecord]) -> String {
        let mut order: Vec<Actor> = Vec::with_capacity(2);
        for turn in turns {
            if !order.contains(&turn.actor) {
                order.push(turn.actor);
            }
        }

        let mut lines = Vec::new();
        for actor in order {
            let count = turns.iter().filter(|t| t.actor == actor).count();
            lines.push(format!(
                "{}: {} arguments presented",
                self.names[actor.index()],
                count
            ));
            if let Some(latest) = turns.iter().rev().find(|t| t.actor == actor) {
                lines.push(format!(
                    "  Latest: {}",
                    first_sentence(&latest.text, KEY_POINT_MAX_CHARS)
                ));
            }
        }

        lines.join("\n")
    }

    /// Recomputes `memory_summary` from the full transcript and logs the update.
    pub fn update(&self, state: &mut DebateState) {
        let summary = self.compress(&state.turns);
        let entry = LogEntry::new(NODE_NAME, "memory_updated")
            .with("total_turns", state.turns.len())
            .with("summary_length", summary.len());

        tracing::debug!(
            total_turns = state.turns.len(),
            summary_length = summary.len(),
            "Memory summary updated"
        );

        state.memory_summary = summary;
        state.log(entry);
    }
}

/// Compresses a transcript using the default actor labels.
pub fn compress(turns: &[TurnRecord]) -> String {
    MemoryCompressor::default().compress(turns)
}
