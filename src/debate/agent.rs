//! Debate agents.
//!
//! A single agent type serves both sides of the debate: it is parameterized
//! by a [`Persona`] and an [`Actor`] tag. Each turn it builds the bounded
//! context, asks the turn generator for text, regenerates near-duplicates of
//! its own earlier turns, and appends exactly one turn and one log entry.

use std::collections::HashSet;

use super::context::build_context;
use super::generator::{TurnGenerator, TurnRequest};
use super::persona::Persona;
use super::state::{Actor, DebateState, LogEntry, TurnRecord};
use super::text::{char_len, jaccard, word_set};
use crate::error::{DebateError, DebateResult};

/// Generation attempts per turn before a duplicate is accepted.
pub const MAX_GENERATION_ATTEMPTS: usize = 3;

/// Jaccard similarity above which a turn counts as a duplicate.
pub const DUPLICATE_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Suffix appended to a turn kept after every attempt was a duplicate.
pub fn duplicate_annotation(round: usize) -> String {
    format!(" This point is particularly relevant in round {}.", round)
}

/// Returns true if `candidate` is too similar to any of `previous`.
pub fn is_duplicate<'a>(candidate: &str, previous: impl IntoIterator<Item = &'a str>) -> bool {
    let candidate_words: HashSet<String> = word_set(candidate);
    previous
        .into_iter()
        .any(|prev| jaccard(&candidate_words, &word_set(prev)) > DUPLICATE_SIMILARITY_THRESHOLD)
}

/// One side of the debate.
#[derive(Debug, Clone)]
pub struct DebateAgent {
    actor: Actor,
    persona: Persona,
}

impl DebateAgent {
    /// Creates an agent speaking for `actor` with the given persona.
    pub fn new(actor: Actor, persona: Persona) -> Self {
        Self { actor, persona }
    }

    /// Produces the next turn and appends it to the transcript.
    ///
    /// Near-duplicates of this agent's earlier turns are regenerated up to
    /// [`MAX_GENERATION_ATTEMPTS`] times; the last attempt is then kept with
    /// [`duplicate_annotation`] appended.
    ///
    /// # Errors
    ///
    /// Returns `DebateError::Capability` if the generator fails. Generator
    /// failures are never retried.
    pub async fn take_turn<G>(
        &self,
        state: &mut DebateState,
        generator: &mut G,
        max_rounds: usize,
    ) -> DebateResult<()>
    where
        G: TurnGenerator + ?Sized,
    {
        let round = state.current_round + 1;
        let context = build_context(state, self.actor, max_rounds);

        let request = TurnRequest {
            actor: self.actor,
            persona: &self.persona,
            topic: &state.topic,
            context: &context,
            round,
        };

        let mut attempts = 0;
        let mut annotated = false;
        let mut text = String::new();

        while attempts < MAX_GENERATION_ATTEMPTS {
            attempts += 1;
            text = generator
                .generate(&request)
                .await
                .map_err(|source| DebateError::Capability {
                    actor: self.actor,
                    round,
                    source,
                })?;

            let previous = state.turns_by(self.actor).map(|t| t.text.as_str());
            if !is_duplicate(&text, previous) {
                break;
            }

            tracing::warn!(
                agent = %self.persona.name,
                round,
                attempt = attempts,
                "Generated argument duplicates an earlier turn"
            );

            if attempts == MAX_GENERATION_ATTEMPTS {
                text.push_str(&duplicate_annotation(round));
                annotated = true;
            }
        }

        let turn = TurnRecord::new(round, self.actor, text)
            .with_meta("agent_id", self.persona.id.clone())
            .with_meta("agent_name", self.persona.name.clone())
            .with_meta("role", self.persona.role.clone())
            .with_meta("context_length", char_len(&context))
            .with_meta("attempts", attempts)
            .with_meta("annotated", annotated);

        let node = format!("{}_node", self.actor.node_name());
        let entry = LogEntry::new(node, "argument_generated")
            .with("round", round)
            .with("agent", self.persona.name.clone())
            .with("argument_length", char_len(&turn.text))
            .with("attempts", attempts);

        tracing::info!(
            round,
            agent = %self.persona.name,
            attempts,
            "[Round {}] {}: {}",
            round,
            self.persona.name,
            turn.text
        );

        state.turns.push(turn);
        state.log(entry);
        Ok(())
    }
}
