//! Bounded context for the next turn.
//!
//! A debater only sees the opponent's most recent point, the upcoming round
//! number and the compressed memory summary. Nothing older is replayed, so
//! the context size does not grow with the length of the debate.

use super::state::{Actor, DebateState};

/// Context handed to the opening speaker.
pub const OPENING_MARKER: &str = "This is the opening statement.";

/// Prefix of the context line quoting the opponent's last turn.
pub const OPPONENT_PREFIX: &str = "Opponent's last point: ";

/// Builds the context `actor` should see for its next turn.
pub fn build_context(state: &DebateState, actor: Actor, max_rounds: usize) -> String {
    if state.turns.is_empty() {
        return OPENING_MARKER.to_string();
    }

    let mut context = String::new();

    if let Some(last_opponent) = state.turns.iter().rev().find(|t| t.actor != actor) {
        context.push_str(&format!("{}{}\n", OPPONENT_PREFIX, last_opponent.text));
    }

    context.push_str(&format!(
        "Current round: {}/{}\n",
        state.current_round + 1,
        max_rounds
    ));

    if !state.memory_summary.is_empty() {
        context.push_str(&format!("Key points so far: {}\n", state.memory_summary));
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::state::TurnRecord;

    #[test]
    fn test_opening_context() {
        let state = DebateState::new("Should AI be regulated?");
        assert_eq!(build_context(&state, Actor::AgentA, 8), OPENING_MARKER);
    }

    #[test]
    fn test_context_uses_latest_opponent_turn_only() {
        let mut state = DebateState::new("Should AI be regulated?");
        state.turns = vec![
            TurnRecord::new(1, Actor::AgentA, "first from A"),
            TurnRecord::new(2, Actor::AgentB, "first from B"),
            TurnRecord::new(3, Actor::AgentA, "second from A"),
        ];
        state.current_round = 3;

        let context = build_context(&state, Actor::AgentB, 8);
        assert!(context.contains("Opponent's last point: second from A"));
        assert!(!context.contains("first from A"));
        assert!(!context.contains("first from B"));
        assert!(context.contains("Current round: 4/8"));
    }

    #[test]
    fn test_context_without_opponent_turn() {
        let mut state = DebateState::new("Should AI be regulated?");
        state.turns = vec![TurnRecord::new(1, Actor::AgentA, "only A so far")];
        state.current_round = 1;

        let context = build_context(&state, Actor::AgentA, 6);
        assert!(!context.contains("Opponent's last point"));
        assert!(context.starts_with("Current round: 2/6"));
    }

    #[test]
    fn test_context_appends_non_empty_summary() {
        let mut state = DebateState::new("Should AI be regulated?");
        state.turns = vec![TurnRecord::new(1, Actor::AgentA, "opening")];
        state.current_round = 1;

        let context = build_context(&state, Actor::AgentB, 8);
        assert!(!context.contains("Key points"));

        state.memory_summary = "Agent A: 1 arguments presented".to_string();
        let context = build_context(&state, Actor::AgentB, 8);
        assert!(context.contains("Key points so far: Agent A: 1 arguments presented"));
    }
}
