//! Judge and scorer.
//!
//! Scores each actor on three sub-scores in `[0, 1]` and declares the actor
//! with the strictly higher total the winner. An exact tie is broken by a
//! single uniform draw from a generator seeded with the run seed plus
//! [`JUDGE_SEED_OFFSET`], re-created on every call so repeated judgments of
//! the same transcript agree.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use super::seed::{component_rng, JUDGE_SEED_OFFSET};
use super::state::{Actor, DebateState, LogEntry, TurnRecord};
use super::text::{char_len, truncate_chars, word_set};
use crate::error::{DebateError, DebateResult};

/// Node name recorded in the event log.
pub const NODE_NAME: &str = "judge";

/// Words that mark an appeal to evidence.
pub const EVIDENCE_MARKERS: &[&str] = &[
    "research",
    "studies",
    "data",
    "evidence",
    "facts",
    "historically",
    "proven",
    "demonstrates",
    "shows",
];

/// Words that mark explicit reasoning.
pub const REASONING_MARKERS: &[&str] = &[
    "therefore",
    "because",
    "thus",
    "consequently",
    "implies",
    "suggests",
    "indicates",
    "means",
];

/// Shared words above which a turn counts as engaging its opponent.
pub const ENGAGEMENT_MIN_SHARED_WORDS: usize = 5;

const VARIETY_PREFIX_CHARS: usize = 20;
const KEY_POINTS_PER_SIDE: usize = 2;
const KEY_POINT_CHARS: usize = 100;

// ============================================================================
// Scores
// ============================================================================

/// One actor's sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub coherence: f64,
    pub engagement: f64,
    pub strength: f64,
}

impl Scores {
    /// Sum of the three sub-scores, in `[0, 3]`.
    pub fn total(&self) -> f64 {
        self.coherence + self.engagement + self.strength
    }
}

fn length_band(avg_len: f64) -> f64 {
    if (50.0..=300.0).contains(&avg_len) {
        1.0
    } else if avg_len < 50.0 {
        0.5
    } else {
        0.8
    }
}

/// Length band averaged with prefix variety. Zero when the actor has no turns.
pub fn coherence_score(own: &[&TurnRecord]) -> f64 {
    if own.is_empty() {
        return 0.0;
    }
    let n = own.len() as f64;

    let avg_len = own.iter().map(|t| char_len(&t.text)).sum::<usize>() as f64 / n;

    let mut prefixes: Vec<&str> = own
        .iter()
        .map(|t| truncate_chars(&t.text, VARIETY_PREFIX_CHARS))
        .collect();
    prefixes.sort_unstable();
    prefixes.dedup();
    let variety = (prefixes.len() as f64 / n).min(1.0);

    (length_band(avg_len) + variety) / 2.0
}

/// Share of the actor's turns that overlap the opponent's turn at the same
/// position by more than [`ENGAGEMENT_MIN_SHARED_WORDS`] words.
///
/// 0.5 when either side has no turns.
pub fn engagement_score(own: &[&TurnRecord], opponent: &[&TurnRecord]) -> f64 {
    if own.is_empty() || opponent.is_empty() {
        return 0.5;
    }

    let engaged = own
        .iter()
        .zip(opponent.iter())
        .filter(|(mine, theirs)| {
            let mine = word_set(&mine.text);
            let theirs = word_set(&theirs.text);
            mine.intersection(&theirs).count() > ENGAGEMENT_MIN_SHARED_WORDS
        })
        .count();

    engaged as f64 / own.len() as f64
}

fn marker_hits(text: &str, markers: &[&str]) -> usize {
    markers.iter().filter(|m| text.contains(*m)).count()
}

/// Evidence and reasoning marker frequency, each normalized by twice the
/// turn count and capped at 1.0. Zero when the actor has no turns.
pub fn strength_score(own: &[&TurnRecord]) -> f64 {
    if own.is_empty() {
        return 0.0;
    }

    let (evidence, reasoning) = own.iter().fold((0, 0), |(e, r), turn| {
        let lower = turn.text.to_lowercase();
        (
            e + marker_hits(&lower, EVIDENCE_MARKERS),
            r + marker_hits(&lower, REASONING_MARKERS),
        )
    });

    let max_possible = (own.len() * 2) as f64;
    let evidence = (evidence as f64 / max_possible).min(1.0);
    let reasoning = (reasoning as f64 / max_possible).min(1.0);
    (evidence + reasoning) / 2.0
}

/// Scores one actor against the full transcript.
pub fn score_actor(turns: &[TurnRecord], actor: Actor) -> Scores {
    let own: Vec<&TurnRecord> = turns.iter().filter(|t| t.actor == actor).collect();
    let opponent: Vec<&TurnRecord> = turns
        .iter()
        .filter(|t| t.actor == actor.opponent())
        .collect();

    Scores {
        coherence: coherence_score(&own),
        engagement: engagement_score(&own, &opponent),
        strength: strength_score(&own),
    }
}

// ============================================================================
// Verdict
// ============================================================================

/// Outcome of judging a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub winner: Actor,
    /// Sub-scores indexed by [`Actor::index`].
    pub scores: [Scores; 2],
    /// Winner's total minus loser's total; zero on a tie.
    pub margin: f64,
    /// True when the winner was drawn at random.
    pub tie_break: bool,
    /// Report beginning with `Winner: <name>`.
    pub rationale: String,
}

impl Verdict {
    /// Sub-scores of one actor.
    pub fn scores_for(&self, actor: Actor) -> &Scores {
        &self.scores[actor.index()]
    }
}

/// Deterministic debate scorer.
#[derive(Debug, Clone)]
pub struct Judge {
    seed: u64,
    names: [String; 2],
}

impl Judge {
    /// Creates a judge for the given run seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            names: [
                Actor::AgentA.label().to_string(),
                Actor::AgentB.label().to_string(),
            ],
        }
    }

    /// Sets the display names used in reports.
    pub fn with_names(mut self, names: [String; 2]) -> Self {
        self.names = names;
        self
    }

    fn name(&self, actor: Actor) -> &str {
        &self.names[actor.index()]
    }

    /// Scores the transcript and picks a winner.
    pub fn judge(&self, turns: &[TurnRecord]) -> Verdict {
        let scores = [
            score_actor(turns, Actor::AgentA),
            score_actor(turns, Actor::AgentB),
        ];
        let total_a = scores[0].total();
        let total_b = scores[1].total();

        let (winner, margin, tie_break) = if total_a > total_b {
            (Actor::AgentA, total_a - total_b, false)
        } else if total_b > total_a {
            (Actor::AgentB, total_b - total_a, false)
        } else {
            let mut rng = component_rng(self.seed, JUDGE_SEED_OFFSET);
            (Actor::BOTH[rng.random_range(0..2)], 0.0, true)
        };

        let rationale = self.rationale(winner, &scores, margin);
        Verdict {
            winner,
            scores,
            margin,
            tie_break,
            rationale,
        }
    }

    fn rationale(&self, winner: Actor, scores: &[Scores; 2], margin: f64) -> String {
        let (a, b) = (self.name(Actor::AgentA), self.name(Actor::AgentB));
        let width = a.chars().count().max(b.chars().count()).max(6);
        let row = |label: &str, x: f64, y: f64| {
            format!("  {:<12}{:>w$.2}  {:>w$.2}\n", label, x, y, w = width)
        };

        let mut out = format!("Winner: {}\n\nEvaluation Scores:\n", self.name(winner));
        out.push_str(&format!(
            "  {:<12}{:>w$}  {:>w$}\n",
            "Criterion",
            a,
            b,
            w = width
        ));
        out.push_str(&row("Coherence", scores[0].coherence, scores[1].coherence));
        out.push_str(&row("Engagement", scores[0].engagement, scores[1].engagement));
        out.push_str(&row("Strength", scores[0].strength, scores[1].strength));
        out.push_str(&row("TOTAL", scores[0].total(), scores[1].total()));

        let own = &scores[winner.index()];
        let strong_in = if own.coherence > 0.7 {
            "coherence"
        } else if own.engagement > 0.7 {
            "engagement"
        } else {
            "reasoning"
        };
        let structure = if own.coherence > 0.6 {
            "well-structured"
        } else {
            "engaged"
        };
        let basis = if own.strength > 0.6 {
            "evidence-based"
        } else {
            "logically sound"
        };
        let closeness = if margin > 0.5 {
            "decisive"
        } else if margin > 0.2 {
            "close but clear"
        } else {
            "very close"
        };

        out.push_str(&format!(
            "\nReasoning:\nThe {} presented arguments with strong {}.\n\
             Their arguments were {} and {}.\n\
             The margin of victory was {:.2} points, indicating a {} win.\n",
            self.name(winner),
            strong_in,
            structure,
            basis,
            margin,
            closeness
        ));
        out
    }

    /// Human-readable summary of the debate: topic, turn counts and the
    /// first points of each side.
    pub fn summary(&self, topic: &str, turns: &[TurnRecord]) -> String {
        let mut out = format!(
            "DEBATE SUMMARY\n==============\n\nTopic: {}\nTotal Rounds: {}\n\nParticipants:\n",
            topic,
            turns.len()
        );
        for actor in Actor::BOTH {
            out.push_str(&format!(
                "- {} ({}): {} arguments\n",
                self.name(actor),
                actor.label(),
                turns.iter().filter(|t| t.actor == actor).count()
            ));
        }

        out.push_str("\nKey Arguments:\n");
        for actor in Actor::BOTH {
            let points: Vec<&TurnRecord> = turns
                .iter()
                .filter(|t| t.actor == actor)
                .take(KEY_POINTS_PER_SIDE)
                .collect();
            if points.is_empty() {
                continue;
            }
            out.push_str(&format!("\n{}'s main points:\n", self.name(actor)));
            for (i, turn) in points.iter().enumerate() {
                out.push_str(&format!(
                    "  {}. {}...\n",
                    i + 1,
                    truncate_chars(&turn.text, KEY_POINT_CHARS)
                ));
            }
        }
        out
    }

    /// Judges a completed debate and records the outcome on the state.
    ///
    /// Sets `winner` and `judgment` (summary followed by the rationale) and
    /// logs `judgment_rendered`.
    ///
    /// # Errors
    ///
    /// Returns `DebateError::NotComplete` if the debate has not finished.
    pub fn render(&self, state: &mut DebateState) -> DebateResult<Verdict> {
        if !state.debate_complete {
            return Err(DebateError::NotComplete {
                turns: state.turns.len(),
            });
        }

        let verdict = self.judge(&state.turns);
        let summary = self.summary(&state.topic, &state.turns);

        tracing::info!(
            winner = %self.name(verdict.winner),
            margin = verdict.margin,
            tie_break = verdict.tie_break,
            "Judgment rendered"
        );

        state.winner = Some(verdict.winner);
        state.judgment = format!("{}\n{}", summary, verdict.rationale);
        state.log(
            LogEntry::new(NODE_NAME, "judgment_rendered")
                .with("winner", self.name(verdict.winner).to_string())
                .with("margin", verdict.margin)
                .with("tie_break", verdict.tie_break),
        );

        Ok(verdict)
    }
}
