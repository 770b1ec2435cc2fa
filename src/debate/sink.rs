//! Debate record and log writer.
//!
//! [`DebateRecord`] is the durable JSON shape of a finished debate. Key names
//! and their order are relied on by downstream tools and must not change.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::persona::Personas;
use super::state::{Actor, DebateState, LogEntry, TurnRecord};
use crate::error::SinkError;

/// Component name used in error reports and the workflow graph.
pub const NODE_NAME: &str = "logger";

/// Record metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub topic: String,
    pub total_rounds: usize,
    pub debate_complete: bool,
    pub seed: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub log_generated: DateTime<Utc>,
}

/// One participant's entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub turns: usize,
}

/// Both participants, keyed by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    pub agent_a: Participant,
    pub agent_b: Participant,
}

/// The judge's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalJudgment {
    /// Display name of the winner.
    pub winner: Option<String>,
    pub judgment_text: String,
}

/// Serializable record of a finished debate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateRecord {
    pub metadata: RecordMetadata,
    pub participants: Participants,
    pub transcript: Vec<TurnRecord>,
    pub memory_summary: String,
    pub final_judgment: FinalJudgment,
    pub node_log: Vec<LogEntry>,
}

impl DebateRecord {
    /// Builds the record of a completed debate.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Incomplete` if the debate has not finished or has
    /// not been judged.
    pub fn from_state(
        state: &DebateState,
        personas: &Personas,
        seed: u64,
    ) -> Result<Self, SinkError> {
        if !state.debate_complete || state.winner.is_none() {
            return Err(SinkError::Incomplete);
        }

        let participant = |actor: Actor| Participant {
            name: personas.get(actor).name.clone(),
            turns: state.turns_by(actor).count(),
        };

        let completed_at = state
            .event_log
            .iter()
            .rev()
            .find(|e| e.action == "judgment_rendered")
            .map(|e| e.timestamp)
            .unwrap_or_else(Utc::now);

        Ok(Self {
            metadata: RecordMetadata {
                topic: state.topic.clone(),
                total_rounds: state.current_round,
                debate_complete: state.debate_complete,
                seed,
                started_at: state.started_at,
                completed_at,
                log_generated: Utc::now(),
            },
            participants: Participants {
                agent_a: participant(Actor::AgentA),
                agent_b: participant(Actor::AgentB),
            },
            transcript: state.turns.clone(),
            memory_summary: state.memory_summary.clone(),
            final_judgment: FinalJudgment {
                winner: state.winner.map(|w| personas.get(w).name.clone()),
                judgment_text: state.judgment.clone(),
            },
            node_log: state.event_log.clone(),
        })
    }

    fn participant_name(&self, actor: Actor) -> &str {
        match actor {
            Actor::AgentA => &self.participants.agent_a.name,
            Actor::AgentB => &self.participants.agent_b.name,
        }
    }

    /// Renders the human-readable transcript.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "Generated: {}\n\nTopic: {}\nTotal Rounds: {}\nWinner: {}\n\nFULL TRANSCRIPT:\n",
            self.metadata.log_generated.format("%Y-%m-%d %H:%M:%S"),
            self.metadata.topic,
            self.metadata.total_rounds,
            self.final_judgment
                .winner
                .as_deref()
                .unwrap_or("Not determined")
        );

        for turn in &self.transcript {
            out.push_str(&format!(
                "\n[Round {}] {}:\n{}\n({})\n",
                turn.round,
                self.participant_name(turn.actor),
                turn.text,
                turn.produced_at.to_rfc3339()
            ));
        }

        out.push_str(&format!(
            "\n\nFINAL JUDGMENT:\n{}\n",
            self.final_judgment.judgment_text
        ));
        out
    }
}

/// Writes debate records to disk.
///
/// The JSON record goes to the configured path; a plain-text transcript is
/// written beside it with a `.txt` extension.
#[derive(Debug, Clone)]
pub struct DebateLogWriter {
    path: PathBuf,
}

impl DebateLogWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the JSON record.
    pub fn json_path(&self) -> &Path {
        &self.path
    }

    /// Path of the text transcript.
    pub fn text_path(&self) -> PathBuf {
        self.path.with_extension("txt")
    }

    /// Writes both files, creating parent directories as needed.
    ///
    /// Both files are staged next to their targets and renamed into place,
    /// the JSON record last. A failed write leaves no JSON record behind.
    pub fn write(&self, record: &DebateRecord) -> Result<(), SinkError> {
        if !record.metadata.debate_complete {
            return Err(SinkError::Incomplete);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(record)?;
        let text_path = self.text_path();
        let staged_json = staging_path(&self.path);
        let staged_text = staging_path(&text_path);

        let result = fs::write(&staged_text, record.to_text())
            .and_then(|_| fs::write(&staged_json, json))
            .and_then(|_| fs::rename(&staged_text, &text_path))
            .and_then(|_| fs::rename(&staged_json, &self.path));
        if let Err(err) = result {
            let _ = fs::remove_file(&staged_text);
            let _ = fs::remove_file(&staged_json);
            return Err(err.into());
        }

        tracing::info!(
            json = %self.path.display(),
            text = %self.text_path().display(),
            "Debate log written"
        );
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
