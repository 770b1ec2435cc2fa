//! End-to-end tests of the debate engine through the public API.

use debate_forge::debate::judge::Judge;
use debate_forge::debate::{
    Actor, DebateLogWriter, DebateOrchestrator, DebateRecord, DebateSettings, Personas,
    ScriptedTurnGenerator, TemplateTurnGenerator, TurnRecord,
};
use debate_forge::error::{DebateError, ValidationError};
use tempfile::tempdir;

const TOPIC: &str = "Should AI be regulated?";

#[tokio::test]
async fn test_end_to_end_default_debate() {
    let settings = DebateSettings::new().with_max_rounds(8).with_seed(42);
    let mut orchestrator = DebateOrchestrator::new(settings, TemplateTurnGenerator::new(42));

    let outcome = orchestrator.run(TOPIC).await.expect("debate should complete");
    let state = &outcome.state;

    assert_eq!(state.turns.len(), 8);
    for (idx, turn) in state.turns.iter().enumerate() {
        let expected = if idx % 2 == 0 {
            Actor::AgentA
        } else {
            Actor::AgentB
        };
        assert_eq!(turn.actor, expected);
        assert_eq!(turn.round, idx + 1);
    }
    assert!(state.turn_order_is_valid());
    assert!(state.debate_complete);
    assert_eq!(state.current_round, 8);
    assert!(matches!(
        state.winner,
        Some(Actor::AgentA) | Some(Actor::AgentB)
    ));
    assert!(state.judgment.contains("Winner:"));
    assert!(!state.memory_summary.is_empty());
}

#[tokio::test]
async fn test_topic_is_whitespace_normalized() {
    let mut orchestrator = DebateOrchestrator::new(
        DebateSettings::new().with_max_rounds(2),
        TemplateTurnGenerator::new(1),
    );

    let outcome = orchestrator
        .run("  Should   AI \t be\n regulated?  ")
        .await
        .expect("debate should complete");
    assert_eq!(outcome.state.topic, TOPIC);
}

#[tokio::test]
async fn test_empty_topic_rejected() {
    let mut orchestrator =
        DebateOrchestrator::new(DebateSettings::new(), TemplateTurnGenerator::new(1));

    let err = orchestrator.run(" \t\n ").await.expect_err("empty topic");
    assert!(matches!(
        err,
        DebateError::Validation(ValidationError::EmptyTopic)
    ));
    assert_eq!(err.component(), "topic_validator");
}

#[tokio::test]
async fn test_capability_failure_leaves_no_record() {
    let generator = ScriptedTurnGenerator::new([
        "Research data shows AI oversight reduces measurable harm.",
        "Yet freedom to build AI tools is itself a moral good.",
    ]);
    let mut orchestrator =
        DebateOrchestrator::new(DebateSettings::new().with_max_rounds(4), generator);

    let err = orchestrator.run(TOPIC).await.expect_err("script runs out");
    assert_eq!(err.component(), "agent_a");
    assert!(err.to_string().contains("round 3"));
}

#[test]
fn test_judge_is_deterministic_on_tie() {
    let text = "Evidence shows AI regulation works because audits catch failures early.";
    let turns = vec![
        TurnRecord::new(1, Actor::AgentA, text),
        TurnRecord::new(2, Actor::AgentB, text),
    ];

    let first = Judge::new(42).judge(&turns);
    assert!(first.tie_break);
    for _ in 0..10 {
        assert_eq!(Judge::new(42).judge(&turns), first);
    }
}

#[test]
fn test_turn_order_violation_detected() {
    let mut state = debate_forge::DebateState::new(TOPIC);
    state.turns.push(TurnRecord::new(1, Actor::AgentA, "First AI point here."));
    state.turns.push(TurnRecord::new(2, Actor::AgentA, "Second AI point here."));
    assert!(!state.turn_order_is_valid());
}

#[tokio::test]
async fn test_record_written_after_run() {
    let seed = 42;
    let settings = DebateSettings::new().with_max_rounds(4).with_seed(seed);
    let outcome = DebateOrchestrator::new(settings, TemplateTurnGenerator::new(seed))
        .run(TOPIC)
        .await
        .expect("debate should complete");

    let dir = tempdir().expect("tempdir");
    let writer = DebateLogWriter::new(dir.path().join("debate.json"));
    let record =
        DebateRecord::from_state(&outcome.state, &Personas::default(), seed).expect("record");
    writer.write(&record).expect("write");

    let raw = std::fs::read_to_string(writer.json_path()).expect("json");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(value["metadata"]["total_rounds"], 4);
    assert_eq!(value["metadata"]["seed"], 42);
    assert_eq!(value["participants"]["agent_a"]["turns"], 2);
    assert_eq!(value["transcript"].as_array().map(Vec::len), Some(4));
    assert!(value["final_judgment"]["judgment_text"]
        .as_str()
        .unwrap_or_default()
        .contains("Winner:"));
    assert!(writer.text_path().exists());
}
