//! Workflow graph rendering.
//!
//! Emits the debate workflow as a Graphviz DOT document. Controller edges
//! are derived from [`Route::from_phase`], so the picture follows the
//! routing the orchestrator actually uses.

use std::fmt::Write;

use super::controller::{self, ControllerPhase};
use super::orchestrator::{DebateSettings, Route};
use super::state::Actor;
use super::{judge, memory, sink, topic};

fn node_for(route: Route) -> &'static str {
    match route {
        Route::Agent(actor) => actor.node_name(),
        Route::Judge => judge::NODE_NAME,
    }
}

fn edge_label(phase: ControllerPhase, max_rounds: usize) -> String {
    match phase {
        ControllerPhase::AwaitingTurn(actor) => format!("{} turn", actor.label()),
        ControllerPhase::Evaluating => String::new(),
        ControllerPhase::Complete => format!("debate complete ({} rounds)", max_rounds),
    }
}

/// Renders the workflow for the given settings as DOT.
pub fn workflow_dot(settings: &DebateSettings) -> String {
    let mut dot = String::from("digraph debate {\n");
    dot.push_str("    rankdir=TB;\n");
    dot.push_str("    node [shape=box, style=\"rounded,filled\", fillcolor=\"#F5F5F5\"];\n\n");

    dot.push_str("    start [shape=ellipse, label=\"START\"];\n");
    let _ = writeln!(dot, "    {} [label=\"Topic validator\"];", topic::NODE_NAME);
    let _ = writeln!(
        dot,
        "    {} [label=\"Round controller\"];",
        controller::NODE_NAME
    );
    for actor in Actor::BOTH {
        let persona = settings.personas.get(actor);
        let _ = writeln!(
            dot,
            "    {} [label=\"{}\\n({})\"];",
            actor.node_name(),
            actor.label(),
            persona.name.replace('"', "'")
        );
    }
    let _ = writeln!(dot, "    {} [label=\"Memory\"];", memory::NODE_NAME);
    let _ = writeln!(dot, "    {} [label=\"Judge\"];", judge::NODE_NAME);
    let _ = writeln!(dot, "    {} [label=\"Logger\"];", sink::NODE_NAME);
    dot.push_str("    end [shape=ellipse, label=\"END\"];\n\n");

    let _ = writeln!(dot, "    start -> {};", topic::NODE_NAME);
    let _ = writeln!(
        dot,
        "    {} -> {} [label=\"topic validated\"];",
        topic::NODE_NAME,
        controller::NODE_NAME
    );

    let phases = [
        ControllerPhase::AwaitingTurn(Actor::AgentA),
        ControllerPhase::AwaitingTurn(Actor::AgentB),
        ControllerPhase::Evaluating,
        ControllerPhase::Complete,
    ];
    for phase in phases {
        if let Some(route) = Route::from_phase(phase) {
            let _ = writeln!(
                dot,
                "    {} -> {} [label=\"{}\"];",
                controller::NODE_NAME,
                node_for(route),
                edge_label(phase, settings.max_rounds)
            );
        }
    }

    for actor in Actor::BOTH {
        let _ = writeln!(
            dot,
            "    {} -> {} [label=\"argument added\"];",
            actor.node_name(),
            memory::NODE_NAME
        );
    }
    let _ = writeln!(
        dot,
        "    {} -> {} [label=\"memory updated\", style=dashed];",
        memory::NODE_NAME,
        controller::NODE_NAME
    );
    let _ = writeln!(
        dot,
        "    {} -> {} [label=\"judgment ready\"];",
        judge::NODE_NAME,
        sink::NODE_NAME
    );
    let _ = writeln!(
        dot,
        "    {} -> end [label=\"log written\"];",
        sink::NODE_NAME
    );

    dot.push_str("}\n");
    dot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_routes_to_both_agents_and_judge() {
        let dot = workflow_dot(&DebateSettings::new().with_max_rounds(6));

        assert!(dot.starts_with("digraph debate {"));
        assert!(dot.contains("rounds_controller -> agent_a [label=\"Agent A turn\"];"));
        assert!(dot.contains("rounds_controller -> agent_b [label=\"Agent B turn\"];"));
        assert!(dot.contains("rounds_controller -> judge [label=\"debate complete (6 rounds)\"];"));
        assert!(dot.contains("judge -> logger"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_agent_nodes_show_persona_names() {
        let dot = workflow_dot(&DebateSettings::new());
        assert!(dot.contains("agent_a [label=\"Agent A\\n(Scientist)\"];"));
        assert!(dot.contains("agent_b [label=\"Agent B\\n(Philosopher)\"];"));
    }

    #[test]
    fn test_every_controller_edge_has_one_line() {
        let dot = workflow_dot(&DebateSettings::new());
        let controller_edges = dot
            .lines()
            .filter(|l| l.trim_start().starts_with("rounds_controller ->"))
            .count();
        assert_eq!(controller_edges, 3);
    }
}
