//! Debate orchestration.
//!
//! Drives one component at a time to completion:
//!
//! ```text
//! topic validator -> controller -> (agent A | agent B -> memory -> controller)* -> judge
//! ```
//!
//! The state is owned by the run and passed by exclusive reference, so no
//! step ever observes another mid-mutation. The run is async only because
//! turn generation may await a network call; nothing runs concurrently.

use super::agent::DebateAgent;
use super::controller::{ControllerPhase, RoundController, DEFAULT_MAX_ROUNDS};
use super::generator::TurnGenerator;
use super::judge::{Judge, Verdict};
use super::memory::MemoryCompressor;
use super::persona::Personas;
use super::state::{Actor, DebateState};
use super::topic::validate_topic;
use crate::error::{DebateError, DebateResult};

// ============================================================================
// Configuration
// ============================================================================

/// Settings for a single debate run.
#[derive(Debug, Clone)]
pub struct DebateSettings {
    /// Number of turns before the debate completes.
    pub max_rounds: usize,
    /// Run seed; every seeded draw derives from it.
    pub seed: u64,
    /// Personas of both sides.
    pub personas: Personas,
}

impl Default for DebateSettings {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            seed: 0,
            personas: Personas::default(),
        }
    }
}

impl DebateSettings {
    /// Creates settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the round limit.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Sets the run seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the personas.
    pub fn with_personas(mut self, personas: Personas) -> Self {
        self.personas = personas;
        self
    }
}

// ============================================================================
// Routing
// ============================================================================

/// The component that runs after a controller visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Agent(Actor),
    Judge,
}

impl Route {
    /// Maps the controller's phase to the next component.
    ///
    /// `Evaluating` is transient inside a controller visit and has no route.
    pub fn from_phase(phase: ControllerPhase) -> Option<Self> {
        match phase {
            ControllerPhase::AwaitingTurn(actor) => Some(Self::Agent(actor)),
            ControllerPhase::Complete => Some(Self::Judge),
            ControllerPhase::Evaluating => None,
        }
    }
}

/// Final state and verdict of a completed run.
#[derive(Debug, Clone)]
pub struct DebateOutcome {
    pub state: DebateState,
    pub verdict: Verdict,
    /// Seed the run used.
    pub seed: u64,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Runs debates with a given turn generator.
pub struct DebateOrchestrator<G: TurnGenerator> {
    settings: DebateSettings,
    generator: G,
    agents: [DebateAgent; 2],
    memory: MemoryCompressor,
    judge: Judge,
}

impl<G: TurnGenerator> DebateOrchestrator<G> {
    /// Creates an orchestrator.
    pub fn new(settings: DebateSettings, generator: G) -> Self {
        if settings.max_rounds % 2 == 1 {
            tracing::warn!(
                max_rounds = settings.max_rounds,
                "Odd round limit: agent A will take one more turn than agent B"
            );
        }

        let names = settings.personas.names();
        let agents = [
            DebateAgent::new(Actor::AgentA, settings.personas.agent_a.clone()),
            DebateAgent::new(Actor::AgentB, settings.personas.agent_b.clone()),
        ];

        Self {
            memory: MemoryCompressor::new(names.clone()),
            judge: Judge::new(settings.seed).with_names(names),
            agents,
            generator,
            settings,
        }
    }

    /// Settings this orchestrator runs with.
    pub fn settings(&self) -> &DebateSettings {
        &self.settings
    }

    /// The turn generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Runs a full debate on `raw_topic`.
    ///
    /// # Errors
    ///
    /// - `DebateError::Validation` if the topic is rejected; no turn is produced.
    /// - `DebateError::Capability` if turn generation fails; the run stops
    ///   without a verdict.
    /// - `DebateError::TurnOrder` if the transcript stops alternating.
    pub async fn run(&mut self, raw_topic: &str) -> DebateResult<DebateOutcome> {
        let topic = validate_topic(raw_topic)?;
        let validated = topic.log_entry();
        let mut state = DebateState::new(topic.into_string());
        state.log(validated);

        tracing::info!(
            topic = %state.topic,
            max_rounds = self.settings.max_rounds,
            seed = self.settings.seed,
            "Starting debate"
        );

        let mut controller = RoundController::new(self.settings.max_rounds);
        let mut phase = controller.step(&mut state)?;

        loop {
            match Route::from_phase(phase) {
                Some(Route::Agent(actor)) => {
                    self.agents[actor.index()]
                        .take_turn(&mut state, &mut self.generator, controller.max_rounds())
                        .await?;
                    self.memory.update(&mut state);
                    phase = controller.step(&mut state)?;
                }
                Some(Route::Judge) => break,
                None => {
                    return Err(DebateError::TurnOrder(format!(
                        "controller left in phase {}",
                        phase
                    )))
                }
            }
        }

        let verdict = self.judge.render(&mut state)?;

        Ok(DebateOutcome {
            state,
            verdict,
            seed: self.settings.seed,
        })
    }
}
