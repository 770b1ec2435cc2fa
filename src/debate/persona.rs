//! Debate personas.
//!
//! A persona is a plain value object describing how one side argues. Both
//! debaters are driven by the same agent code parameterized by a persona
//! and an [`Actor`] tag.

use serde::{Deserialize, Serialize};

use super::state::Actor;

/// A debater's identity and argumentation style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Stable identifier (e.g. `agent_a`).
    pub id: String,
    /// Display name used in transcripts and the judgment.
    pub name: String,
    /// The role the persona plays (e.g. "Research Scientist").
    pub role: String,
    /// Free-form description of the argumentation style.
    #[serde(default)]
    pub style: String,
    /// Domain the persona draws evidence from.
    #[serde(default = "default_expertise")]
    pub expertise: String,
}

fn default_expertise() -> String {
    "general knowledge".to_string()
}

impl Persona {
    /// Creates a persona with no style and general expertise.
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            style: String::new(),
            expertise: default_expertise(),
        }
    }

    /// Sets the argumentation style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Sets the area of expertise.
    pub fn with_expertise(mut self, expertise: impl Into<String>) -> Self {
        self.expertise = expertise.into();
        self
    }

    /// The default opening persona.
    pub fn scientist() -> Self {
        Self::new("agent_a", "Scientist", "Research Scientist")
            .with_style("analytical, evidence-driven, cites data and studies")
            .with_expertise("empirical research and risk assessment")
    }

    /// The default responding persona.
    pub fn philosopher() -> Self {
        Self::new("agent_b", "Philosopher", "Moral Philosopher")
            .with_style("reflective, principled, reasons from first principles")
            .with_expertise("ethics and political philosophy")
    }

    /// Builds the system prompt that frames this persona for text generation.
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!(
            "You are a {} with expertise in {}.\n",
            self.role, self.expertise
        );
        if !self.style.is_empty() {
            prompt.push_str(&format!("Style: {}\n", self.style));
        }
        prompt.push_str(DEBATE_INSTRUCTIONS);
        prompt
    }
}

const DEBATE_INSTRUCTIONS: &str = r#"
You are participating in a structured debate. Generate arguments that are:
- Logical and well-reasoned
- Directly relevant to the topic
- 2-3 sentences long
- Not repetitive of your previous points"#;

/// The pair of personas taking part in a debate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Personas {
    /// Persona speaking first.
    pub agent_a: Persona,
    /// Persona speaking second.
    pub agent_b: Persona,
}

impl Default for Personas {
    fn default() -> Self {
        Self {
            agent_a: Persona::scientist(),
            agent_b: Persona::philosopher(),
        }
    }
}

impl Personas {
    /// Returns the persona for the given actor.
    pub fn get(&self, actor: Actor) -> &Persona {
        match actor {
            Actor::AgentA => &self.agent_a,
            Actor::AgentB => &self.agent_b,
        }
    }

    /// Display names indexed by [`Actor::index`].
    pub fn names(&self) -> [String; 2] {
        [self.agent_a.name.clone(), self.agent_b.name.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_mentions_role_and_style() {
        let prompt = Persona::scientist().system_prompt();
        assert!(prompt.contains("Research Scientist"));
        assert!(prompt.contains("Style: analytical"));
        assert!(prompt.contains("structured debate"));
    }

    #[test]
    fn test_system_prompt_without_style() {
        let prompt = Persona::new("x", "X", "Critic").system_prompt();
        assert!(!prompt.contains("Style:"));
        assert!(prompt.contains("general knowledge"));
    }

    #[test]
    fn test_personas_lookup_by_actor() {
        let personas = Personas::default();
        assert_eq!(personas.get(Actor::AgentA).name, "Scientist");
        assert_eq!(personas.get(Actor::AgentB).name, "Philosopher");
        assert_eq!(personas.names()[Actor::AgentB.index()], "Philosopher");
    }

    #[test]
    fn test_persona_deserializes_with_defaults() {
        let yaml = "id: a\nname: Alice\nrole: Economist\n";
        let persona: Persona = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(persona.style, "");
        assert_eq!(persona.expertise, "general knowledge");
    }
}
