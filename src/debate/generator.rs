//! Turn generation capability.
//!
//! The orchestrator treats argument generation as an opaque call: given a
//! persona, the topic, the bounded context and the round number, return
//! text or fail. Three implementations are provided:
//!
//! - [`LlmTurnGenerator`]: prompts an [`LlmProvider`] under a timeout.
//! - [`TemplateTurnGenerator`]: offline, composes arguments from phrase banks
//!   using per-actor seeded generators.
//! - [`ScriptedTurnGenerator`]: replays fixed texts, for tests and demos.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::context::OPPONENT_PREFIX;
use super::persona::Persona;
use super::seed::{actor_offset, component_rng};
use super::state::Actor;
use crate::error::{CapabilityError, LlmError};
use crate::llm::{GenerationRequest, LlmProvider, Message};

/// Everything the generator may see for one turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnRequest<'a> {
    /// Side producing the turn.
    pub actor: Actor,
    /// Persona of that side.
    pub persona: &'a Persona,
    /// Validated debate topic.
    pub topic: &'a str,
    /// Bounded context from the context builder.
    pub context: &'a str,
    /// 1-indexed round being produced.
    pub round: usize,
}

impl TurnRequest<'_> {
    /// Builds the user prompt for this turn.
    pub fn user_prompt(&self) -> String {
        format!(
            "Topic: {}\n\nContext:\n{}\n\nGenerate your argument for round {}.",
            self.topic, self.context, self.round
        )
    }
}

/// Produces argument text for a turn.
///
/// Errors are fatal to the run; implementations should not retry internally
/// on the orchestrator's behalf.
#[async_trait]
pub trait TurnGenerator: Send {
    /// Generates the argument text for one turn.
    async fn generate(&mut self, request: &TurnRequest<'_>) -> Result<String, CapabilityError>;
}

#[async_trait]
impl<G: TurnGenerator + ?Sized> TurnGenerator for Box<G> {
    async fn generate(&mut self, request: &TurnRequest<'_>) -> Result<String, CapabilityError> {
        (**self).generate(request).await
    }
}

// ============================================================================
// LLM-backed generator
// ============================================================================

/// Generation settings for [`LlmTurnGenerator`].
#[derive(Debug, Clone)]
pub struct LlmGeneratorConfig {
    /// Model identifier; empty means the provider's default model.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens per argument.
    pub max_tokens: u32,
    /// Upper bound on a single generation call.
    pub timeout: Duration,
}

impl Default for LlmGeneratorConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.7,
            max_tokens: 200,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Generates arguments by prompting an LLM provider.
pub struct LlmTurnGenerator {
    provider: Arc<dyn LlmProvider>,
    config: LlmGeneratorConfig,
}

impl LlmTurnGenerator {
    /// Creates a generator over the given provider.
    pub fn new(provider: Arc<dyn LlmProvider>, config: LlmGeneratorConfig) -> Self {
        Self { provider, config }
    }

    fn build_request(&self, request: &TurnRequest<'_>) -> GenerationRequest {
        GenerationRequest::new(
            self.config.model.clone(),
            vec![
                Message::system(request.persona.system_prompt()),
                Message::user(request.user_prompt()),
            ],
        )
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens)
    }
}

#[async_trait]
impl TurnGenerator for LlmTurnGenerator {
    async fn generate(&mut self, request: &TurnRequest<'_>) -> Result<String, CapabilityError> {
        let generation = self.build_request(request);

        let response = tokio::time::timeout(self.config.timeout, self.provider.generate(generation))
            .await
            .map_err(|_| CapabilityError::Timeout {
                seconds: self.config.timeout.as_secs(),
            })??;

        let content = response
            .first_content()
            .map(str::trim)
            .unwrap_or_default();
        if content.is_empty() {
            return Err(CapabilityError::EmptyResponse);
        }

        tracing::debug!(
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "Argument generated"
        );

        Ok(content.to_string())
    }
}

// ============================================================================
// Offline template generator
// ============================================================================

const OPENERS: &[&str] = &[
    "On the question of",
    "Turning to whether",
    "When we weigh whether",
    "Looking closely at whether",
    "Anyone asking",
    "The debate over",
    "Considering the claim behind",
    "Reframing the issue of",
];

const EVIDENCE: &[&str] = &[
    "Research from comparable cases shows",
    "Historical data demonstrates",
    "Recent studies indicate",
    "The evidence from past reforms suggests",
    "Documented facts show",
    "Field data from several countries shows",
    "Long-running surveys demonstrate",
    "Published analyses indicate",
];

const CLAIMS: &[&str] = &[
    "that early safeguards prevent costly failures later",
    "that public trust grows when rules are transparent",
    "that accountability improves outcomes for ordinary people",
    "that unchecked incentives tend to concentrate power",
    "that clear standards make innovation safer and faster",
    "that the burden of proof should fall on those creating risk",
    "that voluntary commitments rarely survive commercial pressure",
    "that measured oversight protects both users and builders",
];

const CONNECTORS: &[&str] = &[
    "Therefore",
    "Consequently",
    "Because of this",
    "Thus",
    "This implies that",
    "It follows that",
];

const CONCLUSIONS: &[&str] = &[
    "we need a framework that adapts as understanding improves",
    "the sensible course is a proportionate response grounded in principle",
    "any answer must balance liberty with responsibility",
    "the costs of inaction outweigh the costs of careful action",
    "we should judge policies by their real effects rather than intentions",
    "a principled middle path deserves serious consideration",
];

/// Offline generator composing arguments from phrase banks.
///
/// Each actor draws from its own ChaCha8 generator seeded with the run seed
/// plus that actor's offset, so a fixed seed yields a fixed debate.
pub struct TemplateTurnGenerator {
    rngs: [ChaCha8Rng; 2],
}

impl TemplateTurnGenerator {
    /// Creates a generator for the given run seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rngs: [
                component_rng(seed, actor_offset(Actor::AgentA)),
                component_rng(seed, actor_offset(Actor::AgentB)),
            ],
        }
    }

    fn compose(&mut self, request: &TurnRequest<'_>) -> String {
        let rng = &mut self.rngs[request.actor.index()];

        let topic = request.topic.trim_end_matches(['?', '.', '!']);
        let mut text = format!(
            "{} {}, as a {} I start from {}.",
            pick(rng, OPENERS),
            topic.to_lowercase(),
            request.persona.role.to_lowercase(),
            request.persona.expertise
        );

        if let Some(point) = opponent_point(request.context) {
            text.push_str(&format!(" My opponent argued that {}, yet", point));
            text.push_str(&format!(" {}", lowercase_first(pick(rng, EVIDENCE))));
        } else {
            text.push_str(&format!(" {}", pick(rng, EVIDENCE)));
        }
        text.push_str(&format!(" {}.", pick(rng, CLAIMS)));
        text.push_str(&format!(" {} {}.", pick(rng, CONNECTORS), pick(rng, CONCLUSIONS)));
        text
    }
}

fn pick(rng: &mut ChaCha8Rng, bank: &[&'static str]) -> &'static str {
    bank[rng.random_range(0..bank.len())]
}

/// First words of the opponent's last point, if the context carries one.
fn opponent_point(context: &str) -> Option<String> {
    let line = context
        .lines()
        .find_map(|l| l.strip_prefix(OPPONENT_PREFIX))?;
    let words: Vec<&str> = line
        .split_whitespace()
        .take(8)
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" ").to_lowercase())
    }
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl TurnGenerator for TemplateTurnGenerator {
    async fn generate(&mut self, request: &TurnRequest<'_>) -> Result<String, CapabilityError> {
        Ok(self.compose(request))
    }
}

// ============================================================================
// Scripted generator
// ============================================================================

/// Replays a fixed sequence of texts, one per call.
///
/// Running out of texts is a capability failure, as is any call index
/// registered with [`fail_at`](Self::fail_at).
#[derive(Debug, Clone, Default)]
pub struct ScriptedTurnGenerator {
    script: VecDeque<String>,
    fail_at: Option<usize>,
    calls: usize,
    requests: Vec<(Actor, usize)>,
}

impl ScriptedTurnGenerator {
    /// Creates a generator replaying `texts` in order.
    pub fn new(texts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            script: texts.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Makes the call with the given 0-based index fail.
    pub fn fail_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    /// Number of generate calls made so far.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// `(actor, round)` of every request received, in order.
    pub fn requests(&self) -> &[(Actor, usize)] {
        &self.requests
    }
}

#[async_trait]
impl TurnGenerator for ScriptedTurnGenerator {
    async fn generate(&mut self, request: &TurnRequest<'_>) -> Result<String, CapabilityError> {
        let call = self.calls;
        self.calls += 1;
        self.requests.push((request.actor, request.round));

        if self.fail_at == Some(call) {
            return Err(CapabilityError::Provider(LlmError::RequestFailed(format!(
                "scripted failure at call {}",
                call
            ))));
        }

        self.script.pop_front().ok_or_else(|| {
            CapabilityError::Exhausted(format!("no scripted text left for call {}", call))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Choice, GenerationResponse, Usage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock LLM provider for testing.
    struct MockLlmProvider {
        responses: Mutex<Vec<String>>,
        call_count: AtomicUsize,
        delay: Option<Duration>,
        last_request: Mutex<Option<GenerationRequest>>,
    }

    impl MockLlmProvider {
        fn new(responses: Vec<String>) -> Self {
            Self {
                responses: Mutex::new(responses),
                call_count: AtomicUsize::new(0),
                delay: None,
                last_request: Mutex::new(None),
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::new(vec!["late".to_string()])
            }
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<GenerationResponse, LlmError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().expect("lock not poisoned") = Some(request);
            let responses = self.responses.lock().expect("lock not poisoned");
            let content = responses.get(idx).cloned().unwrap_or_default();

            Ok(GenerationResponse {
                id: format!("mock-{}", idx),
                model: "mock-model".to_string(),
                choices: vec![Choice {
                    index: 0,
                    message: Message::assistant(content),
                    finish_reason: "stop".to_string(),
                }],
                usage: Usage {
                    prompt_tokens: 100,
                    completion_tokens: 50,
                    total_tokens: 150,
                },
            })
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> Result<GenerationResponse, LlmError> {
            Err(LlmError::ApiError {
                code: 500,
                message: "upstream down".to_string(),
            })
        }
    }

    fn request<'a>(persona: &'a Persona, context: &'a str) -> TurnRequest<'a> {
        TurnRequest {
            actor: Actor::AgentA,
            persona,
            topic: "Should AI be regulated?",
            context,
            round: 3,
        }
    }

    #[tokio::test]
    async fn test_llm_generator_builds_prompts() {
        let provider = Arc::new(MockLlmProvider::new(vec![
            "  AI should be regulated because data shows harm.  ".to_string(),
        ]));
        let mut generator = LlmTurnGenerator::new(provider.clone(), LlmGeneratorConfig::default());
        let persona = Persona::scientist();

        let text = generator
            .generate(&request(&persona, "Current round: 3/8"))
            .await
            .expect("text");

        assert_eq!(text, "AI should be regulated because data shows harm.");
        let sent = provider
            .last_request
            .lock()
            .expect("lock not poisoned")
            .clone()
            .expect("request recorded");
        assert_eq!(sent.messages.len(), 2);
        let (system, user) = (&sent.messages[0].content, &sent.messages[1].content);
        assert!(system.contains("Research Scientist"));
        assert!(user.contains("Topic: Should AI be regulated?"));
        assert!(user.contains("round 3"));
        assert_eq!(sent.max_tokens, Some(200));
    }

    #[tokio::test]
    async fn test_llm_generator_empty_response() {
        let provider = Arc::new(MockLlmProvider::new(vec!["   ".to_string()]));
        let mut generator = LlmTurnGenerator::new(provider, LlmGeneratorConfig::default());
        let persona = Persona::scientist();

        let err = generator
            .generate(&request(&persona, ""))
            .await
            .expect_err("empty");
        assert!(matches!(err, CapabilityError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_llm_generator_provider_error() {
        let mut generator =
            LlmTurnGenerator::new(Arc::new(FailingProvider), LlmGeneratorConfig::default());
        let persona = Persona::scientist();

        let err = generator
            .generate(&request(&persona, ""))
            .await
            .expect_err("provider error");
        assert!(matches!(
            err,
            CapabilityError::Provider(LlmError::ApiError { code: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_llm_generator_timeout() {
        let provider = Arc::new(MockLlmProvider::slow(Duration::from_millis(200)));
        let config = LlmGeneratorConfig {
            timeout: Duration::from_millis(10),
            ..LlmGeneratorConfig::default()
        };
        let mut generator = LlmTurnGenerator::new(provider, config);
        let persona = Persona::scientist();

        let err = generator
            .generate(&request(&persona, ""))
            .await
            .expect_err("timeout");
        assert!(matches!(err, CapabilityError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_template_generator_is_deterministic() {
        let persona = Persona::scientist();
        let mut a = TemplateTurnGenerator::new(42);
        let mut b = TemplateTurnGenerator::new(42);

        for _ in 0..4 {
            let req = request(&persona, "This is the opening statement.");
            assert_eq!(
                a.generate(&req).await.expect("text"),
                b.generate(&req).await.expect("text")
            );
        }
    }

    #[tokio::test]
    async fn test_template_generator_references_topic_and_opponent() {
        let persona = Persona::scientist();
        let mut generator = TemplateTurnGenerator::new(7);
        let context = "Opponent's last point: Liberty matters more than safety, always.\n";

        let text = generator
            .generate(&request(&persona, context))
            .await
            .expect("text");

        assert!(text.contains("should ai be regulated"));
        assert!(text.contains("My opponent argued that liberty matters more than safety always"));
        assert!(text.chars().count() >= 20);
        assert!(text.chars().count() <= 1000);
    }

    #[tokio::test]
    async fn test_scripted_generator_replays_and_fails() {
        let persona = Persona::scientist();
        let mut generator = ScriptedTurnGenerator::new(["one", "two"]).fail_at(1);

        assert_eq!(
            generator.generate(&request(&persona, "")).await.expect("first"),
            "one"
        );
        assert!(generator.generate(&request(&persona, "")).await.is_err());
        assert_eq!(
            generator.generate(&request(&persona, "")).await.expect("third"),
            "two"
        );
        assert!(matches!(
            generator.generate(&request(&persona, "")).await,
            Err(CapabilityError::Exhausted(_))
        ));
        assert_eq!(generator.calls(), 4);
        assert_eq!(generator.requests()[0], (Actor::AgentA, 3));
    }
}
