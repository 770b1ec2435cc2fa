//! Integration tests against a live LLM endpoint.
//!
//! These tests make real API calls to OpenRouter.
//! Run with: OPENROUTER_API_KEY=your_key cargo test --test llm_integration -- --ignored

use std::sync::Arc;

use debate_forge::debate::{
    DebateOrchestrator, DebateSettings, LlmGeneratorConfig, LlmTurnGenerator,
};
use debate_forge::llm::{GenerationRequest, LiteLlmClient, LlmProvider, Message};

fn get_test_api_key() -> String {
    std::env::var("OPENROUTER_API_KEY")
        .expect("OPENROUTER_API_KEY environment variable must be set for integration tests")
}

fn create_test_client() -> LiteLlmClient {
    LiteLlmClient::new_with_defaults(get_test_api_key())
}

#[tokio::test]
#[ignore] // Run with: cargo test --test llm_integration -- --ignored
async fn test_simple_generation() {
    let client = create_test_client();

    let request = GenerationRequest::new(
        "",
        vec![
            Message::system("You are a helpful assistant. Reply concisely."),
            Message::user("What is 2 + 2? Reply with just the number."),
        ],
    )
    .with_max_tokens(10)
    .with_temperature(0.0);

    let response = client.generate(request).await;
    assert!(response.is_ok(), "Generation failed: {:?}", response.err());

    let response = response.expect("Should have response");
    let content = response.first_content().expect("Should have content");
    assert!(
        content.contains('4'),
        "Response should contain '4', got: {}",
        content
    );
}

#[tokio::test]
#[ignore]
async fn test_short_llm_debate() {
    let provider: Arc<dyn LlmProvider> = Arc::new(create_test_client());
    let generator = LlmTurnGenerator::new(provider, LlmGeneratorConfig::default());
    let settings = DebateSettings::new().with_max_rounds(2).with_seed(42);

    let outcome = DebateOrchestrator::new(settings, generator)
        .run("Should AI be regulated?")
        .await
        .expect("debate should complete");

    assert_eq!(outcome.state.turns.len(), 2);
    assert!(outcome.state.judgment.contains("Winner:"));
}
