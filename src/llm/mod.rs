//! LLM integration for debate-forge.
//!
//! Provides the request/response types shared by every provider, the
//! [`LlmProvider`] trait, and an OpenAI-compatible client that works against
//! LiteLLM proxies and OpenRouter.
//!
//! ```ignore
//! use debate_forge::llm::{GenerationRequest, LiteLlmClient, LlmProvider, Message};
//!
//! let client = LiteLlmClient::from_env()?;
//! let request = GenerationRequest::new(
//!     "",
//!     vec![
//!         Message::system("You are a Research Scientist."),
//!         Message::user("Topic: Should AI be regulated?"),
//!     ],
//! )
//! .with_max_tokens(200);
//! let response = client.generate(request).await?;
//! ```

pub mod litellm;

pub use litellm::{
    Choice, GenerationRequest, GenerationResponse, LiteLlmClient, LlmProvider, Message, Usage,
    DEFAULT_API_BASE, DEFAULT_MODEL,
};
