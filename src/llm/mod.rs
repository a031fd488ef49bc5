//! Model client for the planning agent.
//!
//! Provides the [`LlmClient`] seam and a Gemini implementation that applies
//! the configured retry policy.

mod error;
mod gemini;
mod retry;
mod types;

use async_trait::async_trait;

pub use error::LlmError;
pub use gemini::GeminiClient;
pub use retry::with_retry;
pub use types::{
    Content, FunctionCall, FunctionDeclaration, FunctionResponse, GenerateRequest,
    GenerateResponse, Part, Role, UsageMetadata,
};

/// A model that can answer a conversation, optionally requesting tool calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError>;
}
