//! Agent module - runs a planning request against the tools.
//!
//! The LLM-backed [`Agent`] follows a "tools in a loop" pattern:
//! 1. Send the user prompt, system instruction and tool declarations
//! 2. If the model requests function calls, execute them and feed results back
//! 3. Repeat until the model answers with text or max iterations is reached
//!
//! [`DirectRuntime`] skips the model and calls weather then packing itself.
//! Both record what happened as a sequence of [`AgentEvent`]s.

mod agent_loop;
mod direct;
mod events;
mod prompt;

use async_trait::async_trait;

pub use agent_loop::Agent;
pub use direct::DirectRuntime;
pub use events::AgentEvent;
pub use prompt::build_instruction;

/// One planning request handed to a runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTask {
    /// Destination as typed by the user, trimmed
    pub destination: String,
    /// Natural-language request sent to the model
    pub prompt: String,
}

/// Something that can turn a task into a sequence of events.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn run(&self, task: &AgentTask) -> anyhow::Result<Vec<AgentEvent>>;
}
