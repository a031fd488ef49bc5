//! Core agent loop implementation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::config::Config;
use crate::llm::{Content, FunctionCall, GeminiClient, GenerateRequest, LlmClient, Part};
use crate::tools::ToolRegistry;

use super::prompt::build_instruction;
use super::{AgentEvent, AgentRuntime, AgentTask};

const AGENT_NAME: &str = "travel_planner";

/// The LLM-backed planning agent.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    max_iterations: usize,
}

impl Agent {
    /// Create an agent talking to Gemini with the default tools.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let llm = Arc::new(GeminiClient::from_config(config)?);
        Ok(Self::with_client(llm, ToolRegistry::new(), config.max_iterations))
    }

    pub fn with_client(llm: Arc<dyn LlmClient>, tools: ToolRegistry, max_iterations: usize) -> Self {
        Self {
            llm,
            tools,
            max_iterations,
        }
    }

    /// Execute the calls of one model turn, in order.
    ///
    /// Tool failures are reported back to the model as `{"error": ...}`
    /// rather than ending the run.
    async fn execute_calls(&self, calls: &[FunctionCall]) -> Vec<Part> {
        let mut parts = Vec::with_capacity(calls.len());
        for call in calls {
            tracing::info!(tool = %call.name, args = %call.args, "Calling tool");
            let response = match self.tools.execute(&call.name, call.args.clone()).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(tool = %call.name, error = %e, "Tool call failed");
                    json!({ "error": e.to_string() })
                }
            };
            parts.push(Part::function_response(call.name.clone(), response));
        }
        parts
    }
}

#[async_trait]
impl AgentRuntime for Agent {
    async fn run(&self, task: &AgentTask) -> anyhow::Result<Vec<AgentEvent>> {
        let invocation_id = Uuid::new_v4();
        let mut events = Vec::new();

        let mut request = GenerateRequest {
            system_instruction: Some(build_instruction(&self.tools)),
            contents: vec![Content::user(vec![Part::text(task.prompt.clone())])],
            tools: self.tools.get_tool_schemas(),
        };

        for iteration in 0..self.max_iterations {
            tracing::debug!(%invocation_id, "Agent iteration {}", iteration + 1);

            let response = self.llm.generate(&request).await?;
            let calls: Vec<FunctionCall> = response.content.function_calls().cloned().collect();
            events.push(AgentEvent::new(
                invocation_id,
                AGENT_NAME,
                Some(response.content.clone()),
            ));

            if calls.is_empty() {
                tracing::debug!(
                    %invocation_id,
                    prompt_tokens = response.usage.prompt_token_count,
                    output_tokens = response.usage.candidates_token_count,
                    "Agent finished"
                );
                return Ok(events);
            }

            let results = Content::user(self.execute_calls(&calls).await);
            events.push(AgentEvent::new(invocation_id, AGENT_NAME, Some(results.clone())));

            request.contents.push(response.content);
            request.contents.push(results);
        }

        Err(anyhow::anyhow!(
            "Max iterations ({}) reached without completion",
            self.max_iterations
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::llm::{GenerateResponse, LlmError, UsageMetadata};

    /// Replays canned model turns and records every request it sees.
    struct ScriptedLlm {
        turns: Mutex<VecDeque<Result<Content, LlmError>>>,
        seen: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedLlm {
        fn new(turns: Vec<Result<Content, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                turns: Mutex::new(turns.into()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            let turn = self
                .turns
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::InvalidResponse("script exhausted".to_string())));
            turn.map(|content| GenerateResponse {
                content,
                finish_reason: Some("STOP".to_string()),
                usage: UsageMetadata::default(),
            })
        }
    }

    fn task(city: &str) -> AgentTask {
        AgentTask {
            destination: city.to_string(),
            prompt: format!("What should I pack for {}?", city),
        }
    }

    #[tokio::test]
    async fn runs_tools_in_requested_order_and_feeds_results_back() {
        let llm = ScriptedLlm::new(vec![
            Ok(Content::model(vec![Part::function_call(
                "get_current_weather",
                json!({ "city": "Helsinki" }),
            )])),
            Ok(Content::model(vec![Part::function_call(
                "get_packing_list",
                json!({ "condition": "snowy" }),
            )])),
            Ok(Content::model(vec![
                Part::text("It's snowy in Helsinki at -5°C."),
                Part::text("- Heavy coat\n- Gloves"),
            ])),
        ]);
        let agent = Agent::with_client(llm.clone(), ToolRegistry::new(), 10);

        let events = agent.run(&task("Helsinki")).await.expect("run");
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.invocation_id == events[0].invocation_id));

        let weather = events[1].content.as_ref().unwrap().parts[0]
            .function_response
            .as_ref()
            .unwrap();
        assert_eq!(weather.name, "get_current_weather");
        assert_eq!(weather.response["condition"], "snowy");

        let packing = events[3].content.as_ref().unwrap().parts[0]
            .function_response
            .as_ref()
            .unwrap();
        assert_eq!(packing.response["recommendations"][0], "Heavy coat");

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        // prompt, call, result, call, result
        assert_eq!(seen[2].contents.len(), 5);
        assert_eq!(seen[0].tools.len(), 2);
        assert!(seen[0]
            .system_instruction
            .as_deref()
            .unwrap()
            .contains("get_current_weather"));
    }

    #[tokio::test]
    async fn tool_errors_are_returned_to_the_model() {
        let llm = ScriptedLlm::new(vec![
            Ok(Content::model(vec![Part::function_call("get_flights", json!({}))])),
            Ok(Content::model(vec![Part::text("Sorry, no flights tool.")])),
        ]);
        let agent = Agent::with_client(llm, ToolRegistry::new(), 10);

        let events = agent.run(&task("Oslo")).await.expect("run");
        let result = events[1].content.as_ref().unwrap().parts[0]
            .function_response
            .as_ref()
            .unwrap();
        assert!(result.response["error"]
            .as_str()
            .unwrap()
            .contains("Unknown tool"));
        assert_eq!(events[2].texts(), vec!["Sorry, no flights tool."]);
    }

    #[tokio::test]
    async fn model_errors_propagate() {
        let llm = ScriptedLlm::new(vec![Err(LlmError::Api {
            status: 403,
            message: "forbidden".to_string(),
        })]);
        let agent = Agent::with_client(llm, ToolRegistry::new(), 10);

        let err = agent.run(&task("Oslo")).await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn stops_at_max_iterations() {
        let looping = || -> Result<Content, LlmError> {
            Ok(Content::model(vec![Part::function_call(
                "get_current_weather",
                json!({ "city": "Oslo" }),
            )]))
        };
        let llm = ScriptedLlm::new(vec![looping(), looping(), looping()]);
        let agent = Agent::with_client(llm, ToolRegistry::new(), 2);

        let err = agent.run(&task("Oslo")).await.unwrap_err();
        assert!(err.to_string().contains("Max iterations (2)"));
    }
}
