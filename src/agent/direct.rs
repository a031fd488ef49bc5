//! Deterministic runtime: weather first, then packing, no model.

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::llm::{Content, Part};
use crate::tools::{PackingResult, ToolRegistry, WeatherObservation};

use super::{AgentEvent, AgentRuntime, AgentTask};

const RUNTIME_NAME: &str = "direct_planner";

/// Sequences the two tools itself and writes a templated answer.
///
/// Emits the same event shapes as the LLM agent (call, response, ...,
/// text) so the planning session reduces both the same way.
pub struct DirectRuntime {
    tools: ToolRegistry,
}

impl DirectRuntime {
    pub fn new() -> Self {
        Self {
            tools: ToolRegistry::new(),
        }
    }

    async fn call(
        &self,
        events: &mut Vec<AgentEvent>,
        invocation_id: Uuid,
        name: &str,
        args: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        events.push(AgentEvent::new(
            invocation_id,
            RUNTIME_NAME,
            Some(Content::model(vec![Part::function_call(name, args.clone())])),
        ));
        let result = self.tools.execute(name, args).await?;
        events.push(AgentEvent::new(
            invocation_id,
            RUNTIME_NAME,
            Some(Content::user(vec![Part::function_response(name, result.clone())])),
        ));
        Ok(result)
    }
}

impl Default for DirectRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentRuntime for DirectRuntime {
    async fn run(&self, task: &AgentTask) -> anyhow::Result<Vec<AgentEvent>> {
        let invocation_id = Uuid::new_v4();
        let mut events = Vec::new();

        let weather: WeatherObservation = serde_json::from_value(
            self.call(
                &mut events,
                invocation_id,
                "get_current_weather",
                json!({ "city": task.destination }),
            )
            .await?,
        )?;

        let packing: PackingResult = serde_json::from_value(
            self.call(
                &mut events,
                invocation_id,
                "get_packing_list",
                json!({ "condition": weather.condition }),
            )
            .await?,
        )?;

        events.push(AgentEvent::text(
            invocation_id,
            RUNTIME_NAME,
            format!(
                "Weather in {}: {}, {}.",
                weather.location, weather.condition, weather.temperature
            ),
        ));
        events.push(AgentEvent::text(
            invocation_id,
            RUNTIME_NAME,
            packing
                .recommendations
                .iter()
                .map(|item| format!("- {}", item))
                .collect::<Vec<_>>()
                .join("\n"),
        ));

        Ok(events)
    }
}
