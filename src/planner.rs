//! Planning session: one destination in, one short answer out.
//!
//! The session builds the request, hands it to an [`AgentRuntime`], and
//! reduces the emitted events to the last two text fragments. Runtime
//! failures never escape; they become [`PlanOutcome::Failed`].

use std::sync::Arc;

use crate::agent::{Agent, AgentEvent, AgentRuntime, AgentTask, DirectRuntime};
use crate::config::{Config, PlannerMode};

/// Shown when a run produced no text at all.
pub const NO_RESPONSE: &str = "No response generated.";

/// How many trailing text fragments make up the answer.
const ANSWER_FRAGMENTS: usize = 2;

/// Result of a planning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// The runtime produced text
    Answer(String),
    /// The runtime finished without emitting any text
    NoResponse,
    /// The runtime failed; holds the error message
    Failed(String),
}

impl PlanOutcome {
    /// User-facing rendering of the outcome.
    pub fn message(&self) -> String {
        match self {
            Self::Answer(text) => text.clone(),
            Self::NoResponse => NO_RESPONSE.to_string(),
            Self::Failed(reason) => format!("Error: {}", reason),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Answer(_) => "answer",
            Self::NoResponse => "no_response",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Drives one agent run per call. Holds no state between calls.
#[derive(Clone)]
pub struct PlanningSession {
    runtime: Arc<dyn AgentRuntime>,
}

impl PlanningSession {
    pub fn new(runtime: Arc<dyn AgentRuntime>) -> Self {
        Self { runtime }
    }

    /// Pick the runtime named by `config.planner_mode`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let runtime: Arc<dyn AgentRuntime> = match config.planner_mode {
            PlannerMode::Agent => Arc::new(Agent::new(config)?),
            PlannerMode::Direct => Arc::new(DirectRuntime::new()),
        };
        Ok(Self::new(runtime))
    }

    pub fn build_prompt(city: &str) -> String {
        format!("What should I pack for {}?", city.trim())
    }

    /// Run the agent once for `city`.
    pub async fn plan(&self, city: &str) -> PlanOutcome {
        self.plan_with_trace(city).await.0
    }

    /// Run the agent once for `city`, also returning the events it emitted.
    ///
    /// The trail is empty when the runtime failed.
    pub async fn plan_with_trace(&self, city: &str) -> (PlanOutcome, Vec<AgentEvent>) {
        let destination = city.trim().to_string();
        let task = AgentTask {
            prompt: Self::build_prompt(&destination),
            destination,
        };
        tracing::info!(destination = %task.destination, "Planning trip");

        let events = match self.runtime.run(&task).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(error = %e, "Planning failed");
                return (PlanOutcome::Failed(e.to_string()), Vec::new());
            }
        };

        for event in &events {
            tracing::debug!(
                event_id = %event.id,
                invocation_id = %event.invocation_id,
                author = %event.author,
                timestamp = %event.timestamp.to_rfc3339(),
                "Agent event"
            );
        }

        let outcome = match reduce_events(&events) {
            Some(answer) => PlanOutcome::Answer(answer),
            None => {
                tracing::warn!(events = events.len(), "Agent emitted no text");
                PlanOutcome::NoResponse
            }
        };
        (outcome, events)
    }

    /// [`plan`](Self::plan) rendered as a string.
    pub async fn plan_message(&self, city: &str) -> String {
        self.plan(city).await.message()
    }
}

/// Join the last two text fragments of a run, newline-separated.
pub fn reduce_events(events: &[AgentEvent]) -> Option<String> {
    let texts: Vec<&str> = events.iter().flat_map(|e| e.texts()).collect();
    if texts.is_empty() {
        return None;
    }
    let start = texts.len().saturating_sub(ANSWER_FRAGMENTS);
    Some(texts[start..].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    enum Script {
        Texts(Vec<&'static str>),
        Fail(&'static str),
    }

    struct ScriptedRuntime {
        script: Script,
        tasks: Mutex<Vec<AgentTask>>,
    }

    impl ScriptedRuntime {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                script,
                tasks: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AgentRuntime for ScriptedRuntime {
        async fn run(&self, task: &AgentTask) -> anyhow::Result<Vec<AgentEvent>> {
            self.tasks.lock().unwrap().push(task.clone());
            let id = Uuid::new_v4();
            match &self.script {
                Script::Texts(texts) => Ok(texts
                    .iter()
                    .map(|t| AgentEvent::text(id, "scripted", *t))
                    .collect()),
                Script::Fail(message) => Err(anyhow::anyhow!(*message)),
            }
        }
    }

    #[tokio::test]
    async fn answer_is_last_two_fragments() {
        let runtime = ScriptedRuntime::new(Script::Texts(vec![
            "Let me check the weather.",
            "It's rainy in London, 12°C.",
            "- Raincoat\n- Umbrella",
        ]));
        let session = PlanningSession::new(runtime);
        assert_eq!(
            session.plan("London").await,
            PlanOutcome::Answer("It's rainy in London, 12°C.\n- Raincoat\n- Umbrella".to_string())
        );
    }

    #[tokio::test]
    async fn single_fragment_is_returned_as_is() {
        let session = PlanningSession::new(ScriptedRuntime::new(Script::Texts(vec!["Pack light."])));
        assert_eq!(session.plan_message("Oslo").await, "Pack light.");
    }

    #[tokio::test]
    async fn no_text_gives_sentinel() {
        let session = PlanningSession::new(ScriptedRuntime::new(Script::Texts(vec![])));
        let outcome = session.plan("Oslo").await;
        assert_eq!(outcome, PlanOutcome::NoResponse);
        assert_eq!(outcome.message(), "No response generated.");
    }

    #[tokio::test]
    async fn runtime_failure_degrades_to_message() {
        let session = PlanningSession::new(ScriptedRuntime::new(Script::Fail("connection reset")));
        let outcome = session.plan("Oslo").await;
        assert!(outcome.is_failure());
        assert_eq!(outcome.message(), "Error: connection reset");
    }

    #[tokio::test]
    async fn trace_keeps_every_event_in_order() {
        let session = PlanningSession::new(ScriptedRuntime::new(Script::Texts(vec!["one", "two", "three"])));
        let (outcome, events) = session.plan_with_trace("Oslo").await;

        assert_eq!(outcome, PlanOutcome::Answer("two\nthree".to_string()));
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].texts(), vec!["one"]);
        assert!(events.windows(2).all(|w| w[0].id != w[1].id));
    }

    #[tokio::test]
    async fn failed_run_has_empty_trace() {
        let session = PlanningSession::new(ScriptedRuntime::new(Script::Fail("boom")));
        let (outcome, events) = session.plan_with_trace("Oslo").await;
        assert!(outcome.is_failure());
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn prompt_embeds_trimmed_city() {
        let runtime = ScriptedRuntime::new(Script::Texts(vec!["ok"]));
        let session = PlanningSession::new(runtime.clone());
        session.plan("  Helsinki \n").await;

        let tasks = runtime.tasks.lock().unwrap();
        assert_eq!(tasks[0].destination, "Helsinki");
        assert_eq!(tasks[0].prompt, "What should I pack for Helsinki?");
    }

    #[tokio::test]
    async fn direct_mode_plans_without_a_model() {
        let mut config = Config::new("unused".to_string());
        config.planner_mode = PlannerMode::Direct;
        let session = PlanningSession::from_config(&config).expect("session");

        let message = session.plan_message("snowy Helsinki").await;
        assert_eq!(
            message,
            "Weather in snowy Helsinki: snowy, -5°C.\n- Heavy coat\n- Gloves\n- Hat\n- Thermal layers"
        );
    }
}
