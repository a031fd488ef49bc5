//! Events emitted by an agent run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::llm::{Content, Part};

/// A single step of an agent run: a model turn or a batch of tool results.
#[derive(Debug, Clone, Serialize)]
pub struct AgentEvent {
    pub id: Uuid,
    /// Shared by every event of the same run
    pub invocation_id: Uuid,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub content: Option<Content>,
}

impl AgentEvent {
    pub fn new(invocation_id: Uuid, author: impl Into<String>, content: Option<Content>) -> Self {
        Self {
            id: Uuid::new_v4(),
            invocation_id,
            author: author.into(),
            timestamp: Utc::now(),
            content,
        }
    }

    /// Convenience for a model turn made of a single text part.
    pub fn text(invocation_id: Uuid, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(invocation_id, author, Some(Content::model(vec![Part::text(text)])))
    }

    /// Non-empty text parts of this event, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.content
            .as_ref()
            .map(|c| c.texts().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn texts_skip_empty_and_non_text_parts() {
        let content = Content::model(vec![
            Part::text(""),
            Part::function_call("get_current_weather", json!({ "city": "Oslo" })),
            Part::text("Packing for Oslo"),
        ]);
        let event = AgentEvent::new(Uuid::new_v4(), "travel_planner", Some(content));
        assert_eq!(event.texts(), vec!["Packing for Oslo"]);
    }

    #[test]
    fn event_without_content_has_no_text() {
        let event = AgentEvent::new(Uuid::new_v4(), "travel_planner", None);
        assert!(event.texts().is_empty());
    }
}
