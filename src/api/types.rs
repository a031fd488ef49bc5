//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::agent::AgentEvent;

/// Body of the HTML form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanForm {
    #[serde(default)]
    pub city: String,
}

/// Request to plan a trip via the JSON API.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    /// Destination, free text
    pub city: String,
}

/// Result of a planning run.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    /// `answer`, `no_response` or `failed`
    pub status: &'static str,

    /// Answer text, the no-response sentinel, or `Error: ...`
    pub message: String,

    /// Every event the run emitted; empty when it failed
    pub events: Vec<AgentEvent>,
}

/// Error body for rejected requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Model the agent talks to
    pub model: String,
}
