//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client};
use tracing::debug;

use super::types::ApiResponse;
use super::{with_retry, GenerateRequest, GenerateResponse, LlmClient, LlmError};
use crate::config::{Config, RetryConfig};

/// Gemini REST client
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    retry: RetryConfig,
    http: Client,
}

impl GeminiClient {
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry.clone(),
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    async fn send_once(&self, url: &str, body: &serde_json::Value) -> Result<GenerateResponse, LlmError> {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = parse_retry_after(response.headers());
            debug!(?retry_after, "generate: rate limited (429)");
            return Err(LlmError::RateLimited { retry_after });
        }

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(status, "generate: API error");
            return Err(LlmError::Api {
                status,
                message: error_message(&text),
            });
        }

        // Decode separately so a malformed body is a Json error, not a Network one
        let text = response.text().await?;
        let api_response: ApiResponse = serde_json::from_str(&text)?;
        parse_response(api_response)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        debug!(model = %self.model, turns = request.contents.len(), "generate: called");
        let url = self.endpoint();
        let body = request.to_body();

        with_retry(&self.retry, |attempt| {
            debug!(attempt, "generate: sending");
            self.send_once(&url, &body)
        })
        .await
    }
}

fn parse_response(api_response: ApiResponse) -> Result<GenerateResponse, LlmError> {
    let usage = api_response.usage_metadata.unwrap_or_default();
    let candidate = api_response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("response contained no candidates".to_string()))?;

    let content = candidate.content.ok_or_else(|| {
        LlmError::InvalidResponse(format!(
            "candidate has no content (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ))
    })?;

    Ok(GenerateResponse {
        content,
        finish_reason: candidate.finish_reason,
        usage,
    })
}

/// Parse `Retry-After` header into a Duration (numeric seconds only).
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get("retry-after")?.to_str().ok()?;
    let secs = value.trim().parse::<f64>().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Pull `error.message` out of a Google API error body, or fall back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
