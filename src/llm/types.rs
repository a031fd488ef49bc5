//! Gemini `generateContent` wire types.
//!
//! Field names follow the REST API (camelCase). Only the subset the planner
//! reads or writes is modelled. Unknown part fields (such as a thinking
//! model's `thoughtSignature`) are kept and echoed back on the next turn.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A function invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

/// The result of a function call, sent back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

/// One piece of a turn. Exactly one field is expected to be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
    /// Fields this client does not model, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn function_call(name: impl Into<String>, args: Value) -> Self {
        Self {
            function_call: Some(FunctionCall {
                name: name.into(),
                args,
            }),
            ..Default::default()
        }
    }

    pub fn function_response(name: impl Into<String>, response: Value) -> Self {
        Self {
            function_response: Some(FunctionResponse {
                name: name.into(),
                response,
            }),
            ..Default::default()
        }
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some(Role::User),
            parts,
        }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: Some(Role::Model),
            parts,
        }
    }

    /// Non-empty text parts, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .filter(|t| !t.is_empty())
    }

    pub fn function_calls(&self) -> impl Iterator<Item = &FunctionCall> {
        self.parts.iter().filter_map(|p| p.function_call.as_ref())
    }
}

/// A callable the model may request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Input to a single model call.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub system_instruction: Option<String>,
    pub contents: Vec<Content>,
    pub tools: Vec<FunctionDeclaration>,
}

impl GenerateRequest {
    /// Request body in the REST API's shape.
    pub fn to_body(&self) -> Value {
        let mut body = serde_json::json!({ "contents": self.contents });
        if let Some(instruction) = &self.system_instruction {
            body["systemInstruction"] = serde_json::json!({ "parts": [{ "text": instruction }] });
        }
        if !self.tools.is_empty() {
            body["tools"] = serde_json::json!([{ "functionDeclarations": self.tools }]);
        }
        body
    }
}

/// Token accounting reported by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

/// Output of a single model call: the first candidate's turn.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResponse {
    pub content: Content,
    pub finish_reason: Option<String>,
    pub usage: UsageMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_uses_rest_field_names() {
        let request = GenerateRequest {
            system_instruction: Some("be brief".to_string()),
            contents: vec![Content::user(vec![Part::text("hi")])],
            tools: vec![FunctionDeclaration {
                name: "get_current_weather".to_string(),
                description: "weather".to_string(),
                parameters: json!({ "type": "object" }),
            }],
        };
        let body = request.to_body();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0], json!({ "text": "hi" }));
        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            "get_current_weather"
        );
    }

    #[test]
    fn request_body_omits_empty_tools() {
        let body = GenerateRequest::default().to_body();
        assert!(body.get("tools").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn parses_function_call_parts() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Checking." },
                        { "functionCall": { "name": "get_current_weather", "args": { "city": "Oslo" } } }
                    ]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 3 }
        });
        let parsed: ApiResponse = serde_json::from_value(raw).unwrap();
        let content = parsed.candidates[0].content.clone().unwrap();
        assert_eq!(content.role, Some(Role::Model));
        assert_eq!(content.texts().collect::<Vec<_>>(), vec!["Checking."]);
        let call = content.function_calls().next().unwrap();
        assert_eq!(call.args["city"], "Oslo");
        assert_eq!(parsed.usage_metadata.unwrap().prompt_token_count, 12);
    }

    #[test]
    fn unknown_part_fields_survive_the_next_turn() {
        let raw = json!({
            "functionCall": { "name": "get_current_weather", "args": { "city": "Oslo" } },
            "thoughtSignature": "c2lnbmF0dXJl"
        });
        let part: Part = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(part.function_call.as_ref().unwrap().name, "get_current_weather");
        assert_eq!(part.extra["thoughtSignature"], "c2lnbmF0dXJl");

        let request = GenerateRequest {
            contents: vec![Content::model(vec![part])],
            ..Default::default()
        };
        assert_eq!(request.to_body()["contents"][0]["parts"][0], raw);
    }
}
