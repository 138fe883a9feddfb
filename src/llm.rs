//! OpenAI-compatible chat-completion client.
//!
//! Shared HTTP plumbing for the classifier and the chat assistant. All
//! failures come back as `Err(String)`; callers decide whether to fall back
//! to offline behavior.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Remote calls time out after this long. There is no cancellation token:
/// the pipeline is sequential, so an abandoned queue simply lets the
/// in-flight call finish.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const MAX_OUTPUT_TOKENS: u32 = 1000;

/// A role-tagged chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".to_string(), content: content.into() }
    }
}

/// Per-call options
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatOptions {
    /// Request a structured JSON object response
    pub json: bool,
    /// Sampling temperature (default 0.3)
    pub temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Send a chat-completion request and return the assistant's text.
///
/// Any transport error, non-success status, or unparseable response is an
/// `Err` — callers treat that as a hard failure of the remote path.
pub async fn call_chat(
    api_key: &str,
    model: &str,
    messages: Vec<ChatMessage>,
    options: ChatOptions,
) -> Result<String, String> {
    if api_key.is_empty() {
        return Err("No API key configured".to_string());
    }

    let request = ChatRequest {
        model: model.to_string(),
        messages,
        temperature: options.temperature.unwrap_or(0.3),
        max_tokens: MAX_OUTPUT_TOKENS,
        response_format: options.json.then(|| ResponseFormat {
            format_type: "json_object".to_string(),
        }),
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

    let response = client
        .post(API_URL)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await
        .map_err(|e| format!("HTTP request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        // Prefer the API's own error message when the body is parseable
        let detail = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .map(|e| e.message)
            .unwrap_or(body);
        return Err(format!("API error {}: {}", status, detail));
    }

    let api_response: ChatResponse = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    Ok(api_response
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .unwrap_or_default())
}
