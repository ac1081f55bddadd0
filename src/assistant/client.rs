use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Fixed generation parameters for every assistant turn: low temperature
/// biases toward conservative output, max_tokens bounds the reply.
pub const TEMPERATURE: f32 = 0.2;
pub const MAX_REPLY_TOKENS: u32 = 700;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// One role-tagged message in the outbound completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub role: &'static str,
    pub content: String,
}

/// Errors from the external completion call. All variants are recovered
/// by the proxy (fallback reply); none reach an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Cannot reach completion service at {0}")]
    Connection(String),
    #[error("Completion request timed out after {0}s")]
    Timeout(u64),
    #[error("HTTP client error: {0}")]
    Http(String),
    #[error("Completion service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

/// A chat-completion backend. Object-safe and blocking — handlers call it
/// through `tokio::task::spawn_blocking`.
pub trait ChatClient: Send + Sync {
    fn complete(&self, messages: &[OutboundMessage]) -> Result<String, CompletionError>;
}

// ═══════════════════════════════════════════════════════════
// CompletionClient — the real upstream
// ═══════════════════════════════════════════════════════════

/// HTTP client for an OpenAI-compatible chat-completion endpoint.
pub struct CompletionClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl CompletionClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Configuration from the environment; credentials are never stored
    /// anywhere else.
    pub fn from_env() -> Self {
        let base_url = std::env::var("CLINICORE_AI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_key = std::env::var("CLINICORE_AI_API_KEY").unwrap_or_default();
        let model =
            std::env::var("CLINICORE_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout_secs = std::env::var("CLINICORE_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::new(&base_url, &api_key, &model, timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request body for POST {base_url}/chat/completions
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [OutboundMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Response body from the completion endpoint
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

impl ChatClient for CompletionClient {
    fn complete(&self, messages: &[OutboundMessage]) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_REPLY_TOKENS,
        };

        let mut request = self.client.post(&url).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                CompletionError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                CompletionError::Timeout(self.timeout_secs)
            } else {
                CompletionError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        match parsed.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content),
            None => Err(CompletionError::MalformedResponse(
                "response contained no choices".to_string(),
            )),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// MockChatClient — test double
// ═══════════════════════════════════════════════════════════

/// Mock completion backend — canned reply or forced failure, recording
/// every message sequence it was called with.
pub struct MockChatClient {
    reply: String,
    fail: bool,
    calls: Mutex<Vec<Vec<OutboundMessage>>>,
}

impl MockChatClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A client whose every call fails, for fallback-path tests.
    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Message sequences of all calls so far.
    pub fn calls(&self) -> Vec<Vec<OutboundMessage>> {
        self.calls.lock().expect("mock calls lock").clone()
    }
}

impl ChatClient for MockChatClient {
    fn complete(&self, messages: &[OutboundMessage]) -> Result<String, CompletionError> {
        self.calls
            .lock()
            .expect("mock calls lock")
            .push(messages.to_vec());
        if self.fail {
            Err(CompletionError::Connection("mock".to_string()))
        } else {
            Ok(self.reply.clone())
        }
    }
}
