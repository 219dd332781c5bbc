/// LLM Client: the single point of entry for all remote text-completion calls.
///
/// No other module may call the completion API directly. Handlers depend on
/// the `ChatCompletion` trait, never on the concrete client, and the classical
/// ML inference path does not depend on this module at all.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const APP_REFERER: &str = "https://skillence.app";
const APP_TITLE: &str = "Skillence Career Advisor";
const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} attempts")]
    RateLimited { retries: u32 },

    #[error("API key rejected")]
    Unauthorized,

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl LlmError {
    /// True when the reply arrived but could not be used.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            LlmError::EmptyContent | LlmError::Parse(_) | LlmError::Malformed(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider for a JSON object reply.
    pub json_response: bool,
    /// Overrides the client's default timeout.
    pub timeout: Option<Duration>,
}

/// Seam between handlers and the remote completion service.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Returns the trimmed text of the first choice.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct OpenRouterRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenRouterError {
    error: OpenRouterErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenRouterErrorBody {
    message: String,
}

fn first_choice_text(body: &str) -> Result<String, LlmError> {
    let parsed: OpenRouterResponse = serde_json::from_str(body)?;
    if let Some(usage) = &parsed.usage {
        debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "LLM call succeeded"
        );
    }
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Malformed("response has no choices".to_string()))?;
    let text = choice
        .message
        .and_then(|m| m.content)
        .map(|c| c.trim().to_string())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(text)
}

/// OpenRouter chat-completions client with retry and backoff.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
    url: String,
    timeout: Duration,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            model,
            url: OPENROUTER_API_URL.to_string(),
            timeout,
        })
    }

    /// Points the client at a different endpoint (e.g. a local proxy).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatCompletion for OpenRouterClient {
    /// Retries connection failures, 429 and 5xx with exponential backoff.
    /// The whole call, retries and backoff included, shares one deadline.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let timeout = request.timeout.unwrap_or(self.timeout);
        match tokio::time::timeout(timeout, self.send_with_retries(&request, timeout)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "LLM call deadline elapsed");
                Err(LlmError::Timeout(timeout))
            }
        }
    }
}

impl OpenRouterClient {
    async fn send_with_retries(
        &self,
        request: &CompletionRequest,
        timeout: Duration,
    ) -> Result<String, LlmError> {
        let body = OpenRouterRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request
                .json_response
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "LLM call failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.url)
                .bearer_auth(&self.api_key)
                .header("HTTP-Referer", APP_REFERER)
                .header("X-Title", APP_TITLE)
                .timeout(timeout)
                .json(&body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) if e.is_timeout() => return Err(LlmError::Timeout(timeout)),
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) if e.is_timeout() => return Err(LlmError::Timeout(timeout)),
                Err(e) => return Err(LlmError::Http(e)),
            };

            if status.as_u16() == 429 {
                warn!("LLM API rate limited");
                last_error = Some(LlmError::RateLimited {
                    retries: attempt + 1,
                });
                continue;
            }
            if status.as_u16() == 401 {
                return Err(LlmError::Unauthorized);
            }

            let message = || {
                serde_json::from_str::<OpenRouterError>(&text)
                    .map(|e| e.error.message)
                    .unwrap_or_else(|_| text.clone())
            };
            if status.is_server_error() {
                warn!(status = status.as_u16(), "LLM API server error");
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: message(),
                });
                continue;
            }
            if !status.is_success() {
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: message(),
                });
            }

            return first_choice_text(&text);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_ATTEMPTS,
        }))
    }
}

/// Calls the model and deserializes the outermost JSON object of its reply.
pub async fn complete_json<T: DeserializeOwned>(
    llm: &dyn ChatCompletion,
    request: CompletionRequest,
) -> Result<T, LlmError> {
    let reply = llm.complete(request).await?;
    parse_json_reply(&reply)
}

/// Parses the span from the first `{` to the last `}`; falls back to the whole text.
pub fn parse_json_reply<T: DeserializeOwned>(reply: &str) -> Result<T, LlmError> {
    let text = extract_json_object(reply).unwrap_or(reply.trim());
    serde_json::from_str(text).map_err(LlmError::Parse)
}

/// Outermost `{ ... }` span of `text`, ignoring code fences or prose around it.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
