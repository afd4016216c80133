//! OpenAI-compatible chat-completions provider.
//!
//! Speaks the `/v1/chat/completions` API shape, so it also works against
//! self-hosted gateways that expose the same endpoint. Async HTTP
//! internals with a synchronous `SelectorGenerator` wrapper; bounded
//! retry on transport errors.

use crate::parser::{parse_field_map, parse_field_set};
use crate::prompt;
use crate::LlmError;
use newshound_domain::traits::SelectorGenerator;
use newshound_domain::{Field, FieldSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Default API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default timeout for a single request (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of transport-level retry attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Sampling temperature for selector generation. Low on purpose: we want
/// reproducible structural answers, not creative ones.
const TEMPERATURE: f64 = 0.3;

/// Chat-completions backed selector generator.
pub struct OpenAiGenerator {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAiGenerator {
    /// Create a generator against an endpoint and model.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Communication(format!("client build failed: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a generator against the default endpoint and model.
    pub fn with_defaults(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, api_key, DEFAULT_MODEL)
    }

    /// Set the maximum number of transport retry attempts.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Send one system+user exchange and return the raw assistant text.
    pub async fn chat(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        let request_body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user.to_string(),
                },
            ],
            temperature: TEMPERATURE,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response
                            .json::<ChatResponse>()
                            .await
                            .map_err(|e| {
                                LlmError::InvalidResponse(format!("Failed to parse response: {e}"))
                            })?;
                        let content = parsed
                            .choices
                            .into_iter()
                            .next()
                            .map(|c| c.message.content)
                            .ok_or_else(|| {
                                LlmError::InvalidResponse("Response had no choices".to_string())
                            })?;
                        debug!(chars = content.len(), "chat completion received");
                        return Ok(content);
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {status}: {error_text}"
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {e}")));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                warn!(attempts, "chat completion attempt failed, retrying");
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    /// Blocking wrapper used by the synchronous trait surface.
    fn chat_blocking(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| LlmError::Other(format!("runtime build failed: {e}")))?;
        runtime.block_on(self.chat(system, user))
    }
}

impl SelectorGenerator for OpenAiGenerator {
    type Error = LlmError;

    fn propose_initial(&self, cleaned_html: &str) -> Result<FieldSet<String>, Self::Error> {
        let response = self.chat_blocking(prompt::INITIAL_PROMPT, cleaned_html)?;
        parse_field_set(&response)
    }

    fn propose_corrections(
        &self,
        _failed: &[Field],
        feedback: &BTreeMap<Field, String>,
        current: &FieldSet<String>,
        cleaned_html: &str,
    ) -> Result<BTreeMap<Field, String>, Self::Error> {
        let system = prompt::correction_prompt(current, feedback);
        let response = self.chat_blocking(&system, cleaned_html)?;
        parse_field_map(&response)
    }

    fn extract_direct(
        &self,
        failed: &[Field],
        feedback: &BTreeMap<Field, String>,
        cleaned_html: &str,
    ) -> Result<BTreeMap<Field, String>, Self::Error> {
        let system = prompt::direct_prompt(failed, feedback);
        let response = self.chat_blocking(&system, cleaned_html)?;
        parse_field_map(&response)
    }
}
