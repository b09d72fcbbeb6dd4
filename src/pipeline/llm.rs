//! LLM interaction: send the assembled prompt and return the model's text.
//!
//! All prompt wording lives in [`crate::prompts`]; this module only moves a
//! prompt to a provider and maps failures to [`DocSumError`].
//!
//! Two [`TextGenerator`] implementations are provided:
//!
//! * [`ChatCompletionsGenerator`] — an OpenAI-compatible `/chat/completions`
//!   client that authenticates with the [`ApiKey`] carried in
//!   [`SummaryConfig`]. This is the default path.
//! * [`ProviderGenerator`] — wraps any `edgequake_llm` provider (Anthropic,
//!   Gemini, Ollama, …) created through `ProviderFactory`.
//!
//! There is exactly one attempt per request: no retry, no backoff. The call is
//! bounded by `api_timeout_secs` so an unresponsive provider cannot hang the
//! caller.

use crate::config::{ApiKey, SummaryConfig};
use crate::error::DocSumError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Sampling and budget options for one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl GenerationOptions {
    pub fn from_config(config: &SummaryConfig) -> Self {
        Self {
            model: config.model_or_default().to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// A completed generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// A text-generation service that answers one prompt with one completion.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name used in logs and error messages.
    fn name(&self) -> &str;

    /// Send `prompt` as a single user message and return the reply.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Generation, DocSumError>;
}

/// Send the prompt once, bounded by the configured timeout.
pub async fn generate_summary(
    generator: &Arc<dyn TextGenerator>,
    prompt: &str,
    config: &SummaryConfig,
) -> Result<Generation, DocSumError> {
    let options = GenerationOptions::from_config(config);
    let timeout = Duration::from_secs(config.api_timeout_secs);
    let start = Instant::now();

    info!(
        "Sending {} chars to '{}' (model {})",
        prompt.len(),
        generator.name(),
        options.model
    );

    let generation = tokio::time::timeout(timeout, generator.generate(prompt, &options))
        .await
        .map_err(|_| {
            warn!("LLM call timed out after {}s", config.api_timeout_secs);
            DocSumError::ApiTimeout {
                secs: config.api_timeout_secs,
            }
        })??;

    if generation.text.trim().is_empty() {
        return Err(DocSumError::EmptyResponse {
            provider: generator.name().to_string(),
        });
    }

    debug!(
        "{} input tokens, {} output tokens, {:?}",
        generation.input_tokens,
        generation.output_tokens,
        start.elapsed()
    );
    Ok(generation)
}

/// Pick the generator described by the config.
///
/// Resolution order:
///
/// 1. **Pre-built generator** (`config.generator`) — used as-is.
/// 2. **Named provider** (`config.provider_name`, anything but `"openai"`) —
///    created through [`ProviderFactory::create_llm_provider`], which reads
///    that provider's own key variable.
/// 3. **OpenAI-compatible client** with `config.api_key` and
///    `config.base_url`.
///
/// Fails with [`DocSumError::MissingCredential`] when none applies.
pub fn resolve_generator(config: &SummaryConfig) -> Result<Arc<dyn TextGenerator>, DocSumError> {
    if let Some(ref generator) = config.generator {
        return Ok(Arc::clone(generator));
    }

    if let Some(ref name) = config.provider_name {
        if !name.eq_ignore_ascii_case("openai") {
            let generator = ProviderGenerator::from_factory(name, config.model_or_default())?;
            return Ok(Arc::new(generator));
        }
    }

    let key = config.api_key.clone().ok_or(DocSumError::MissingCredential)?;
    let generator = ChatCompletionsGenerator::new(
        key,
        &config.base_url,
        Duration::from_secs(config.api_timeout_secs),
    )?;
    Ok(Arc::new(generator))
}

// ── OpenAI-compatible client ─────────────────────────────────────────────

/// Minimal client for OpenAI-compatible `/chat/completions` endpoints.
pub struct ChatCompletionsGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: ApiKey,
    timeout_secs: u64,
}

impl ChatCompletionsGenerator {
    pub fn new(api_key: ApiKey, base_url: &str, timeout: Duration) -> Result<Self, DocSumError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DocSumError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatRequestMessage<'a>; 1],
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatRequest<'a> {
    fn new(prompt: &'a str, options: &'a GenerationOptions) -> Self {
        Self {
            model: &options.model,
            messages: [ChatRequestMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

const OPENAI: &str = "openai";

/// Decode a successful chat-completions body into a [`Generation`].
fn parse_chat_response(body: &str) -> Result<Generation, DocSumError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| DocSumError::MalformedResponse {
            provider: OPENAI.into(),
            detail: e.to_string(),
        })?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| DocSumError::EmptyResponse {
            provider: OPENAI.into(),
        })?;

    let (input_tokens, output_tokens) = response
        .usage
        .map(|u| (u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();

    Ok(Generation {
        text,
        input_tokens,
        output_tokens,
    })
}

/// Map a non-success HTTP status to the matching error.
fn status_error(status: u16, retry_after: Option<u64>, body: &str) -> DocSumError {
    let detail = api_error_message(body).unwrap_or_else(|| body.trim().to_string());
    match status {
        401 | 403 => DocSumError::AuthError {
            provider: OPENAI.into(),
            detail,
        },
        429 => DocSumError::RateLimitExceeded {
            provider: OPENAI.into(),
            retry_after_secs: retry_after,
        },
        _ => DocSumError::LlmApiError {
            message: format!("HTTP {status}: {detail}"),
        },
    }
}

/// Pull `error.message` out of an OpenAI-style error body.
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl TextGenerator for ChatCompletionsGenerator {
    fn name(&self) -> &str {
        OPENAI
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Generation, DocSumError> {
        let request = ChatRequest::new(prompt, options);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DocSumError::ApiTimeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    DocSumError::LlmApiError {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response.text().await.map_err(|e| DocSumError::MalformedResponse {
            provider: OPENAI.into(),
            detail: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), retry_after, &body));
        }

        parse_chat_response(&body)
    }
}

// ── edgequake-llm providers ──────────────────────────────────────────────

/// Adapter from an `edgequake_llm` provider to [`TextGenerator`].
pub struct ProviderGenerator {
    name: String,
    provider: Arc<dyn LLMProvider>,
}

impl ProviderGenerator {
    pub fn new(name: impl Into<String>, provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            name: name.into(),
            provider,
        }
    }

    /// Instantiate a named provider with the given model.
    pub fn from_factory(provider_name: &str, model: &str) -> Result<Self, DocSumError> {
        let provider = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
            DocSumError::ProviderNotConfigured {
                provider: provider_name.to_string(),
                hint: format!("{e}"),
            }
        })?;
        Ok(Self::new(provider_name, provider))
    }
}

#[async_trait]
impl TextGenerator for ProviderGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Generation, DocSumError> {
        let messages = vec![ChatMessage::user(prompt)];
        let completion = CompletionOptions {
            temperature: Some(options.temperature),
            max_tokens: Some(options.max_tokens),
            ..Default::default()
        };

        let response = self
            .provider
            .chat(&messages, Some(&completion))
            .await
            .map_err(|e| DocSumError::LlmApiError {
                message: format!("{}: {}", self.name, e),
            })?;

        Ok(Generation {
            text: response.content,
            input_tokens: response.prompt_tokens as u64,
            output_tokens: response.completion_tokens as u64,
        })
    }
}
