//! Configuration types for document summarization.
//!
//! All summarization behaviour is controlled through [`SummaryConfig`], built
//! via its [`SummaryConfigBuilder`]. The config is constructed once at process
//! entry and passed by reference to every call; the library reads no
//! credentials from the environment behind the caller's back.

use crate::error::DocSumError;
use crate::pipeline::llm::TextGenerator;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Base URL of the OpenAI-compatible chat-completions API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for a summarization request.
///
/// # Example
/// ```rust
/// use edgequake_docsum::{ApiKey, FocusPreference, LengthPreference, SummaryConfig};
///
/// let config = SummaryConfig::builder()
///     .api_key(ApiKey::new("sk-test"))
///     .model("gpt-4.1-mini")
///     .length(LengthPreference::Short)
///     .focus(FocusPreference::ActionItems)
///     .build()
///     .unwrap();
/// assert_eq!(config.min_words, 10);
/// ```
#[derive(Clone)]
pub struct SummaryConfig {
    /// LLM model identifier. If None, uses [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// Named edgequake-llm provider (e.g. "anthropic", "gemini", "ollama").
    ///
    /// When None or "openai", the built-in OpenAI-compatible client is used
    /// with [`SummaryConfig::api_key`].
    pub provider_name: Option<String>,

    /// Pre-constructed text generator. Takes precedence over everything else.
    pub generator: Option<Arc<dyn TextGenerator>>,

    /// Credential for the OpenAI-compatible endpoint.
    pub api_key: Option<ApiKey>,

    /// Base URL of the OpenAI-compatible endpoint. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Sampling temperature. Default: 0.3.
    pub temperature: f32,

    /// Maximum tokens the model may generate for the summary. Default: 1000.
    pub max_tokens: usize,

    /// Timeout for the single LLM call, in seconds. Default: 60.
    ///
    /// An unresponsive provider fails with [`DocSumError::ApiTimeout`]
    /// instead of hanging the caller.
    pub api_timeout_secs: u64,

    /// Inputs with fewer words are rejected before any LLM call. Default: 10.
    pub min_words: usize,

    /// Target verbosity. Default: [`LengthPreference::Medium`].
    pub length: LengthPreference,

    /// Aspect to emphasise. Default: [`FocusPreference::General`].
    pub focus: FocusPreference,

    /// Optional observer for the Idle → Summarizing → Result/Error transitions.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            generator: None,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.3,
            max_tokens: 1000,
            api_timeout_secs: 60,
            min_words: 10,
            length: LengthPreference::default(),
            focus: FocusPreference::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("generator", &self.generator.as_ref().map(|g| g.name().to_string()))
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("min_words", &self.min_words)
            .field("length", &self.length)
            .field("focus", &self.focus)
            .finish()
    }
}

impl SummaryConfig {
    /// Create a new builder for `SummaryConfig`.
    pub fn builder() -> SummaryConfigBuilder {
        SummaryConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model identifier that will be sent to the provider.
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Builder for [`SummaryConfig`].
pub struct SummaryConfigBuilder {
    config: SummaryConfig,
}

impl SummaryConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.config.api_key = Some(key);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn min_words(mut self, n: usize) -> Self {
        self.config.min_words = n;
        self
    }

    pub fn length(mut self, length: LengthPreference) -> Self {
        self.config.length = length;
        self
    }

    pub fn focus(mut self, focus: FocusPreference) -> Self {
        self.config.focus = focus;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummaryConfig, DocSumError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(DocSumError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(DocSumError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(DocSumError::InvalidConfig(format!(
                "base URL must be http(s), got '{}'",
                c.base_url
            )));
        }
        Ok(self.config)
    }
}

// ── Credential ───────────────────────────────────────────────────────────

/// An API key that never appears in logs, `Debug`, or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw secret, for building the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How long the generated summary should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthPreference {
    /// Two or three sentences.
    Short,
    /// One or two paragraphs. (default)
    #[default]
    Medium,
    /// Detailed, with key points.
    Long,
}

impl LengthPreference {
    pub const ALL: [LengthPreference; 3] = [
        LengthPreference::Short,
        LengthPreference::Medium,
        LengthPreference::Long,
    ];

    /// The lookup key, e.g. `"short"`.
    pub fn key(&self) -> &'static str {
        match self {
            LengthPreference::Short => "short",
            LengthPreference::Medium => "medium",
            LengthPreference::Long => "long",
        }
    }

    /// Parse a key, falling back to [`LengthPreference::Medium`] when unrecognised.
    pub fn from_key_or_default(key: &str) -> Self {
        key.parse().unwrap_or_else(|_| {
            warn!("Unknown summary length '{}', using 'medium'", key);
            Self::default()
        })
    }
}

impl FromStr for LengthPreference {
    type Err = DocSumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_key(s).as_str() {
            "short" => Ok(LengthPreference::Short),
            "medium" => Ok(LengthPreference::Medium),
            "long" => Ok(LengthPreference::Long),
            _ => Err(DocSumError::InvalidConfig(format!(
                "unknown summary length '{s}' (expected short, medium, long)"
            ))),
        }
    }
}

impl fmt::Display for LengthPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which aspect of the document the summary should emphasise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusPreference {
    /// Main themes and overall content. (default)
    #[default]
    General,
    /// Key points and main arguments.
    KeyPoints,
    /// Tasks and next steps.
    ActionItems,
    /// Decisions, conclusions, recommendations.
    Decisions,
}

impl FocusPreference {
    pub const ALL: [FocusPreference; 4] = [
        FocusPreference::General,
        FocusPreference::KeyPoints,
        FocusPreference::ActionItems,
        FocusPreference::Decisions,
    ];

    /// The lookup key, e.g. `"key_points"`.
    pub fn key(&self) -> &'static str {
        match self {
            FocusPreference::General => "general",
            FocusPreference::KeyPoints => "key_points",
            FocusPreference::ActionItems => "action_items",
            FocusPreference::Decisions => "decisions",
        }
    }

    /// Parse a key, falling back to [`FocusPreference::General`] when unrecognised.
    pub fn from_key_or_default(key: &str) -> Self {
        key.parse().unwrap_or_else(|_| {
            warn!("Unknown focus area '{}', using 'general'", key);
            Self::default()
        })
    }
}

impl FromStr for FocusPreference {
    type Err = DocSumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_key(s).as_str() {
            "general" => Ok(FocusPreference::General),
            "key_points" => Ok(FocusPreference::KeyPoints),
            "action_items" => Ok(FocusPreference::ActionItems),
            "decisions" => Ok(FocusPreference::Decisions),
            _ => Err(DocSumError::InvalidConfig(format!(
                "unknown focus area '{s}' (expected general, key_points, action_items, decisions)"
            ))),
        }
    }
}

impl fmt::Display for FocusPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Lowercase, trim, and accept `-` or space in place of `_`.
fn normalise_key(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}
