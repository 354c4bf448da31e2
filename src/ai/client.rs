//! Hosted model client for accessibility analysis.
//!
//! Talks to the Anthropic Messages API. Every call is a single request with
//! no retry; callers decide whether a failure is worth surfacing.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::prompt;
use super::types::{
    AiError, AiTask, AltTextSuggestion, ContrastAnalysisResponse, GenerateOptions, ImageInfo,
    SimplificationLevel,
};
use crate::contrast::ElementSample;
use crate::storage::ExtensionConfig;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";

/// API version header value.
const API_VERSION: &str = "2023-06-01";

/// Request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Accessibility operations backed by a hosted model.
pub trait AccessibilityAi: Send + Sync {
    /// Analyze element colors and propose fixes.
    fn analyze_contrast(
        &self,
        elements: &[ElementSample],
        min_contrast: f64,
    ) -> impl Future<Output = Result<ContrastAnalysisResponse, AiError>> + Send;

    /// Rewrite text at a simpler reading level.
    fn simplify_content(
        &self,
        content: &str,
        level: SimplificationLevel,
    ) -> impl Future<Output = Result<String, AiError>> + Send;

    /// Review text for readability problems.
    fn analyze_readability(
        &self,
        content: &str,
    ) -> impl Future<Output = Result<String, AiError>> + Send;

    /// Propose alt text for images.
    fn generate_alt_text(
        &self,
        images: &[ImageInfo],
    ) -> impl Future<Output = Result<Vec<AltTextSuggestion>, AiError>> + Send;
}

/// Hosted model API client.
pub struct AiClient {
    /// HTTP client
    http: reqwest::Client,
    /// Base URL for API
    base_url: String,
    /// API key for authentication
    api_key: String,
    /// Model identifier
    model: String,
    /// Upper bound on reply tokens
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error: ErrorDetail,
}

#[derive(Debug, Deserialize, Default)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

impl AiClient {
    /// Create a client against the default endpoint and model.
    pub fn new(api_key: String) -> Result<Self, AiError> {
        Self::with_options(api_key, DEFAULT_API_URL.to_string(), DEFAULT_MODEL.to_string(), 4000)
    }

    /// Create a client with a custom endpoint, model and token limit.
    pub fn with_options(
        api_key: String,
        base_url: String,
        model: String,
        max_tokens: u32,
    ) -> Result<Self, AiError> {
        if api_key.trim().is_empty() {
            return Err(AiError::NotConfigured);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            max_tokens,
        })
    }

    /// Build a client from the stored configuration.
    pub fn from_config(config: &ExtensionConfig) -> Result<Self, AiError> {
        let api_key = config
            .model_api_key()
            .ok_or(AiError::NotConfigured)?
            .to_string();

        Self::with_options(
            api_key,
            config.ai.base_url.clone(),
            config.ai.model.clone(),
            config.ai.max_tokens,
        )
    }

    /// Model identifier in use.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Free-form generation.
    pub async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<String, AiError> {
        let system = generate_system_prompt(&options);
        self.complete(system, prompt, options.temperature, options.max_tokens).await
    }

    /// Run an analysis task over `content`.
    pub async fn analyze(&self, content: &str, task: Option<AiTask>) -> Result<String, AiError> {
        let system = prompt::system_prompt(task);
        let message = prompt::user_message(content, task);
        self.complete(&system, &message, 0.2, self.max_tokens).await
    }

    /// Send one user message and return the concatenated text blocks.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, AiError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens,
            system,
            temperature,
            messages: vec![Message {
                role: "user",
                content: user,
            }],
        };

        tracing::debug!("POST {} (model {}, {} chars)", url, self.model, user.len());

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let parsed: MessagesResponse = response
                .json()
                .await
                .map_err(|e| AiError::Serialization(e.to_string()))?;
            extract_text(parsed)
        } else {
            let body = response.text().await.unwrap_or_default();
            let error = error_from_status(status.as_u16(), &body);
            tracing::warn!("Model API request failed: {}", error);
            Err(error)
        }
    }
}

fn generate_system_prompt(options: &GenerateOptions) -> &str {
    options
        .system_prompt
        .as_deref()
        .unwrap_or(prompt::DEFAULT_GENERATE_SYSTEM_PROMPT)
}

/// Map a failed response's status and body to an error.
fn error_from_status(status: u16, body: &str) -> AiError {
    if status == 429 {
        return AiError::RateLimited;
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_default();
    let message = if message.is_empty() {
        format!("API returned status {}", status)
    } else {
        message
    };

    AiError::Api { status, message }
}

fn extract_text(response: MessagesResponse) -> Result<String, AiError> {
    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();

    if text.is_empty() {
        return Err(AiError::InvalidResponse("reply contained no text".to_string()));
    }
    Ok(text)
}

impl AccessibilityAi for AiClient {
    async fn analyze_contrast(
        &self,
        elements: &[ElementSample],
        min_contrast: f64,
    ) -> Result<ContrastAnalysisResponse, AiError> {
        tracing::info!("Requesting contrast analysis for {} elements", elements.len());
        let request = prompt::contrast_prompt(elements, min_contrast)?;
        let system = prompt::system_prompt(Some(AiTask::ContrastAnalysis));
        let message = prompt::user_message(&request, Some(AiTask::ContrastAnalysis));
        let reply = self.complete(&system, &message, 0.1, self.max_tokens).await?;
        prompt::parse_contrast_reply(&reply)
    }

    async fn simplify_content(
        &self,
        content: &str,
        level: SimplificationLevel,
    ) -> Result<String, AiError> {
        tracing::info!("Simplifying {} chars at {} level", content.len(), level);
        let system = prompt::simplify_system_prompt(level);
        let message = prompt::simplify_message(content, level);
        self.complete(&system, &message, 0.3, self.max_tokens).await
    }

    async fn analyze_readability(&self, content: &str) -> Result<String, AiError> {
        tracing::info!("Requesting readability analysis for {} chars", content.len());
        self.analyze(content, Some(AiTask::ReadabilityAnalysis)).await
    }

    async fn generate_alt_text(
        &self,
        images: &[ImageInfo],
    ) -> Result<Vec<AltTextSuggestion>, AiError> {
        tracing::info!("Generating alt text for {} images", images.len());
        let request = prompt::alt_text_prompt(images)?;
        let reply = self
            .generate(
                &request,
                GenerateOptions {
                    temperature: 0.3,
                    max_tokens: self.max_tokens,
                    ..Default::default()
                },
            )
            .await?;
        prompt::parse_alt_text_reply(&reply)
    }
}
