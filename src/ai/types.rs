//! Shared AI types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for hosted model calls.
#[derive(Debug, Error)]
pub enum AiError {
    /// No API key configured
    #[error("AI API key not configured")]
    NotConfigured,

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API answered with an error status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the error body
        message: String,
    },

    /// Rate limited by the API
    #[error("Rate limited - try again later")]
    RateLimited,

    /// The model reply did not have the expected shape
    #[error("Invalid AI response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AiError {
    fn from(err: serde_json::Error) -> Self {
        AiError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Http(err.to_string())
    }
}

/// Analysis task, selects the system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiTask {
    ContrastAnalysis,
    ReadabilityAnalysis,
}

impl AiTask {
    /// Identifier used in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            AiTask::ContrastAnalysis => "contrast_analysis",
            AiTask::ReadabilityAnalysis => "readability_analysis",
        }
    }
}

impl std::fmt::Display for AiTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How far content simplification should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimplificationLevel {
    /// Grade 8-9 reading level
    Mild,
    /// Grade 6-7 reading level
    #[default]
    Moderate,
    /// Grade 4-5 reading level
    Strong,
}

impl SimplificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimplificationLevel::Mild => "mild",
            SimplificationLevel::Moderate => "moderate",
            SimplificationLevel::Strong => "strong",
        }
    }

    /// Target school grade range.
    pub fn grade_range(&self) -> &'static str {
        match self {
            SimplificationLevel::Mild => "8-9",
            SimplificationLevel::Moderate => "6-7",
            SimplificationLevel::Strong => "4-5",
        }
    }
}

impl std::fmt::Display for SimplificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SimplificationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mild" => Ok(SimplificationLevel::Mild),
            "moderate" => Ok(SimplificationLevel::Moderate),
            "strong" => Ok(SimplificationLevel::Strong),
            other => Err(format!("unknown simplification level: {other}")),
        }
    }
}

/// Sampling options for a free-form generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    pub system_prompt: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            system_prompt: None,
            temperature: 0.7,
            max_tokens: 4000,
        }
    }
}

/// Colors the model proposes for an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedColors {
    pub foreground: String,
    pub background: String,
}

/// One element the model flagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiContrastIssue {
    /// Selector of the flagged element
    pub element: String,
    pub current_contrast: f64,
    pub recommendation: String,
    pub suggested_colors: SuggestedColors,
}

/// Overall assessment returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastAnalysis {
    /// Score in [0, 1]
    pub overall_score: f64,
    #[serde(default)]
    pub issues: Vec<AiContrastIssue>,
}

/// Structured reply to a contrast analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastAnalysisResponse {
    pub analysis: ContrastAnalysis,
    /// Stylesheet that applies the suggested colors
    pub css_fixes: String,
}

/// Image dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// An image that needs alt text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Nearby text that may help describe the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contextual_text: Option<String>,
}

impl ImageInfo {
    /// True when the image has no usable alt text.
    pub fn missing_alt(&self) -> bool {
        self.current_alt.as_deref().map_or(true, |a| a.trim().is_empty())
    }
}

/// Alt text proposed for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltTextSuggestion {
    pub src: String,
    pub alt: String,
}
