//! Typed request/response messages exchanged with the background worker.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::ai::{AltTextSuggestion, ContrastAnalysisResponse, ImageInfo, SimplificationLevel};
use crate::contrast::{AuditReport, ContrastCheck, ElementSample};

/// Extension features that can be switched on from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Feature {
    Contrast,
    ContrastOptimization,
    AltText,
    Simplify,
    Reading,
    FocusMode,
    WebsiteTheme,
    TextToSpeech,
}

impl Feature {
    /// Features that need a model API key before they can run.
    pub fn requires_ai(&self) -> bool {
        matches!(self, Feature::Simplify | Feature::Contrast | Feature::Reading)
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feature::Contrast => write!(f, "Contrast Analysis"),
            Feature::ContrastOptimization => write!(f, "Contrast Optimization"),
            Feature::AltText => write!(f, "Alt Text"),
            Feature::Simplify => write!(f, "Content Simplifier"),
            Feature::Reading => write!(f, "Reading Assistant"),
            Feature::FocusMode => write!(f, "Focus Mode"),
            Feature::WebsiteTheme => write!(f, "Website Theme"),
            Feature::TextToSpeech => write!(f, "Text to Speech"),
        }
    }
}

/// Requests handled by the background worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    /// Evaluate one foreground/background pair locally
    CheckContrast { foreground: String, background: String },
    /// Audit collected elements locally
    AuditPage {
        elements: Vec<ElementSample>,
        #[serde(default)]
        min_ratio: Option<f64>,
    },
    /// Ask the hosted model for contrast fixes
    AnalyzeContrast {
        elements: Vec<ElementSample>,
        #[serde(default)]
        min_contrast: Option<f64>,
    },
    SimplifyContent {
        content: String,
        #[serde(default)]
        level: Option<SimplificationLevel>,
    },
    /// Ask the hosted model for readability feedback
    AnalyzeReadability { content: String },
    GenerateAltText { images: Vec<ImageInfo> },
    ActivateFeature { feature: Feature },
    OpenSettings,
}

impl Request {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Request::CheckContrast { .. } => "CHECK_CONTRAST",
            Request::AuditPage { .. } => "AUDIT_PAGE",
            Request::AnalyzeContrast { .. } => "ANALYZE_CONTRAST",
            Request::SimplifyContent { .. } => "SIMPLIFY_CONTENT",
            Request::AnalyzeReadability { .. } => "ANALYZE_READABILITY",
            Request::GenerateAltText { .. } => "GENERATE_ALT_TEXT",
            Request::ActivateFeature { .. } => "ACTIVATE_FEATURE",
            Request::OpenSettings => "OPEN_SETTINGS",
        }
    }
}

/// Replies from the background worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Response {
    Contrast { check: ContrastCheck },
    Audit { report: AuditReport },
    /// `None` when the model is unavailable or its reply was unusable
    ContrastAnalysis { result: Option<ContrastAnalysisResponse> },
    Simplified { text: String },
    Readability { feedback: String },
    AltText { suggestions: Vec<AltTextSuggestion> },
    /// The feature needs an API key that is not configured
    ShowApiKeyPrompt { feature: Feature },
    FeatureActivated { feature: Feature },
    Settings { path: String },
    Error { message: String },
}

/// A request in flight, with the channel its reply goes back on.
#[derive(Debug)]
pub struct Envelope {
    pub id: Uuid,
    pub request: Request,
    pub reply: oneshot::Sender<Response>,
}
