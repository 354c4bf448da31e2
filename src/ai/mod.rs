//! Hosted model integration.
//!
//! Provides AI-assisted accessibility features:
//! - Contrast analysis with suggested colors and CSS fixes
//! - Content simplification to a target reading level
//! - Alt text generation for images

pub mod client;
pub mod prompt;
pub mod types;

// Re-exports for convenience
pub use client::{AccessibilityAi, AiClient, DEFAULT_API_URL, DEFAULT_MODEL};
pub use types::{
    AiContrastIssue, AiError, AiTask, AltTextSuggestion, ContrastAnalysis,
    ContrastAnalysisResponse, Dimensions, GenerateOptions, ImageInfo, SimplificationLevel,
    SuggestedColors,
};
