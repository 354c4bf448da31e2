//! Prompt construction and reply parsing for the hosted model.

use serde::Deserialize;

use super::types::{
    AiError, AiTask, AltTextSuggestion, ContrastAnalysisResponse, ImageInfo, SimplificationLevel,
};
use crate::contrast::ElementSample;

const BASE_SYSTEM_PROMPT: &str = "You are an AI assistant specialized in web accessibility analysis.";

/// Default system prompt for free-form generation.
pub const DEFAULT_GENERATE_SYSTEM_PROMPT: &str =
    "You are an AI assistant specialized in creating accessible content.";

/// System prompt for an analysis task.
pub fn system_prompt(task: Option<AiTask>) -> String {
    let suffix = match task {
        Some(AiTask::ContrastAnalysis) => {
            " Analyze the provided HTML elements for contrast issues according to WCAG 2.2 standards."
        }
        Some(AiTask::ReadabilityAnalysis) => {
            " Analyze the provided text for readability issues and suggest improvements."
        }
        None => "",
    };
    format!("{BASE_SYSTEM_PROMPT}{suffix}")
}

/// User message for an analysis task.
pub fn user_message(content: &str, task: Option<AiTask>) -> String {
    match task {
        Some(task) => format!("Task: {task}\n\nContent to analyze:\n{content}"),
        None => content.to_string(),
    }
}

/// Prompt asking for a structured contrast analysis with CSS fixes.
pub fn contrast_prompt(elements: &[ElementSample], min_contrast: f64) -> Result<String, AiError> {
    let elements_json = serde_json::to_string(elements)?;

    Ok(format!(
        r##"Analyze these website elements for contrast issues and provide specific CSS fixes.
Elements: {elements_json}

IMPORTANT: You must respond with a valid JSON object in exactly this format, with no additional text:
{{
  "analysis": {{
    "overall_score": 0.75,
    "issues": [
      {{
        "element": "p.some-class",
        "current_contrast": 2.5,
        "recommendation": "Increase contrast by darkening text",
        "suggested_colors": {{
          "foreground": "#000000",
          "background": "#FFFFFF"
        }}
      }}
    ]
  }},
  "css_fixes": "p.some-class {{ color: #000000; background-color: #FFFFFF; }}"
}}

Ensure all CSS selectors are specific and valid. Target elements by their exact class names, IDs, or tag names from the input data. The contrast ratio must meet WCAG {min_contrast}:1 standard."##
    ))
}

/// System prompt for simplifying content to a reading level.
pub fn simplify_system_prompt(level: SimplificationLevel) -> String {
    format!(
        "You are an AI assistant specialized in making content more accessible.\n\
         Your task is to simplify text to a {level} reading level while preserving the key information.\n\
         For a \"mild\" level, aim for grade {} reading level.\n\
         For a \"moderate\" level, aim for grade {} reading level.\n\
         For a \"strong\" level, aim for grade {} reading level.",
        SimplificationLevel::Mild.grade_range(),
        SimplificationLevel::Moderate.grade_range(),
        SimplificationLevel::Strong.grade_range(),
    )
}

/// User message for content simplification.
pub fn simplify_message(content: &str, level: SimplificationLevel) -> String {
    format!(
        "Please simplify the following text to a {level} reading level. Preserve all key \
         information but use simpler language, shorter sentences, and clearer structure:\n\n{content}"
    )
}

/// Prompt asking for alt text for each image.
pub fn alt_text_prompt(images: &[ImageInfo]) -> Result<String, AiError> {
    let images_json = serde_json::to_string(images)?;

    Ok(format!(
        r#"Write concise, descriptive alt text for each of these images. Use the src, dimensions and nearby text as context. Do not start with "image of".
Images: {images_json}

Respond with a valid JSON object in exactly this format, with no additional text:
{{"suggestions": [{{"src": "<image src>", "alt": "<alt text>"}}]}}"#
    ))
}

/// Slice from the first `{` to the last `}`, dropping prose and code fences.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

/// Parse and validate a contrast analysis reply.
pub fn parse_contrast_reply(reply: &str) -> Result<ContrastAnalysisResponse, AiError> {
    let json = extract_json_object(reply)
        .ok_or_else(|| AiError::InvalidResponse("no JSON object in reply".to_string()))?;

    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| AiError::InvalidResponse(format!("malformed JSON: {e}")))?;

    for field in ["analysis", "css_fixes"] {
        if value.get(field).map_or(true, serde_json::Value::is_null) {
            return Err(AiError::InvalidResponse(format!("missing `{field}`")));
        }
    }

    let response: ContrastAnalysisResponse = serde_json::from_value(value)
        .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

    let score = response.analysis.overall_score;
    if !(0.0..=1.0).contains(&score) {
        return Err(AiError::InvalidResponse(format!(
            "overall_score {score} outside [0, 1]"
        )));
    }

    Ok(response)
}

#[derive(Deserialize)]
struct AltTextReply {
    suggestions: Vec<AltTextSuggestion>,
}

/// Parse an alt text reply.
pub fn parse_alt_text_reply(reply: &str) -> Result<Vec<AltTextSuggestion>, AiError> {
    let json = extract_json_object(reply)
        .ok_or_else(|| AiError::InvalidResponse("no JSON object in reply".to_string()))?;

    let parsed: AltTextReply =
        serde_json::from_str(json).map_err(|e| AiError::InvalidResponse(e.to_string()))?;
    Ok(parsed.suggestions)
}
