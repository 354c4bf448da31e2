//! Page-wide contrast audit over collected element samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::color::parse_color;
use super::evaluator::{contrast_ratio, AA_NORMAL_MIN};

/// Characters of element text kept in a sample.
pub const TEXT_EXCERPT_LEN: usize = 50;

/// Default minimum ratio an element must reach.
pub const DEFAULT_MIN_RATIO: f64 = AA_NORMAL_MIN;

/// A text element's computed colors as collected from a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSample {
    /// CSS selector identifying the element
    pub selector: String,
    /// Lowercase tag name
    pub tag: String,
    /// Text excerpt
    pub text: String,
    /// Computed foreground color string
    pub foreground: String,
    /// Computed background color string
    pub background: String,
}

impl ElementSample {
    /// Build a sample, truncating `text` to the excerpt length.
    pub fn new(
        selector: impl Into<String>,
        tag: impl Into<String>,
        text: &str,
        foreground: impl Into<String>,
        background: impl Into<String>,
    ) -> Self {
        Self {
            selector: selector.into(),
            tag: tag.into(),
            text: text.chars().take(TEXT_EXCERPT_LEN).collect(),
            foreground: foreground.into(),
            background: background.into(),
        }
    }
}

/// An element whose contrast falls below the audit minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastIssue {
    /// Position of the sample in the audited slice
    pub index: usize,
    pub selector: String,
    pub foreground: String,
    pub background: String,
    pub ratio: f64,
    pub recommendation: String,
}

/// Result of auditing a set of samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// Minimum ratio applied
    pub min_ratio: f64,
    /// Samples with text and parseable colors
    pub evaluated: usize,
    /// Samples skipped for unparseable colors
    pub skipped: usize,
    /// Fraction of evaluated samples that pass, 1.0 when nothing was evaluated
    pub score: f64,
    /// Elements below the minimum
    pub issues: Vec<ContrastIssue>,
    /// When the audit ran
    pub generated_at: DateTime<Utc>,
}

impl AuditReport {
    /// True when no element fell below the minimum.
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Recommendation text attached to each issue.
pub fn recommendation(min_ratio: f64, ratio: f64) -> String {
    format!(
        "Increase contrast to at least {:.1}:1. Current: {:.2}:1",
        min_ratio, ratio
    )
}

/// Evaluate every sample with non-empty text against `min_ratio`.
pub fn audit_elements(samples: &[ElementSample], min_ratio: f64) -> AuditReport {
    let mut evaluated = 0;
    let mut skipped = 0;
    let mut issues = Vec::new();

    for (index, sample) in samples
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.text.trim().is_empty())
    {
        let colors = parse_color(&sample.foreground)
            .and_then(|fg| parse_color(&sample.background).map(|bg| (fg, bg)));

        let (fg, bg) = match colors {
            Ok(pair) => pair,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", sample.selector, e);
                skipped += 1;
                continue;
            }
        };

        evaluated += 1;
        let ratio = contrast_ratio(fg, bg);
        if ratio < min_ratio {
            issues.push(ContrastIssue {
                index,
                selector: sample.selector.clone(),
                foreground: sample.foreground.clone(),
                background: sample.background.clone(),
                ratio,
                recommendation: recommendation(min_ratio, ratio),
            });
        }
    }

    let score = if evaluated == 0 {
        1.0
    } else {
        (evaluated - issues.len()) as f64 / evaluated as f64
    };

    tracing::info!(
        "Contrast audit: {} evaluated, {} skipped, {} issues",
        evaluated,
        skipped,
        issues.len()
    );

    AuditReport {
        min_ratio,
        evaluated,
        skipped,
        score,
        issues,
        generated_at: Utc::now(),
    }
}
