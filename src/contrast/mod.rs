//! WCAG contrast evaluation.
//!
//! This module provides:
//! - Color parsing from `#RRGGBB` and `rgb(r, g, b)` strings
//! - Relative luminance, contrast ratio and AA/AAA classification
//! - Page-wide audits over collected element samples
//! - Foreground suggestions that reach a target ratio

pub mod adjust;
pub mod audit;
pub mod color;
pub mod evaluator;

// Re-export primary types
pub use adjust::{enhance, suggest_foreground};
pub use audit::{audit_elements, AuditReport, ContrastIssue, ElementSample, DEFAULT_MIN_RATIO};
pub use color::{parse_color, Color, ColorFormatError};
pub use evaluator::{
    classify, contrast_ratio, format_ratio, luminance, ComplianceResult, ContrastCheck,
    LevelResult,
};
