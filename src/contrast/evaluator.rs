//! WCAG 2.x relative luminance, contrast ratio and compliance levels.
//!
//! https://www.w3.org/TR/WCAG21/#dfn-relative-luminance
//! https://www.w3.org/TR/WCAG21/#dfn-contrast-ratio

use serde::{Deserialize, Serialize};

use super::color::Color;

/// Minimum ratio for AA normal text (and AAA large text).
pub const AA_NORMAL_MIN: f64 = 4.5;
/// Minimum ratio for AA large text.
pub const AA_LARGE_MIN: f64 = 3.0;
/// Minimum ratio for AAA normal text.
pub const AAA_NORMAL_MIN: f64 = 7.0;
/// Minimum ratio for AAA large text.
pub const AAA_LARGE_MIN: f64 = 4.5;

/// Pass/fail for normal and large text at one conformance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelResult {
    pub normal: bool,
    pub large: bool,
}

/// Pass/fail at both WCAG conformance levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct ComplianceResult {
    pub aa: LevelResult,
    pub aaa: LevelResult,
}

impl ComplianceResult {
    /// True when every level and size passes.
    pub fn all_pass(&self) -> bool {
        self.aa.normal && self.aa.large && self.aaa.normal && self.aaa.large
    }
}

/// Relative luminance of a color, in [0, 1].
///
/// Channels are `u8`, so out-of-range input cannot reach this function;
/// `parse_color` rejects channel values above 255 instead of clamping them.
pub fn luminance(color: Color) -> f64 {
    let [r, g, b] = color.channels().map(|c| linearize(f64::from(c) / 255.0));
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// sRGB to linear light for one normalized channel.
fn linearize(value: f64) -> f64 {
    if value <= 0.03928 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

/// Contrast ratio between two colors, in [1, 21]. Order does not matter.
pub fn contrast_ratio(a: Color, b: Color) -> f64 {
    let la = luminance(a);
    let lb = luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };

    (lighter + 0.05) / (darker + 0.05)
}

/// Classify a ratio against the fixed WCAG thresholds. No rounding is applied.
pub fn classify(ratio: f64) -> ComplianceResult {
    ComplianceResult {
        aa: LevelResult {
            normal: ratio >= AA_NORMAL_MIN,
            large: ratio >= AA_LARGE_MIN,
        },
        aaa: LevelResult {
            normal: ratio >= AAA_NORMAL_MIN,
            large: ratio >= AAA_LARGE_MIN,
        },
    }
}

/// Display form used by consumers, e.g. `"4.54:1"`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.2}:1", ratio)
}

/// Ratio and classification for a foreground/background pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastCheck {
    pub foreground: Color,
    pub background: Color,
    pub ratio: f64,
    pub compliance: ComplianceResult,
}

impl ContrastCheck {
    /// Evaluate a pair of colors.
    pub fn new(foreground: Color, background: Color) -> Self {
        let ratio = contrast_ratio(foreground, background);
        Self {
            foreground,
            background,
            ratio,
            compliance: classify(ratio),
        }
    }
}
