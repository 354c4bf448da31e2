//! A11yLens - Accessibility Contrast Toolkit
//!
//! WCAG contrast evaluation for web content. Parses CSS colors, computes
//! relative luminance and contrast ratios, classifies AA/AAA compliance,
//! audits collected page elements and asks a hosted model for fixes.

pub mod ai;
pub mod contrast;
pub mod highlight;
pub mod messaging;
pub mod storage;

// Re-export commonly used types
pub use ai::AiClient;
pub use contrast::{classify, contrast_ratio, luminance, parse_color, Color, ComplianceResult};
pub use messaging::{Background, MessageBus, Request, Response};
pub use storage::ExtensionConfig;
