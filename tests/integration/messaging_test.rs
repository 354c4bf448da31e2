//! Integration tests for the background worker and message bus.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use a11ylens::ai::{
    AccessibilityAi, AiClient, AiContrastIssue, AiError, AltTextSuggestion, ContrastAnalysis,
    ContrastAnalysisResponse, ImageInfo, SimplificationLevel, SuggestedColors,
};
use a11ylens::contrast::ElementSample;
use a11ylens::messaging::{Background, Feature, MessageBus, Request, Response};
use a11ylens::storage::ExtensionConfig;

/// Model stand-in that answers from canned data.
#[derive(Default)]
struct StubAi {
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl AccessibilityAi for StubAi {
    async fn analyze_contrast(
        &self,
        elements: &[ElementSample],
        min_contrast: f64,
    ) -> Result<ContrastAnalysisResponse, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AiError::InvalidResponse("missing `css_fixes`".to_string()));
        }
        Ok(ContrastAnalysisResponse {
            analysis: ContrastAnalysis {
                overall_score: 0.5,
                issues: elements
                    .iter()
                    .map(|e| AiContrastIssue {
                        element: e.selector.clone(),
                        current_contrast: 2.5,
                        recommendation: format!("Reach {min_contrast}:1"),
                        suggested_colors: SuggestedColors {
                            foreground: "#000000".to_string(),
                            background: "#FFFFFF".to_string(),
                        },
                    })
                    .collect(),
            },
            css_fixes: "p { color: #000000; }".to_string(),
        })
    }

    async fn simplify_content(
        &self,
        content: &str,
        level: SimplificationLevel,
    ) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("[{level}] {}", content.to_lowercase()))
    }

    async fn analyze_readability(&self, content: &str) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{} words", content.split_whitespace().count()))
    }

    async fn generate_alt_text(
        &self,
        images: &[ImageInfo],
    ) -> Result<Vec<AltTextSuggestion>, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(images
            .iter()
            .map(|i| AltTextSuggestion {
                src: i.src.clone(),
                alt: "A bicycle".to_string(),
            })
            .collect())
    }
}

fn configured() -> ExtensionConfig {
    let mut config = ExtensionConfig::default();
    config.api_keys.claude = Some("sk-test".to_string());
    config
}

fn bus_with(config: ExtensionConfig, ai: Option<StubAi>) -> MessageBus {
    Background::new(config, PathBuf::from("/tmp/a11ylens/config.toml"), ai).spawn()
}

fn image(src: &str, alt: Option<&str>) -> ImageInfo {
    ImageInfo {
        src: src.to_string(),
        current_alt: alt.map(str::to_string),
        dimensions: None,
        contextual_text: None,
    }
}

#[tokio::test]
async fn test_check_contrast_round_trip() {
    let bus = bus_with(ExtensionConfig::default(), None);

    let response = bus
        .send(Request::CheckContrast {
            foreground: "#000000".to_string(),
            background: "rgb(255, 255, 255)".to_string(),
        })
        .await
        .unwrap();

    match response {
        Response::Contrast { check } => {
            assert!((check.ratio - 21.0).abs() < 1e-9);
            assert!(check.compliance.all_pass());
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_check_contrast_bad_color_is_recoverable() {
    let bus = bus_with(ExtensionConfig::default(), None);

    let response = bus
        .send(Request::CheckContrast {
            foreground: "#abc".to_string(),
            background: "#ffffff".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::Error { message } if message.contains("#abc")));

    // The worker keeps serving after a bad request
    let response = bus.send(Request::OpenSettings).await.unwrap();
    assert!(matches!(response, Response::Settings { path } if path.ends_with("config.toml")));
}

#[tokio::test]
async fn test_audit_uses_configured_minimum() {
    let mut config = ExtensionConfig::default();
    config.contrast.min_contrast = 3.0;
    let bus = bus_with(config, None);

    let elements = vec![ElementSample::new(
        "p",
        "p",
        "Fine print",
        "rgb(120, 120, 120)",
        "rgb(245, 245, 245)",
    )];

    let response = bus
        .send(Request::AuditPage {
            elements: elements.clone(),
            min_ratio: None,
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::Audit { report } if report.passed()));

    let response = bus
        .send(Request::AuditPage {
            elements,
            min_ratio: Some(4.5),
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::Audit { report } if report.issues.len() == 1));
}

#[tokio::test]
async fn test_activate_ai_feature_without_key_prompts() {
    let bus = bus_with(ExtensionConfig::default(), None);

    let response = bus
        .send(Request::ActivateFeature {
            feature: Feature::Simplify,
        })
        .await
        .unwrap();
    assert!(matches!(
        response,
        Response::ShowApiKeyPrompt {
            feature: Feature::Simplify
        }
    ));

    let response = bus
        .send(Request::ActivateFeature {
            feature: Feature::FocusMode,
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::FeatureActivated { .. }));
}

#[tokio::test]
async fn test_gemini_key_alone_still_prompts() {
    let mut config = ExtensionConfig::default();
    config.api_keys.gemini = Some("gm-test".to_string());
    assert!(AiClient::from_config(&config).is_err());
    let bus = bus_with(config, None);

    let response = bus
        .send(Request::ActivateFeature {
            feature: Feature::Simplify,
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::ShowApiKeyPrompt { .. }));
}

#[tokio::test]
async fn test_activate_ai_feature_with_key() {
    let bus = bus_with(configured(), Some(StubAi::default()));

    let response = bus
        .send(Request::ActivateFeature {
            feature: Feature::Contrast,
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::FeatureActivated { .. }));
}

#[tokio::test]
async fn test_analyze_contrast_without_client_returns_none() {
    let bus = bus_with(ExtensionConfig::default(), None);

    let response = bus
        .send(Request::AnalyzeContrast {
            elements: vec![],
            min_contrast: None,
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::ContrastAnalysis { result: None }));
}

#[tokio::test]
async fn test_analyze_contrast_passes_through_result() {
    let bus = bus_with(configured(), Some(StubAi::default()));

    let response = bus
        .send(Request::AnalyzeContrast {
            elements: vec![ElementSample::new("p.note", "p", "Note", "#999999", "#ffffff")],
            min_contrast: Some(7.0),
        })
        .await
        .unwrap();

    let Response::ContrastAnalysis { result: Some(result) } = response else {
        panic!("expected an analysis");
    };
    assert_eq!(result.analysis.issues[0].element, "p.note");
    assert_eq!(result.analysis.issues[0].recommendation, "Reach 7:1");
}

#[tokio::test]
async fn test_analyze_contrast_failure_returns_none() {
    let ai = StubAi {
        fail: true,
        ..Default::default()
    };
    let bus = bus_with(configured(), Some(ai));

    let response = bus
        .send(Request::AnalyzeContrast {
            elements: vec![],
            min_contrast: None,
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::ContrastAnalysis { result: None }));
}

#[tokio::test]
async fn test_simplify_uses_configured_level() {
    let mut config = configured();
    config.simplify.level = SimplificationLevel::Mild;
    let bus = bus_with(config, Some(StubAi::default()));

    let response = bus
        .send(Request::SimplifyContent {
            content: "Utilize The Apparatus".to_string(),
            level: None,
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::Simplified { text } if text == "[mild] utilize the apparatus"));
}

#[tokio::test]
async fn test_simplify_without_client_is_error() {
    let bus = bus_with(ExtensionConfig::default(), None);

    let response = bus
        .send(Request::SimplifyContent {
            content: "text".to_string(),
            level: Some(SimplificationLevel::Strong),
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::Error { .. }));
}

#[tokio::test]
async fn test_readability_passes_through_feedback() {
    let ai = StubAi::default();
    let calls = ai.calls.clone();
    let bus = bus_with(configured(), Some(ai));

    let response = bus
        .send(Request::AnalyzeReadability {
            content: "The quick brown fox".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::Readability { feedback } if feedback == "4 words"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_readability_without_client_is_error() {
    let bus = bus_with(ExtensionConfig::default(), None);

    let response = bus
        .send(Request::AnalyzeReadability {
            content: "text".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::Error { message } if message.contains("API key")));
}

#[tokio::test]
async fn test_alt_text_skips_images_that_have_alt() {
    let ai = StubAi::default();
    let calls = ai.calls.clone();
    let bus = bus_with(configured(), Some(ai));

    let response = bus
        .send(Request::GenerateAltText {
            images: vec![image("a.png", Some("Logo")), image("b.png", Some("  ")), image("c.png", None)],
        })
        .await
        .unwrap();

    let Response::AltText { suggestions } = response else {
        panic!("expected suggestions");
    };
    let srcs: Vec<_> = suggestions.iter().map(|s| s.src.as_str()).collect();
    assert_eq!(srcs, vec!["b.png", "c.png"]);

    let response = bus
        .send(Request::GenerateAltText {
            images: vec![image("a.png", Some("Logo"))],
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::AltText { suggestions } if suggestions.is_empty()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_requests_all_answered() {
    let bus = bus_with(ExtensionConfig::default(), None);

    let handles: Vec<_> = (0..20u8)
        .map(|i| {
            let bus = bus.clone();
            tokio::spawn(async move {
                bus.send(Request::CheckContrast {
                    foreground: format!("rgb({i}, {i}, {i})"),
                    background: "#ffffff".to_string(),
                })
                .await
            })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert!(matches!(response, Response::Contrast { .. }));
    }
}

#[test]
fn test_real_client_requires_key() {
    let config = ExtensionConfig::default();
    assert!(matches!(AiClient::from_config(&config), Err(AiError::NotConfigured)));
}
