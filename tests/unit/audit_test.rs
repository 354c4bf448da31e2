//! Unit tests for page audits and foreground suggestions.

use a11ylens::contrast::adjust::{enhance, suggest_foreground, DEFAULT_ENHANCE_AMOUNT};
use a11ylens::contrast::{
    audit_elements, contrast_ratio, parse_color, Color, ElementSample, DEFAULT_MIN_RATIO,
};

fn page() -> Vec<ElementSample> {
    vec![
        ElementSample::new("h1", "h1", "Welcome", "#000000", "#FFFFFF"),
        ElementSample::new("p.muted", "p", "Fine print", "rgb(120, 120, 120)", "rgb(245, 245, 245)"),
        ElementSample::new("a.link", "a", "Read more", "rgb(70, 130, 180)", "rgb(240, 240, 240)"),
        ElementSample::new("span.ghost", "span", "Hidden", "rgb(0, 0, 0)", "rgba(0, 0, 0, 0)"),
        ElementSample::new("div.empty", "div", "", "#777777", "#777777"),
    ]
}

#[test]
fn test_audit_flags_low_contrast_elements() {
    let report = audit_elements(&page(), DEFAULT_MIN_RATIO);

    assert_eq!(report.evaluated, 3);
    assert_eq!(report.skipped, 1);
    let selectors: Vec<_> = report.issues.iter().map(|i| i.selector.as_str()).collect();
    assert_eq!(selectors, vec!["p.muted", "a.link"]);
    assert!((report.score - 1.0 / 3.0).abs() < 1e-9);
    assert!(!report.passed());
}

#[test]
fn test_audit_recommendation_mentions_ratio() {
    let report = audit_elements(&page(), DEFAULT_MIN_RATIO);
    let issue = &report.issues[0];
    assert_eq!(
        issue.recommendation,
        "Increase contrast to at least 4.5:1. Current: 4.05:1"
    );
}

#[test]
fn test_audit_with_large_text_minimum() {
    let report = audit_elements(&page(), 3.0);
    assert!(report.passed());
    assert_eq!(report.score, 1.0);
}

#[test]
fn test_suggestion_fixes_every_flagged_pair() {
    let report = audit_elements(&page(), DEFAULT_MIN_RATIO);
    for issue in &report.issues {
        let fg = parse_color(&issue.foreground).unwrap();
        let bg = parse_color(&issue.background).unwrap();
        let fixed = suggest_foreground(fg, bg, DEFAULT_MIN_RATIO).unwrap();
        assert!(contrast_ratio(fixed, bg) >= DEFAULT_MIN_RATIO, "{}", issue.selector);
    }
}

#[test]
fn test_enhance_default_amount() {
    assert_eq!(
        enhance(Color::from_rgb(0, 100, 250), DEFAULT_ENHANCE_AMOUNT),
        Color::from_rgb(20, 120, 255)
    );
}
