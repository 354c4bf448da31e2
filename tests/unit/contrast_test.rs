//! Unit tests for luminance, contrast ratio and WCAG classification.

use a11ylens::contrast::{classify, contrast_ratio, format_ratio, luminance, parse_color, Color};

/// Deterministic spread of colors across the 8-bit cube.
fn sample_colors() -> Vec<Color> {
    let steps = [0u8, 17, 51, 99, 128, 160, 200, 238, 255];
    let mut colors = Vec::new();
    for &r in &steps {
        for &g in &steps {
            for &b in &steps {
                colors.push(Color::from_rgb(r, g, b));
            }
        }
    }
    colors
}

#[test]
fn test_luminance_in_unit_range() {
    for color in sample_colors() {
        let l = luminance(color);
        assert!((0.0..=1.0 + 1e-12).contains(&l), "{color} -> {l}");
    }
}

#[test]
fn test_luminance_monotonic_per_channel() {
    for fixed in [0u8, 90, 255] {
        let mut prev = (-1.0, -1.0, -1.0);
        for v in 0..=255u8 {
            let r = luminance(Color::from_rgb(v, fixed, fixed));
            let g = luminance(Color::from_rgb(fixed, v, fixed));
            let b = luminance(Color::from_rgb(fixed, fixed, v));
            assert!(r >= prev.0 && g >= prev.1 && b >= prev.2, "not monotonic at {v}");
            prev = (r, g, b);
        }
    }
}

#[test]
fn test_ratio_bounds_and_symmetry() {
    let colors = sample_colors();
    for a in colors.iter().step_by(7) {
        for b in colors.iter().step_by(11) {
            let ab = contrast_ratio(*a, *b);
            let ba = contrast_ratio(*b, *a);
            assert_eq!(ab, ba);
            assert!(ab >= 1.0 && ab <= 21.0 + 1e-9, "{a} / {b} -> {ab}");
        }
    }
}

#[test]
fn test_identical_colors() {
    for color in sample_colors().into_iter().step_by(13) {
        assert_eq!(contrast_ratio(color, color), 1.0);
    }
}

#[test]
fn test_black_white_is_maximal() {
    let ratio = contrast_ratio(Color::BLACK, Color::WHITE);
    assert!((ratio - 21.0).abs() < 1e-9);
}

#[test]
fn test_classify_thresholds() {
    assert!(classify(4.5).aa.normal);
    assert!(!classify(4.49).aa.normal);
    assert!(classify(7.0).aaa.normal);
    assert!(classify(3.0).aa.large);
    assert!(!classify(4.49).aaa.large);
    assert!(classify(4.5).aaa.large);
}

#[test]
fn test_black_on_white_scenario() {
    let fg = parse_color("#000000").unwrap();
    let bg = parse_color("#FFFFFF").unwrap();
    let ratio = contrast_ratio(fg, bg);

    assert_eq!(format_ratio(ratio), "21.00:1");
    let result = classify(ratio);
    assert!(result.aa.normal && result.aa.large);
    assert!(result.aaa.normal && result.aaa.large);
    assert!(result.all_pass());
}

#[test]
fn test_mid_gray_on_off_white_scenario() {
    let fg = parse_color("rgb(120,120,120)").unwrap();
    let bg = parse_color("rgb(245,245,245)").unwrap();
    let ratio = contrast_ratio(fg, bg);

    // WCAG formula gives 4.0497 for this pair
    assert!((ratio - 4.05).abs() < 0.01, "got {ratio}");
    let result = classify(ratio);
    assert!(!result.aa.normal);
    assert!(result.aa.large);
    assert!(!result.aaa.normal);
    assert!(!result.aaa.large);
}

#[test]
fn test_aa_reference_gray() {
    // #767676 is the lightest gray that passes AA on white
    let white = Color::WHITE;
    assert!(classify(contrast_ratio(parse_color("#767676").unwrap(), white)).aa.normal);
    assert!(!classify(contrast_ratio(parse_color("#777777").unwrap(), white)).aa.normal);
}
