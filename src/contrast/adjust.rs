//! Color adjustments for raising contrast.

use super::color::Color;
use super::evaluator::contrast_ratio;

/// Amount added to each channel by the page-wide color adaptation pass.
pub const DEFAULT_ENHANCE_AMOUNT: u8 = 20;

/// Search steps when looking for a passing foreground.
const SEARCH_STEPS: u32 = 24;

/// Brighten every channel by `amount`, saturating at 255.
pub fn enhance(color: Color, amount: u8) -> Color {
    let [r, g, b] = color.channels().map(|c| c.saturating_add(amount));
    Color::from_rgb(r, g, b)
}

/// Linear blend from `from` towards `to`; `t` in [0, 1].
pub fn mix(from: Color, to: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| {
        let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
        v.round().clamp(0.0, 255.0) as u8
    };
    Color::from_rgb(lerp(from.r, to.r), lerp(from.g, to.g), lerp(from.b, to.b))
}

/// Find the foreground closest to `fg` that reaches `target` against `bg`.
///
/// Tries darkening towards black and lightening towards white, keeping
/// whichever passing candidate needs the smaller blend. Returns `fg` itself
/// when it already passes and `None` when neither black nor white is enough.
pub fn suggest_foreground(fg: Color, bg: Color, target: f64) -> Option<Color> {
    if contrast_ratio(fg, bg) >= target {
        return Some(fg);
    }

    let darker = search_towards(fg, Color::BLACK, bg, target);
    let lighter = search_towards(fg, Color::WHITE, bg, target);

    match (darker, lighter) {
        (Some((t_dark, dark)), Some((t_light, light))) => {
            Some(if t_dark <= t_light { dark } else { light })
        }
        (Some((_, dark)), None) => Some(dark),
        (None, Some((_, light))) => Some(light),
        (None, None) => None,
    }
}

/// Bisect the smallest blend towards `anchor` that passes.
fn search_towards(fg: Color, anchor: Color, bg: Color, target: f64) -> Option<(f64, Color)> {
    if contrast_ratio(anchor, bg) < target {
        return None;
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..SEARCH_STEPS {
        let mid = (lo + hi) / 2.0;
        if contrast_ratio(mix(fg, anchor, mid), bg) >= target {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    // `hi` only ever moves to blends whose rounded color passes.
    Some((hi, mix(fg, anchor, hi)))
}
