//! Marker attributes for highlighting low-contrast elements.
//!
//! Every operation here is idempotent: marking an element twice writes its
//! attributes once, and clearing an unmarked element is a no-op.

pub mod snapshot;

pub use snapshot::{PageSnapshot, SnapshotElement, SnapshotError};

use crate::contrast::{adjust, parse_color, ColorFormatError};

/// Marker set on elements that fail the contrast audit.
pub const CONTRAST_ISSUE_ATTR: &str = "data-contrast-issue";
/// Foreground color saved before adaptation.
pub const ORIGINAL_COLOR_ATTR: &str = "data-original-color";
/// Background color saved before adaptation.
pub const ORIGINAL_BG_ATTR: &str = "data-original-bg";
/// Inline style attribute.
pub const STYLE_ATTR: &str = "style";

/// Outline drawn around flagged elements.
pub const ISSUE_OUTLINE: &str = "outline: 2px solid #ff6b6b";

/// Minimal attribute access the highlighter needs from an element.
pub trait MarkableElement {
    /// Current value of an attribute.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Set an attribute, replacing any previous value.
    fn set_attribute(&mut self, name: &str, value: &str);

    /// Remove an attribute. Missing attributes are ignored.
    fn remove_attribute(&mut self, name: &str);

    /// Whether the element currently carries the issue marker.
    fn is_marked(&self) -> bool {
        self.attribute(CONTRAST_ISSUE_ATTR) == Some("true")
    }
}

/// Flag an element as a contrast issue. Returns `false` if it was already flagged.
pub fn mark_issue<E: MarkableElement + ?Sized>(element: &mut E) -> bool {
    if element.is_marked() {
        return false;
    }

    element.set_attribute(CONTRAST_ISSUE_ATTR, "true");
    let style = append_declaration(element.attribute(STYLE_ATTR), ISSUE_OUTLINE);
    element.set_attribute(STYLE_ATTR, &style);
    true
}

/// Remove the issue marker and its outline. Returns `false` if nothing was flagged.
pub fn clear_issue<E: MarkableElement + ?Sized>(element: &mut E) -> bool {
    if !element.is_marked() {
        return false;
    }

    element.remove_attribute(CONTRAST_ISSUE_ATTR);
    let style = element
        .attribute(STYLE_ATTR)
        .map(|s| remove_declaration(s, ISSUE_OUTLINE));
    match style {
        Some(style) if style.is_empty() => element.remove_attribute(STYLE_ATTR),
        Some(style) => element.set_attribute(STYLE_ATTR, &style),
        None => {}
    }
    true
}

/// Brighten an element's colors, recording the originals the first time.
///
/// Takes the computed colors as input; the overrides go into the inline style.
pub fn adapt_colors<E: MarkableElement + ?Sized>(
    element: &mut E,
    foreground: &str,
    background: &str,
    amount: u8,
) -> Result<(), ColorFormatError> {
    let fg = parse_color(foreground)?;
    let bg = parse_color(background)?;

    if element.attribute(ORIGINAL_COLOR_ATTR).is_none() {
        element.set_attribute(ORIGINAL_COLOR_ATTR, foreground);
    }
    if element.attribute(ORIGINAL_BG_ATTR).is_none() {
        element.set_attribute(ORIGINAL_BG_ATTR, background);
    }

    let mut style = element.attribute(STYLE_ATTR).unwrap_or_default().to_string();
    style = set_property(&style, "color", &adjust::enhance(fg, amount).to_string());
    style = set_property(&style, "background-color", &adjust::enhance(bg, amount).to_string());
    element.set_attribute(STYLE_ATTR, &style);
    Ok(())
}

/// Undo [`adapt_colors`]. Returns `false` if the element was never adapted.
pub fn restore_colors<E: MarkableElement + ?Sized>(element: &mut E) -> bool {
    let had_color = element.attribute(ORIGINAL_COLOR_ATTR).is_some();
    let had_bg = element.attribute(ORIGINAL_BG_ATTR).is_some();
    if !had_color && !had_bg {
        return false;
    }

    if let Some(style) = element.attribute(STYLE_ATTR) {
        let style = remove_property(&remove_property(style, "color"), "background-color");
        if style.is_empty() {
            element.remove_attribute(STYLE_ATTR);
        } else {
            element.set_attribute(STYLE_ATTR, &style);
        }
    }
    element.remove_attribute(ORIGINAL_COLOR_ATTR);
    element.remove_attribute(ORIGINAL_BG_ATTR);
    true
}

fn declarations(style: &str) -> impl Iterator<Item = &str> {
    style.split(';').map(str::trim).filter(|d| !d.is_empty())
}

fn property_name(declaration: &str) -> &str {
    declaration.split(':').next().unwrap_or_default().trim()
}

fn join(decls: Vec<&str>) -> String {
    decls.join("; ")
}

fn append_declaration(style: Option<&str>, declaration: &str) -> String {
    let mut decls: Vec<&str> = style.map(|s| declarations(s).collect()).unwrap_or_default();
    decls.push(declaration);
    join(decls)
}

fn remove_declaration(style: &str, declaration: &str) -> String {
    join(declarations(style).filter(|d| *d != declaration).collect())
}

fn set_property(style: &str, name: &str, value: &str) -> String {
    let replacement = format!("{}: {}", name, value);
    let mut decls: Vec<&str> = declarations(style).filter(|d| property_name(d) != name).collect();
    decls.push(&replacement);
    join(decls)
}

fn remove_property(style: &str, name: &str) -> String {
    join(declarations(style).filter(|d| property_name(d) != name).collect())
}
