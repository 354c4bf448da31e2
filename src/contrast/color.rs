//! sRGB color value and string parsing.
//!
//! Accepts the two shapes browsers hand back from computed styles and that
//! users type into color pickers: `#RRGGBB` and `rgb(r, g, b)`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a color string is not one of the recognized shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorFormatError {
    /// Input was empty after trimming
    #[error("empty color string")]
    Empty,

    /// Input did not match `#RRGGBB` or `rgb(r, g, b)`
    #[error("unsupported color format: {0:?} (expected #RRGGBB or rgb(r, g, b))")]
    Unsupported(String),

    /// An `rgb(...)` channel was not an integer in 0..=255
    #[error("invalid channel value {value:?} in {input:?}")]
    InvalidChannel {
        /// The full input string
        input: String,
        /// The offending channel token
        value: String,
    },
}

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);
    pub const WHITE: Color = Color::from_rgb(255, 255, 255);

    /// Create a color from its channels.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels as an array, red first.
    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

/// Parse a `#RRGGBB` or `rgb(r, g, b)` string into a [`Color`].
///
/// Hex digits may be upper or lower case. Whitespace is allowed around the
/// whole input and around each `rgb` token. Channel values above 255 are
/// rejected rather than clamped. Three-digit hex, named colors, `rgba(...)`
/// and `hsl(...)` are not supported.
pub fn parse_color(input: &str) -> Result<Color, ColorFormatError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ColorFormatError::Empty);
    }

    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorFormatError::Unsupported(input.to_string()));
    }

    if let Some(args) = rgb_arguments(trimmed) {
        return parse_rgb_arguments(input, args);
    }

    Err(ColorFormatError::Unsupported(input.to_string()))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Returns the text between the parentheses of `rgb( ... )`.
fn rgb_arguments(s: &str) -> Option<&str> {
    let prefix = s.get(..3)?;
    if !prefix.eq_ignore_ascii_case("rgb") {
        return None;
    }
    s[3..].trim_start().strip_prefix('(')?.strip_suffix(')')
}

fn parse_rgb_arguments(input: &str, args: &str) -> Result<Color, ColorFormatError> {
    let tokens: Vec<&str> = args.split(',').map(str::trim).collect();
    if tokens.len() != 3 {
        return Err(ColorFormatError::Unsupported(input.to_string()));
    }

    let mut channels = [0u8; 3];
    for (slot, token) in channels.iter_mut().zip(&tokens) {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ColorFormatError::InvalidChannel {
                input: input.to_string(),
                value: token.to_string(),
            });
        }
        *slot = token.parse::<u8>().map_err(|_| ColorFormatError::InvalidChannel {
            input: input.to_string(),
            value: token.to_string(),
        })?;
    }

    Ok(Color::from_rgb(channels[0], channels[1], channels[2]))
}
