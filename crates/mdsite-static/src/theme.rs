//! Accent color theme and WCAG contrast resolution.

use std::fmt;

/// Errors produced while parsing a theme color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid color {0:?}: expected 3 or 6 hex digits with optional leading '#'")]
    InvalidLength(String),

    #[error("invalid color {0:?}: contains non-hex digits")]
    InvalidDigit(String),
}

/// An sRGB color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rgb`, `#rrggbb`, `rgb` or `rrggbb`.
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let hex = input.trim().strip_prefix('#').unwrap_or(input.trim());

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit(input.to_string()));
        }

        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(ColorError::InvalidLength(input.to_string())),
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| ColorError::InvalidDigit(input.to_string()))
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// WCAG 2.0 relative luminance in `[0, 1]`.
    pub fn relative_luminance(&self) -> f64 {
        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }
}

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Text color placed on top of the accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    White,
    Black,
}

impl TextColor {
    pub fn as_hex(&self) -> &'static str {
        match self {
            Self::White => "#ffffff",
            Self::Black => "#000000",
        }
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_hex())
    }
}

/// Pick whichever of white or black text contrasts more with `background`.
///
/// White wins only when its contrast ratio is strictly greater.
pub fn resolve_text_color(background: &str) -> Result<TextColor, ColorError> {
    let luminance = Rgb::from_hex(background)?.relative_luminance();

    let white_contrast = 1.05 / (luminance + 0.05);
    let black_contrast = (luminance + 0.05) / 0.05;

    Ok(if white_contrast > black_contrast {
        TextColor::White
    } else {
        TextColor::Black
    })
}

/// The resolved theme shared by every page of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Accent color exactly as configured
    pub accent: String,
    /// Contrasting text color for content drawn on the accent
    pub text: TextColor,
}

impl Theme {
    pub fn from_accent(accent: &str) -> Result<Self, ColorError> {
        Ok(Self {
            accent: accent.to_string(),
            text: resolve_text_color(accent)?,
        })
    }
}
