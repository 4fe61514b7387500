//! Text element payload.

use super::Color;
use serde::{Deserialize, Serialize};

/// Default font size in canvas units.
pub const DEFAULT_FONT_SIZE: f64 = 18.0;

/// Styling and content of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    /// The text content.
    pub text: String,
    /// Font size in canvas units.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Text color.
    #[serde(default = "default_text_color")]
    pub color: Color,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_text_color() -> Color {
    Color::rgb(0x11, 0x18, 0x27)
}

impl TextProps {
    /// Create text props with default styling.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: DEFAULT_FONT_SIZE,
            color: default_text_color(),
            bold: false,
            italic: false,
            underline: false,
        }
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }
}
