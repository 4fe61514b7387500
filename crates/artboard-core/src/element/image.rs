//! Image element payload.
//!
//! The engine never decodes image bytes. `src` is an opaque reference (URL or
//! data URL) that the host resolves when rendering.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Crop window into the source image, as fractions of its size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for CropRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl CropRect {
    /// The whole source image.
    pub const FULL: CropRect = CropRect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }.normalized()
    }

    /// Clamp all fractions into `[0, 1]` and keep the window inside the image.
    pub fn normalized(self) -> Self {
        let x = finite_or(self.x, 0.0).clamp(0.0, 1.0);
        let y = finite_or(self.y, 0.0).clamp(0.0, 1.0);
        Self {
            x,
            y,
            width: finite_or(self.width, 1.0).clamp(0.0, 1.0 - x),
            height: finite_or(self.height, 1.0).clamp(0.0, 1.0 - y),
        }
    }

    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }

    /// The crop window in source pixels for an image of the given size.
    pub fn source_rect(&self, source_width: f64, source_height: f64) -> Rect {
        Rect::new(
            self.x * source_width,
            self.y * source_height,
            (self.x + self.width) * source_width,
            (self.y + self.height) * source_height,
        )
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

fn default_opacity() -> f64 {
    1.0
}

/// Source reference, opacity and crop of an image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageProps {
    /// Opaque image reference.
    pub src: String,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Crop window (defaults to the full image).
    #[serde(default)]
    pub crop: CropRect,
}

impl ImageProps {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            opacity: default_opacity(),
            crop: CropRect::FULL,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_crop(mut self, crop: CropRect) -> Self {
        self.crop = crop;
        self
    }

    /// Clamp opacity and crop into their valid ranges.
    pub fn normalized(self) -> Self {
        Self {
            opacity: finite_or(self.opacity, 1.0).clamp(0.0, 1.0),
            crop: self.crop.normalized(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_default() {
        let props: ImageProps = serde_json::from_str(r#"{"src":"data:image/png;base64,AAAA"}"#).unwrap();
        assert!((props.opacity - 1.0).abs() < f64::EPSILON);
        assert!(props.crop.is_full());
    }

    #[test]
    fn test_normalize_clamps_out_of_range() {
        let props = ImageProps::new("a.png")
            .with_opacity(1.7)
            .with_crop(CropRect {
                x: -0.5,
                y: 0.25,
                width: 2.0,
                height: 0.5,
            })
            .normalized();
        assert!((props.opacity - 1.0).abs() < f64::EPSILON);
        assert_eq!(props.crop, CropRect { x: 0.0, y: 0.25, width: 1.0, height: 0.5 });
    }

    #[test]
    fn test_crop_window_stays_inside_image() {
        let crop = CropRect::new(0.75, 0.5, 0.5, 0.5);
        assert!((crop.width - 0.25).abs() < f64::EPSILON);
        assert!((crop.height - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_finite_values_fall_back() {
        let props = ImageProps::new("a.png").with_opacity(f64::NAN).normalized();
        assert!((props.opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_source_rect() {
        let crop = CropRect::new(0.25, 0.0, 0.5, 1.0);
        let rect = crop.source_rect(400.0, 300.0);
        assert_eq!(rect, Rect::new(100.0, 0.0, 300.0, 300.0));
    }
}
