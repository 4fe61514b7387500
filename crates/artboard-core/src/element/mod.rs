//! Element definitions for the artboard.

mod color;
mod image;
mod text;

pub use color::{Color, ColorParseError};
pub use image::{CropRect, ImageProps};
pub use text::{DEFAULT_FONT_SIZE, TextProps};

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// The closed set of element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rect,
    Circle,
    Line,
    Text,
    Image,
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Rect => "rect",
            ElementKind::Circle => "circle",
            ElementKind::Line => "line",
            ElementKind::Text => "text",
            ElementKind::Image => "image",
        }
    }
}

/// Fill payload shared by rectangles and circles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillProps {
    pub fill: Color,
}

/// Stroke payload of a line element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineProps {
    pub stroke: Color,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_stroke_width() -> f64 {
    2.0
}

/// Variant-specific payload. The variant tag doubles as the element type, so
/// the type and the payload can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementProps {
    Rect(FillProps),
    Circle(FillProps),
    Line(LineProps),
    Text(TextProps),
    Image(ImageProps),
}

impl ElementProps {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementProps::Rect(_) => ElementKind::Rect,
            ElementProps::Circle(_) => ElementKind::Circle,
            ElementProps::Line(_) => ElementKind::Line,
            ElementProps::Text(_) => ElementKind::Text,
            ElementProps::Image(_) => ElementKind::Image,
        }
    }

    /// Clamp payload values that have a valid range.
    pub(crate) fn normalized(self) -> Self {
        match self {
            ElementProps::Image(image) => ElementProps::Image(image.normalized()),
            ElementProps::Line(line) => ElementProps::Line(LineProps {
                stroke_width: line.stroke_width.max(0.0),
                ..line
            }),
            other => other,
        }
    }
}

/// A positioned, sized, rotated visual unit on the artboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    id: ElementId,
    /// Left edge in canvas units.
    pub x: f64,
    /// Top edge in canvas units.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees around the element center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(flatten)]
    pub props: ElementProps,
}

impl Element {
    /// Build an element from a draft with an already-assigned id.
    pub(crate) fn from_draft(id: ElementId, draft: ElementDraft) -> Self {
        Self {
            id,
            x: draft.x,
            y: draft.y,
            width: clamp_extent(draft.width),
            height: clamp_extent(draft.height),
            rotation: draft.rotation,
            props: draft.props.normalized(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.props.kind()
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Axis-aligned bounds, ignoring rotation.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Check if a point hits the element's bounds (within `tolerance`).
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    /// Shallow-merge a patch into this element. The caller is responsible for
    /// checking that a props patch has the same kind.
    pub(crate) fn apply(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = clamp_extent(width);
        }
        if let Some(height) = patch.height {
            self.height = clamp_extent(height);
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(props) = &patch.props {
            self.props = props.clone().normalized();
        }
    }
}

/// Negative or non-finite extents become zero.
fn clamp_extent(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// Element fields minus the id; the input of an add operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDraft {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(flatten)]
    pub props: ElementProps,
}

impl ElementDraft {
    pub fn new(props: ElementProps, bounds: Rect) -> Self {
        Self {
            x: bounds.x0,
            y: bounds.y0,
            width: bounds.width(),
            height: bounds.height(),
            rotation: 0.0,
            props,
        }
    }

    /// Red rectangle at the toolbar's default spot.
    pub fn rect() -> Self {
        Self::new(
            ElementProps::Rect(FillProps {
                fill: Color::rgb(0xef, 0x44, 0x44),
            }),
            Rect::new(50.0, 50.0, 170.0, 110.0),
        )
    }

    /// Blue circle at the toolbar's default spot.
    pub fn circle() -> Self {
        Self::new(
            ElementProps::Circle(FillProps {
                fill: Color::rgb(0x60, 0xa5, 0xfa),
            }),
            Rect::new(80.0, 80.0, 160.0, 160.0),
        )
    }

    /// Thin horizontal black line.
    pub fn line() -> Self {
        Self::new(
            ElementProps::Line(LineProps {
                stroke: Color::black(),
                stroke_width: 2.0,
            }),
            Rect::new(100.0, 200.0, 300.0, 202.0),
        )
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(
            ElementProps::Text(TextProps::new(content)),
            Rect::new(120.0, 120.0, 320.0, 160.0),
        )
    }

    pub fn image(src: impl Into<String>) -> Self {
        Self::new(
            ElementProps::Image(ImageProps::new(src)),
            Rect::new(100.0, 100.0, 300.0, 250.0),
        )
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.props.kind()
    }
}

/// A partial update. `None` fields are left untouched; `props` replaces the
/// whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<ElementProps>,
}

impl ElementPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Position and size taken from a rectangle.
    pub fn bounds(rect: Rect) -> Self {
        Self {
            x: Some(rect.x0),
            y: Some(rect.y0),
            width: Some(rect.width()),
            height: Some(rect.height()),
            ..Self::default()
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }

    pub fn props(props: ElementProps) -> Self {
        Self {
            props: Some(props),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True if any extent in the patch is negative.
    pub(crate) fn has_negative_extent(&self) -> bool {
        self.width.is_some_and(|w| w < 0.0) || self.height.is_some_and(|h| h < 0.0)
    }
}
