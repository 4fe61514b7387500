//! Selection model and resize handles.

use crate::element::ElementId;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in canvas units.
pub const HANDLE_HIT_TOLERANCE: f64 = 6.0;

/// Ordered selection. The order is the selection sequence; the last entry is
/// the active element.
///
/// Ids are not validated against the element collection; the reducer prunes
/// them when elements are deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(Vec<ElementId>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection wholesale.
    pub fn replace(&mut self, ids: Vec<ElementId>) {
        self.0 = ids;
    }

    /// Add `id` at the end if absent, otherwise remove it.
    /// Returns true if the id is selected afterwards.
    pub fn toggle(&mut self, id: ElementId) -> bool {
        if self.contains(id) {
            self.remove(id);
            false
        } else {
            self.0.push(id);
            true
        }
    }

    /// Remove every occurrence of `id`.
    pub fn remove(&mut self, id: ElementId) {
        self.0.retain(|&selected| selected != id);
    }

    /// Keep only ids for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&ElementId) -> bool) {
        self.0.retain(keep);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.0.contains(&id)
    }

    /// The most recently selected id.
    pub fn active(&self) -> Option<ElementId> {
        self.0.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[ElementId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ElementId>> for Selection {
    fn from(ids: Vec<ElementId>) -> Self {
        Self(ids)
    }
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Position of this corner on `rect`.
    pub fn position(self, rect: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(rect.x0, rect.y0),
            Corner::TopRight => Point::new(rect.x1, rect.y0),
            Corner::BottomLeft => Point::new(rect.x0, rect.y1),
            Corner::BottomRight => Point::new(rect.x1, rect.y1),
        }
    }

    /// The diagonally opposite corner.
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }
}

/// A resize handle with its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub position: Point,
    pub corner: Corner,
}

impl Handle {
    /// Check if a point hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// The four corner handles of a bounding rectangle.
pub fn corner_handles(bounds: Rect) -> [Handle; 4] {
    Corner::ALL.map(|corner| Handle {
        position: corner.position(bounds),
        corner,
    })
}

/// Find which corner handle (if any) is hit at the given point.
pub fn hit_test_handles(bounds: Rect, point: Point, tolerance: f64) -> Option<Corner> {
    corner_handles(bounds)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.corner)
}

/// Drag `corner` of `original` by `delta` while the opposite corner stays
/// anchored. Dragging past the anchor collapses that extent to zero rather
/// than flipping the rectangle.
pub fn resize_from_corner(original: Rect, corner: Corner, delta: Vec2) -> Rect {
    let anchor = corner.opposite().position(original);
    let moved = corner.position(original) + delta;

    let (x0, x1) = match corner {
        Corner::TopLeft | Corner::BottomLeft => (moved.x.min(anchor.x), anchor.x),
        Corner::TopRight | Corner::BottomRight => (anchor.x, moved.x.max(anchor.x)),
    };
    let (y0, y1) = match corner {
        Corner::TopLeft | Corner::TopRight => (moved.y.min(anchor.y), anchor.y),
        Corner::BottomLeft | Corner::BottomRight => (anchor.y, moved.y.max(anchor.y)),
    };

    Rect::new(x0, y0, x1, y1)
}
