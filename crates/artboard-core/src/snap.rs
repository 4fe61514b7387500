//! Snap functionality for aligning a moving rectangle to the artboard and to
//! other elements.
//!
//! Every call is a pure read of the element collection. Drag preview, drag
//! commit, resize and keyboard nudges all go through [`compute_guides_and_snap`]
//! so that what the user sees while dragging is exactly what gets committed.

use crate::element::{Element, ElementId};
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Distance threshold for snapping (in canvas units).
pub const SNAP_THRESHOLD: f64 = 8.0;

/// Which of the target's three reference lines matched a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    /// Left or top edge.
    Start,
    Center,
    /// Right or bottom edge.
    End,
}

/// Winning snap on one axis.
#[derive(Debug, Clone, Copy)]
struct AxisSnap {
    delta: f64,
    guide: f64,
    anchor: Anchor,
}

/// Result of a snap query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapOutcome {
    /// Horizontal correction to add to the target's left edge.
    pub delta_x: f64,
    /// Vertical correction to add to the target's top edge.
    pub delta_y: f64,
    /// Vertical guide lines (x coordinates), at most one.
    pub v_guides: Vec<f64>,
    /// Horizontal guide lines (y coordinates), at most one.
    pub h_guides: Vec<f64>,
}

impl SnapOutcome {
    /// A result with no snapping.
    pub fn none() -> Self {
        Self::default()
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        !self.v_guides.is_empty() || !self.h_guides.is_empty()
    }

    /// Translate `rect` by the correction. Size is never changed.
    pub fn apply(&self, rect: Rect) -> Rect {
        rect + kurbo::Vec2::new(self.delta_x, self.delta_y)
    }
}

/// The three vertical (x) reference lines of a rectangle.
fn vertical_lines(rect: Rect) -> [f64; 3] {
    [rect.x0, (rect.x0 + rect.x1) / 2.0, rect.x1]
}

/// The three horizontal (y) reference lines of a rectangle.
fn horizontal_lines(rect: Rect) -> [f64; 3] {
    [rect.y0, (rect.y0 + rect.y1) / 2.0, rect.y1]
}

/// Match one candidate coordinate against the target's reference lines.
/// On equal distances the start line wins over the center, the center over
/// the end.
fn match_candidate(candidate: f64, lines: [f64; 3], threshold: f64) -> Option<AxisSnap> {
    let [start, center, end] = lines;
    let d_start = (start - candidate).abs();
    let d_center = (center - candidate).abs();
    let d_end = (end - candidate).abs();
    let min = d_start.min(d_center).min(d_end);

    if min.is_nan() || min > threshold {
        return None;
    }

    let (anchor, line) = if min == d_start {
        (Anchor::Start, start)
    } else if min == d_center {
        (Anchor::Center, center)
    } else {
        (Anchor::End, end)
    };

    Some(AxisSnap {
        delta: candidate - line,
        guide: candidate,
        anchor,
    })
}

/// Pick the best snap for one axis. The smallest correction wins; among
/// equal corrections a center-to-center match replaces an edge match, and
/// otherwise the first candidate encountered is kept.
fn best_snap(
    candidates: impl Iterator<Item = (f64, Anchor)>,
    lines: [f64; 3],
    threshold: f64,
) -> Option<AxisSnap> {
    let mut best: Option<AxisSnap> = None;

    for (candidate, candidate_anchor) in candidates {
        let Some(snap) = match_candidate(candidate, lines, threshold) else {
            continue;
        };
        let replace = match best {
            None => true,
            Some(current) => {
                let (new, old) = (snap.delta.abs(), current.delta.abs());
                new < old
                    || (new == old
                        && current.anchor != Anchor::Center
                        && snap.anchor == Anchor::Center
                        && candidate_anchor == Anchor::Center)
            }
        };
        if replace {
            best = Some(snap);
        }
    }

    best
}

/// Compute the guide lines and positional correction for `target`.
///
/// Candidates are the artboard's near edge, center and far edge plus the same
/// three lines of every element except `excluded`. A candidate is eligible
/// when one of the target's reference lines lies within `threshold` of it.
/// At most one guide is produced per axis.
pub fn compute_guides_and_snap(
    target: Rect,
    elements: &[Element],
    excluded: Option<ElementId>,
    artboard: Size,
    threshold: f64,
) -> SnapOutcome {
    let others = || {
        elements
            .iter()
            .filter(move |el| Some(el.id()) != excluded)
            .map(Element::bounds)
    };
    let artboard_rect = Rect::from_origin_size(kurbo::Point::ZERO, artboard);
    let tagged = |lines: [f64; 3]| {
        [
            (lines[0], Anchor::Start),
            (lines[1], Anchor::Center),
            (lines[2], Anchor::End),
        ]
    };

    let v_candidates = std::iter::once(artboard_rect)
        .chain(others())
        .flat_map(|r| tagged(vertical_lines(r)));
    let h_candidates = std::iter::once(artboard_rect)
        .chain(others())
        .flat_map(|r| tagged(horizontal_lines(r)));

    let snap_x = best_snap(v_candidates, vertical_lines(target), threshold);
    let snap_y = best_snap(h_candidates, horizontal_lines(target), threshold);

    if let Some(s) = snap_x {
        log::trace!("snap x: guide {} delta {}", s.guide, s.delta);
    }
    if let Some(s) = snap_y {
        log::trace!("snap y: guide {} delta {}", s.guide, s.delta);
    }

    SnapOutcome {
        delta_x: snap_x.map_or(0.0, |s| s.delta),
        delta_y: snap_y.map_or(0.0, |s| s.delta),
        v_guides: snap_x.map(|s| s.guide).into_iter().collect(),
        h_guides: snap_y.map(|s| s.guide).into_iter().collect(),
    }
}

/// Snap parameters bound to one artboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEngine {
    pub artboard: Size,
    pub threshold: f64,
}

impl SnapEngine {
    pub fn new(artboard: Size, threshold: f64) -> Self {
        Self { artboard, threshold }
    }

    /// See [`compute_guides_and_snap`].
    pub fn compute(&self, target: Rect, elements: &[Element], excluded: Option<ElementId>) -> SnapOutcome {
        compute_guides_and_snap(target, elements, excluded, self.artboard, self.threshold)
    }
}
