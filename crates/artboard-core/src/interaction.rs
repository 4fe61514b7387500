//! Pointer and keyboard gestures on top of the reducer.
//!
//! Gestures preview without committing: while a drag or resize is in flight
//! the canvas state is untouched and only the previewed rectangle and guides
//! change. Releasing the pointer dispatches one command. Preview and commit
//! run the same snap query, so the committed position is the one shown.

use crate::canvas::Canvas;
use crate::command::{Command, Outcome};
use crate::element::{ElementId, ElementPatch};
use crate::input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::selection::{Corner, HANDLE_HIT_TOLERANCE, hit_test_handles, resize_from_corner};
use crate::shortcuts::{NudgeDirection, ShortcutAction, resolve};
use crate::snap::SnapOutcome;
use kurbo::{Point, Rect, Vec2};

/// An in-flight pointer gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Drag {
        id: ElementId,
        /// Bounds at the last commit.
        origin: Rect,
        /// Pointer position relative to the element's top-left corner.
        grab_offset: Vec2,
        /// Snapped preview.
        current: Rect,
    },
    Resize {
        id: ElementId,
        corner: Corner,
        origin: Rect,
        current: Rect,
    },
}

impl Gesture {
    pub fn id(&self) -> ElementId {
        match self {
            Gesture::Drag { id, .. } | Gesture::Resize { id, .. } => *id,
        }
    }

    /// The rectangle the renderer should draw for the element.
    pub fn preview(&self) -> Rect {
        match self {
            Gesture::Drag { current, .. } | Gesture::Resize { current, .. } => *current,
        }
    }

    fn origin(&self) -> Rect {
        match self {
            Gesture::Drag { origin, .. } | Gesture::Resize { origin, .. } => *origin,
        }
    }
}

/// Gesture state machine. Owns no document state; every mutation goes
/// through [`Canvas::dispatch`].
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    gesture: Option<Gesture>,
    input: InputState,
    v_guides: Vec<f64>,
    h_guides: Vec<f64>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn is_manipulating(&self) -> bool {
        self.gesture.is_some()
    }

    /// Guides to draw: vertical lines (x) and horizontal lines (y).
    pub fn guides(&self) -> (&[f64], &[f64]) {
        (&self.v_guides, &self.h_guides)
    }

    fn set_guides(&mut self, snap: &SnapOutcome) {
        self.v_guides.clone_from(&snap.v_guides);
        self.h_guides.clone_from(&snap.h_guides);
    }

    fn clear_guides(&mut self) {
        self.v_guides.clear();
        self.h_guides.clear();
    }

    /// Drop the gesture without committing.
    pub fn cancel(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            log::debug!("gesture on {} cancelled", gesture.id());
        }
        self.input.reset();
        self.clear_guides();
    }

    /// Snap a candidate rectangle for `id` against everything else.
    fn snap(&self, canvas: &Canvas, id: ElementId, candidate: Rect) -> (Rect, SnapOutcome) {
        let outcome = canvas
            .config()
            .snap_engine()
            .compute(candidate, canvas.elements(), Some(id));
        (outcome.apply(candidate), outcome)
    }

    /// Start dragging an element. Returns false if it does not exist.
    pub fn begin_drag(&mut self, canvas: &Canvas, id: ElementId) -> bool {
        self.begin_drag_with_offset(canvas, id, Vec2::ZERO)
    }

    fn begin_drag_with_offset(&mut self, canvas: &Canvas, id: ElementId, grab_offset: Vec2) -> bool {
        let Some(element) = canvas.element(id) else {
            return false;
        };
        let origin = element.bounds();
        self.gesture = Some(Gesture::Drag {
            id,
            origin,
            grab_offset,
            current: origin,
        });
        self.clear_guides();
        log::debug!("drag started on {id}");
        true
    }

    /// Keep the whole element on the artboard where it fits.
    fn clamp_to_artboard(canvas: &Canvas, left: f64, top: f64, size: kurbo::Size) -> Point {
        let artboard = canvas.config().artboard;
        let max_x = (artboard.width - size.width).max(0.0);
        let max_y = (artboard.height - size.height).max(0.0);
        Point::new(left.clamp(0.0, max_x), top.clamp(0.0, max_y))
    }

    /// Candidate drag position for the element's top-left corner, clamped
    /// and snapped.
    fn drag_target(&self, canvas: &Canvas, left: f64, top: f64) -> Option<(ElementId, Rect, SnapOutcome)> {
        let Some(Gesture::Drag { id, origin, .. }) = &self.gesture else {
            return None;
        };
        let size = origin.size();
        let position = Self::clamp_to_artboard(canvas, left, top, size);
        let candidate = Rect::from_origin_size(position, size);
        let (snapped, outcome) = self.snap(canvas, *id, candidate);
        Some((*id, snapped, outcome))
    }

    /// Move the drag preview. Returns the snapped rectangle, or `None` when
    /// no drag is in progress.
    pub fn drag_to(&mut self, canvas: &Canvas, left: f64, top: f64) -> Option<Rect> {
        let (_, snapped, outcome) = self.drag_target(canvas, left, top)?;
        self.set_guides(&outcome);
        if let Some(Gesture::Drag { current, .. }) = &mut self.gesture {
            *current = snapped;
        }
        log::trace!("drag preview at ({}, {})", snapped.x0, snapped.y0);
        Some(snapped)
    }

    /// Finish the drag at `(left, top)`. Commits one position update unless
    /// the element ends where it started.
    pub fn end_drag(&mut self, canvas: &mut Canvas, left: f64, top: f64) -> Option<Outcome> {
        let target = self.drag_target(canvas, left, top);
        let origin = self.gesture.as_ref().map(Gesture::origin);
        self.gesture = None;
        self.clear_guides();

        let (id, snapped, _) = target?;
        if origin.is_some_and(|origin| origin.origin() == snapped.origin()) {
            log::debug!("drag on {id} ended in place");
            return None;
        }
        log::debug!("drag on {id} committed at ({}, {})", snapped.x0, snapped.y0);
        Some(canvas.dispatch(Command::UpdateElement {
            id,
            patch: ElementPatch::position(snapped.x0, snapped.y0),
        }))
    }

    /// Start resizing an element from one of its corners.
    pub fn begin_resize(&mut self, canvas: &Canvas, id: ElementId, corner: Corner) -> bool {
        let Some(element) = canvas.element(id) else {
            return false;
        };
        let origin = element.bounds();
        self.gesture = Some(Gesture::Resize {
            id,
            corner,
            origin,
            current: origin,
        });
        self.clear_guides();
        log::debug!("resize started on {id} from {corner:?}");
        true
    }

    /// Snap a resize candidate. Only the position is corrected.
    fn resize_target(&self, canvas: &Canvas, rect: Rect) -> Option<(ElementId, Rect, SnapOutcome)> {
        let Some(Gesture::Resize { id, .. }) = &self.gesture else {
            return None;
        };
        let rect = rect.abs();
        let (snapped, outcome) = self.snap(canvas, *id, rect);
        Some((*id, snapped, outcome))
    }

    /// Move the resize preview to `rect`.
    pub fn resize_to(&mut self, canvas: &Canvas, rect: Rect) -> Option<Rect> {
        let (_, snapped, outcome) = self.resize_target(canvas, rect)?;
        self.set_guides(&outcome);
        if let Some(Gesture::Resize { current, .. }) = &mut self.gesture {
            *current = snapped;
        }
        log::trace!("resize preview {}x{}", snapped.width(), snapped.height());
        Some(snapped)
    }

    /// Finish the resize at `rect`, committing position and size together.
    pub fn end_resize(&mut self, canvas: &mut Canvas, rect: Rect) -> Option<Outcome> {
        let target = self.resize_target(canvas, rect);
        let origin = self.gesture.as_ref().map(Gesture::origin);
        self.gesture = None;
        self.clear_guides();

        let (id, snapped, _) = target?;
        if origin == Some(snapped) {
            return None;
        }
        log::debug!(
            "resize on {id} committed: {}x{} at ({}, {})",
            snapped.width(),
            snapped.height(),
            snapped.x0,
            snapped.y0
        );
        Some(canvas.dispatch(Command::UpdateElement {
            id,
            patch: ElementPatch::bounds(snapped),
        }))
    }

    /// Translate raw pointer events into gestures.
    ///
    /// A press on a corner handle of the active element starts a resize. A
    /// press on an element selects it (Shift toggles) and starts a drag. A
    /// press on empty canvas clears the selection. Returns the outcome of any
    /// command dispatched.
    pub fn handle_pointer(&mut self, canvas: &mut Canvas, event: PointerEvent, modifiers: Modifiers) -> Option<Outcome> {
        match event {
            PointerEvent::Down { position, button } => {
                self.input.handle_pointer_event(event);
                if button != MouseButton::Left {
                    return None;
                }
                self.press(canvas, position, modifiers)
            }
            PointerEvent::Move { position } => {
                self.input.handle_pointer_event(event);
                self.pointer_moved(canvas, position);
                None
            }
            PointerEvent::Up { position, button } => {
                // Release against the drag start before the tracker forgets it.
                let outcome = if button == MouseButton::Left {
                    self.release(canvas, position)
                } else {
                    None
                };
                self.input.handle_pointer_event(event);
                outcome
            }
        }
    }

    fn press(&mut self, canvas: &mut Canvas, position: Point, modifiers: Modifiers) -> Option<Outcome> {
        if let Some(active) = canvas.active_element() {
            let id = active.id();
            if let Some(corner) = hit_test_handles(active.bounds(), position, HANDLE_HIT_TOLERANCE) {
                self.begin_resize(canvas, id, corner);
                return None;
            }
        }

        let Some(hit) = canvas.element_at(position, 0.0) else {
            if canvas.selected_ids().is_empty() {
                return None;
            }
            return Some(canvas.dispatch(Command::Select(Vec::new())));
        };
        let id = hit.id();
        let grab_offset = position - hit.position();

        let outcome = if modifiers.shift {
            Some(canvas.dispatch(Command::ToggleSelect(id)))
        } else if !canvas.is_selected(id) {
            Some(canvas.dispatch(Command::Select(vec![id])))
        } else {
            None
        };

        if canvas.is_selected(id) {
            self.begin_drag_with_offset(canvas, id, grab_offset);
        }
        outcome
    }

    fn pointer_moved(&mut self, canvas: &Canvas, position: Point) {
        match self.gesture.clone() {
            Some(Gesture::Drag { grab_offset, .. }) => {
                let top_left = position - grab_offset;
                self.drag_to(canvas, top_left.x, top_left.y);
            }
            Some(Gesture::Resize { corner, origin, .. }) => {
                let delta = self.input.drag_delta().unwrap_or(Vec2::ZERO);
                self.resize_to(canvas, resize_from_corner(origin, corner, delta));
            }
            None => {}
        }
    }

    fn release(&mut self, canvas: &mut Canvas, position: Point) -> Option<Outcome> {
        match self.gesture.clone() {
            Some(Gesture::Drag { grab_offset, .. }) => {
                let top_left = position - grab_offset;
                self.end_drag(canvas, top_left.x, top_left.y)
            }
            Some(Gesture::Resize { corner, origin, .. }) => {
                let delta = self
                    .input
                    .drag_start
                    .map_or(Vec2::ZERO, |start| position - start);
                self.end_resize(canvas, resize_from_corner(origin, corner, delta))
            }
            None => None,
        }
    }

    /// Resolve a key press and act on it. Returns the outcome of any command
    /// dispatched.
    pub fn handle_key(&mut self, canvas: &mut Canvas, event: KeyEvent) -> Option<Outcome> {
        let action = resolve(&event)?;
        log::debug!("shortcut {action:?}");
        match action {
            ShortcutAction::Undo => {
                self.cancel();
                Some(canvas.dispatch(Command::Undo))
            }
            ShortcutAction::Redo => {
                self.cancel();
                Some(canvas.dispatch(Command::Redo))
            }
            ShortcutAction::SelectAll => Some(canvas.dispatch(Command::SelectAll)),
            ShortcutAction::DeleteSelected => {
                self.cancel();
                Some(canvas.dispatch(Command::DeleteSelected))
            }
            ShortcutAction::Cancel => {
                self.cancel();
                None
            }
            ShortcutAction::Nudge(direction) => self.nudge(canvas, direction, event.modifiers.shift),
        }
    }

    /// Move every selected element one step, snapping each against the
    /// state before the key press. The whole press is one history entry.
    /// Elements that snap back to where they were are left out; if none
    /// moves, nothing is committed. A gesture in progress is dropped first.
    pub fn nudge(&mut self, canvas: &mut Canvas, direction: NudgeDirection, large: bool) -> Option<Outcome> {
        self.cancel();
        let config = canvas.config();
        let step = if large { config.nudge_step_large } else { config.nudge_step };
        let offset = direction.offset(step);

        let mut updates: Vec<(ElementId, ElementPatch)> = Vec::new();
        let mut last_snap = None;
        for id in canvas.selected_ids().iter() {
            if updates.iter().any(|(seen, _)| *seen == id) {
                continue;
            }
            let Some(element) = canvas.element(id) else {
                continue;
            };
            let (snapped, outcome) = self.snap(canvas, id, element.bounds() + offset);
            last_snap = Some(outcome);
            if snapped.origin() != element.position() {
                updates.push((id, ElementPatch::position(snapped.x0, snapped.y0)));
            }
        }

        if let Some(snap) = last_snap {
            self.set_guides(&snap);
        }
        if updates.is_empty() {
            return None;
        }
        log::debug!("nudge {direction:?} by {step} on {} element(s)", updates.len());
        Some(canvas.dispatch(Command::UpdateElements(updates)))
    }
}
