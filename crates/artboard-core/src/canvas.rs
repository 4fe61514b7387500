//! Editor state and the mutation reducer.

use crate::command::{Command, Outcome, Rejection};
use crate::config::EngineConfig;
use crate::element::{Element, ElementDraft, ElementId, ElementPatch};
use crate::history::History;
use crate::selection::Selection;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// Unique identifier for groups.
pub type GroupId = Uuid;

/// Everything undo/redo restores: elements in paint order (back to front),
/// the selection, and the groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    pub elements: Vec<Element>,
    pub selected_ids: Selection,
    #[serde(default)]
    pub groups: BTreeMap<GroupId, Vec<ElementId>>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an element by id.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id() == id)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id() == id)
    }

    /// Paint index of an element.
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|el| el.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// The group an element belongs to, if any.
    pub fn group_of(&self, id: ElementId) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|(_, members)| members.contains(&id))
            .map(|(&group, _)| group)
    }

    /// Ids of elements hit at `point`, front to back.
    pub fn elements_at_point(&self, point: Point, tolerance: f64) -> Vec<ElementId> {
        self.elements
            .iter()
            .rev()
            .filter(|el| el.hit_test(point, tolerance))
            .map(Element::id)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Drop a member from every group, dissolving groups left with fewer
    /// than two members.
    fn remove_from_groups(&mut self, id: ElementId) {
        for members in self.groups.values_mut() {
            members.retain(|&member| member != id);
        }
        self.dissolve_small_groups();
    }

    fn dissolve_small_groups(&mut self) {
        self.groups.retain(|_, members| members.len() >= 2);
    }

    /// Remove selection and group references to elements that no longer exist.
    fn prune_dangling(&mut self) {
        let live: Vec<ElementId> = self.elements.iter().map(Element::id).collect();
        self.selected_ids.retain(|id| live.contains(id));
        for members in self.groups.values_mut() {
            members.retain(|id| live.contains(id));
        }
        self.dissolve_small_groups();
    }
}

/// Read-only view handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot<'a> {
    pub elements: &'a [Element],
    pub selected_ids: &'a Selection,
}

impl RenderSnapshot<'_> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Owner of the live editor state and its history. All mutation goes
/// through [`Canvas::dispatch`].
#[derive(Debug, Clone)]
pub struct Canvas {
    state: EditorState,
    history: History<EditorState>,
    config: EngineConfig,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Canvas {
    /// Create an empty canvas. History starts empty.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: EditorState::new(),
            history: History::new(config.history_limit),
            config,
        }
    }

    /// Apply a command. Every successful command other than undo/redo
    /// records exactly one snapshot; an ignored command changes nothing.
    pub fn dispatch(&mut self, command: Command) -> Outcome {
        let name = command.name();
        let outcome = match command {
            Command::Undo => return self.undo(),
            Command::Redo => return self.redo(),
            Command::AddElement(draft) => self.add_element(draft),
            Command::UpdateElement { id, patch } => self.update_element(id, &patch),
            Command::UpdateElements(updates) => self.update_elements(&updates),
            Command::SetElements(elements) => self.set_elements(elements),
            Command::DeleteElement(id) => self.delete_element(id),
            Command::DeleteSelected => self.delete_selected(),
            Command::Select(ids) => {
                self.state.selected_ids.replace(ids);
                Ok(Outcome::Committed)
            }
            Command::SelectAll => {
                let ids = self.state.elements.iter().map(Element::id).collect();
                self.state.selected_ids.replace(ids);
                Ok(Outcome::Committed)
            }
            Command::ToggleSelect(id) => {
                self.state.selected_ids.toggle(id);
                Ok(Outcome::Committed)
            }
            Command::ReorderElements { source, dest } => self.reorder(source, dest),
            Command::GroupElements(ids) => self.group_elements(ids),
            Command::Ungroup(group) => self.ungroup(group),
            Command::ClearCanvas => {
                self.state = EditorState::new();
                Ok(Outcome::Committed)
            }
        };

        match outcome {
            Ok(outcome) => {
                self.history.commit(self.state.clone());
                log::debug!(
                    "{name}: committed ({} elements, history {}/{})",
                    self.state.len(),
                    self.history.len(),
                    self.history.limit()
                );
                outcome
            }
            Err(rejection) => {
                log::debug!("{name}: ignored ({rejection})");
                Outcome::Ignored(rejection)
            }
        }
    }

    fn undo(&mut self) -> Outcome {
        match self.history.undo() {
            Some(snapshot) => {
                self.state = snapshot.clone();
                log::debug!("undo: restored snapshot {:?}", self.history.index());
                Outcome::Restored
            }
            None => Outcome::Ignored(Rejection::BoundaryReached),
        }
    }

    fn redo(&mut self) -> Outcome {
        match self.history.redo() {
            Some(snapshot) => {
                self.state = snapshot.clone();
                log::debug!("redo: restored snapshot {:?}", self.history.index());
                Outcome::Restored
            }
            None => Outcome::Ignored(Rejection::BoundaryReached),
        }
    }

    fn add_element(&mut self, draft: ElementDraft) -> Result<Outcome, Rejection> {
        if draft.width < 0.0 || draft.height < 0.0 {
            log::warn!(
                "negative extent {}x{} clamped to zero",
                draft.width,
                draft.height
            );
        }
        let id = Uuid::new_v4();
        self.state.elements.push(Element::from_draft(id, draft));
        Ok(Outcome::Created(id))
    }

    /// Validate and apply one patch without recording history.
    fn patch_element(&mut self, id: ElementId, patch: &ElementPatch) -> Result<(), Rejection> {
        let element = self.state.element_mut(id).ok_or(Rejection::NotFound(id))?;
        if let Some(props) = &patch.props {
            if props.kind() != element.kind() {
                return Err(Rejection::KindMismatch);
            }
        }
        if patch.has_negative_extent() {
            log::warn!("element {id}: negative extent in patch clamped to zero");
        }
        element.apply(patch);
        Ok(())
    }

    fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> Result<Outcome, Rejection> {
        self.patch_element(id, patch)?;
        Ok(Outcome::Committed)
    }

    /// Entries that cannot apply are skipped; the batch is ignored only if
    /// none of them applies.
    fn update_elements(&mut self, updates: &[(ElementId, ElementPatch)]) -> Result<Outcome, Rejection> {
        let mut applied = 0;
        for (id, patch) in updates {
            match self.patch_element(*id, patch) {
                Ok(()) => applied += 1,
                Err(rejection) => log::warn!("batch update skipped {id}: {rejection}"),
            }
        }
        if applied == 0 {
            return Err(Rejection::EmptyBatch);
        }
        Ok(Outcome::Committed)
    }

    fn set_elements(&mut self, elements: Vec<Element>) -> Result<Outcome, Rejection> {
        let mut seen = HashSet::with_capacity(elements.len());
        if let Some(dup) = elements.iter().map(Element::id).find(|id| !seen.insert(*id)) {
            return Err(Rejection::DuplicateId(dup));
        }
        self.state.elements = elements
            .into_iter()
            .map(|mut el| {
                el.props = el.props.normalized();
                if !(el.width >= 0.0 && el.height >= 0.0 && el.width.is_finite() && el.height.is_finite()) {
                    log::warn!("element {}: invalid extent clamped to zero", el.id());
                    let clamp = ElementPatch::size(el.width, el.height);
                    el.apply(&clamp);
                }
                el
            })
            .collect();
        self.state.prune_dangling();
        Ok(Outcome::Committed)
    }

    fn delete_element(&mut self, id: ElementId) -> Result<Outcome, Rejection> {
        let index = self.state.index_of(id).ok_or(Rejection::NotFound(id))?;
        self.state.elements.remove(index);
        self.state.selected_ids.remove(id);
        self.state.remove_from_groups(id);
        Ok(Outcome::Committed)
    }

    fn delete_selected(&mut self) -> Result<Outcome, Rejection> {
        let before = self.state.len();
        let selection = self.state.selected_ids.clone();
        self.state.elements.retain(|el| !selection.contains(el.id()));
        if self.state.len() == before {
            return Err(Rejection::EmptyBatch);
        }
        self.state.prune_dangling();
        Ok(Outcome::Committed)
    }

    fn reorder(&mut self, source: usize, dest: usize) -> Result<Outcome, Rejection> {
        let len = self.state.len();
        for index in [source, dest] {
            if index >= len {
                return Err(Rejection::IndexOutOfRange { index, len });
            }
        }
        let element = self.state.elements.remove(source);
        self.state.elements.insert(dest, element);
        Ok(Outcome::Committed)
    }

    /// Members are kept in the order given, minus duplicates and ids that
    /// do not exist. They leave any group they were already in.
    fn group_elements(&mut self, ids: Vec<ElementId>) -> Result<Outcome, Rejection> {
        let mut members: Vec<ElementId> = Vec::with_capacity(ids.len());
        for id in ids {
            if self.state.contains(id) && !members.contains(&id) {
                members.push(id);
            }
        }
        if members.len() < 2 {
            return Err(Rejection::NotEnoughMembers);
        }

        for existing in self.state.groups.values_mut() {
            existing.retain(|id| !members.contains(id));
        }
        self.state.dissolve_small_groups();

        let group = Uuid::new_v4();
        self.state.groups.insert(group, members);
        Ok(Outcome::Created(group))
    }

    fn ungroup(&mut self, group: GroupId) -> Result<Outcome, Rejection> {
        self.state
            .groups
            .remove(&group)
            .map(|_| Outcome::Committed)
            .ok_or(Rejection::NotFound(group))
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Elements in paint order.
    pub fn elements(&self) -> &[Element] {
        &self.state.elements
    }

    pub fn selected_ids(&self) -> &Selection {
        &self.state.selected_ids
    }

    pub fn groups(&self) -> &BTreeMap<GroupId, Vec<ElementId>> {
        &self.state.groups
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.state.element(id)
    }

    /// The last selected element, if it still exists.
    pub fn active_element(&self) -> Option<&Element> {
        self.state
            .selected_ids
            .active()
            .and_then(|id| self.state.element(id))
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.state.selected_ids.contains(id)
    }

    /// Topmost element hit at `point`.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<&Element> {
        self.state
            .elements
            .iter()
            .rev()
            .find(|el| el.hit_test(point, tolerance))
    }

    pub fn render_snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            elements: &self.state.elements,
            selected_ids: &self.state.selected_ids,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_index(&self) -> Option<usize> {
        self.history.index()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{CropRect, ElementKind, ElementProps, FillProps, ImageProps, TextProps};

    fn add(canvas: &mut Canvas, draft: ElementDraft) -> ElementId {
        canvas
            .dispatch(Command::AddElement(draft))
            .created_id()
            .unwrap()
    }

    fn rect_at(x: f64, y: f64) -> ElementDraft {
        ElementDraft::rect().at(x, y)
    }

    #[test]
    fn test_add_element_assigns_unique_ids() {
        let mut canvas = Canvas::default();
        let a = add(&mut canvas, rect_at(0.0, 0.0));
        let b = add(&mut canvas, rect_at(0.0, 0.0));
        assert_ne!(a, b);
        assert_eq!(canvas.elements().len(), 2);
        assert_eq!(canvas.elements()[1].id(), b);
        assert_eq!(canvas.history_len(), 2);
        assert_eq!(canvas.history_index(), Some(1));
    }

    #[test]
    fn test_update_element_merges() {
        let mut canvas = Canvas::default();
        let id = add(&mut canvas, rect_at(10.0, 10.0));
        let outcome = canvas.dispatch(Command::UpdateElement {
            id,
            patch: ElementPatch::position(40.0, 50.0),
        });
        assert_eq!(outcome, Outcome::Committed);
        let el = canvas.element(id).unwrap();
        assert_eq!(el.position(), Point::new(40.0, 50.0));
        assert!((el.width - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_missing_element_is_ignored() {
        let mut canvas = Canvas::default();
        add(&mut canvas, rect_at(0.0, 0.0));
        let before = canvas.state().clone();
        let missing = Uuid::new_v4();
        let outcome = canvas.dispatch(Command::UpdateElement {
            id: missing,
            patch: ElementPatch::position(1.0, 1.0),
        });
        assert_eq!(outcome, Outcome::Ignored(Rejection::NotFound(missing)));
        assert_eq!(canvas.state(), &before);
        assert_eq!(canvas.history_len(), 1);
    }

    #[test]
    fn test_props_kind_mismatch_is_ignored() {
        let mut canvas = Canvas::default();
        let id = add(&mut canvas, rect_at(0.0, 0.0));
        let outcome = canvas.dispatch(Command::UpdateElement {
            id,
            patch: ElementPatch::props(ElementProps::Text(TextProps::new("nope"))),
        });
        assert_eq!(outcome, Outcome::Ignored(Rejection::KindMismatch));
        assert_eq!(canvas.element(id).unwrap().kind(), ElementKind::Rect);

        let outcome = canvas.dispatch(Command::UpdateElement {
            id,
            patch: ElementPatch::props(ElementProps::Rect(FillProps {
                fill: "#00ff00".parse().unwrap(),
            })),
        });
        assert!(outcome.is_committed());
    }

    #[test]
    fn test_negative_extent_is_clamped() {
        let mut canvas = Canvas::default();
        let id = add(&mut canvas, rect_at(0.0, 0.0).with_size(-10.0, 20.0));
        assert_eq!(canvas.element(id).unwrap().width, 0.0);

        canvas.dispatch(Command::UpdateElement {
            id,
            patch: ElementPatch::size(30.0, -1.0),
        });
        let el = canvas.element(id).unwrap();
        assert!((el.width - 30.0).abs() < f64::EPSILON);
        assert_eq!(el.height, 0.0);
    }

    #[test]
    fn test_update_elements_is_one_snapshot() {
        let mut canvas = Canvas::default();
        let a = add(&mut canvas, rect_at(0.0, 0.0));
        let b = add(&mut canvas, rect_at(200.0, 0.0));
        let outcome = canvas.dispatch(Command::UpdateElements(vec![
            (a, ElementPatch::position(1.0, 1.0)),
            (b, ElementPatch::position(201.0, 1.0)),
            (Uuid::new_v4(), ElementPatch::position(5.0, 5.0)),
        ]));
        assert!(outcome.is_committed());
        assert_eq!(canvas.history_len(), 3);

        canvas.dispatch(Command::Undo);
        assert_eq!(canvas.element(a).unwrap().position(), Point::new(0.0, 0.0));
        assert_eq!(canvas.element(b).unwrap().position(), Point::new(200.0, 0.0));
    }

    #[test]
    fn test_update_elements_nothing_applies() {
        let mut canvas = Canvas::default();
        let outcome = canvas.dispatch(Command::UpdateElements(vec![(
            Uuid::new_v4(),
            ElementPatch::position(0.0, 0.0),
        )]));
        assert_eq!(outcome, Outcome::Ignored(Rejection::EmptyBatch));
        assert_eq!(canvas.history_len(), 0);
    }

    #[test]
    fn test_delete_prunes_selection_and_groups() {
        let mut canvas = Canvas::default();
        let a = add(&mut canvas, rect_at(0.0, 0.0));
        let b = add(&mut canvas, rect_at(200.0, 0.0));
        canvas.dispatch(Command::Select(vec![a, b]));
        let group = canvas.dispatch(Command::GroupElements(vec![a, b])).created_id().unwrap();
        assert!(canvas.groups().contains_key(&group));

        assert!(canvas.dispatch(Command::DeleteElement(a)).is_committed());
        assert_eq!(canvas.selected_ids().as_slice(), &[b]);
        // A group with a single member dissolves.
        assert!(canvas.groups().is_empty());

        let outcome = canvas.dispatch(Command::DeleteElement(a));
        assert_eq!(outcome, Outcome::Ignored(Rejection::NotFound(a)));
    }

    #[test]
    fn test_delete_selected() {
        let mut canvas = Canvas::default();
        let a = add(&mut canvas, rect_at(0.0, 0.0));
        let b = add(&mut canvas, rect_at(200.0, 0.0));
        let c = add(&mut canvas, rect_at(400.0, 0.0));
        canvas.dispatch(Command::Select(vec![a, c]));
        assert!(canvas.dispatch(Command::DeleteSelected).is_committed());
        assert_eq!(canvas.elements().len(), 1);
        assert_eq!(canvas.elements()[0].id(), b);
        assert!(canvas.selected_ids().is_empty());

        let outcome = canvas.dispatch(Command::DeleteSelected);
        assert_eq!(outcome, Outcome::Ignored(Rejection::EmptyBatch));
    }

    #[test]
    fn test_select_and_toggle() {
        let mut canvas = Canvas::default();
        let a = add(&mut canvas, rect_at(0.0, 0.0));
        let b = add(&mut canvas, rect_at(200.0, 0.0));

        canvas.dispatch(Command::Select(vec![a]));
        canvas.dispatch(Command::ToggleSelect(b));
        assert_eq!(canvas.selected_ids().as_slice(), &[a, b]);
        assert_eq!(canvas.active_element().unwrap().id(), b);

        canvas.dispatch(Command::ToggleSelect(a));
        assert_eq!(canvas.selected_ids().as_slice(), &[b]);

        canvas.dispatch(Command::SelectAll);
        assert_eq!(canvas.selected_ids().as_slice(), &[a, b]);
        assert!(canvas.is_selected(a));
    }

    #[test]
    fn test_reorder() {
        let mut canvas = Canvas::default();
        let a = add(&mut canvas, rect_at(0.0, 0.0));
        let b = add(&mut canvas, rect_at(0.0, 0.0));
        let c = add(&mut canvas, rect_at(0.0, 0.0));

        canvas.dispatch(Command::ReorderElements { source: 0, dest: 2 });
        let order: Vec<_> = canvas.elements().iter().map(Element::id).collect();
        assert_eq!(order, vec![b, c, a]);

        let outcome = canvas.dispatch(Command::ReorderElements { source: 3, dest: 0 });
        assert_eq!(
            outcome,
            Outcome::Ignored(Rejection::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_group_requires_two_existing_members() {
        let mut canvas = Canvas::default();
        let a = add(&mut canvas, rect_at(0.0, 0.0));
        let outcome = canvas.dispatch(Command::GroupElements(vec![a, a, Uuid::new_v4()]));
        assert_eq!(outcome, Outcome::Ignored(Rejection::NotEnoughMembers));
    }

    #[test]
    fn test_regrouping_moves_members() {
        let mut canvas = Canvas::default();
        let a = add(&mut canvas, rect_at(0.0, 0.0));
        let b = add(&mut canvas, rect_at(0.0, 0.0));
        let c = add(&mut canvas, rect_at(0.0, 0.0));

        let first = canvas.dispatch(Command::GroupElements(vec![a, b])).created_id().unwrap();
        let second = canvas.dispatch(Command::GroupElements(vec![b, c])).created_id().unwrap();

        assert!(!canvas.groups().contains_key(&first));
        assert_eq!(canvas.groups()[&second], vec![b, c]);
        assert_eq!(canvas.state().group_of(c), Some(second));
        assert_eq!(canvas.state().group_of(a), None);

        assert!(canvas.dispatch(Command::Ungroup(second)).is_committed());
        assert!(canvas.groups().is_empty());
        assert_eq!(
            canvas.dispatch(Command::Ungroup(second)),
            Outcome::Ignored(Rejection::NotFound(second))
        );
    }

    #[test]
    fn test_set_elements_prunes_selection() {
        let mut canvas = Canvas::default();
        let a = add(&mut canvas, rect_at(0.0, 0.0));
        let b = add(&mut canvas, rect_at(0.0, 0.0));
        canvas.dispatch(Command::Select(vec![a, b]));

        let keep = canvas.element(b).unwrap().clone();
        canvas.dispatch(Command::SetElements(vec![keep]));
        assert_eq!(canvas.elements().len(), 1);
        assert_eq!(canvas.selected_ids().as_slice(), &[b]);
    }

    #[test]
    fn test_set_elements_rejects_duplicate_ids() {
        let mut canvas = Canvas::default();
        let a = add(&mut canvas, rect_at(0.0, 0.0));
        let el = canvas.element(a).unwrap().clone();
        let history = canvas.history_len();

        let outcome = canvas.dispatch(Command::SetElements(vec![el.clone(), el]));
        assert_eq!(outcome, Outcome::Ignored(Rejection::DuplicateId(a)));
        assert_eq!(canvas.elements().len(), 1);
        assert_eq!(canvas.history_len(), history);

        assert!(canvas.dispatch(Command::DeleteElement(a)).is_committed());
        assert!(canvas.element(a).is_none());
    }

    #[test]
    fn test_set_elements_clamps_image_props() {
        let mut canvas = Canvas::default();
        let id = add(&mut canvas, ElementDraft::image("photo.png"));
        let mut el = canvas.element(id).unwrap().clone();
        el.props = ElementProps::Image(ImageProps::new("photo.png").with_opacity(5.0).with_crop(CropRect {
            x: -0.5,
            y: 0.25,
            width: 3.0,
            height: 1.0,
        }));

        assert!(canvas.dispatch(Command::SetElements(vec![el])).is_committed());
        match &canvas.element(id).unwrap().props {
            ElementProps::Image(image) => {
                assert!((image.opacity - 1.0).abs() < f64::EPSILON);
                assert!(image.crop.x.abs() < f64::EPSILON);
                assert!((image.crop.width - 1.0).abs() < f64::EPSILON);
                assert!((image.crop.height - 0.75).abs() < f64::EPSILON);
            }
            other => panic!("expected image props, got {other:?}"),
        }
    }

    #[test]
    fn test_clear_and_undo() {
        let mut canvas = Canvas::default();
        add(&mut canvas, rect_at(0.0, 0.0));
        add(&mut canvas, ElementDraft::circle());
        let before = canvas.state().clone();

        canvas.dispatch(Command::ClearCanvas);
        assert!(canvas.elements().is_empty());

        assert_eq!(canvas.dispatch(Command::Undo), Outcome::Restored);
        assert_eq!(canvas.state(), &before);
    }

    #[test]
    fn test_undo_redo_boundaries() {
        let mut canvas = Canvas::default();
        assert_eq!(
            canvas.dispatch(Command::Undo),
            Outcome::Ignored(Rejection::BoundaryReached)
        );
        add(&mut canvas, rect_at(0.0, 0.0));
        assert_eq!(
            canvas.dispatch(Command::Undo),
            Outcome::Ignored(Rejection::BoundaryReached)
        );
        assert_eq!(
            canvas.dispatch(Command::Redo),
            Outcome::Ignored(Rejection::BoundaryReached)
        );
        assert!(!canvas.can_undo());
        assert!(!canvas.can_redo());
    }

    #[test]
    fn test_new_commit_discards_redo() {
        let mut canvas = Canvas::default();
        add(&mut canvas, rect_at(0.0, 0.0));
        add(&mut canvas, rect_at(10.0, 0.0));
        canvas.dispatch(Command::Undo);
        assert!(canvas.can_redo());

        add(&mut canvas, rect_at(20.0, 0.0));
        assert!(!canvas.can_redo());
        assert_eq!(
            canvas.dispatch(Command::Redo),
            Outcome::Ignored(Rejection::BoundaryReached)
        );
    }

    #[test]
    fn test_restored_state_is_not_aliased() {
        let mut canvas = Canvas::default();
        let id = add(&mut canvas, rect_at(0.0, 0.0));
        canvas.dispatch(Command::UpdateElement {
            id,
            patch: ElementPatch::position(5.0, 5.0),
        });
        canvas.dispatch(Command::Undo);
        canvas.dispatch(Command::UpdateElement {
            id,
            patch: ElementPatch::position(9.0, 9.0),
        });
        canvas.dispatch(Command::Undo);
        assert_eq!(canvas.element(id).unwrap().position(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = EngineConfig {
            history_limit: 3,
            ..EngineConfig::default()
        };
        let mut canvas = Canvas::new(config);
        for i in 0..5 {
            add(&mut canvas, rect_at(i as f64, 0.0));
        }
        assert_eq!(canvas.history_len(), 3);
        while canvas.dispatch(Command::Undo) == Outcome::Restored {}
        assert_eq!(canvas.elements().len(), 3);
    }

    #[test]
    fn test_element_at_returns_topmost() {
        let mut canvas = Canvas::default();
        let back = add(&mut canvas, rect_at(0.0, 0.0));
        let front = add(&mut canvas, rect_at(50.0, 30.0));
        assert_eq!(canvas.element_at(Point::new(60.0, 40.0), 0.0).unwrap().id(), front);
        assert_eq!(canvas.element_at(Point::new(10.0, 10.0), 0.0).unwrap().id(), back);
        assert!(canvas.element_at(Point::new(500.0, 300.0), 0.0).is_none());
        assert_eq!(
            canvas.state().elements_at_point(Point::new(60.0, 40.0), 0.0),
            vec![front, back]
        );
    }

    #[test]
    fn test_render_snapshot_json() {
        let mut canvas = Canvas::default();
        let id = add(&mut canvas, rect_at(0.0, 0.0));
        canvas.dispatch(Command::Select(vec![id]));
        let json = canvas.render_snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["elements"][0]["type"], "rect");
        assert_eq!(value["selected_ids"][0], id.to_string());
    }
}
