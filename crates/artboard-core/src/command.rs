//! Mutations accepted by [`Canvas::dispatch`](crate::Canvas::dispatch) and
//! their outcomes.

use crate::canvas::GroupId;
use crate::element::{Element, ElementDraft, ElementId, ElementPatch};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Every state transition of the editor.
///
/// Scripts spell commands as `{"op": "...", "args": ...}`:
///
/// ```json
/// {"op": "update_element", "args": {"id": "…", "patch": {"x": 10}}}
/// {"op": "undo"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
pub enum Command {
    AddElement(ElementDraft),
    UpdateElement {
        id: ElementId,
        patch: ElementPatch,
    },
    /// Several updates recorded as a single history entry.
    UpdateElements(Vec<(ElementId, ElementPatch)>),
    /// Replace the whole collection. Selection and groups drop ids that no
    /// longer exist.
    SetElements(Vec<Element>),
    DeleteElement(ElementId),
    DeleteSelected,
    Select(Vec<ElementId>),
    SelectAll,
    ToggleSelect(ElementId),
    /// Move the element at paint index `source` to `dest`.
    ReorderElements {
        source: usize,
        dest: usize,
    },
    GroupElements(Vec<ElementId>),
    Ungroup(GroupId),
    ClearCanvas,
    Undo,
    Redo,
}

impl Command {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddElement(_) => "add_element",
            Command::UpdateElement { .. } => "update_element",
            Command::UpdateElements(_) => "update_elements",
            Command::SetElements(_) => "set_elements",
            Command::DeleteElement(_) => "delete_element",
            Command::DeleteSelected => "delete_selected",
            Command::Select(_) => "select",
            Command::SelectAll => "select_all",
            Command::ToggleSelect(_) => "toggle_select",
            Command::ReorderElements { .. } => "reorder_elements",
            Command::GroupElements(_) => "group_elements",
            Command::Ungroup(_) => "ungroup",
            Command::ClearCanvas => "clear_canvas",
            Command::Undo => "undo",
            Command::Redo => "redo",
        }
    }
}

/// Why a command left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("no element or group with id {0}")]
    NotFound(Uuid),
    #[error("history boundary reached")]
    BoundaryReached,
    #[error("index {index} out of range for {len} elements")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("props patch does not match the element type")]
    KindMismatch,
    #[error("a group needs at least two existing elements")]
    NotEnoughMembers,
    #[error("nothing to apply")]
    EmptyBatch,
    #[error("element id {0} appears more than once")]
    DuplicateId(Uuid),
}

/// Result of dispatching a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// State changed and one snapshot was recorded.
    Committed,
    /// Like `Committed`, carrying the id of the new element or group.
    Created(Uuid),
    /// Undo or redo restored a snapshot.
    Restored,
    Ignored(Rejection),
}

impl Outcome {
    /// True if a snapshot was recorded.
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed | Outcome::Created(_))
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignored(_))
    }

    pub fn created_id(&self) -> Option<Uuid> {
        match self {
            Outcome::Created(id) => Some(*id),
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Outcome::Ignored(rejection) => Some(*rejection),
            _ => None,
        }
    }
}
