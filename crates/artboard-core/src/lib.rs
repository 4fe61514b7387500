//! Artboard Core Library
//!
//! Manipulation engine for a 2D design canvas: element model, snap guides,
//! mutation reducer with bounded undo/redo, and pointer/keyboard gestures.
//! Rendering and UI chrome live outside this crate.

pub mod canvas;
pub mod command;
pub mod config;
pub mod element;
pub mod history;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod shortcuts;
pub mod snap;

pub use canvas::{Canvas, EditorState, GroupId, RenderSnapshot};
pub use command::{Command, Outcome, Rejection};
pub use config::{ArtboardSize, ConfigError, EngineConfig};
pub use element::{Color, Element, ElementDraft, ElementId, ElementKind, ElementPatch, ElementProps};
pub use history::History;
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{Gesture, Interaction};
pub use selection::{Corner, Selection};
pub use shortcuts::{NudgeDirection, ShortcutAction, ShortcutRegistry};
pub use snap::{SnapEngine, SnapOutcome, compute_guides_and_snap};
