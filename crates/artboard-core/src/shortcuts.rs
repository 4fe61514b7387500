//! Keyboard shortcut resolution and the binding table.

use crate::input::{Key, KeyEvent};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NudgeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl NudgeDirection {
    /// Offset of one nudge of `step` units.
    pub fn offset(self, step: f64) -> Vec2 {
        match self {
            NudgeDirection::Up => Vec2::new(0.0, -step),
            NudgeDirection::Down => Vec2::new(0.0, step),
            NudgeDirection::Left => Vec2::new(-step, 0.0),
            NudgeDirection::Right => Vec2::new(step, 0.0),
        }
    }
}

/// What a key press asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShortcutAction {
    Undo,
    Redo,
    SelectAll,
    DeleteSelected,
    /// Abort the gesture in progress.
    Cancel,
    Nudge(NudgeDirection),
}

/// Map a key press to an action.
pub fn resolve(event: &KeyEvent) -> Option<ShortcutAction> {
    let mods = event.modifiers;
    match event.key {
        Key::Char(c) if mods.command() => match c.to_ascii_lowercase() {
            'z' if mods.shift => Some(ShortcutAction::Redo),
            'z' => Some(ShortcutAction::Undo),
            'y' => Some(ShortcutAction::Redo),
            'a' => Some(ShortcutAction::SelectAll),
            _ => None,
        },
        Key::Char(_) => None,
        Key::Delete | Key::Backspace => Some(ShortcutAction::DeleteSelected),
        Key::Escape => Some(ShortcutAction::Cancel),
        Key::ArrowUp => Some(ShortcutAction::Nudge(NudgeDirection::Up)),
        Key::ArrowDown => Some(ShortcutAction::Nudge(NudgeDirection::Down)),
        Key::ArrowLeft => Some(ShortcutAction::Nudge(NudgeDirection::Left)),
        Key::ArrowRight => Some(ShortcutAction::Nudge(NudgeDirection::Right)),
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("A", true, false, "Select all elements"),
            Shortcut::new("Delete", false, false, "Delete selected elements"),
            Shortcut::new("Backspace", false, false, "Delete selected elements"),
            Shortcut::new("Escape", false, false, "Cancel current drag or resize"),
            Shortcut::new("Arrows", false, false, "Nudge selection by the small step"),
            Shortcut::new("Arrows", false, true, "Nudge selection by the large step"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn press(key: Key, modifiers: Modifiers) -> Option<ShortcutAction> {
        resolve(&KeyEvent::new(key, modifiers))
    }

    #[test]
    fn test_history_shortcuts() {
        assert_eq!(press(Key::Char('z'), Modifiers::CTRL), Some(ShortcutAction::Undo));
        assert_eq!(
            press(Key::Char('Z'), Modifiers { shift: true, ctrl: true, ..Modifiers::NONE }),
            Some(ShortcutAction::Redo)
        );
        assert_eq!(press(Key::Char('y'), Modifiers::CTRL), Some(ShortcutAction::Redo));
        assert_eq!(
            press(Key::Char('z'), Modifiers { meta: true, ..Modifiers::NONE }),
            Some(ShortcutAction::Undo)
        );
    }

    #[test]
    fn test_plain_letters_do_nothing() {
        assert_eq!(press(Key::Char('z'), Modifiers::NONE), None);
        assert_eq!(press(Key::Char('q'), Modifiers::CTRL), None);
    }

    #[test]
    fn test_editing_keys() {
        assert_eq!(press(Key::Char('a'), Modifiers::CTRL), Some(ShortcutAction::SelectAll));
        assert_eq!(press(Key::Delete, Modifiers::NONE), Some(ShortcutAction::DeleteSelected));
        assert_eq!(press(Key::Backspace, Modifiers::NONE), Some(ShortcutAction::DeleteSelected));
        assert_eq!(press(Key::Escape, Modifiers::NONE), Some(ShortcutAction::Cancel));
    }

    #[test]
    fn test_arrows_nudge_regardless_of_shift() {
        assert_eq!(
            press(Key::ArrowLeft, Modifiers::SHIFT),
            Some(ShortcutAction::Nudge(NudgeDirection::Left))
        );
        let offset = NudgeDirection::Up.offset(10.0);
        assert_eq!(offset, Vec2::new(0.0, -10.0));
    }

    #[test]
    fn test_shortcut_format() {
        assert_eq!(Shortcut::new("Z", true, true, "Redo").format(), "Ctrl+Shift+Z");
        assert!(ShortcutRegistry::all().iter().any(|s| s.description == "Undo"));
    }
}
