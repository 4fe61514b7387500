//! Editing scripts: a config plus a list of commands and input events.
//!
//! ```json
//! {
//!   "config": { "artboard": { "width": 1000, "height": 700 } },
//!   "steps": [
//!     { "command": { "op": "add_element", "args": { "type": "rect", "x": 50, "y": 50, "width": 120, "height": 60, "fill": "#ef4444" } } },
//!     { "pointer": { "event": { "kind": "down", "position": { "x": 60, "y": 60 } } } },
//!     { "pointer": { "event": { "kind": "up", "position": { "x": 90, "y": 60 } } } },
//!     { "key": { "key": { "Char": "z" }, "modifiers": { "ctrl": true } } }
//!   ]
//! }
//! ```

use artboard_core::{
    Canvas, Command, ConfigError, EngineConfig, Interaction, KeyEvent, Modifiers, Outcome, PointerEvent,
    RenderSnapshot,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Host errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Dispatch a command directly.
    Command(Command),
    /// A pointer event routed through the interaction controller.
    Pointer {
        event: PointerEvent,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// A key press routed through the shortcut table.
    Key(KeyEvent),
}

/// A full editing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let script: Self = serde_json::from_str(json).map_err(|e| AppError::Parse(e.to_string()))?;
        script.config.validate()?;
        Ok(script)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Replay every step against a fresh canvas.
    pub fn replay(&self) -> Session {
        let mut canvas = Canvas::new(self.config.clone());
        let mut interaction = Interaction::new();
        let mut outcomes = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            let outcome = match step {
                Step::Command(command) => Some(canvas.dispatch(command.clone())),
                Step::Pointer { event, modifiers } => interaction.handle_pointer(&mut canvas, *event, *modifiers),
                Step::Key(event) => interaction.handle_key(&mut canvas, *event),
            };
            log::debug!("step {index}: {outcome:?}");
            outcomes.push(outcome);
        }

        log::info!(
            "replayed {} steps: {} elements, history {}",
            self.steps.len(),
            canvas.elements().len(),
            canvas.history_len()
        );
        Session {
            canvas,
            interaction,
            outcomes,
        }
    }
}

/// State left behind by a replay.
#[derive(Debug, Clone)]
pub struct Session {
    pub canvas: Canvas,
    pub interaction: Interaction,
    /// One entry per step; `None` when the step dispatched nothing.
    pub outcomes: Vec<Option<Outcome>>,
}

impl Session {
    pub fn report(&self) -> Report<'_> {
        let (v_guides, h_guides) = self.interaction.guides();
        Report {
            snapshot: self.canvas.render_snapshot(),
            v_guides,
            h_guides,
            outcomes: &self.outcomes,
            can_undo: self.canvas.can_undo(),
            can_redo: self.canvas.can_redo(),
        }
    }
}

/// What the host prints after a replay.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    #[serde(flatten)]
    pub snapshot: RenderSnapshot<'a>,
    pub v_guides: &'a [f64],
    pub h_guides: &'a [f64],
    pub outcomes: &'a [Option<Outcome>],
    pub can_undo: bool,
    pub can_redo: bool,
}

impl Report<'_> {
    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Load a script, replay it and render the report as JSON.
pub fn run_file(path: impl AsRef<Path>) -> Result<String, AppError> {
    let script = Script::load(path)?;
    script.replay().report().to_json()
}
