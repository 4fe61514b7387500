//! Engine configuration.
//!
//! The artboard size is agreed with the host rather than fixed, so everything
//! size- or threshold-dependent reads it from here. Configs are plain JSON:
//!
//! ```json
//! { "artboard": { "width": 1000, "height": 700 }, "history_limit": 50 }
//! ```
//!
//! Missing fields fall back to their defaults.

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::snap::{SNAP_THRESHOLD, SnapEngine};
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Logical size of the artboard in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArtboardSize {
    pub width: f64,
    pub height: f64,
}

impl ArtboardSize {
    /// 600 x 350, the default editor layout.
    pub const COMPACT: ArtboardSize = ArtboardSize {
        width: 600.0,
        height: 350.0,
    };

    /// 1000 x 700, the large editor layout.
    pub const WIDE: ArtboardSize = ArtboardSize {
        width: 1000.0,
        height: 700.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for ArtboardSize {
    fn default() -> Self {
        Self::COMPACT
    }
}

fn default_snap_threshold() -> f64 {
    SNAP_THRESHOLD
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_nudge_step() -> f64 {
    1.0
}

fn default_nudge_step_large() -> f64 {
    10.0
}

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub artboard: ArtboardSize,
    /// Maximum distance (canvas units) at which a guide captures an edge.
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f64,
    /// Maximum number of history snapshots.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Arrow-key nudge distance.
    #[serde(default = "default_nudge_step")]
    pub nudge_step: f64,
    /// Arrow-key nudge distance with Shift held.
    #[serde(default = "default_nudge_step_large")]
    pub nudge_step_large: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            artboard: ArtboardSize::default(),
            snap_threshold: default_snap_threshold(),
            history_limit: default_history_limit(),
            nudge_step: default_nudge_step(),
            nudge_step_large: default_nudge_step_large(),
        }
    }
}

impl EngineConfig {
    /// Default settings on a different artboard.
    pub fn with_artboard(artboard: ArtboardSize) -> Self {
        Self {
            artboard,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&json).map_err(|e| match e {
            ConfigError::Parse(msg) => {
                ConfigError::Parse(format!("Failed to parse {}: {}", path.display(), msg))
            }
            other => other,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        let ArtboardSize { width, height } = self.artboard;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "artboard must have a positive size, got {width} x {height}"
            )));
        }
        if !(self.snap_threshold.is_finite() && self.snap_threshold >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "snap_threshold must be >= 0, got {}",
                self.snap_threshold
            )));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid("history_limit must be at least 1".to_string()));
        }
        for (name, step) in [
            ("nudge_step", self.nudge_step),
            ("nudge_step_large", self.nudge_step_large),
        ] {
            if !(step.is_finite() && step >= 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be >= 0, got {step}")));
            }
        }
        Ok(())
    }

    /// Snap engine bound to this artboard and threshold.
    pub fn snap_engine(&self) -> SnapEngine {
        SnapEngine::new(self.artboard.size(), self.snap_threshold)
    }
}
