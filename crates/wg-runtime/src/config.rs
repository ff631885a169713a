#![forbid(unsafe_code)]

//! Engine configuration loaded from TOML or JSON.
//!
//! Groups the tunables of the calendar engines into one [`EngineConfig`]
//! that a host can ship as a file instead of hardcoding.
//!
//! # Loading
//!
//! ```toml
//! # workgraph.toml
//! [selection]
//! drag_select = false
//!
//! [history]
//! max_history = 100
//! guard_release = "after_dispatch"
//!
//! [shortcuts]
//! redo_with_y = false
//! ```
//!
//! ```rust,ignore
//! let config = EngineConfig::from_toml_file("workgraph.toml")?;
//! let config = EngineConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! Every section and field is optional. Missing values take the same
//! defaults as the individual config types, so an empty file equals
//! `EngineConfig::default()`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wg_core::ShortcutConfig;
use wg_selection::SelectionConfig;

use crate::undo::HistoryConfig;

/// Top-level configuration for the calendar engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Selection gestures.
    pub selection: SelectionConfig,
    /// Undo/redo depth and guard behavior.
    pub history: HistoryConfig,
    /// Keyboard shortcut bindings.
    pub shortcuts: ShortcutConfig,
}

impl EngineConfig {
    /// Load from a TOML string and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk and validate.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(
            target: "wg_runtime::config",
            path = %path.as_ref().display(),
            "loading engine config"
        );
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Serialize to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check constraints, returning every violation found.
    ///
    /// An empty vector means the configuration is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.history.max_history == 0 {
            errors.push("history.max_history must be >= 1".into());
        }

        errors
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    /// JSON parse or serialize error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
