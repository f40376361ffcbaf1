//! Settings infrastructure for nbhint.
//!
//! This module provides support for loading and parsing `hints.toml` files
//! to tune the documentation hint pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::document::CellResolver;
use crate::lsp::DEFAULT_DEBOUNCE;

/// Name of the settings file searched for in the workspace.
pub const SETTINGS_FILE: &str = "hints.toml";

/// Root settings structure loaded from hints.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Documentation hint configuration.
    pub hints: Option<HintSettings>,
}

/// Settings for hover and cursor-tracking documentation.
#[derive(Debug, Default, Deserialize)]
pub struct HintSettings {
    /// Quiescence delay for cursor-tracking lookups, in milliseconds (default: 200).
    pub debounce_ms: Option<u64>,

    /// Completion kinds never shown on hover (default: ["tooltip"]).
    pub hover_exclude_types: Option<Vec<String>>,

    /// Completion kinds never shown for the cursor position (default: none).
    pub cursor_exclude_types: Option<Vec<String>>,

    /// Regex applied to a document URI fragment to find its cell.
    /// The `id` group (or the first group) is the cell id.
    pub cell_pattern: Option<String>,
}

impl Settings {
    pub fn debounce(&self) -> Duration {
        self.hints
            .as_ref()
            .and_then(|h| h.debounce_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DEBOUNCE)
    }

    pub fn hover_exclude_types(&self) -> Vec<String> {
        self.hints
            .as_ref()
            .and_then(|h| h.hover_exclude_types.clone())
            .unwrap_or_else(|| vec!["tooltip".to_string()])
    }

    pub fn cursor_exclude_types(&self) -> Vec<String> {
        self.hints
            .as_ref()
            .and_then(|h| h.cursor_exclude_types.clone())
            .unwrap_or_default()
    }

    /// Build the cell resolver, falling back to the default pattern if the
    /// configured one does not compile.
    pub fn cell_resolver(&self) -> CellResolver {
        let Some(pattern) = self.hints.as_ref().and_then(|h| h.cell_pattern.as_deref()) else {
            return CellResolver::default();
        };
        match CellResolver::new(pattern) {
            Ok(resolver) => resolver,
            Err(e) => {
                tracing::warn!(pattern, error = %e, "invalid cell_pattern, using default");
                CellResolver::default()
            }
        }
    }
}

/// Load settings from a hints.toml file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse settings");
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

/// Discover hints.toml by searching up the directory tree, then direct children.
///
/// Search order:
/// 1. Walk up from `start_dir` to filesystem root
/// 2. If not found, check immediate child directories of `start_dir`
///
/// Returns `(settings, settings_dir)`. If not found, returns
/// `(Settings::default(), start_dir)`.
pub fn discover_settings(start_dir: &Path) -> (Settings, PathBuf) {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join(SETTINGS_FILE);
        if candidate.is_file() {
            return (load_settings(&candidate), dir.to_path_buf());
        }
        current = dir.parent();
    }

    if let Ok(entries) = std::fs::read_dir(start_dir) {
        for entry in entries.flatten() {
            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                let candidate = entry.path().join(SETTINGS_FILE);
                if candidate.is_file() {
                    return (load_settings(&candidate), entry.path());
                }
            }
        }
    }

    (Settings::default(), start_dir.to_path_buf())
}
