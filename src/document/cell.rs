//! Notebook cell identification.
//!
//! Each notebook cell is opened by the client as its own text document. The
//! cell identifier lives in the URI fragment, e.g. `file:///nb.py#cell-Hbol`.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::Url;

/// Default pattern applied to the URI fragment. The `id` group is the cell id.
pub const DEFAULT_CELL_PATTERN: &str = r"^cell-(?P<id>.+)$";

/// Opaque identifier of a notebook cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the cell enclosing a document from its URI.
#[derive(Debug, Clone)]
pub struct CellResolver {
    pattern: Regex,
}

impl CellResolver {
    /// Build a resolver from a regex with an `id` capture group (or a first
    /// capture group).
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Find the enclosing cell, or None if the URI does not name one.
    pub fn resolve(&self, uri: &Url) -> Option<CellId> {
        let fragment = uri.fragment()?;
        let captures = self.pattern.captures(fragment)?;
        let id = captures.name("id").or_else(|| captures.get(1))?.as_str();
        if id.is_empty() {
            return None;
        }
        Some(CellId::new(id))
    }
}

fn default_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(DEFAULT_CELL_PATTERN).unwrap())
}

impl Default for CellResolver {
    fn default() -> Self {
        Self {
            pattern: default_pattern().clone(),
        }
    }
}
