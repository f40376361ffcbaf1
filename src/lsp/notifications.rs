//! Notebook-specific LSP messages.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::{Position, TextDocumentIdentifier};

/// Client -> server: the primary cursor of a cell moved.
#[derive(Debug)]
pub enum CursorMoved {}

impl Notification for CursorMoved {
    type Params = CursorMovedParams;
    const METHOD: &'static str = "notebook/cursorMoved";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorMovedParams {
    pub text_document: TextDocumentIdentifier,
    pub position: Position,
}

/// Server -> client: the documentation panel content changed.
#[derive(Debug)]
pub enum DocumentationChanged {}

impl Notification for DocumentationChanged {
    type Params = DocumentationChangedParams;
    const METHOD: &'static str = "notebook/documentation";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationChangedParams {
    /// Rendered HTML, or null to clear the panel.
    pub documentation: Option<String>,
}
