//! Document state management for open notebook cells.

use std::sync::Arc;

use dashmap::DashMap;
use tower_lsp::lsp_types::Url;

use super::cell::{CellId, CellResolver};
use super::text::Text;

/// State for a single open cell document.
#[derive(Debug, Clone)]
pub struct CellDocument {
    /// Snapshot of the cell's text.
    pub text: Text,
    /// Document version from the client.
    pub version: i32,
    /// The enclosing cell, if the URI names one.
    pub cell_id: Option<CellId>,
}

impl CellDocument {
    pub fn new(source: String, version: i32, cell_id: Option<CellId>) -> Self {
        Self {
            text: Text::new(source),
            version,
            cell_id,
        }
    }
}

/// Thread-safe storage for open documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, Arc<CellDocument>>,
    resolver: CellResolver,
}

impl DocumentStore {
    /// Create a new empty document store.
    pub fn new(resolver: CellResolver) -> Self {
        Self {
            documents: DashMap::new(),
            resolver,
        }
    }

    /// Open or update a document with the given source text.
    pub fn open(&self, uri: Url, source: String, version: i32) -> Arc<CellDocument> {
        let cell_id = self.resolver.resolve(&uri);
        let state = Arc::new(CellDocument::new(source, version, cell_id));
        self.documents.insert(uri, Arc::clone(&state));
        state
    }

    /// Close a document.
    pub fn close(&self, uri: &Url) {
        self.documents.remove(uri);
    }

    /// Get a document's state.
    pub fn get(&self, uri: &Url) -> Option<Arc<CellDocument>> {
        self.documents.get(uri).map(|r| Arc::clone(&r))
    }
}
