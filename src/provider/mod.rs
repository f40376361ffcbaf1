//! Documentation provider interface.
//!
//! The provider is the notebook kernel's completion service. This crate only
//! defines the two request fields and the nullable result it consumes.

mod client;

use serde::{Deserialize, Serialize};

use crate::document::CellId;
use crate::error::ProviderResult;

pub use client::{ClientProvider, CodeCompletion};

/// A documentation lookup for the word ending at the end of `document`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationRequest {
    /// Cell text from its start up to the end of the word under the cursor.
    pub document: String,
    /// The cell the text belongs to.
    pub cell_id: CellId,
}

/// Completion result reported by the kernel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationResult {
    /// Length of the prefix the options complete.
    #[serde(default)]
    pub prefix_length: usize,
    #[serde(default)]
    pub options: Vec<CompletionOption>,
}

impl DocumentationResult {
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// One completion candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionOption {
    pub name: String,
    /// Completion kind, e.g. `function`, `module`, `tooltip`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Pre-rendered HTML documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Source of documentation for notebook code.
///
/// `Ok(None)` means the provider has no documentation for the request.
#[tower_lsp::async_trait]
pub trait DocumentationProvider: Send + Sync + 'static {
    async fn request(
        &self,
        request: DocumentationRequest,
    ) -> ProviderResult<Option<DocumentationResult>>;
}
