//! Notebook documentation hint language server.
//!
//! Each notebook cell is opened as its own text document. Hovering a word
//! shows its documentation; moving the cursor into a word publishes the same
//! documentation to the client's documentation panel after a short pause.

use std::sync::{Arc, OnceLock};

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService};

mod document;
pub mod error;
mod lsp;
mod provider;
pub mod settings;

pub use document::{
    is_cursor_in_word, is_word_char, word_bounds_at, CellDocument, CellId, CellResolver,
    DocumentStore, Text, TextBuffer, WordSpan, DEFAULT_CELL_PATTERN,
};
pub use error::{ProviderError, ProviderResult};
pub use lsp::{
    as_hover_tooltip, hint_tooltip, request_documentation, CursorDocumentation, CursorMoved,
    CursorMovedParams, DebounceState, Documentation, DocumentationChanged,
    DocumentationChangedParams, DocumentationDebouncer, DocumentationSlot, HintTooltip,
    HoverDocumentation, Tooltip, TooltipOptions, DEFAULT_DEBOUNCE,
};
pub use provider::{
    ClientProvider, CodeCompletion, CompletionOption, DocumentationProvider,
    DocumentationRequest, DocumentationResult,
};
pub use settings::{discover_settings, load_settings, Settings};

pub struct Backend {
    client: Client,
    documents: OnceLock<DocumentStore>,
    hints: OnceLock<HintTooltip<ClientProvider>>,
}

impl Backend {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: OnceLock::new(),
            hints: OnceLock::new(),
        }
    }

    fn document(&self, uri: &Url) -> Option<Arc<CellDocument>> {
        self.documents.get()?.get(uri)
    }

    /// Forward every change of the published documentation to the client.
    fn spawn_documentation_forwarder(&self) {
        let Some(hints) = self.hints.get() else {
            return;
        };
        let mut slot = hints.cursor.subscribe();
        let client = self.client.clone();

        tokio::spawn(async move {
            while slot.changed().await.is_ok() {
                let documentation = slot.borrow_and_update().clone();
                client
                    .send_notification::<DocumentationChanged>(DocumentationChangedParams {
                        documentation,
                    })
                    .await;
            }
            tracing::debug!("documentation forwarder stopped");
        });
    }

    /// Handle `notebook/cursorMoved`.
    async fn cursor_moved(&self, params: CursorMovedParams) {
        let uri = &params.text_document.uri;
        let Some(doc) = self.document(uri) else {
            tracing::debug!(%uri, "cursor moved in unknown document");
            return;
        };
        let Some(offset) = doc.text.position_to_offset(params.position) else {
            return;
        };
        if let Some(hints) = self.hints.get() {
            hints.cursor.cursor_moved(doc, offset);
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Extract workspace root from params
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|f| f.uri.to_file_path().ok())
            .or_else(|| {
                #[allow(deprecated)]
                params.root_uri.as_ref()?.to_file_path().ok()
            });

        let settings = match workspace_root {
            Some(root) => {
                let (settings, settings_dir) = settings::discover_settings(&root);
                tracing::info!(root = %root.display(), settings_dir = %settings_dir.display(), "workspace settings loaded");
                settings
            }
            None => Settings::default(),
        };

        let _ = self
            .documents
            .set(DocumentStore::new(settings.cell_resolver()));
        let provider = Arc::new(ClientProvider::new(self.client.clone()));
        let _ = self.hints.set(hint_tooltip(provider, &settings));

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.spawn_documentation_forwarder();
        self.client
            .log_message(MessageType::INFO, "notebook hint server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        if let Some(hints) = self.hints.get() {
            hints.cursor.cancel();
        }
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        if let Some(documents) = self.documents.get() {
            let doc = params.text_document;
            documents.open(doc.uri, doc.text, doc.version);
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // We use FULL sync, so there's exactly one change with the full text
        let Some(documents) = self.documents.get() else {
            return;
        };
        if let Some(change) = params.content_changes.into_iter().next() {
            documents.open(
                params.text_document.uri,
                change.text,
                params.text_document.version,
            );
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        if let Some(documents) = self.documents.get() {
            documents.close(&params.text_document.uri);
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let (Some(doc), Some(hints)) = (self.document(uri), self.hints.get()) else {
            return Ok(None);
        };

        Ok(hints.hover.hover(&doc, position).await)
    }
}

pub fn create_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::build(Backend::new)
        .custom_method(CursorMoved::METHOD, Backend::cursor_moved)
        .finish()
}
