//! Provider that asks the LSP client for documentation.
//!
//! The notebook front end owns the kernel connection, so lookups are sent
//! back to it as a `notebook/codeCompletion` request.

use serde_json::Value;
use tower_lsp::lsp_types::request::Request;
use tower_lsp::Client;

use super::{DocumentationProvider, DocumentationRequest, DocumentationResult};
use crate::error::ProviderResult;

/// Custom request sent from server to client.
///
/// The result is kept as raw JSON so malformed payloads are reported as
/// `ProviderError::Malformed` instead of a transport error.
#[derive(Debug)]
pub enum CodeCompletion {}

impl Request for CodeCompletion {
    type Params = DocumentationRequest;
    type Result = Option<Value>;
    const METHOD: &'static str = "notebook/codeCompletion";
}

#[derive(Debug, Clone)]
pub struct ClientProvider {
    client: Client,
}

impl ClientProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[tower_lsp::async_trait]
impl DocumentationProvider for ClientProvider {
    async fn request(
        &self,
        request: DocumentationRequest,
    ) -> ProviderResult<Option<DocumentationResult>> {
        tracing::debug!(cell = %request.cell_id, len = request.document.len(), "requesting documentation");
        let response = self.client.send_request::<CodeCompletion>(request).await?;
        parse_response(response)
    }
}

fn parse_response(response: Option<Value>) -> ProviderResult<Option<DocumentationResult>> {
    match response {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let result: DocumentationResult = serde_json::from_value(value)?;
            Ok((!result.is_empty()).then_some(result))
        }
    }
}
