//! Error types for documentation lookups.

use thiserror::Error;

/// Failure of a documentation provider round-trip.
///
/// An empty result is not an error; providers report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("documentation request failed: {0}")]
    Request(#[from] tower_lsp::jsonrpc::Error),

    #[error("malformed documentation response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("documentation provider unavailable: {0}")]
    Unavailable(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
