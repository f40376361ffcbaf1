//! Documentation lookup for the word at a position.

use crate::document::{word_bounds_at, CellId, TextBuffer};
use crate::error::ProviderResult;
use crate::provider::{DocumentationProvider, DocumentationRequest};

use super::tooltip::{as_hover_tooltip, Tooltip, TooltipOptions};

/// Outcome of a successful lookup.
///
/// A failed provider round-trip is the `Err` side of the surrounding `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Documentation {
    Found(Tooltip),
    NotFound,
}

impl Documentation {
    pub fn tooltip(self) -> Option<Tooltip> {
        match self {
            Documentation::Found(tooltip) => Some(tooltip),
            Documentation::NotFound => None,
        }
    }

    pub fn html(&self) -> Option<&str> {
        match self {
            Documentation::Found(tooltip) => Some(&tooltip.html),
            Documentation::NotFound => None,
        }
    }
}

/// Ask the provider for documentation of the word at `position`.
///
/// The provider sees the text from the start of the cell up to the end of the
/// word. Without an enclosing cell no request is issued. The provider call is
/// the only await point; its errors are returned unchanged and never retried.
pub async fn request_documentation<P, T>(
    provider: &P,
    doc: &T,
    position: usize,
    cell_id: Option<&CellId>,
    exclude_types: &[String],
) -> ProviderResult<Documentation>
where
    P: DocumentationProvider + ?Sized,
    T: TextBuffer + ?Sized,
{
    let Some(cell_id) = cell_id else {
        tracing::error!("failed to find active cell");
        return Ok(Documentation::NotFound);
    };

    let span = word_bounds_at(doc, position);
    let request = DocumentationRequest {
        document: doc.slice(0..span.end).to_string(),
        cell_id: cell_id.clone(),
    };

    let Some(result) = provider.request(request).await? else {
        return Ok(Documentation::NotFound);
    };
    if result.is_empty() {
        return Ok(Documentation::NotFound);
    }

    let exact_name = doc.slice(span.range());
    let tooltip = as_hover_tooltip(
        &result,
        TooltipOptions {
            position: span.end,
            exact_name,
            exclude_types,
        },
    );

    Ok(tooltip.map_or(Documentation::NotFound, Documentation::Found))
}
