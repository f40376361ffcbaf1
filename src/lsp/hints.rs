//! Hover and cursor-tracking documentation hints.
//!
//! `hint_tooltip` bundles the two entry points the server wires into its
//! handlers. Neither surfaces lookup failures to the user: a failed or empty
//! lookup simply shows no documentation.

use std::sync::Arc;

use tower_lsp::lsp_types::{Hover, Position};

use crate::document::{is_cursor_in_word, word_bounds_at, CellDocument};
use crate::provider::DocumentationProvider;
use crate::settings::Settings;

use super::debounce::{DebounceState, DocumentationDebouncer, DocumentationSlot};
use super::documentation::request_documentation;
use super::tooltip::Tooltip;

/// The hover provider and cursor notifier sharing one documentation provider.
pub struct HintTooltip<P: ?Sized> {
    pub hover: HoverDocumentation<P>,
    pub cursor: CursorDocumentation<P>,
}

/// Build the hint bundle from settings.
pub fn hint_tooltip<P>(provider: Arc<P>, settings: &Settings) -> HintTooltip<P>
where
    P: DocumentationProvider + ?Sized,
{
    HintTooltip {
        hover: HoverDocumentation::new(Arc::clone(&provider), settings.hover_exclude_types()),
        cursor: CursorDocumentation::new(DocumentationDebouncer::new(
            provider,
            settings.debounce(),
            settings.cursor_exclude_types(),
        )),
    }
}

/// Documentation for the word under the mouse.
pub struct HoverDocumentation<P: ?Sized> {
    provider: Arc<P>,
    exclude_types: Vec<String>,
}

impl<P> HoverDocumentation<P>
where
    P: DocumentationProvider + ?Sized,
{
    pub fn new(provider: Arc<P>, exclude_types: Vec<String>) -> Self {
        Self {
            provider,
            exclude_types,
        }
    }

    /// Look up the tooltip at a character offset. Provider failures are
    /// logged and yield no tooltip.
    pub async fn tooltip_at(&self, doc: &CellDocument, offset: usize) -> Option<Tooltip> {
        let outcome = request_documentation(
            &*self.provider,
            &doc.text,
            offset,
            doc.cell_id.as_ref(),
            &self.exclude_types,
        )
        .await;

        match outcome {
            Ok(found) => found.tooltip(),
            Err(err) => {
                tracing::warn!(error = %err, "hover documentation request failed");
                None
            }
        }
    }

    /// LSP hover at `position`, covering the word under it.
    pub async fn hover(&self, doc: &CellDocument, position: Position) -> Option<Hover> {
        let offset = doc.text.position_to_offset(position)?;
        let tooltip = self.tooltip_at(doc, offset).await?;
        let span = word_bounds_at(&doc.text, offset);
        Some(tooltip.into_hover(Some(doc.text.span_to_range(&span.range()))))
    }
}

/// Documentation for the word the cursor sits in, published after a pause.
pub struct CursorDocumentation<P: ?Sized> {
    debouncer: DocumentationDebouncer<P>,
}

impl<P> CursorDocumentation<P>
where
    P: DocumentationProvider + ?Sized,
{
    pub fn new(debouncer: DocumentationDebouncer<P>) -> Self {
        Self { debouncer }
    }

    /// Handle a cursor move to character offset `head`.
    ///
    /// Only schedules a lookup when the cursor is right after a word
    /// character. Returns whether a lookup was scheduled.
    pub fn cursor_moved(&self, doc: Arc<CellDocument>, head: usize) -> bool {
        if !is_cursor_in_word(&doc.text, head) {
            return false;
        }
        self.debouncer.schedule(doc, head);
        true
    }

    pub fn subscribe(&self) -> DocumentationSlot {
        self.debouncer.subscribe()
    }

    pub fn current(&self) -> Option<String> {
        self.debouncer.current()
    }

    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    pub fn state(&self) -> DebounceState {
        self.debouncer.state()
    }
}
