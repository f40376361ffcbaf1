//! LSP feature implementations.
//!
//! This module provides:
//! - Documentation lookup for the word at a position
//! - Tooltip rendering from provider results
//! - Debounced cursor-tracking documentation
//! - Notebook-specific notifications

mod debounce;
mod documentation;
mod hints;
mod notifications;
mod tooltip;

pub use debounce::{DebounceState, DocumentationDebouncer, DocumentationSlot, DEFAULT_DEBOUNCE};
pub use documentation::{request_documentation, Documentation};
pub use hints::{hint_tooltip, CursorDocumentation, HintTooltip, HoverDocumentation};
pub use notifications::{
    CursorMoved, CursorMovedParams, DocumentationChanged, DocumentationChangedParams,
};
pub use tooltip::{as_hover_tooltip, Tooltip, TooltipOptions};
