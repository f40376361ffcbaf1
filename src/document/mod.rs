//! Document state management and text utilities.
//!
//! This module provides:
//! - `Text` and the `TextBuffer` accessor for character-offset slicing
//! - Word boundary detection around a position
//! - `CellId` resolution from cell document URIs
//! - `CellDocument` and `DocumentStore` for document lifecycle management

mod cell;
mod state;
mod text;
mod words;

pub use cell::{CellId, CellResolver, DEFAULT_CELL_PATTERN};
pub use state::{CellDocument, DocumentStore};
pub use text::{Text, TextBuffer};
pub use words::{is_cursor_in_word, is_word_char, word_bounds_at, WordSpan};
