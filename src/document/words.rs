//! Word boundary detection around a cursor or hover position.

use std::ops::Range;

use super::text::TextBuffer;

/// The run of word characters surrounding a position.
///
/// An empty span (`start == end`) means there is no word at the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
}

impl WordSpan {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Letters, digits and underscore. Only ASCII counts.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Find the maximal run of word characters containing or adjacent to `position`.
///
/// Scans backward while the preceding character is a word character and
/// forward while the following one is. Positions past the end of the document
/// are clamped to its length.
pub fn word_bounds_at<T: TextBuffer + ?Sized>(doc: &T, position: usize) -> WordSpan {
    let position = position.min(doc.len());
    let mut start = position;
    let mut end = position;

    while start > 0 && doc.char_at(start - 1).is_some_and(is_word_char) {
        start -= 1;
    }

    while end < doc.len() && doc.char_at(end).is_some_and(is_word_char) {
        end += 1;
    }

    WordSpan { start, end }
}

/// Whether the character right before `head` is a word character.
pub fn is_cursor_in_word<T: TextBuffer + ?Sized>(doc: &T, head: usize) -> bool {
    head > 0 && doc.char_at(head - 1).is_some_and(is_word_char)
}
