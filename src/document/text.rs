//! Text buffer and position conversion.
//!
//! Offsets handed around the hint pipeline are zero-based character offsets.
//! LSP positions use line/column where column is in UTF-16 code units, so
//! `Text` converts between the two.

use std::ops::Range;

use tower_lsp::lsp_types::Position;

/// Read access to an immutable snapshot of a document.
///
/// All offsets are character offsets. Implementations clamp ranges to the
/// document instead of panicking.
pub trait TextBuffer {
    /// Number of characters in the document.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The text between two character offsets.
    fn slice(&self, range: Range<usize>) -> &str;

    /// The character at `offset`, if any.
    fn char_at(&self, offset: usize) -> Option<char> {
        self.slice(offset..offset.saturating_add(1)).chars().next()
    }
}

/// Characters between two entries of the character-to-byte checkpoint table.
const CHECKPOINT_INTERVAL: usize = 64;

/// Owned document text with a pre-computed line index.
///
/// Line starts are stored both as byte and as character offsets for O(log n)
/// line lookup. Character offsets map to byte offsets through a checkpoint
/// table, so slicing never scans more than `CHECKPOINT_INTERVAL` characters.
/// ASCII text skips the table entirely.
#[derive(Debug, Clone)]
pub struct Text {
    source: String,
    /// Byte offset where each line starts.
    line_starts: Vec<usize>,
    /// Character offset where each line starts.
    line_char_starts: Vec<usize>,
    /// Byte offset of every `CHECKPOINT_INTERVAL`-th character.
    checkpoints: Vec<usize>,
    /// Total number of characters.
    len: usize,
}

impl Text {
    /// Build a text buffer from source text.
    pub fn new(source: String) -> Self {
        let mut line_starts = vec![0];
        let mut line_char_starts = vec![0];
        let mut checkpoints = Vec::new();
        let mut len = 0;

        for (i, c) in source.char_indices() {
            if len % CHECKPOINT_INTERVAL == 0 {
                checkpoints.push(i);
            }
            len += 1;
            if c == '\n' {
                line_starts.push(i + 1);
                line_char_starts.push(len);
            }
        }

        Self {
            source,
            line_starts,
            line_char_starts,
            checkpoints,
            len,
        }
    }

    /// Get the source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    fn line_of(&self, offset: usize) -> usize {
        match self.line_char_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// Convert a character offset to a byte offset, clamping to the end.
    fn byte_offset(&self, offset: usize) -> usize {
        let offset = offset.min(self.len);
        if self.source.len() == self.len {
            return offset;
        }

        let Some(&checkpoint) = self.checkpoints.get(offset / CHECKPOINT_INTERVAL) else {
            return self.source.len();
        };
        self.source[checkpoint..]
            .char_indices()
            .nth(offset % CHECKPOINT_INTERVAL)
            .map(|(i, _)| checkpoint + i)
            .unwrap_or(self.source.len())
    }

    /// Convert a character offset to an LSP position.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self.line_of(offset);
        let line_start = self.line_starts[line];
        let skip = offset - self.line_char_starts[line];

        let col: usize = self.source[line_start..]
            .chars()
            .take(skip)
            .map(char::len_utf16)
            .sum();

        Position::new(line as u32, col as u32)
    }

    /// Convert an LSP position to a character offset.
    ///
    /// Returns None if the line is out of bounds. Columns past the end of the
    /// line resolve to the end of that line.
    pub fn position_to_offset(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        if line >= self.line_starts.len() {
            return None;
        }

        let line_start = self.line_starts[line];
        let line_end = self
            .line_starts
            .get(line + 1)
            .map(|&end| end.saturating_sub(1))
            .unwrap_or(self.source.len());
        let char_start = self.line_char_starts[line];

        let mut utf16_col = 0u32;
        let mut chars = 0;
        for c in self.source[line_start..line_end].chars() {
            if utf16_col >= position.character {
                return Some(char_start + chars);
            }
            utf16_col += c.len_utf16() as u32;
            chars += 1;
        }

        Some(char_start + chars)
    }

    /// Convert a character span to an LSP range.
    pub fn span_to_range(&self, span: &Range<usize>) -> tower_lsp::lsp_types::Range {
        let start = self.offset_to_position(span.start);
        let end = self.offset_to_position(span.end);
        tower_lsp::lsp_types::Range::new(start, end)
    }
}

impl TextBuffer for Text {
    fn len(&self) -> usize {
        self.len
    }

    fn slice(&self, range: Range<usize>) -> &str {
        let start = range.start.min(self.len);
        let end = range.end.clamp(start, self.len);
        &self.source[self.byte_offset(start)..self.byte_offset(end)]
    }
}

impl From<&str> for Text {
    fn from(source: &str) -> Self {
        Self::new(source.to_string())
    }
}
