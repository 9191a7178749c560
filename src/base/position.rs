//! Line/column positions used by the tokenizer cursor and requested ranges.
//!
//! Both lines and columns are 0-indexed for LSP compatibility. Columns count
//! characters, not bytes.

/// A half-open range `[start, end)` in source code; empty when `end <= start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// A position in source code (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a span from line/column coordinates
    pub fn from_coords(
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Step over one character: a newline moves to the start of the next line.
    pub fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    /// Position reached after walking the first `bytes` bytes of `text` from here.
    ///
    /// `bytes` is clamped to the text length; a partially covered multi-byte
    /// character is not counted.
    pub fn walked(mut self, text: &str, bytes: usize) -> Self {
        for (idx, ch) in text.char_indices() {
            if idx + ch.len_utf8() > bytes {
                break;
            }
            self.advance(ch);
        }
        self
    }
}
