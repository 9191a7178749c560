//! Mapping between line/column positions and byte offsets.

use text_size::TextSize;

use super::Position;

/// Line start offsets for a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::from((idx + 1) as u32));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position just past the last character of `text`.
    pub fn end_position(&self, text: &str) -> Position {
        let last_line = self.line_count() - 1;
        let start: usize = self.line_starts[last_line].into();
        Position::new(last_line, text[start..].chars().count())
    }

    /// Byte offset of `position`, clamped to the end of its line (or of the text).
    pub fn offset(&self, text: &str, position: Position) -> TextSize {
        let Some(&line_start) = self.line_starts.get(position.line) else {
            return self.len;
        };
        let line_end = self
            .line_starts
            .get(position.line + 1)
            .map(|next| *next - TextSize::from(1))
            .unwrap_or(self.len);

        let line_text = &text[usize::from(line_start)..usize::from(line_end)];
        let column_offset = line_text
            .char_indices()
            .nth(position.column)
            .map(|(idx, _)| idx)
            .unwrap_or(line_text.len());

        line_start + TextSize::from(column_offset as u32)
    }
}
