use crate::TextSize;

/// A 0-based line/column position. `col` is a byte offset from the start
/// of its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Sorted start-of-line byte offsets for one file, built lazily the first
/// time a location in that file needs line/column coordinates.
///
/// Only `\n` terminates a line; a `\r` before it counts as an ordinary
/// byte in column math.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(TextSize::new(i as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Binary-search the offset into a line/column pair. Offsets past the
    /// end of the text clamp to the EOF position.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        LineCol {
            line: line as u32,
            col: u32::from(offset) - u32::from(self.line_starts[line]),
        }
    }

    /// Inverse of [`line_col`](Self::line_col). `None` when the line does
    /// not exist or the column runs past its end.
    pub fn offset(&self, lc: LineCol) -> Option<TextSize> {
        let start = *self.line_starts.get(lc.line as usize)?;
        let end = self
            .line_starts
            .get(lc.line as usize + 1)
            .copied()
            .unwrap_or(self.len);
        let offset = TextSize::new(u32::from(start).checked_add(lc.col)?);
        (offset <= end).then_some(offset)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
