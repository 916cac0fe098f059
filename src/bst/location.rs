//! Line and column positions
//!
//! Trees work in byte offsets. Diagnostics for people need line:column positions, which
//! [LineIndex] computes with a binary search over the line starts. Lines and columns are
//! 1-based; columns count characters, not bytes.

use std::fmt;
use std::ops::Range;

/// A 1-based line:column position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Fast conversion from byte offsets to positions
pub struct LineIndex<'s> {
    source: &'s str,
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl<'s> LineIndex<'s> {
    pub fn new(source: &'s str) -> Self {
        let mut line_starts = vec![0];
        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Position of a byte offset. Offsets past the end clamp to the end; offsets inside a
    /// character count as that character.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);
        let start = self.line_starts[line];
        let column = self.source[start..]
            .char_indices()
            .take_while(|(i, _)| start + i < offset)
            .count();
        Position::new(line + 1, column + 1)
    }

    pub fn range(&self, range: &Range<usize>) -> Range<Position> {
        self.position(range.start)..self.position(range.end)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset of the start of a 1-based line
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line.checked_sub(1)?).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        let index = LineIndex::new("READ SORT");
        assert_eq!(index.position(0), Position::new(1, 1));
        assert_eq!(index.position(5), Position::new(1, 6));
    }

    #[test]
    fn test_after_line_breaks() {
        let index = LineIndex::new("READ\n\nSORT");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.position(4), Position::new(1, 5));
        assert_eq!(index.position(5), Position::new(2, 1));
        assert_eq!(index.position(8), Position::new(3, 3));
        assert_eq!(index.line_start(3), Some(6));
        assert_eq!(index.line_start(0), None);
    }

    #[test]
    fn test_columns_count_characters() {
        let index = LineIndex::new("é @");
        assert_eq!(index.position(3), Position::new(1, 3));
        assert_eq!(index.position(99), Position::new(1, 4));
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(3, 7).to_string(), "3:7");
    }
}
