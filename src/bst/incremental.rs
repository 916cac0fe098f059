//! Incremental re-parsing
//!
//!     A tree is a list of top-level segments (see [syntax](crate::bst::syntax)). After an edit,
//!     the segments that end well before the edit are kept, parsing restarts at a segment
//!     boundary before the edit, and once the parser is past the edit and about to start a
//!     statement that the old tree also started at the same (shifted) place, the rest of the
//!     old segments are reused as they are.
//!
//!     The result is always structurally equal to a fresh parse of the new text.
//!
//! Restart point
//!
//!     Parsing restarts right after a complete statement: one that ended by consuming its own
//!     closing token, without looking at what follows. Anything else (trivia, an error region,
//!     a statement closed because the next keyword arrived) may have been shaped by the text
//!     after it and is parsed again. The segment touching the edit start is always re-parsed,
//!     since a token can grow into inserted text (`READ` + `X` is the identifier `READX`).

use crate::bst::error::EditError;
use crate::bst::parsing::engine::{Engine, Resume};
use crate::bst::syntax::SyntaxTree;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

/// Replace a byte range of the old text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: Range<usize>, replacement: impl Into<String>) -> Self {
        TextEdit {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        TextEdit::new(at..at, text)
    }

    pub fn delete(range: Range<usize>) -> Self {
        TextEdit::new(range, String::new())
    }

    /// Check that the edit applies to `text`.
    pub fn validate(&self, text: &str) -> Result<(), EditError> {
        let Range { start, end } = self.range;
        if start > end || end > text.len() {
            return Err(EditError::RangeOutOfBounds {
                start,
                end,
                len: text.len(),
            });
        }
        for offset in [start, end] {
            if !text.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary { offset });
            }
        }
        Ok(())
    }

    /// Length of the text after the edit.
    pub fn new_len(&self, old_len: usize) -> usize {
        old_len - (self.range.end - self.range.start) + self.replacement.len()
    }

    /// The edited text.
    pub fn apply(&self, text: &str) -> Result<String, EditError> {
        self.validate(text)?;
        let mut result = String::with_capacity(self.new_len(text.len()));
        result.push_str(&text[..self.range.start]);
        result.push_str(&self.replacement);
        result.push_str(&text[self.range.end..]);
        Ok(result)
    }

    /// Offset of the first byte where `new_text` disagrees with this edit applied to `old_text`.
    fn mismatch(&self, old_text: &str, new_text: &str) -> Option<usize> {
        let Range { start, end } = self.range;
        let inserted = start + self.replacement.len();
        let pieces = [
            (0, &old_text[..start], &new_text[..start]),
            (start, self.replacement.as_str(), &new_text[start..inserted]),
            (inserted, &old_text[end..], &new_text[inserted..]),
        ];
        pieces.into_iter().find_map(|(base, expected, found)| {
            expected
                .bytes()
                .zip(found.bytes())
                .position(|(a, b)| a != b)
                .map(|position| base + position)
        })
    }
}

impl SyntaxTree {
    /// Parse the text produced by applying `edit` to this tree's text.
    pub fn edit(&self, edit: &TextEdit) -> Result<SyntaxTree, EditError> {
        let new_text = edit.apply(self.text())?;
        reparse(self, self.text(), edit, &new_text)
    }
}

/// Re-parse `new_text`, which must be `old_text` with `edit` applied, reusing `old_tree`.
pub fn reparse(
    old_tree: &SyntaxTree,
    old_text: &str,
    edit: &TextEdit,
    new_text: &str,
) -> Result<SyntaxTree, EditError> {
    if old_tree.text() != old_text {
        return Err(EditError::StaleText);
    }
    edit.validate(old_text)?;
    let expected = edit.new_len(old_text.len());
    if new_text.len() != expected {
        return Err(EditError::LengthMismatch {
            expected,
            found: new_text.len(),
        });
    }
    if let Some(offset) = edit.mismatch(old_text, new_text) {
        return Err(EditError::TextMismatch { offset });
    }

    let keep = restart_index(old_tree, edit.range.start);
    let restart = old_tree.offsets.get(keep).copied().unwrap_or(0);
    let resume = Resume {
        min_pos: edit.range.start + edit.replacement.len(),
        delta: edit.replacement.len() as isize - (edit.range.end - edit.range.start) as isize,
        old: old_tree,
    };
    let output = Engine::new(new_text, restart, Some(resume)).run();

    let reparsed = output.segments.len();
    let mut segments = Vec::with_capacity(old_tree.segments.len() + reparsed);
    segments.extend(old_tree.segments[..keep].iter().cloned());
    segments.extend(output.segments);
    if let Some(from) = output.reuse_from {
        segments.extend(old_tree.segments[from..].iter().cloned());
    }

    let tree = SyntaxTree::from_segments(Arc::from(new_text), segments);
    debug!(
        edit = ?edit.range,
        inserted = edit.replacement.len(),
        kept = keep,
        reparsed,
        reused = output
            .reuse_from
            .map_or(0, |from| old_tree.segments.len() - from),
        "reparsed"
    );
    Ok(tree)
}

/// Index of the first old segment that must be parsed again for an edit at `start`.
fn restart_index(tree: &SyntaxTree, start: usize) -> usize {
    let before = tree.offsets.partition_point(|&offset| offset < start);
    let mut index = before.saturating_sub(1);
    while index > 0 && !tree.segments[index - 1].is_complete_statement() {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bst::parsing::parse;

    #[test]
    fn apply_splices_the_replacement() {
        let edit = TextEdit::new(5..9, "SORT");
        assert_eq!(edit.apply("READ READ").unwrap(), "READ SORT");
        assert_eq!(edit.new_len(9), 9);
    }

    #[test]
    fn out_of_bounds_edits_are_rejected() {
        let err = TextEdit::delete(3..12).apply("READ").unwrap_err();
        assert_eq!(
            err,
            EditError::RangeOutOfBounds {
                start: 3,
                end: 12,
                len: 4
            }
        );
        let err = TextEdit::insert(1, "x").apply("é").unwrap_err();
        assert_eq!(err, EditError::NotCharBoundary { offset: 1 });
    }

    #[test]
    fn restart_follows_a_complete_statement() {
        // READ, " ", EXECUTE {f}, "\n", SORT
        let tree = parse("READ EXECUTE {f}\nSORT");
        assert_eq!(restart_index(&tree, 0), 0);
        // Inside EXECUTE: the whitespace before it is re-parsed too.
        assert_eq!(restart_index(&tree, 14), 1);
        // Touching the end of EXECUTE still re-parses EXECUTE.
        assert_eq!(restart_index(&tree, 16), 1);
        assert_eq!(restart_index(&tree, 21), 3);
    }

    #[test]
    fn incomplete_statements_are_not_restart_points() {
        let tree = parse("EXECUTE {f\nSORT");
        assert_eq!(restart_index(&tree, 15), 0);
    }

    #[test]
    fn mismatched_new_text_is_rejected() {
        let tree = parse("READ");
        let edit = TextEdit::insert(4, " SORT");
        let err = reparse(&tree, "READ", &edit, " SORTREAD").unwrap_err();
        assert_eq!(err, EditError::TextMismatch { offset: 0 });
        let err = reparse(&tree, "READ", &edit, "READ").unwrap_err();
        assert_eq!(
            err,
            EditError::LengthMismatch {
                expected: 9,
                found: 4
            }
        );
    }
}
