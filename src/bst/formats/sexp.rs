//! S-expression dumps
//!
//! The format parser tests are usually written against: one parenthesized form per named node,
//! field labels in front of the children that fill them, and anonymous tokens (keywords,
//! braces, quotes, whitespace) left out.
//!
//!     (source_file
//!       (function
//!         name: (identifier)
//!         body: (block
//!           term: (integer))))
//!
//! Missing pieces print as `(MISSING <expected>)`. With `show_ranges`, every form carries its
//! byte range as `[start..end]`.

use super::registry::{FormatError, Formatter};
use super::DumpOptions;
use crate::bst::error::SyntaxError;
use crate::bst::syntax::{SyntaxNode, SyntaxTree};
use std::fmt::Write;

enum Step<'t> {
    Open(SyntaxNode<'t>, usize),
    Close,
}

pub fn to_sexp(tree: &SyntaxTree, options: &DumpOptions) -> String {
    let mut out = String::new();
    let mut stack = vec![Step::Open(tree.root(), 0)];

    while let Some(step) = stack.pop() {
        let (node, depth) = match step {
            Step::Open(node, depth) => (node, depth),
            Step::Close => {
                out.push(')');
                continue;
            }
        };
        if depth > 0 {
            out.push('\n');
            out.push_str(&"  ".repeat(depth));
        }
        if let Some(field) = node.field_name() {
            let _ = write!(out, "{}: ", field);
        }
        match node.error() {
            Some(SyntaxError::MissingToken { expected }) if node.is_missing() => {
                let _ = write!(out, "(MISSING {}", expected);
            }
            _ => {
                out.push('(');
                out.push_str(node.kind().name());
            }
        }
        if options.show_ranges {
            let range = node.range();
            let _ = write!(out, " [{}..{}]", range.start, range.end);
        }
        stack.push(Step::Close);
        let children: Vec<_> = node
            .children()
            .filter(|child| options.shows(child.kind()))
            .collect();
        stack.extend(
            children
                .into_iter()
                .rev()
                .map(|child| Step::Open(child, depth + 1)),
        );
    }
    out
}

pub struct SexpFormatter;

impl Formatter for SexpFormatter {
    fn name(&self) -> &str {
        "sexp"
    }

    fn serialize(&self, tree: &SyntaxTree, options: &DumpOptions) -> Result<String, FormatError> {
        Ok(to_sexp(tree, options))
    }

    fn description(&self) -> &str {
        "S-expression with field labels"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bst::parsing::parse;

    fn sexp(source: &str) -> String {
        to_sexp(&parse(source), &DumpOptions::default())
    }

    #[test]
    fn test_bare_statement() {
        assert_eq!(sexp("READ"), "(source_file\n  (read))");
    }

    #[test]
    fn test_fields_are_labeled() {
        assert_eq!(
            sexp("EXECUTE {begin.bib}"),
            "(source_file\n  (execute\n    func: (identifier)))"
        );
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(
            sexp("ITERATE"),
            "(source_file\n  (iterate\n    (MISSING \"{\")))"
        );
    }

    #[test]
    fn test_ranges_and_trivia() {
        let options = DumpOptions {
            show_ranges: true,
            include_trivia: true,
        };
        assert_eq!(
            to_sexp(&parse("READ % x"), &options),
            "(source_file [0..8]\n  (read [0..4])\n  (whitespace [4..5])\n  (comment [5..8]))"
        );
    }
}
