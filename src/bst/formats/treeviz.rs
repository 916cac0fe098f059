//! Treeviz formatter for syntax trees
//!
//! One line per node, with the nesting drawn by box characters. Tokens show their text,
//! composite nodes show the start of theirs, and error nodes show their message:
//!
//!     └─ function: FUNCTION {f} { #1 }
//!       ├─ keyword: FUNCTION
//!       ├─ {: {
//!       ├─ identifier (name): f
//!       ├─ }: }
//!       └─ block (body): { #1 }
//!         ├─ {: {
//!         ├─ integer (term): #1
//!         └─ }: }
//!
//! Labels are truncated to 30 characters and line breaks are escaped.

use super::registry::{FormatError, Formatter};
use super::DumpOptions;
use crate::bst::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};
use std::fmt::Write;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn label(node: &SyntaxNode<'_>) -> String {
    if let Some(error) = node.error() {
        if !node.is_token() {
            return error.to_string();
        }
    }
    truncate(&node.text().escape_debug().to_string(), 30)
}

enum Step<'t> {
    Line(SyntaxNode<'t>, bool),
    Ascend(usize),
}

pub fn to_treeviz_str(tree: &SyntaxTree, options: &DumpOptions) -> String {
    let mut result = String::new();
    let visible =
        |node: &SyntaxNode<'_>| options.include_trivia || node.kind() != SyntaxKind::Whitespace;

    // One prefix shared by every line, grown on descent and cut back on ascent.
    let mut prefix = String::new();
    let mut stack = Vec::new();
    push_children(&mut stack, tree.root().children().filter(visible).collect());

    while let Some(step) = stack.pop() {
        let (node, is_last) = match step {
            Step::Line(node, is_last) => (node, is_last),
            Step::Ascend(len) => {
                prefix.truncate(len);
                continue;
            }
        };
        let connector = if is_last { "└─" } else { "├─" };
        let _ = write!(result, "{}{} {}", prefix, connector, node.kind().name());
        if let Some(field) = node.field_name() {
            let _ = write!(result, " ({})", field);
        }
        if options.show_ranges {
            let range = node.range();
            let _ = write!(result, " [{}..{}]", range.start, range.end);
        }
        let _ = writeln!(result, ": {}", label(&node));

        let children: Vec<_> = node.children().filter(visible).collect();
        if children.is_empty() {
            continue;
        }
        stack.push(Step::Ascend(prefix.len()));
        prefix.push_str(if is_last { "  " } else { "│ " });
        push_children(&mut stack, children);
    }
    result
}

fn push_children<'t>(stack: &mut Vec<Step<'t>>, children: Vec<SyntaxNode<'t>>) {
    let count = children.len();
    for (i, child) in children.into_iter().enumerate().rev() {
        stack.push(Step::Line(child, i + 1 == count));
    }
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, tree: &SyntaxTree, options: &DumpOptions) -> Result<String, FormatError> {
        Ok(to_treeviz_str(tree, options))
    }

    fn description(&self) -> &str {
        "Visual tree, one line per node"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bst::parsing::parse;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn test_whitespace_hidden_by_default() {
        let output = to_treeviz_str(&parse("READ\nSORT"), &DumpOptions::default());
        assert_eq!(
            output,
            "├─ read: READ\n│ └─ keyword: READ\n└─ sort: SORT\n  └─ keyword: SORT\n"
        );
    }

    #[test]
    fn test_errors_show_their_message() {
        let output = to_treeviz_str(&parse("}"), &DumpOptions::default());
        assert_eq!(output, "└─ ERROR: unexpected \"}\"\n  └─ }: }\n");
    }

    #[test]
    fn test_prefix_is_restored_after_a_subtree() {
        let source = "FUNCTION {f} { { #1 } }\nREAD";
        let output = to_treeviz_str(&parse(source), &DumpOptions::default());
        assert!(output.contains("\n│   │ ├─ integer (term): #1\n"));
        assert!(output.ends_with("\n└─ read: READ\n  └─ keyword: READ\n"));
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 1_000;
        let source = format!("FUNCTION {{f}} {}{}", "{ ".repeat(depth), "} ".repeat(depth));
        let output = to_treeviz_str(&parse(&source), &DumpOptions::default());
        assert_eq!(output.lines().count(), 5 + 3 * depth);
        assert_eq!(output.lines().last(), Some("    └─ }: }"));
    }
}
