//! Testing utilities for tree assertions
//!
//! Parser tests should assert on the shape and content of the tree, not on generalities like
//! node counts. [assert_tree] offers a fluent API that walks into statements and fields and
//! reports failures with a path to the offending node:
//!
//! ```rust-example
//! use bst::testing::assert_tree;
//!
//! let tree = bst::parse("FUNCTION {f} { #1 'g }");
//! assert_tree(&tree)
//!     .no_errors()
//!     .statement_count(1)
//!     .statement(0, |function| {
//!         function
//!             .kind(SyntaxKind::Function)
//!             .child(Field::Name, |name| { name.text("f"); })
//!             .child(Field::Body, |body| {
//!                 body.term_count(2)
//!                     .term(0, |t| { t.integer(1); })
//!                     .term(1, |t| { t.kind(SyntaxKind::Ref); });
//!             });
//!     });
//! ```
//!
//! Closures receive the assertion by value; end them with `;` to drop the returned builder.

use crate::bst::error::SyntaxError;
use crate::bst::syntax::{Field, Supertype, SyntaxKind, SyntaxNode, SyntaxTree};
use std::ops::Range;

pub fn assert_tree(tree: &SyntaxTree) -> TreeAssertion<'_> {
    TreeAssertion {
        tree,
        context: "tree".to_string(),
    }
}

pub struct TreeAssertion<'t> {
    tree: &'t SyntaxTree,
    context: String,
}

impl<'t> TreeAssertion<'t> {
    pub fn statement_count(self, expected: usize) -> Self {
        let actual = self.tree.statements().count();
        assert_eq!(
            actual, expected,
            "{}: Expected {} statements, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn no_errors(self) -> Self {
        let errors = self.tree.errors();
        assert!(
            errors.is_empty(),
            "{}: Expected no errors, found {:?}",
            self.context,
            errors
        );
        self
    }

    pub fn error_count(self, expected: usize) -> Self {
        let errors = self.tree.errors();
        assert_eq!(
            errors.len(),
            expected,
            "{}: Expected {} errors, found {:?}",
            self.context,
            expected,
            errors
        );
        self
    }

    /// The error at `index` in source order.
    pub fn error(self, index: usize, expected: SyntaxError, range: Range<usize>) -> Self {
        let errors = self.tree.errors();
        let actual = errors.get(index).unwrap_or_else(|| {
            panic!(
                "{}: Error index {} out of bounds ({} errors)",
                self.context,
                index,
                errors.len()
            )
        });
        assert_eq!(
            (&actual.error, &actual.range),
            (&expected, &range),
            "{}: errors[{}] mismatch",
            self.context,
            index
        );
        self
    }

    /// The text of all leaves, concatenated, is the source.
    pub fn round_trips(self) -> Self {
        let text: String = self.tree.tokens().map(|token| token.text()).collect();
        assert_eq!(
            text,
            self.tree.text(),
            "{}: Tokens do not reproduce the source",
            self.context
        );
        self
    }

    pub fn statement<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'t>),
    {
        let count = self.tree.statements().count();
        let node = self.tree.statements().nth(index).unwrap_or_else(|| {
            panic!(
                "{}: Statement index {} out of bounds ({} statements)",
                self.context, index, count
            )
        });
        assertion(NodeAssertion {
            node,
            context: format!("{}:statements[{}]", self.context, index),
        });
        self
    }

    /// The top-level child at `index`, trivia included.
    pub fn top_level<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'t>),
    {
        let node = self.tree.root().children().nth(index).unwrap_or_else(|| {
            panic!(
                "{}: Top-level index {} out of bounds",
                self.context, index
            )
        });
        assertion(NodeAssertion {
            node,
            context: format!("{}:children[{}]", self.context, index),
        });
        self
    }
}

pub struct NodeAssertion<'t> {
    node: SyntaxNode<'t>,
    context: String,
}

impl<'t> NodeAssertion<'t> {
    pub fn node(&self) -> SyntaxNode<'t> {
        self.node
    }

    pub fn kind(self, expected: SyntaxKind) -> Self {
        assert_eq!(
            self.node.kind(),
            expected,
            "{}: Expected kind {}, found {}",
            self.context,
            expected,
            self.node.kind()
        );
        self
    }

    pub fn text(self, expected: &str) -> Self {
        assert_eq!(
            self.node.text(),
            expected,
            "{}: Expected text '{}', found '{}'",
            self.context,
            expected,
            self.node.text()
        );
        self
    }

    pub fn range(self, expected: Range<usize>) -> Self {
        assert_eq!(
            self.node.range(),
            expected,
            "{}: Range mismatch",
            self.context
        );
        self
    }

    pub fn field(self, expected: Field) -> Self {
        assert_eq!(
            self.node.field_name(),
            Some(expected),
            "{}: Expected field {}",
            self.context,
            expected
        );
        self
    }

    pub fn supertype(self, expected: Supertype) -> Self {
        assert!(
            self.node.is(expected),
            "{}: Expected {} to be a {}",
            self.context,
            self.node.kind(),
            expected
        );
        self
    }

    /// Neither this node nor anything below it is an error.
    pub fn clean(self) -> Self {
        assert!(
            !self.node.has_error(),
            "{}: Expected no errors in {:?}",
            self.context,
            self.node
        );
        self
    }

    pub fn has_error(self) -> Self {
        assert!(
            self.node.has_error(),
            "{}: Expected an error in {:?}",
            self.context,
            self.node
        );
        self
    }

    pub fn error(self, expected: SyntaxError) -> Self {
        assert_eq!(
            self.node.error(),
            Some(&expected),
            "{}: Error mismatch on {:?}",
            self.context,
            self.node
        );
        self
    }

    pub fn child<F>(self, field: Field, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'t>),
    {
        let node = self.node.child_by_field(field).unwrap_or_else(|| {
            panic!(
                "{}: Expected a child for field {} in {:?}",
                self.context, field, self.node
            )
        });
        assertion(NodeAssertion {
            node,
            context: format!("{}.{}", self.context, field),
        });
        self
    }

    pub fn missing_field(self, field: Field) -> Self {
        let found = self.node.child_by_field(field);
        assert!(
            found.is_none(),
            "{}: Expected no child for field {}, found {:?}",
            self.context,
            field,
            found
        );
        self
    }

    /// The identifiers directly below this node, e.g. of an `identifier_list`.
    pub fn identifiers(self, expected: &[&str]) -> Self {
        let actual: Vec<_> = self
            .node
            .children()
            .filter(|child| child.kind() == SyntaxKind::Identifier)
            .map(|child| child.text())
            .collect();
        assert_eq!(
            actual, expected,
            "{}: Identifier mismatch",
            self.context
        );
        self
    }

    pub fn term_count(self, expected: usize) -> Self {
        let actual = self.node.children_by_field(Field::Term).count();
        assert_eq!(
            actual, expected,
            "{}: Expected {} terms, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn term<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'t>),
    {
        let node = self
            .node
            .children_by_field(Field::Term)
            .nth(index)
            .unwrap_or_else(|| panic!("{}: Term index {} out of bounds", self.context, index));
        assertion(NodeAssertion {
            node,
            context: format!("{}.term[{}]", self.context, index),
        });
        self
    }

    /// The first direct child of `kind`.
    pub fn child_of_kind<F>(self, kind: SyntaxKind, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'t>),
    {
        let node = self
            .node
            .children()
            .find(|child| child.kind() == kind)
            .unwrap_or_else(|| {
                panic!(
                    "{}: Expected a {} child in {:?}",
                    self.context, kind, self.node
                )
            });
        assertion(NodeAssertion {
            node,
            context: format!("{}/{}", self.context, kind.name()),
        });
        self
    }

    pub fn integer(self, expected: i64) -> Self {
        assert_eq!(
            self.node.integer_value(),
            Some(expected),
            "{}: Integer value mismatch on {:?}",
            self.context,
            self.node
        );
        self
    }

    pub fn string(self, expected: &str) -> Self {
        assert_eq!(
            self.node.string_value(),
            Some(expected),
            "{}: String value mismatch on {:?}",
            self.context,
            self.node
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bst::parsing::parse;

    #[test]
    fn test_fluent_walk() {
        let tree = parse("EXECUTE {begin.bib}");
        assert_tree(&tree)
            .no_errors()
            .round_trips()
            .statement_count(1)
            .statement(0, |execute| {
                execute
                    .kind(SyntaxKind::Execute)
                    .supertype(Supertype::Statement)
                    .clean()
                    .child(Field::Func, |func| {
                        func.text("begin.bib").supertype(Supertype::Symbol);
                    });
            });
    }

    #[test]
    #[should_panic(expected = "Expected 2 statements, found 1")]
    fn test_failures_name_the_problem() {
        assert_tree(&parse("READ")).statement_count(2);
    }

    #[test]
    #[should_panic(expected = "tree:statements[0].name")]
    fn test_failures_carry_a_path() {
        assert_tree(&parse("FUNCTION {f} {}")).statement(0, |f| {
            f.child(Field::Name, |name| {
                name.text("g");
            });
        });
    }
}
