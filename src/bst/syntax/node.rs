//! Node handles.
//!
//!     A [SyntaxNode] borrows the tree it points into and is `Copy`. Navigation never allocates
//!     except in [SyntaxNode::descendants], whose explicit stack replaces recursion.

use super::kind::{Field, Supertype, SupertypeSet, SyntaxKind};
use super::tree::{NodeData, Segment, SyntaxTree};
use crate::bst::error::SyntaxError;
use std::fmt;
use std::ops::Range;

/// Position of a node inside a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum At {
    Root,
    Node { segment: usize, index: u32 },
}

/// A node of a [SyntaxTree]: a composite node or a token leaf.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    tree: &'t SyntaxTree,
    at: At,
}

impl<'t> SyntaxNode<'t> {
    pub(crate) fn new(tree: &'t SyntaxTree, at: At) -> Self {
        SyntaxNode { tree, at }
    }

    fn data(&self) -> Option<(&'t Segment, &'t NodeData, usize)> {
        match self.at {
            At::Root => None,
            At::Node { segment, index } => {
                let seg = &self.tree.segments[segment];
                let offset = self.tree.offsets[segment];
                Some((seg, &seg.nodes[index as usize], offset))
            }
        }
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> SyntaxKind {
        match self.data() {
            Some((_, data, _)) => data.kind,
            None => SyntaxKind::SourceFile,
        }
    }

    /// Absolute byte range.
    pub fn range(&self) -> Range<usize> {
        match self.data() {
            Some((_, data, offset)) => offset + data.start..offset + data.end,
            None => 0..self.tree.len(),
        }
    }

    pub fn text(&self) -> &'t str {
        &self.tree.text()[self.range()]
    }

    /// The field this node fills in its parent, if any.
    pub fn field_name(&self) -> Option<Field> {
        self.data().and_then(|(_, data, _)| data.field)
    }

    /// Supertypes of this node's kind.
    pub fn supertypes(&self) -> SupertypeSet {
        match self.data() {
            Some((_, data, _)) => data.supertypes,
            None => SupertypeSet::EMPTY,
        }
    }

    /// Whether the node belongs to a supertype.
    pub fn is(&self, supertype: Supertype) -> bool {
        self.supertypes().contains(supertype)
    }

    pub fn is_token(&self) -> bool {
        self.kind().is_token()
    }

    /// Whether this node itself carries a syntax error.
    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// Whether this is a zero-width marker for something absent.
    pub fn is_missing(&self) -> bool {
        matches!(self.error(), Some(SyntaxError::MissingToken { .. })) && self.range().is_empty()
    }

    pub fn error(&self) -> Option<&'t SyntaxError> {
        self.data().and_then(|(_, data, _)| data.error.as_ref())
    }

    /// Whether this node or any node below it carries a syntax error.
    pub fn has_error(&self) -> bool {
        match self.data() {
            Some((_, data, _)) => data.contains_error,
            None => self.tree.has_errors(),
        }
    }

    pub fn parent(&self) -> Option<SyntaxNode<'t>> {
        let At::Node { segment, index } = self.at else {
            return None;
        };
        let (_, data, _) = self.data()?;
        let at = match data.parent {
            Some(parent) => At::Node {
                segment,
                index: parent,
            },
            None if index == 0 => At::Root,
            None => return None,
        };
        Some(SyntaxNode::new(self.tree, at))
    }

    /// Direct children in source order, tokens and trivia included.
    pub fn children(&self) -> Children<'t> {
        let len = match self.data() {
            Some((_, data, _)) => data.children.len(),
            None => self.tree.segments.len(),
        };
        Children {
            tree: self.tree,
            parent: self.at,
            front: 0,
            back: len,
        }
    }

    /// Children that show up in S-expression dumps: no whitespace, punctuation or keywords.
    pub fn named_children(&self) -> impl Iterator<Item = SyntaxNode<'t>> {
        self.children().filter(|child| child.kind().is_named())
    }

    /// The first child labeled `field`.
    pub fn child_by_field(&self, field: Field) -> Option<SyntaxNode<'t>> {
        self.children_by_field(field).next()
    }

    /// All children labeled `field`, in source order.
    pub fn children_by_field(&self, field: Field) -> impl Iterator<Item = SyntaxNode<'t>> {
        self.children()
            .filter(move |child| child.field_name() == Some(field))
    }

    /// This node and everything below it, in pre-order.
    pub fn descendants(&self) -> Preorder<'t> {
        Preorder { stack: vec![*self] }
    }

    /// Value of an `integer` token: `#-12` is `-12`.
    pub fn integer_value(&self) -> Option<i64> {
        if self.kind() != SyntaxKind::Integer {
            return None;
        }
        self.text().strip_prefix('#')?.parse().ok()
    }

    /// Content of a `string` token without its quotes.
    pub fn string_value(&self) -> Option<&'t str> {
        if self.kind() != SyntaxKind::String {
            return None;
        }
        self.text().strip_prefix('"')?.strip_suffix('"')
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.at == other.at
    }
}

impl Eq for SyntaxNode<'_> {}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.range();
        write!(f, "{}@{}..{}", self.kind().name(), range.start, range.end)?;
        if let Some(field) = self.field_name() {
            write!(f, " ({})", field)?;
        }
        Ok(())
    }
}

/// Iterator over the direct children of a node.
#[derive(Clone)]
pub struct Children<'t> {
    tree: &'t SyntaxTree,
    parent: At,
    front: usize,
    back: usize,
}

impl<'t> Children<'t> {
    fn get(&self, position: usize) -> SyntaxNode<'t> {
        let at = match self.parent {
            At::Root => At::Node {
                segment: position,
                index: 0,
            },
            At::Node { segment, index } => At::Node {
                segment,
                index: self.tree.segments[segment].nodes[index as usize].children[position],
            },
        };
        SyntaxNode::new(self.tree, at)
    }
}

impl<'t> Iterator for Children<'t> {
    type Item = SyntaxNode<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let node = self.get(self.front);
        self.front += 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.get(self.back))
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Pre-order traversal with an explicit stack.
pub struct Preorder<'t> {
    stack: Vec<SyntaxNode<'t>>,
}

impl<'t> Iterator for Preorder<'t> {
    type Item = SyntaxNode<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().rev());
        Some(node)
    }
}
