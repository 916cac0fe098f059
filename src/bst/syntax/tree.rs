//! Tree storage: segments of arena-allocated nodes.

use super::classify::classify;
use super::kind::{Field, Supertype, SupertypeSet, SyntaxKind};
use super::node::{At, SyntaxNode};
use crate::bst::error::{Diagnostic, SyntaxError};
use std::sync::Arc;

/// One node in a segment arena. Offsets are relative to the segment start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) field: Option<Field>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) parent: Option<u32>,
    pub(crate) children: Vec<u32>,
    pub(crate) error: Option<SyntaxError>,
    pub(crate) contains_error: bool,
    pub(crate) supertypes: SupertypeSet,
}

impl NodeData {
    pub(crate) fn new(kind: SyntaxKind, field: Option<Field>, start: usize, end: usize) -> Self {
        NodeData {
            kind,
            field,
            start,
            end,
            parent: None,
            children: Vec::new(),
            error: None,
            contains_error: false,
            supertypes: classify(kind),
        }
    }
}

/// A top-level element of a tree: a statement, a top-level error region or a trivia token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    /// Node 0 is the segment root.
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) len: usize,
    /// Whether the element was closed by its own final token rather than by looking at the
    /// token after it. Only complete statements are safe restart points for re-parsing.
    pub(crate) complete: bool,
}

impl Segment {
    pub(crate) fn root(&self) -> &NodeData {
        &self.nodes[0]
    }

    pub(crate) fn is_complete_statement(&self) -> bool {
        self.complete && self.root().supertypes.contains(Supertype::Statement)
    }

    pub(crate) fn is_statement(&self) -> bool {
        self.root().supertypes.contains(Supertype::Statement)
    }
}

/// An immutable concrete syntax tree together with the text it was parsed from.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    text: Arc<str>,
    pub(crate) segments: Vec<Arc<Segment>>,
    pub(crate) offsets: Vec<usize>,
}

impl SyntaxTree {
    pub(crate) fn from_segments(text: Arc<str>, segments: Vec<Arc<Segment>>) -> Self {
        let mut offsets = Vec::with_capacity(segments.len());
        let mut offset = 0;
        for segment in &segments {
            offsets.push(offset);
            offset += segment.len;
        }
        debug_assert_eq!(offset, text.len(), "segments must cover the source");
        SyntaxTree {
            text,
            segments,
            offsets,
        }
    }

    /// The virtual `source_file` root.
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode::new(self, At::Root)
    }

    /// The source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Top-level statements, in source order.
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode<'_>> {
        self.root()
            .children()
            .filter(|node| node.is(Supertype::Statement))
    }

    /// All leaves that hold source text, trivia included, in source order.
    pub fn tokens(&self) -> impl Iterator<Item = SyntaxNode<'_>> {
        self.root()
            .descendants()
            .filter(|node| node.kind().is_token())
    }

    /// Whether any node in the tree is an error.
    pub fn has_errors(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| segment.root().contains_error)
    }

    /// Every syntax error in source order.
    pub fn errors(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut stack: Vec<SyntaxNode<'_>> = self
            .root()
            .children()
            .filter(|node| node.has_error())
            .collect();
        stack.reverse();

        while let Some(node) = stack.pop() {
            if let Some(error) = node.error() {
                diagnostics.push(Diagnostic {
                    range: node.range(),
                    error: error.clone(),
                });
            }
            let mut children: Vec<_> = node.children().filter(|c| c.has_error()).collect();
            children.reverse();
            stack.extend(children);
        }
        diagnostics
    }

    /// Number of top-level segments shared with `other`, by identity.
    ///
    /// Used to observe subtree reuse across incremental re-parses.
    pub fn shared_segments(&self, other: &SyntaxTree) -> usize {
        self.segments
            .iter()
            .filter(|segment| other.segments.iter().any(|o| Arc::ptr_eq(segment, o)))
            .count()
    }
}

/// Structural equality: same text and same tree shape, kinds, fields, ranges and errors.
impl PartialEq for SyntaxTree {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| Arc::ptr_eq(a, b) || a == b)
    }
}

impl Eq for SyntaxTree {}
