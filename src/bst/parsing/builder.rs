//! Segment builder
//!
//! Builds the node arena of one top-level segment from start/token/finish events, the same
//! event shape a green-tree builder uses. Offsets passed in are absolute; they are stored
//! relative to the segment base so the finished segment can be shifted freely.

use crate::bst::error::{Construct, SyntaxError};
use crate::bst::syntax::{Field, NodeData, Segment, SyntaxKind};

pub(crate) struct SegmentBuilder {
    base: usize,
    nodes: Vec<NodeData>,
    open: Vec<u32>,
    /// Relative end of the last token added.
    end: usize,
}

impl SegmentBuilder {
    pub(crate) fn new(base: usize) -> Self {
        SegmentBuilder {
            base,
            nodes: Vec::new(),
            open: Vec::new(),
            end: 0,
        }
    }

    fn attach(&mut self, mut node: NodeData) -> u32 {
        let index = self.nodes.len() as u32;
        if let Some(&parent) = self.open.last() {
            node.parent = Some(parent);
            let parent = &mut self.nodes[parent as usize];
            parent.children.push(index);
            parent.contains_error |= node.contains_error;
        }
        self.nodes.push(node);
        index
    }

    /// Open a composite node starting at absolute offset `at`.
    pub(crate) fn start_node(&mut self, kind: SyntaxKind, field: Option<Field>, at: usize) {
        let start = at - self.base;
        let index = self.attach(NodeData::new(kind, field, start, start));
        self.open.push(index);
    }

    /// Add a leaf. Lexical error tokens carry their error.
    pub(crate) fn token(&mut self, kind: SyntaxKind, start: usize, end: usize, field: Option<Field>) {
        let mut node = NodeData::new(kind, field, start - self.base, end - self.base);
        node.error = match kind {
            SyntaxKind::LexError => Some(SyntaxError::LexError),
            SyntaxKind::UnterminatedString => Some(SyntaxError::UnterminatedConstruct {
                construct: Construct::String,
            }),
            _ => None,
        };
        node.contains_error = node.error.is_some();
        self.end = node.end;
        self.attach(node);
    }

    /// Add a zero-width error node at the end of what has been built so far.
    pub(crate) fn marker(&mut self, error: SyntaxError) {
        let mut node = NodeData::new(SyntaxKind::Error, None, self.end, self.end);
        node.error = Some(error);
        node.contains_error = true;
        self.attach(node);
    }

    /// Close the innermost open node; it ends where its last child ends.
    pub(crate) fn finish_node(&mut self, error: Option<SyntaxError>) {
        let Some(index) = self.open.pop() else {
            return;
        };
        let end = self.end;
        let node = &mut self.nodes[index as usize];
        node.end = end.max(node.start);
        node.contains_error |= error.is_some();
        node.error = error;
        let contains_error = node.contains_error;
        if let Some(parent) = node.parent {
            self.nodes[parent as usize].contains_error |= contains_error;
        }
    }

    pub(crate) fn finish(mut self, complete: bool) -> Segment {
        while !self.open.is_empty() {
            self.finish_node(None);
        }
        let len = self.nodes.first().map_or(0, |root| root.end);
        Segment {
            nodes: self.nodes,
            len,
            complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bst::error::Expected;

    #[test]
    fn offsets_are_relative_to_the_base() {
        let mut builder = SegmentBuilder::new(10);
        builder.start_node(SyntaxKind::Read, None, 10);
        builder.token(SyntaxKind::Keyword, 10, 14, None);
        let segment = builder.finish(true);
        assert_eq!(segment.len, 4);
        assert_eq!(segment.nodes[1].start, 0);
        assert_eq!(segment.nodes[1].parent, Some(0));
    }

    #[test]
    fn errors_propagate_to_ancestors() {
        let mut builder = SegmentBuilder::new(0);
        builder.start_node(SyntaxKind::Execute, None, 0);
        builder.token(SyntaxKind::Keyword, 0, 7, None);
        builder.marker(SyntaxError::MissingToken {
            expected: Expected::LBrace,
        });
        let segment = builder.finish(false);
        assert!(segment.root().contains_error);
        assert_eq!(segment.nodes[2].start, 7);
        assert_eq!(segment.nodes[2].end, 7);
    }

    #[test]
    fn a_lone_token_is_its_own_root() {
        let mut builder = SegmentBuilder::new(3);
        builder.token(SyntaxKind::LexError, 3, 4, None);
        let segment = builder.finish(false);
        assert_eq!(segment.nodes.len(), 1);
        assert_eq!(segment.root().error, Some(SyntaxError::LexError));
    }
}
