//! Tree snapshots
//!
//! A [TreeSnapshot] is a plain, owned copy of a tree suitable for serialization. The JSON and
//! YAML formats are serde renderings of it, so both carry exactly the same information.
//!
//! Nodes are stored flat, in preorder, each pointing at its parent by index. Serializing and
//! dropping a snapshot therefore never recurses, however deeply blocks nest.

use super::registry::{FormatError, Formatter};
use super::DumpOptions;
use crate::bst::error::SyntaxError;
use crate::bst::syntax::{SyntaxKind, SyntaxTree};
use serde::Serialize;
use std::ops::Range;

/// A serializable copy of a whole tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeSnapshot {
    /// Preorder; the root is first and every parent comes before its children.
    pub nodes: Vec<SnapshotNode>,
}

/// One node of a [TreeSnapshot]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotNode {
    pub kind: String,
    /// Index of the parent in [TreeSnapshot::nodes], absent for the root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub range: Range<usize>,
    /// Source text, for tokens only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SyntaxError>,
}

impl TreeSnapshot {
    pub fn root(&self) -> Option<&SnapshotNode> {
        self.nodes.first()
    }

    /// Children of the node at `index`, in source order.
    pub fn children(&self, index: usize) -> impl Iterator<Item = &SnapshotNode> + '_ {
        self.nodes
            .iter()
            .skip(index + 1)
            .filter(move |node| node.parent == Some(index))
    }
}

/// Build the snapshot of a whole tree, without recursion.
pub fn snapshot_tree(tree: &SyntaxTree, options: &DumpOptions) -> TreeSnapshot {
    let mut nodes = Vec::new();
    let mut stack = vec![(tree.root(), None)];

    while let Some((node, parent)) = stack.pop() {
        let index = nodes.len();
        nodes.push(SnapshotNode {
            kind: node.kind().name().to_string(),
            parent,
            field: node.field_name().map(|field| field.name().to_string()),
            range: node.range(),
            text: node.is_token().then(|| node.text().to_string()),
            error: node.error().cloned(),
        });
        let children: Vec<_> = node
            .children()
            .filter(|child| options.include_trivia || child.kind() != SyntaxKind::Whitespace)
            .collect();
        stack.extend(children.into_iter().rev().map(|child| (child, Some(index))));
    }
    TreeSnapshot { nodes }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, tree: &SyntaxTree, options: &DumpOptions) -> Result<String, FormatError> {
        serde_json::to_string_pretty(&snapshot_tree(tree, options))
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "JSON tree snapshot"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, tree: &SyntaxTree, options: &DumpOptions) -> Result<String, FormatError> {
        serde_yaml::to_string(&snapshot_tree(tree, options))
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "YAML tree snapshot"
    }
}
