//! Output formats for syntax trees
//!
//! This module contains the dump formats of a [SyntaxTree](crate::bst::syntax::SyntaxTree):
//! - sexp: the S-expression form parser tests are usually written against
//! - treeviz: one line per node, drawn as a tree
//! - json and yaml: serializations of a [TreeSnapshot]
//!
//! Every format implements [Formatter] and is looked up by name through [FormatRegistry].

pub mod registry;
pub mod sexp;
pub mod snapshot;
pub mod treeviz;

pub use registry::{FormatError, FormatRegistry, Formatter};
pub use sexp::{to_sexp, SexpFormatter};
pub use snapshot::{snapshot_tree, JsonFormatter, SnapshotNode, TreeSnapshot, YamlFormatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};

/// Knobs shared by all formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpOptions {
    /// Append byte ranges to nodes.
    pub show_ranges: bool,
    /// Keep whitespace tokens in the output.
    pub include_trivia: bool,
}

impl DumpOptions {
    pub(crate) fn shows(&self, kind: crate::bst::syntax::SyntaxKind) -> bool {
        kind.is_named() || (self.include_trivia && kind.is_trivia())
    }
}
