//! Syntax tree
//!
//!     The concrete syntax tree keeps every byte of the source: trivia, punctuation and keywords
//!     are leaves next to the grammatical content, so the text of any node is a slice of the
//!     source and the leaves of the tree partition it.
//!
//! Storage
//!
//!     A tree is a list of top-level segments, one per statement, top-level error region or
//!     top-level trivia token. Each segment is an index arena of nodes whose offsets are
//!     relative to the segment start, and is reference counted. Absolute offsets are computed
//!     from the segment offsets when a node is queried. This is what makes incremental
//!     re-parsing cheap: segments outside an edit are shared with the previous tree as-is, only
//!     the segment offset table is rebuilt.
//!
//!     Arena indices instead of owned child boxes keep construction, traversal and drop free of
//!     native recursion, however deeply function bodies nest.
//!
//! Access
//!
//!     [SyntaxNode] is a cheap copyable handle into a tree. It exposes the kind, range, text,
//!     field-labeled children and supertype membership of a node. The root is a virtual
//!     `source_file` node whose children are the segment roots.

pub mod classify;
pub mod kind;
pub mod node;
pub mod tree;

pub use classify::classify;
pub use kind::{Field, Supertype, SupertypeSet, SyntaxKind};
pub use node::{Children, Preorder, SyntaxNode};
pub use tree::SyntaxTree;

pub(crate) use tree::{NodeData, Segment};
