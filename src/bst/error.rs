//! Error types.
//!
//!     Syntax errors never escape a parse: they are stored in the tree as data (see
//!     [SyntaxError] and [Diagnostic]). Only conditions outside the grammar, such as input that
//!     is not UTF-8 or an edit computed against a different text, surface as [Error].

use crate::bst::syntax::SyntaxKind;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Constructs that can be left open at end of input or at the next statement keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Construct {
    String,
    Block,
    Group,
    IdentifierList,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Construct::String => "string literal",
            Construct::Block => "block",
            Construct::Group => "braced group",
            Construct::IdentifierList => "identifier list",
        })
    }
}

/// What the parser was looking for when it inserted a missing marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expected {
    LBrace,
    RBrace,
    Identifier,
    Symbol,
    Pattern,
    String,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Expected::LBrace => "\"{\"",
            Expected::RBrace => "\"}\"",
            Expected::Identifier => "identifier",
            Expected::Symbol => "symbol",
            Expected::Pattern => "pattern",
            Expected::String => "string",
        })
    }
}

/// A syntax error recorded in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyntaxError {
    /// A character no token pattern accepts.
    #[error("unrecognized character")]
    LexError,

    /// A string, group or block without its closing delimiter.
    #[error("unterminated {construct}")]
    UnterminatedConstruct { construct: Construct },

    /// A token that is valid on its own but not allowed at this position.
    #[error("unexpected {found}")]
    UnexpectedToken { found: SyntaxKind },

    /// A required token that is absent.
    #[error("missing {expected}")]
    MissingToken { expected: Expected },
}

/// A syntax error together with its absolute byte range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub range: Range<usize>,
    pub error: SyntaxError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}: {}", self.range.start, self.range.end, self.error)
    }
}

/// Reasons an incremental edit is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("the old text does not match the text the tree was parsed from")]
    StaleText,

    #[error("edit range {start}..{end} is outside the {len} byte document")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    #[error("edit offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },

    #[error("new text does not match the edit: expected {expected} bytes, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("new text does not match the edit at byte {offset}")]
    TextMismatch { offset: usize },
}

/// Errors returned by the public entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("input of {size} bytes exceeds the configured limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Format(#[from] crate::bst::formats::FormatError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
