//! Node kinds, field names and supertypes.
//!
//!     Every element of the tree, token or composite node, carries a [SyntaxKind]. Tokens are
//!     leaves and their kinds double as node kinds where the grammar uses a single token as a
//!     term (an `identifier` is both a token and a `Term`/`Symbol` node).
//!
//!     Kinds are grouped under three supertypes (see [Supertype]):
//!
//!         Statement: entry, integers, strings, macro, function, read, execute, iterate, sort,
//!                    reverse
//!         Term:      integer, string, ref, identifier, operator, builtin, block
//!         Symbol:    identifier, builtin
//!
//!     The grouping is a static lookup (see [classify](super::classify)) and carries no data.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxKind {
    // Trivia
    Whitespace,
    Comment,

    // Lexical errors, attached like trivia
    LexError,
    UnterminatedString,

    // Punctuation
    LBrace,
    RBrace,
    Quote,

    // Any of the ten command keywords, matched case-insensitively
    Keyword,

    // Leaf tokens that are also terms or symbols
    Identifier,
    Builtin,
    Pattern,
    Integer,
    String,
    Operator,

    // Composite nodes
    SourceFile,
    Entry,
    Integers,
    Strings,
    Macro,
    Function,
    Read,
    Execute,
    Iterate,
    Sort,
    Reverse,
    Block,
    Ref,
    IdentifierList,
    Error,
}

impl SyntaxKind {
    /// Number of kinds, used to size static lookup tables.
    pub const COUNT: usize = SyntaxKind::Error as usize + 1;

    /// Whitespace and comments.
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Whitespace | SyntaxKind::Comment)
    }

    /// Tokens the parser never consumes as grammar content: trivia plus lexical errors.
    pub fn is_filler(self) -> bool {
        self.is_trivia() || matches!(self, SyntaxKind::LexError | SyntaxKind::UnterminatedString)
    }

    /// Whether this kind is produced by the lexer (a leaf).
    pub fn is_token(self) -> bool {
        (self as usize) < (SyntaxKind::SourceFile as usize)
    }

    /// Leaf tokens that form a `Term` on their own inside a block.
    pub fn is_term_token(self) -> bool {
        matches!(
            self,
            SyntaxKind::Integer
                | SyntaxKind::String
                | SyntaxKind::Identifier
                | SyntaxKind::Builtin
                | SyntaxKind::Operator
        )
    }

    /// Named kinds show up in S-expression dumps; punctuation, keywords and whitespace do not.
    pub fn is_named(self) -> bool {
        !matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::LBrace
                | SyntaxKind::RBrace
                | SyntaxKind::Quote
                | SyntaxKind::Keyword
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            SyntaxKind::Whitespace => "whitespace",
            SyntaxKind::Comment => "comment",
            SyntaxKind::LexError => "lex_error",
            SyntaxKind::UnterminatedString => "unterminated_string",
            SyntaxKind::LBrace => "{",
            SyntaxKind::RBrace => "}",
            SyntaxKind::Quote => "'",
            SyntaxKind::Keyword => "keyword",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::Builtin => "builtin",
            SyntaxKind::Pattern => "pattern",
            SyntaxKind::Integer => "integer",
            SyntaxKind::String => "string",
            SyntaxKind::Operator => "operator",
            SyntaxKind::SourceFile => "source_file",
            SyntaxKind::Entry => "entry",
            SyntaxKind::Integers => "integers",
            SyntaxKind::Strings => "strings",
            SyntaxKind::Macro => "macro",
            SyntaxKind::Function => "function",
            SyntaxKind::Read => "read",
            SyntaxKind::Execute => "execute",
            SyntaxKind::Iterate => "iterate",
            SyntaxKind::Sort => "sort",
            SyntaxKind::Reverse => "reverse",
            SyntaxKind::Block => "block",
            SyntaxKind::Ref => "ref",
            SyntaxKind::IdentifierList => "identifier_list",
            SyntaxKind::Error => "ERROR",
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxKind::LBrace | SyntaxKind::RBrace | SyntaxKind::Quote => {
                write!(f, "\"{}\"", self.name())
            }
            _ => f.write_str(self.name()),
        }
    }
}

/// The structural role a child fills within its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Fields,
    Integers,
    Strings,
    Pattern,
    Subst,
    Name,
    Body,
    Term,
    Symbol,
    Func,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Fields => "fields",
            Field::Integers => "integers",
            Field::Strings => "strings",
            Field::Pattern => "pattern",
            Field::Subst => "subst",
            Field::Name => "name",
            Field::Body => "body",
            Field::Term => "term",
            Field::Symbol => "symbol",
            Field::Func => "func",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grouping tags spanning several concrete kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Supertype {
    Statement,
    Term,
    Symbol,
}

impl Supertype {
    pub const ALL: [Supertype; 3] = [Supertype::Statement, Supertype::Term, Supertype::Symbol];

    fn bit(self) -> u8 {
        match self {
            Supertype::Statement => 0b001,
            Supertype::Term => 0b010,
            Supertype::Symbol => 0b100,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Supertype::Statement => "statement",
            Supertype::Term => "term",
            Supertype::Symbol => "symbol",
        }
    }
}

impl fmt::Display for Supertype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A small set of [Supertype]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SupertypeSet(u8);

impl SupertypeSet {
    pub const EMPTY: SupertypeSet = SupertypeSet(0);

    pub const fn from_bits(bits: u8) -> Self {
        SupertypeSet(bits)
    }

    pub fn contains(self, supertype: Supertype) -> bool {
        self.0 & supertype.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Supertype> {
        Supertype::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_kinds_precede_node_kinds() {
        assert!(SyntaxKind::Operator.is_token());
        assert!(SyntaxKind::Whitespace.is_token());
        assert!(!SyntaxKind::SourceFile.is_token());
        assert!(!SyntaxKind::Error.is_token());
    }

    #[test]
    fn filler_covers_trivia_and_lex_errors() {
        assert!(SyntaxKind::Comment.is_filler());
        assert!(SyntaxKind::LexError.is_filler());
        assert!(SyntaxKind::UnterminatedString.is_filler());
        assert!(!SyntaxKind::String.is_filler());
    }

    #[test]
    fn punctuation_displays_quoted() {
        assert_eq!(SyntaxKind::LBrace.to_string(), "\"{\"");
        assert_eq!(SyntaxKind::Builtin.to_string(), "builtin");
    }
}
