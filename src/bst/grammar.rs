//! Grammar table
//!
//!     The statement grammar as data. Each statement keyword maps to a [Production]: the node
//!     kind it builds and the fixed sequence of [Item]s that follow the keyword. The parser
//!     interprets these shapes with an explicit frame stack; nothing in the table changes after
//!     it is built.
//!
//!     source_file = (statement | trivia)*
//!     entry       = ENTRY list(fields) list(integers) list(strings)
//!     integers    = INTEGERS list(integers)
//!     strings     = STRINGS list(strings)
//!     macro       = MACRO "{" pattern(pattern) "}" "{" string(subst) "}"
//!     function    = FUNCTION "{" identifier(name) "}" block(body)
//!     read        = READ
//!     execute     = EXECUTE "{" symbol(func) "}"
//!     iterate     = ITERATE "{" symbol(func) "}"
//!     sort        = SORT
//!     reverse     = REVERSE "{" symbol(func) "}"
//!     list        = "{" identifier* "}"
//!     block       = "{" term(term)* "}"
//!     term        = integer | string | ref | identifier | operator | builtin | block
//!     ref         = "'" symbol(symbol)
//!     symbol      = identifier | builtin
//!
//!     Token patterns and their priorities live next to the token enums in
//!     [token](crate::bst::token).

use crate::bst::error::Expected;
use crate::bst::lexing::LexMode;
use crate::bst::syntax::{Field, SyntaxKind};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One element following a statement keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    /// A braced identifier list, built as an `identifier_list` node.
    List(Field),
    /// `{` one token of `class` `}`; the braces belong to the statement.
    Group { field: Field, class: Class },
    /// A function body.
    Block(Field),
}

/// The token class a braced group holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Identifier,
    Symbol,
    Pattern,
    String,
}

impl Class {
    pub fn accepts(self, kind: SyntaxKind) -> bool {
        match self {
            Class::Identifier => kind == SyntaxKind::Identifier,
            Class::Symbol => matches!(kind, SyntaxKind::Identifier | SyntaxKind::Builtin),
            Class::Pattern => kind == SyntaxKind::Pattern,
            Class::String => kind == SyntaxKind::String,
        }
    }

    pub fn expected(self) -> Expected {
        match self {
            Class::Identifier => Expected::Identifier,
            Class::Symbol => Expected::Symbol,
            Class::Pattern => Expected::Pattern,
            Class::String => Expected::String,
        }
    }

    /// The lexing mode for the inside of the group.
    pub fn mode(self) -> LexMode {
        match self {
            Class::Pattern => LexMode::Macro,
            _ => LexMode::Normal,
        }
    }
}

/// The shape of one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Production {
    pub keyword: &'static str,
    pub kind: SyntaxKind,
    pub items: &'static [Item],
}

const SYMBOL_GROUP: &[Item] = &[Item::Group {
    field: Field::Func,
    class: Class::Symbol,
}];

static PRODUCTIONS: [Production; 10] = [
    Production {
        keyword: "ENTRY",
        kind: SyntaxKind::Entry,
        items: &[
            Item::List(Field::Fields),
            Item::List(Field::Integers),
            Item::List(Field::Strings),
        ],
    },
    Production {
        keyword: "INTEGERS",
        kind: SyntaxKind::Integers,
        items: &[Item::List(Field::Integers)],
    },
    Production {
        keyword: "STRINGS",
        kind: SyntaxKind::Strings,
        items: &[Item::List(Field::Strings)],
    },
    Production {
        keyword: "MACRO",
        kind: SyntaxKind::Macro,
        items: &[
            Item::Group {
                field: Field::Pattern,
                class: Class::Pattern,
            },
            Item::Group {
                field: Field::Subst,
                class: Class::String,
            },
        ],
    },
    Production {
        keyword: "FUNCTION",
        kind: SyntaxKind::Function,
        items: &[
            Item::Group {
                field: Field::Name,
                class: Class::Identifier,
            },
            Item::Block(Field::Body),
        ],
    },
    Production {
        keyword: "READ",
        kind: SyntaxKind::Read,
        items: &[],
    },
    Production {
        keyword: "EXECUTE",
        kind: SyntaxKind::Execute,
        items: SYMBOL_GROUP,
    },
    Production {
        keyword: "ITERATE",
        kind: SyntaxKind::Iterate,
        items: SYMBOL_GROUP,
    },
    Production {
        keyword: "SORT",
        kind: SyntaxKind::Sort,
        items: &[],
    },
    Production {
        keyword: "REVERSE",
        kind: SyntaxKind::Reverse,
        items: SYMBOL_GROUP,
    },
];

/// The immutable grammar shared by every parse.
#[derive(Debug)]
pub struct Grammar {
    productions: &'static [Production],
    by_keyword: HashMap<&'static str, usize>,
    by_kind: HashMap<SyntaxKind, usize>,
}

static GRAMMAR: Lazy<Grammar> = Lazy::new(Grammar::build);

impl Grammar {
    /// The process-wide grammar, built on first use.
    pub fn get() -> &'static Grammar {
        &GRAMMAR
    }

    fn build() -> Self {
        let productions: &'static [Production] = &PRODUCTIONS;
        let by_keyword = productions
            .iter()
            .enumerate()
            .map(|(index, production)| (production.keyword, index))
            .collect();
        let by_kind = productions
            .iter()
            .enumerate()
            .map(|(index, production)| (production.kind, index))
            .collect();
        Grammar {
            productions,
            by_keyword,
            by_kind,
        }
    }

    pub fn productions(&self) -> &'static [Production] {
        self.productions
    }

    /// Look up the production for keyword text, in any letter case.
    pub fn production(&self, keyword: &str) -> Option<&'static Production> {
        let upper = keyword.to_ascii_uppercase();
        let index = *self.by_keyword.get(upper.as_str())?;
        self.productions.get(index)
    }

    /// Look up the production that builds a statement kind.
    pub fn production_for(&self, kind: SyntaxKind) -> Option<&'static Production> {
        let index = *self.by_kind.get(&kind)?;
        self.productions.get(index)
    }
}
