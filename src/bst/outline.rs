//! Declaration outline
//!
//! Lists what a style file declares, in source order: functions, macros, entry fields and
//! variables. This is a listing, not a check; duplicates are reported as they appear and
//! nothing is resolved against builtins.

use crate::bst::syntax::{Field, SyntaxKind, SyntaxNode, SyntaxTree};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Function,
    Macro,
    /// A field read from each database entry (`ENTRY` first list)
    EntryField,
    /// A per-entry integer variable (`ENTRY` second list)
    EntryInteger,
    /// A per-entry string variable (`ENTRY` third list)
    EntryString,
    /// A global integer variable (`INTEGERS`)
    Integer,
    /// A global string variable (`STRINGS`)
    String,
}

impl DeclarationKind {
    pub fn name(self) -> &'static str {
        match self {
            DeclarationKind::Function => "function",
            DeclarationKind::Macro => "macro",
            DeclarationKind::EntryField => "entry field",
            DeclarationKind::EntryInteger => "entry integer",
            DeclarationKind::EntryString => "entry string",
            DeclarationKind::Integer => "integer",
            DeclarationKind::String => "string",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    /// Range of the declared name
    pub range: Range<usize>,
    /// Range of the whole declaring statement
    pub statement: Range<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub declarations: Vec<Declaration>,
}

impl Outline {
    pub fn from_tree(tree: &SyntaxTree) -> Self {
        let mut declarations = Vec::new();
        for statement in tree.statements() {
            let mut declare = |kind, node: SyntaxNode<'_>| {
                declarations.push(Declaration {
                    kind,
                    name: node.text().to_string(),
                    range: node.range(),
                    statement: statement.range(),
                });
            };
            match statement.kind() {
                SyntaxKind::Function => {
                    if let Some(name) = statement.child_by_field(Field::Name) {
                        declare(DeclarationKind::Function, name);
                    }
                }
                SyntaxKind::Macro => {
                    if let Some(pattern) = statement.child_by_field(Field::Pattern) {
                        declare(DeclarationKind::Macro, pattern);
                    }
                }
                SyntaxKind::Entry => {
                    let lists = [
                        (Field::Fields, DeclarationKind::EntryField),
                        (Field::Integers, DeclarationKind::EntryInteger),
                        (Field::Strings, DeclarationKind::EntryString),
                    ];
                    for (field, kind) in lists {
                        for name in list_identifiers(statement, field) {
                            declare(kind, name);
                        }
                    }
                }
                SyntaxKind::Integers => {
                    for name in list_identifiers(statement, Field::Integers) {
                        declare(DeclarationKind::Integer, name);
                    }
                }
                SyntaxKind::Strings => {
                    for name in list_identifiers(statement, Field::Strings) {
                        declare(DeclarationKind::String, name);
                    }
                }
                _ => {}
            }
        }
        Outline { declarations }
    }

    pub fn of_kind(&self, kind: DeclarationKind) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(move |d| d.kind == kind)
    }

    /// Names of declared functions, in source order.
    pub fn functions(&self) -> Vec<&str> {
        self.of_kind(DeclarationKind::Function)
            .map(|d| d.name.as_str())
            .collect()
    }

    /// The first function declared with `name`.
    pub fn function(&self, name: &str) -> Option<&Declaration> {
        self.of_kind(DeclarationKind::Function)
            .find(|d| d.name == name)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

fn list_identifiers<'t>(
    statement: SyntaxNode<'t>,
    field: Field,
) -> impl Iterator<Item = SyntaxNode<'t>> {
    statement
        .child_by_field(field)
        .into_iter()
        .flat_map(|list| list.children())
        .filter(|node| node.kind() == SyntaxKind::Identifier)
}
