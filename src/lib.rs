//! # bst
//!
//! An incremental concrete syntax tree parser for BibTeX style (`.bst`) files.
//!
//! A style file is a flat sequence of commands (`ENTRY`, `FUNCTION`, `MACRO`, `READ`,
//! `ITERATE`, ...). [parse] turns any text into a [SyntaxTree] that keeps every byte of the
//! source, labels children by the role they play (`name`, `body`, `func`, ...) and classifies
//! nodes into the `statement`, `term` and `symbol` supertypes. Malformed input never fails to
//! parse; errors are part of the tree and listed by [SyntaxTree::errors].
//!
//! After an edit, [SyntaxTree::edit] re-parses only the region around it and shares the rest
//! of the previous tree.
//!
//! ## Testing
//!
//! For tree assertions in tests, see the [testing module](bst::testing).

pub mod bst;

pub use bst::config::{BstConfig, DumpConfig, DumpFormat, Loader, ParserConfig};
pub use bst::error::{Construct, Diagnostic, EditError, Error, Expected, SyntaxError};
pub use bst::formats::{DumpOptions, FormatRegistry};
pub use bst::incremental::{reparse, TextEdit};
pub use bst::lexing::{lex_at, tokenize, LexMode, Lexeme};
pub use bst::location::{LineIndex, Position};
pub use bst::outline::{Declaration, DeclarationKind, Outline};
pub use bst::parsing::{parse, parse_bytes, Parser};
pub use bst::testing;
pub use bst::syntax::{Field, Supertype, SupertypeSet, SyntaxKind, SyntaxNode, SyntaxTree};
