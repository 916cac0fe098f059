//! Lexer
//!
//!     The parser pulls tokens one at a time: given a cursor and a [LexMode], [lex_at] returns the
//!     next token or trivia and where it ends. Pulling on demand lets the parser switch token
//!     sets for the inside of a `MACRO` pattern group without a separate pre-tokenization pass,
//!     and lets the incremental re-parser start lexing at any top-level boundary.
//!
//!     Any character that no pattern accepts becomes a one-character [SyntaxKind::LexError]
//!     token, so lexing never fails and the tokens of a source always partition it.

use crate::bst::syntax::SyntaxKind;
use crate::bst::token::{MacroToken, Token};
use logos::Logos;
use std::ops::Range;

/// Which token set to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LexMode {
    #[default]
    Normal,
    /// Inside the braces of a `MACRO` pattern.
    Macro,
}

/// A classified span of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lexeme {
    pub kind: SyntaxKind,
    pub start: usize,
    pub end: usize,
}

impl Lexeme {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

/// Lex the token starting at `cursor`. Returns `None` at end of input.
pub fn lex_at(source: &str, cursor: usize, mode: LexMode) -> Option<Lexeme> {
    let rest = source.get(cursor..).filter(|rest| !rest.is_empty())?;

    let (result, span) = match mode {
        LexMode::Normal => {
            let mut lexer = Token::lexer(rest);
            let result = lexer.next()?.map(SyntaxKind::from);
            (result, lexer.span())
        }
        LexMode::Macro => {
            let mut lexer = MacroToken::lexer(rest);
            let result = lexer.next()?.map(SyntaxKind::from);
            (result, lexer.span())
        }
    };

    let lexeme = match result {
        Ok(kind) => Lexeme {
            kind,
            start: cursor + span.start,
            end: cursor + span.end,
        },
        Err(()) => {
            let width = rest.chars().next().map_or(1, char::len_utf8);
            Lexeme {
                kind: SyntaxKind::LexError,
                start: cursor,
                end: cursor + width,
            }
        }
    };
    Some(lexeme)
}

/// Tokenize a whole source in normal mode, trivia included.
pub fn tokenize(source: &str) -> Vec<Lexeme> {
    let mut tokens = Vec::new();
    let mut cursor = 0;
    while let Some(lexeme) = lex_at(source, cursor, LexMode::Normal) {
        cursor = lexeme.end;
        tokens.push(lexeme);
    }
    tokens
}
