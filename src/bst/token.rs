//! Token definitions for BST source
//!
//!     The token patterns are declared with the logos derive macro, which compiles them into a
//!     single static DFA. Logos resolves overlaps by longest match first and by priority second,
//!     which is exactly the precedence mechanism the grammar needs:
//!
//!     - Keywords carry an explicit high priority so that `READ` is a keyword rather than an
//!       identifier of the same length. A longer identifier still wins by length, so `ENTRYX`
//!       and `sort.format` are single identifiers.
//!     - A builtin is an identifier followed by `$`. The two patterns never accept the same
//!       text; the longer match including `$` wins.
//!     - Comments have the lowest priority. Nothing else starts with `%` today, the priority is
//!       there for future token classes.
//!
//!     There are two token sets. [Token] is used everywhere; [MacroToken] is used only between
//!     the braces of a `MACRO` pattern, where slashes are allowed and angle brackets, colons and
//!     ampersands are not.

use crate::bst::syntax::SyntaxKind;
use logos::Logos;

/// All tokens of the normal lexing mode
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    #[regex(r"[ \t\r\n\f\u{3000}]+")]
    Whitespace,

    #[regex(r"%[^\r\n]*", priority = 1)]
    Comment,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("'")]
    Quote,

    #[token("ENTRY", priority = 10, ignore(ascii_case))]
    #[token("INTEGERS", priority = 10, ignore(ascii_case))]
    #[token("STRINGS", priority = 10, ignore(ascii_case))]
    #[token("MACRO", priority = 10, ignore(ascii_case))]
    #[token("FUNCTION", priority = 10, ignore(ascii_case))]
    #[token("READ", priority = 10, ignore(ascii_case))]
    #[token("EXECUTE", priority = 10, ignore(ascii_case))]
    #[token("ITERATE", priority = 10, ignore(ascii_case))]
    #[token("SORT", priority = 10, ignore(ascii_case))]
    #[token("REVERSE", priority = 10, ignore(ascii_case))]
    Keyword,

    #[regex(r"[A-Za-z_][A-Za-z0-9_.+:<>&\-]*")]
    Identifier,

    #[regex(r"[A-Za-z_][A-Za-z0-9_.+:<>&\-]*\$")]
    Builtin,

    #[regex(r"#-?[0-9]+")]
    Integer,

    #[regex(r#""[^"\n]*""#)]
    String,

    // Strings may not span lines; an opening quote without a closing one on the same line
    // runs to the end of that line.
    #[regex(r#""[^"\n]*"#)]
    UnterminatedString,

    #[token(":=")]
    #[token("=")]
    #[token("*")]
    #[token(">")]
    #[token("<")]
    #[token("+")]
    #[token("-")]
    #[token("&")]
    Operator,
}

impl From<Token> for SyntaxKind {
    fn from(token: Token) -> Self {
        match token {
            Token::Whitespace => SyntaxKind::Whitespace,
            Token::Comment => SyntaxKind::Comment,
            Token::LBrace => SyntaxKind::LBrace,
            Token::RBrace => SyntaxKind::RBrace,
            Token::Quote => SyntaxKind::Quote,
            Token::Keyword => SyntaxKind::Keyword,
            Token::Identifier => SyntaxKind::Identifier,
            Token::Builtin => SyntaxKind::Builtin,
            Token::Integer => SyntaxKind::Integer,
            Token::String => SyntaxKind::String,
            Token::UnterminatedString => SyntaxKind::UnterminatedString,
            Token::Operator => SyntaxKind::Operator,
        }
    }
}

/// Tokens of the macro pattern mode
///
/// Keywords are still recognized here so that an unclosed pattern group does not swallow the
/// statements that follow it.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroToken {
    #[regex(r"[ \t\r\n\f\u{3000}]+")]
    Whitespace,

    #[regex(r"%[^\r\n]*", priority = 1)]
    Comment,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[token("ENTRY", priority = 10, ignore(ascii_case))]
    #[token("INTEGERS", priority = 10, ignore(ascii_case))]
    #[token("STRINGS", priority = 10, ignore(ascii_case))]
    #[token("MACRO", priority = 10, ignore(ascii_case))]
    #[token("FUNCTION", priority = 10, ignore(ascii_case))]
    #[token("READ", priority = 10, ignore(ascii_case))]
    #[token("EXECUTE", priority = 10, ignore(ascii_case))]
    #[token("ITERATE", priority = 10, ignore(ascii_case))]
    #[token("SORT", priority = 10, ignore(ascii_case))]
    #[token("REVERSE", priority = 10, ignore(ascii_case))]
    Keyword,

    #[regex(r"[A-Za-z_][A-Za-z0-9_.+/\-]*")]
    Pattern,
}

impl From<MacroToken> for SyntaxKind {
    fn from(token: MacroToken) -> Self {
        match token {
            MacroToken::Whitespace => SyntaxKind::Whitespace,
            MacroToken::Comment => SyntaxKind::Comment,
            MacroToken::LBrace => SyntaxKind::LBrace,
            MacroToken::RBrace => SyntaxKind::RBrace,
            MacroToken::Keyword => SyntaxKind::Keyword,
            MacroToken::Pattern => SyntaxKind::Pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<(Token, &str)> {
        let mut lexer = Token::lexer(source);
        let mut tokens = Vec::new();
        while let Some(result) = lexer.next() {
            if let Ok(token) = result {
                tokens.push((token, lexer.slice()));
            }
        }
        tokens
    }

    #[test]
    fn test_keywords_any_case() {
        for source in ["ENTRY", "entry", "Entry", "eNtRy"] {
            assert_eq!(lex(source), vec![(Token::Keyword, source)]);
        }
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(lex("ENTRYX"), vec![(Token::Identifier, "ENTRYX")]);
        assert_eq!(lex("sort.format"), vec![(Token::Identifier, "sort.format")]);
    }

    #[test]
    fn test_builtin_takes_trailing_dollar() {
        assert_eq!(lex("add.period$"), vec![(Token::Builtin, "add.period$")]);
        assert_eq!(
            lex("a b$"),
            vec![
                (Token::Identifier, "a"),
                (Token::Whitespace, " "),
                (Token::Builtin, "b$")
            ]
        );
    }

    #[test]
    fn test_integer_and_minus_operator() {
        assert_eq!(lex("#-12"), vec![(Token::Integer, "#-12")]);
        assert_eq!(
            lex("- #3"),
            vec![
                (Token::Operator, "-"),
                (Token::Whitespace, " "),
                (Token::Integer, "#3")
            ]
        );
    }

    #[test]
    fn test_assignment_is_one_operator() {
        assert_eq!(lex(":="), vec![(Token::Operator, ":=")]);
    }

    #[test]
    fn test_strings() {
        assert_eq!(lex("\"hello\""), vec![(Token::String, "\"hello\"")]);
        assert_eq!(
            lex("\"open\nnext"),
            vec![
                (Token::UnterminatedString, "\"open"),
                (Token::Whitespace, "\n"),
                (Token::Identifier, "next")
            ]
        );
    }

    #[test]
    fn test_comment_stops_at_line_break() {
        assert_eq!(
            lex("% note\nREAD"),
            vec![
                (Token::Comment, "% note"),
                (Token::Whitespace, "\n"),
                (Token::Keyword, "READ")
            ]
        );
    }

    #[test]
    fn test_full_width_space_is_whitespace() {
        assert_eq!(
            lex("a\u{3000}b"),
            vec![
                (Token::Identifier, "a"),
                (Token::Whitespace, "\u{3000}"),
                (Token::Identifier, "b")
            ]
        );
    }

    #[test]
    fn test_macro_pattern_allows_slash() {
        let mut lexer = MacroToken::lexer("jan/feb");
        assert_eq!(lexer.next(), Some(Ok(MacroToken::Pattern)));
        assert_eq!(lexer.slice(), "jan/feb");
        assert_eq!(lexer.next(), None);
    }
}
